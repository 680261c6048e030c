//! Presentation module
//!
//! The simulation never draws. Each frame the host captures a
//! [`RenderSnapshot`] and hands it to a backend; the canvas backend only
//! exists on the web build.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod snapshot;
pub mod sprites;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use snapshot::{CollectibleView, GuideView, HazardView, PlayerView, RenderSnapshot};
pub use sprites::{SpriteSet, SpriteSlot, SpriteState};
