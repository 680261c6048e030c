//! Platform abstraction layer
//!
//! Host-independent pieces of the frame driver:
//! - Fixed timestep scheduling with pause/resume
//! - Key and touch mapping into per-step input intent
//! - Storage backends live in `persistence`

pub mod input;
pub mod time;

pub use input::{Action, InputState, TouchButton};
pub use time::{FixedTimestep, Simulation};
