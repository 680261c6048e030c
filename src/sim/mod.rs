//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, velocities are per step
//! - No RNG
//! - Stable iteration order (level order for platforms, hazards and items)
//! - No rendering or platform dependencies

pub mod body;
pub mod collectible;
pub mod collision;
pub mod patrol;
pub mod progression;
pub mod state;
pub mod tick;

pub use body::{Body, Facing, Player, Rect};
pub use collectible::{Collectible, CollectibleTracker, Pickup, within_pickup_range};
pub use collision::{Contact, LevelBounds, clamp_to_bounds, move_and_collide};
pub use patrol::{Hazard, PatrolOutcome, Waypoint};
pub use progression::{LevelPhase, ProgressState, SavedPoint, Transition, evaluate};
pub use state::{GameEvent, GameState, LevelInstance};
pub use tick::{TickInput, tick};
