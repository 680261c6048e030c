//! Apple Knight - a side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, patrols, progression)
//! - `level`: Level documents and read-only level templates
//! - `game`: Session glue between the simulation, persistence and the guide
//! - `guide`: The owl guide's dialogue queue
//! - `renderer`: Presentation snapshots, sprite slots and the canvas backend
//! - `platform`: Fixed timestep scheduler and input mapping
//! - `persistence`: Progress and settings storage
//! - `tuning`: Data-driven gameplay constants

pub mod game;
pub mod guide;
pub mod level;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Simulation steps per second
    pub const STEPS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_STEP_MS: f64 = 1000.0 / STEPS_PER_SECOND as f64;
    /// Maximum substeps per frame to prevent a catch-up burst
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta a single frame may feed into the accumulator
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;
}

/// Convert a wall-clock duration in milliseconds to whole simulation steps
#[inline]
pub fn ms_to_steps(ms: f64) -> u32 {
    (ms / consts::SIM_STEP_MS).round().max(0.0) as u32
}
