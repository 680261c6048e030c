//! Fixed timestep scheduler
//!
//! The host calls [`FixedTimestep::frame`] once per display frame with a
//! millisecond timestamp. Zero or more simulation steps run, then exactly one
//! draw.

use crate::consts::{MAX_FRAME_DELTA_MS, MAX_SUBSTEPS, SIM_STEP_MS};

/// Something the scheduler can drive
pub trait Simulation {
    /// Advance one fixed step
    fn step(&mut self);
    /// Present the current state
    fn draw(&mut self);
}

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step_ms: f64,
    max_substeps: u32,
    max_frame_delta_ms: f64,
    accumulator: f64,
    last_timestamp: Option<f64>,
    paused: bool,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::with_limits(SIM_STEP_MS, MAX_SUBSTEPS, MAX_FRAME_DELTA_MS)
    }

    pub fn with_limits(step_ms: f64, max_substeps: u32, max_frame_delta_ms: f64) -> Self {
        Self {
            step_ms,
            max_substeps: max_substeps.max(1),
            max_frame_delta_ms,
            accumulator: 0.0,
            last_timestamp: None,
            paused: false,
        }
    }

    /// Handle one host frame. Returns how many steps ran.
    pub fn frame<S: Simulation>(&mut self, timestamp_ms: f64, sim: &mut S) -> u32 {
        let mut steps = 0;

        if !self.paused {
            // First frame after start or resume only sets the reference
            let delta = match self.last_timestamp {
                Some(last) => (timestamp_ms - last).clamp(0.0, self.max_frame_delta_ms),
                None => 0.0,
            };
            self.last_timestamp = Some(timestamp_ms);
            self.accumulator += delta;

            while self.accumulator >= self.step_ms && steps < self.max_substeps {
                sim.step();
                self.accumulator -= self.step_ms;
                steps += 1;
            }

            if self.accumulator >= self.step_ms {
                let dropped = (self.accumulator / self.step_ms).floor();
                log::debug!("Dropping {} catch-up steps", dropped);
                self.accumulator %= self.step_ms;
            }
        }

        sim.draw();
        steps
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::debug!("Scheduler paused");
            self.paused = true;
        }
    }

    /// Resume without a catch-up burst for the paused time
    pub fn resume(&mut self) {
        if self.paused {
            log::debug!("Scheduler resumed");
            self.paused = false;
            self.last_timestamp = None;
            self.accumulator = 0.0;
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Unconsumed time in milliseconds
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}
