//! Fixed-step driver
//!
//! Converts variable frame time into whole 60 Hz simulation ticks. Long
//! stalls (tab switches, breakpoints) are clamped so the game never tries to
//! catch up on seconds of backlog in one frame.

use super::state::GameState;
use super::tick::{TickInput, tick};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Largest frame delta honoured, in seconds
const MAX_FRAME_DT: f32 = 0.1;

/// Accumulates wall-clock time and spends it in fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leftover time not yet spent on a tick, in seconds
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Drop any banked time, e.g. after loading a new session
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Feed `frame_dt` seconds of elapsed time and run as many ticks as it
    /// covers, up to [`MAX_SUBSTEPS`]. Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Backlog beyond the substep cap is dropped rather than carried
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            log::trace!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator %= SIM_DT;
        }

        substeps
    }
}
