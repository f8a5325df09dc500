//! Difficulty ramp
//!
//! One ramp step per RAMP_PERIOD of running time. Each step shrinks the spawn
//! interval and mole lifetime ranges by RAMP_DECAY, down to MIN_FACTOR of baseline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::SecondsRange;
use crate::consts::*;

/// Ramp step for the given running time
pub fn ramp_step(elapsed: Duration) -> u32 {
    (elapsed.as_millis() / RAMP_PERIOD.as_millis()) as u32
}

/// Multiplier applied to the baseline ranges at `ramp`
pub fn ramp_factor(ramp: u32) -> f64 {
    (1.0 - ramp as f64 * RAMP_DECAY).max(MIN_FACTOR)
}

/// Live difficulty parameters used by future spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub ramp: u32,
    pub factor: f64,
    pub spawn_interval: SecondsRange,
    pub mole_lifetime: SecondsRange,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::at_ramp(0)
    }
}

impl Difficulty {
    pub fn at_ramp(ramp: u32) -> Self {
        let factor = ramp_factor(ramp);
        Self {
            ramp,
            factor,
            spawn_interval: SecondsRange::from(SPAWN_INTERVAL_RANGE).scaled(factor),
            mole_lifetime: SecondsRange::from(MOLE_LIFETIME_RANGE).scaled(factor),
        }
    }

    /// Recompute from running time. Returns true if the ramp step changed.
    pub fn update(&mut self, elapsed: Duration) -> bool {
        let ramp = ramp_step(elapsed);
        let changed = ramp != self.ramp;
        *self = Self::at_ramp(ramp);
        changed
    }
}
