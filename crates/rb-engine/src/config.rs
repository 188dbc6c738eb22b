//! Engine-wide settings.
//!
//! ```json
//! { "tickDurationSecs": 0.06, "seed": 42, "chooseIntervalTicks": 5, "tieEpsilon": 0.001 }
//! ```
//!
//! Every field is optional; missing ones take the defaults below.

use rb_core::EngineClock;
use rb_core::time::DEFAULT_TICK_DURATION_SECS;
use serde::{Deserialize, Serialize};

use crate::{EngineError, EngineResult};

pub const DEFAULT_CHOOSE_INTERVAL_TICKS: u64 = 5;
pub const DEFAULT_TIE_EPSILON: f32 = 1e-3;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Engine seconds per tick.
    pub tick_duration_secs: f64,

    /// Master seed.  The robot RNG and the chooser RNG are derived from it.
    pub seed: u64,

    /// The chooser re-scores behaviors every this many ticks, and also
    /// whenever the active behavior ends.
    pub choose_interval_ticks: u64,

    /// Scores within this distance of the best are treated as tied.
    pub tie_epsilon: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tick_duration_secs: DEFAULT_TICK_DURATION_SECS,
            seed: 0,
            choose_interval_ticks: DEFAULT_CHOOSE_INTERVAL_TICKS,
            tie_epsilon: DEFAULT_TIE_EPSILON,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.tick_duration_secs.is_finite() && self.tick_duration_secs > 0.0) {
            return Err(EngineError::Config(format!(
                "tickDurationSecs must be positive, got {}",
                self.tick_duration_secs
            )));
        }
        if self.choose_interval_ticks == 0 {
            return Err(EngineError::Config("chooseIntervalTicks must be at least 1".into()));
        }
        if !(self.tie_epsilon.is_finite() && self.tie_epsilon >= 0.0) {
            return Err(EngineError::Config(format!(
                "tieEpsilon must be non-negative, got {}",
                self.tie_epsilon
            )));
        }
        Ok(())
    }

    pub fn make_clock(&self) -> EngineClock {
        EngineClock::new(self.tick_duration_secs)
    }
}
