//! `ActivityStrategy`: when a long-running activity may start and when it
//! should end.
//!
//! ```json
//! {
//!   "minDurationSecs": 30,
//!   "maxDurationSecs": 120,
//!   "cooldownSecs": 60,
//!   "requiredMinStartMoodScore": 0.5,
//!   "moodScorer": [
//!     { "emotionType": "Social", "scoreGraph": { "nodes": [ { "x": -1, "y": 0 }, { "x": 1, "y": 1 } ] }, "trackDelta": false }
//!   ]
//! }
//! ```
//!
//! Durations use `-1` for "not set".  `requiredMinStartMoodScore` and
//! `moodScorer` come as a pair; either one alone is a configuration error.

use rb_mood::{MoodManager, MoodScorer};
use serde::{Deserialize, Serialize};

use crate::{BehaviorError, BehaviorResult};

fn unset() -> f64 {
    -1.0
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityStrategyConfig {
    #[serde(default = "unset")]
    pub min_duration_secs: f64,

    #[serde(default = "unset")]
    pub max_duration_secs: f64,

    #[serde(default = "unset")]
    pub cooldown_secs: f64,

    #[serde(default)]
    pub required_min_start_mood_score: Option<f32>,

    #[serde(default)]
    pub mood_scorer: Option<MoodScorer>,
}

impl Default for ActivityStrategyConfig {
    fn default() -> Self {
        ActivityStrategyConfig {
            min_duration_secs: unset(),
            max_duration_secs: unset(),
            cooldown_secs: unset(),
            required_min_start_mood_score: None,
            mood_scorer: None,
        }
    }
}

#[derive(Clone, Debug)]
struct MoodGate {
    min_score: f32,
    scorer:    MoodScorer,
}

#[derive(Clone, Debug)]
pub struct ActivityStrategy {
    min_duration_secs: Option<f64>,
    max_duration_secs: Option<f64>,
    cooldown_secs:     Option<f64>,
    start_gate:        Option<MoodGate>,
}

fn set(value: f64) -> Option<f64> {
    (value >= 0.0).then_some(value)
}

impl ActivityStrategy {
    pub fn new(config: ActivityStrategyConfig) -> BehaviorResult<Self> {
        let start_gate = match (config.required_min_start_mood_score, config.mood_scorer) {
            (Some(min_score), Some(scorer)) => {
                scorer.validate()?;
                Some(MoodGate { min_score, scorer })
            }
            (None, None) => None,
            (Some(_), None) => {
                return Err(BehaviorError::Config(
                    "requiredMinStartMoodScore needs a moodScorer".into(),
                ));
            }
            (None, Some(_)) => {
                return Err(BehaviorError::Config(
                    "moodScorer given without requiredMinStartMoodScore".into(),
                ));
            }
        };
        let strategy = ActivityStrategy {
            min_duration_secs: set(config.min_duration_secs),
            max_duration_secs: set(config.max_duration_secs),
            cooldown_secs: set(config.cooldown_secs),
            start_gate,
        };
        if let (Some(min), Some(max)) = (strategy.min_duration_secs, strategy.max_duration_secs) {
            if max < min {
                return Err(BehaviorError::Config(format!(
                    "maxDurationSecs ({max}) is less than minDurationSecs ({min})"
                )));
            }
        }
        Ok(strategy)
    }

    /// No limits at all: always wants to start, never wants to end.
    pub fn unrestricted() -> Self {
        ActivityStrategy {
            min_duration_secs: None,
            max_duration_secs: None,
            cooldown_secs: None,
            start_gate: None,
        }
    }

    pub fn wants_to_start(&self, now_secs: f64, last_finished_secs: Option<f64>, mood: &MoodManager) -> bool {
        if let (Some(cooldown), Some(last)) = (self.cooldown_secs, last_finished_secs) {
            if now_secs - last < cooldown {
                return false;
            }
        }
        match &self.start_gate {
            Some(gate) => gate.scorer.evaluate(mood) >= gate.min_score,
            None => true,
        }
    }

    pub fn wants_to_end(&self, now_secs: f64, started_secs: f64) -> bool {
        let elapsed = now_secs - started_secs;
        if self.min_duration_secs.is_some_and(|min| elapsed < min) {
            return false;
        }
        self.max_duration_secs.is_some_and(|max| elapsed >= max)
    }
}
