//! Mood manager configuration record.
//!
//! ```json
//! {
//!   "historyTicks": 100,
//!   "sameSourceRepetitionPenalty": { "nodes": [ { "x": 0, "y": 0 }, { "x": 10, "y": 1 } ] },
//!   "decay": [
//!     { "emotionType": "Stimulated", "graph": { "nodes": [ { "x": 0, "y": 1 }, { "x": 60, "y": 0 } ] } }
//!   ]
//! }
//! ```

use rb_core::Graph2d;
use serde::{Deserialize, Serialize};

use crate::{EmotionType, MoodError, MoodResult};

pub const DEFAULT_HISTORY_TICKS: usize = 100;

fn default_history_ticks() -> usize {
    DEFAULT_HISTORY_TICKS
}

/// Repeated additions from one source within 10 s are scaled down linearly.
fn default_same_source_penalty() -> Graph2d {
    Graph2d::new(&[(0.0, 0.0), (10.0, 1.0)]).unwrap_or_else(|_| Graph2d::identity())
}

/// Time-ratio decay curve for one emotion: the value becomes
/// `value_at_last_change * graph(secs since last change)`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionDecayConfig {
    pub emotion_type: EmotionType,
    pub graph:        Graph2d,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodConfig {
    #[serde(default = "default_history_ticks")]
    pub history_ticks: usize,

    #[serde(default = "default_same_source_penalty")]
    pub same_source_repetition_penalty: Graph2d,

    #[serde(default)]
    pub decay: Vec<EmotionDecayConfig>,
}

impl Default for MoodConfig {
    fn default() -> Self {
        MoodConfig {
            history_ticks: DEFAULT_HISTORY_TICKS,
            same_source_repetition_penalty: default_same_source_penalty(),
            decay: Vec::new(),
        }
    }
}

impl MoodConfig {
    pub fn validate(&self) -> MoodResult<()> {
        if self.history_ticks == 0 {
            return Err(MoodError::Config("historyTicks must be at least 1".into()));
        }
        self.same_source_repetition_penalty.validate()?;
        for (i, entry) in self.decay.iter().enumerate() {
            entry.graph.validate()?;
            if self.decay[..i].iter().any(|d| d.emotion_type == entry.emotion_type) {
                return Err(MoodError::Config(format!(
                    "duplicate decay graph for {}",
                    entry.emotion_type
                )));
            }
        }
        Ok(())
    }

    pub fn decay_for(&self, emotion: EmotionType) -> Option<&Graph2d> {
        self.decay.iter().find(|d| d.emotion_type == emotion).map(|d| &d.graph)
    }
}
