//! Behavior configuration record.
//!
//! ```json
//! {
//!   "name": "ExploreLookAround",
//!   "behaviorGroups": ["Freeplay"],
//!   "requiredUnlockId": "Explore",
//!   "requiredRecentDriveOffCharger_sec": -1,
//!   "emotionScorers": [
//!     { "emotionType": "Stimulated",
//!       "scoreGraph": { "nodes": [ { "x": -1, "y": 1 }, { "x": 1, "y": 0.1 } ] },
//!       "trackDelta": false }
//!   ],
//!   "repetitionPenalty": { "nodes": [ { "x": 0, "y": 0 }, { "x": 30, "y": 1 } ] },
//!   "runningPenalty":    { "nodes": [ { "x": 0, "y": 1 }, { "x": 60, "y": 0.5 } ] },
//!   "considerThisHasRunForBehaviorObjective": "Explored"
//! }
//! ```
//!
//! Time windows use `-1` (or omission) for "no requirement".  Empty
//! penalty graphs are normalised to the identity curve.

use rb_core::Graph2d;
use rb_mood::MoodScorer;
use serde::{Deserialize, Serialize};

use crate::{BehaviorError, BehaviorObjective, BehaviorResult};

/// Coarse grouping used by choosers to filter candidates.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum BehaviorGroup {
    Freeplay,
    Social,
    Play,
    Reactions,
    Idle,
}

fn unset() -> f64 {
    -1.0
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorConfig {
    pub name: String,

    #[serde(default)]
    pub behavior_groups: Vec<BehaviorGroup>,

    #[serde(default)]
    pub required_unlock_id: Option<String>,

    #[serde(default = "unset", rename = "requiredRecentDriveOffCharger_sec")]
    pub required_recent_drive_off_charger_secs: f64,

    #[serde(default = "unset", rename = "requiredRecentSwitchToParent_sec")]
    pub required_recent_switch_to_parent_secs: f64,

    #[serde(default)]
    pub required_process: Option<String>,

    #[serde(default)]
    pub executable_behavior_type: Option<String>,

    #[serde(default)]
    pub emotion_scorers: MoodScorer,

    #[serde(default)]
    pub flat_score: Option<f32>,

    #[serde(default)]
    pub repetition_penalty: Graph2d,

    #[serde(default, alias = "activatedPenalty")]
    pub running_penalty: Graph2d,

    #[serde(default)]
    pub consider_this_has_run_for_behavior_objective: Option<BehaviorObjective>,
}

impl BehaviorConfig {
    /// A config with only a name: flat score 0, no requirements, no penalties.
    pub fn new(name: impl Into<String>) -> Self {
        BehaviorConfig {
            name: name.into(),
            behavior_groups: Vec::new(),
            required_unlock_id: None,
            required_recent_drive_off_charger_secs: unset(),
            required_recent_switch_to_parent_secs: unset(),
            required_process: None,
            executable_behavior_type: None,
            emotion_scorers: MoodScorer::default(),
            flat_score: None,
            repetition_penalty: Graph2d::default(),
            running_penalty: Graph2d::default(),
            consider_this_has_run_for_behavior_objective: None,
        }
    }

    pub fn with_flat_score(mut self, score: f32) -> Self {
        self.flat_score = Some(score);
        self
    }

    pub fn validate(&self) -> BehaviorResult<()> {
        if self.name.is_empty() {
            return Err(BehaviorError::Config("behavior name must not be empty".into()));
        }
        if self.flat_score.is_some() && !self.emotion_scorers.is_empty() {
            return Err(BehaviorError::Config(format!(
                "'{}': flatScore and emotionScorers are mutually exclusive",
                self.name
            )));
        }
        self.emotion_scorers.validate()?;
        self.repetition_penalty.validate()?;
        self.running_penalty.validate()?;
        Ok(())
    }

    /// Validate, then replace empty penalty graphs with the identity curve.
    pub fn normalized(mut self) -> BehaviorResult<Self> {
        self.validate()?;
        self.repetition_penalty = self.repetition_penalty.or_identity();
        self.running_penalty = self.running_penalty.or_identity();
        Ok(self)
    }
}
