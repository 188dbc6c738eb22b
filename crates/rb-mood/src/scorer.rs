//! Mood-driven score functions.
//!
//! A [`MoodScorer`] is authored as a JSON array of emotion scorers:
//!
//! ```json
//! [
//!   { "emotionType": "Happy", "scoreGraph": { "nodes": [ { "x": -1, "y": 0.2 }, { "x": 1, "y": 1 } ] }, "trackDelta": false },
//!   { "emotionType": "Stimulated", "scoreGraph": { "nodes": [ { "x": 0, "y": 1 } ] }, "trackDelta": true }
//! ]
//! ```

use rb_core::Graph2d;
use serde::{Deserialize, Serialize};

use crate::{EmotionType, MoodManager, MoodResult};

/// Window a `trackDelta` scorer measures an emotion's change over.
pub const TRACK_DELTA_WINDOW_SECS: f64 = 2.0;

/// Maps one emotion (its value, or its recent change) through a graph.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionScorer {
    pub emotion_type: EmotionType,
    pub score_graph:  Graph2d,
    pub track_delta:  bool,
}

impl EmotionScorer {
    pub fn new(emotion_type: EmotionType, score_graph: Graph2d, track_delta: bool) -> Self {
        EmotionScorer { emotion_type, score_graph, track_delta }
    }

    pub fn evaluate(&self, mood: &MoodManager) -> f32 {
        let x = if self.track_delta {
            mood.delta_recent_seconds(self.emotion_type, TRACK_DELTA_WINDOW_SECS)
        } else {
            mood.emotion_value(self.emotion_type)
        };
        self.score_graph.evaluate(x)
    }
}

/// Average of its emotion scorers, except that any scorer returning
/// exactly `0.0` vetoes the whole score.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodScorer {
    scorers: Vec<EmotionScorer>,
}

impl MoodScorer {
    pub fn new(scorers: Vec<EmotionScorer>) -> Self {
        MoodScorer { scorers }
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scorers.len()
    }

    pub fn scorers(&self) -> &[EmotionScorer] {
        &self.scorers
    }

    pub fn push(&mut self, scorer: EmotionScorer) {
        self.scorers.push(scorer);
    }

    pub fn validate(&self) -> MoodResult<()> {
        for scorer in &self.scorers {
            scorer.score_graph.validate()?;
        }
        Ok(())
    }

    pub fn evaluate(&self, mood: &MoodManager) -> f32 {
        if self.scorers.is_empty() {
            return 0.0;
        }
        let mut total = 0.0;
        for scorer in &self.scorers {
            let score = scorer.evaluate(mood);
            if score == 0.0 {
                return 0.0;
            }
            total += score;
        }
        total / self.scorers.len() as f32
    }
}
