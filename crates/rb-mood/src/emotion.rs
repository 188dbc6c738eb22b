//! `EmotionType` and the per-emotion state kept by the mood manager.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use rb_core::Graph2d;
use serde::{Deserialize, Serialize};

use crate::MoodError;

// ── EmotionType ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum EmotionType {
    Happy,
    Calm,
    Brave,
    Confident,
    Social,
    Stimulated,
}

impl EmotionType {
    pub const COUNT: usize = 6;

    pub const ALL: [EmotionType; Self::COUNT] = [
        EmotionType::Happy,
        EmotionType::Calm,
        EmotionType::Brave,
        EmotionType::Confident,
        EmotionType::Social,
        EmotionType::Stimulated,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmotionType::Happy      => "Happy",
            EmotionType::Calm       => "Calm",
            EmotionType::Brave      => "Brave",
            EmotionType::Confident  => "Confident",
            EmotionType::Social     => "Social",
            EmotionType::Stimulated => "Stimulated",
        }
    }
}

impl fmt::Display for EmotionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmotionType {
    type Err = MoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionType::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| MoodError::UnknownEmotion(s.to_owned()))
    }
}

// ── Emotion ───────────────────────────────────────────────────────────────────

/// Value of an emotion at the start of one tick.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct HistorySample {
    pub time_secs: f64,
    pub value:     f32,
}

/// One emotion's value plus its start-of-tick history.
#[derive(Clone, Debug)]
pub struct Emotion {
    value:                f32,
    value_at_last_change: f32,
    last_change_secs:     f64,
    decay:                Option<Graph2d>,
    history:              VecDeque<HistorySample>,
    max_history:          usize,
}

impl Emotion {
    pub(crate) fn new(decay: Option<Graph2d>, max_history: usize) -> Self {
        Emotion {
            value: 0.0,
            value_at_last_change: 0.0,
            last_change_secs: 0.0,
            decay,
            history: VecDeque::with_capacity(max_history),
            max_history,
        }
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn history(&self) -> impl ExactSizeIterator<Item = &HistorySample> {
        self.history.iter()
    }

    pub(crate) fn set(&mut self, value: f32, now_secs: f64) {
        self.value = value.clamp(-1.0, 1.0);
        self.value_at_last_change = self.value;
        self.last_change_secs = now_secs;
    }

    /// Apply decay and record the start-of-tick sample.
    pub(crate) fn tick(&mut self, now_secs: f64) {
        if let Some(decay) = &self.decay {
            let ratio = decay.evaluate((now_secs - self.last_change_secs) as f32);
            self.value = (self.value_at_last_change * ratio).clamp(-1.0, 1.0);
        }
        if self.history.len() == self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(HistorySample { time_secs: now_secs, value: self.value });
    }

    /// Change since the start of the tick `ticks` ticks before the latest.
    ///
    /// Zero ticks is always `0.0`.  Looking further back than the history
    /// reaches compares against the oldest sample.
    pub fn delta_recent_ticks(&self, ticks: usize) -> f32 {
        if ticks == 0 || self.history.is_empty() {
            return 0.0;
        }
        let idx = (self.history.len() - 1).saturating_sub(ticks);
        self.value - self.history[idx].value
    }

    /// Change since the latest sample taken at or before `now - secs`
    /// (or the oldest sample when none is that old).
    pub fn delta_recent_seconds(&self, secs: f64, now_secs: f64) -> f32 {
        let cutoff = now_secs - secs;
        let base = self
            .history
            .iter()
            .rev()
            .find(|s| s.time_secs <= cutoff)
            .or(self.history.front());
        base.map_or(0.0, |s| self.value - s.value)
    }
}
