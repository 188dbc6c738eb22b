//! `MoodManager`: the robot's current emotional state.

use rustc_hash::FxHashMap;
use tracing::debug;

use rb_core::Graph2d;

use crate::{Emotion, EmotionType, MoodConfig, MoodResult};

#[derive(Clone, Debug)]
pub struct MoodManager {
    emotions:            Vec<Emotion>,
    same_source_penalty: Graph2d,
    /// Last time each source added to each emotion.
    last_add_secs:       FxHashMap<(EmotionType, String), f64>,
    now_secs:            f64,
}

impl Default for MoodManager {
    fn default() -> Self {
        Self::from_validated(&MoodConfig::default())
    }
}

impl MoodManager {
    pub fn new(config: &MoodConfig) -> MoodResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: &MoodConfig) -> Self {
        let emotions = EmotionType::ALL
            .iter()
            .map(|&e| Emotion::new(config.decay_for(e).cloned(), config.history_ticks))
            .collect();
        MoodManager {
            emotions,
            same_source_penalty: config.same_source_repetition_penalty.clone(),
            last_add_secs: FxHashMap::default(),
            now_secs: 0.0,
        }
    }

    /// Start-of-tick bookkeeping: decay, then record history.
    pub fn update(&mut self, now_secs: f64) {
        self.now_secs = now_secs;
        for emotion in &mut self.emotions {
            emotion.tick(now_secs);
        }
    }

    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.now_secs
    }

    pub fn emotion(&self, emotion: EmotionType) -> &Emotion {
        &self.emotions[emotion.index()]
    }

    #[inline]
    pub fn emotion_value(&self, emotion: EmotionType) -> f32 {
        self.emotions[emotion.index()].value()
    }

    pub fn set_emotion(&mut self, emotion: EmotionType, value: f32) {
        self.emotions[emotion.index()].set(value, self.now_secs);
    }

    /// Add `delta` to an emotion on behalf of `source`.
    ///
    /// Repeated additions from the same source are scaled by the
    /// same-source repetition penalty sampled at the time since that
    /// source last added to this emotion.  Returns the delta applied.
    pub fn add_to_emotion(&mut self, emotion: EmotionType, delta: f32, source: &str) -> f32 {
        let key = (emotion, source.to_owned());
        let scale = match self.last_add_secs.get(&key) {
            Some(&last) => self.same_source_penalty.evaluate((self.now_secs - last) as f32),
            None => 1.0,
        };
        let applied = delta * scale;
        let slot = &mut self.emotions[emotion.index()];
        let before = slot.value();
        slot.set(before + applied, self.now_secs);
        self.last_add_secs.insert(key, self.now_secs);
        debug!(%emotion, source, delta, scale, value = slot.value(), "mood changed");
        applied
    }

    /// See [`Emotion::delta_recent_ticks`].
    pub fn delta_recent_ticks(&self, emotion: EmotionType, ticks: usize) -> f32 {
        self.emotions[emotion.index()].delta_recent_ticks(ticks)
    }

    /// See [`Emotion::delta_recent_seconds`].
    pub fn delta_recent_seconds(&self, emotion: EmotionType, secs: f64) -> f32 {
        self.emotions[emotion.index()].delta_recent_seconds(secs, self.now_secs)
    }

    /// Every emotion with its current value, in `EmotionType::ALL` order.
    pub fn values(&self) -> impl Iterator<Item = (EmotionType, f32)> + '_ {
        EmotionType::ALL.into_iter().map(|e| (e, self.emotion_value(e)))
    }
}
