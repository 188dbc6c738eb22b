//! `rb-mood`: the robot's emotional state and the scores derived from it.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`emotion`] | `EmotionType`, `Emotion` (value + start-of-tick history)   |
//! | [`manager`] | `MoodManager`: one clamped value per emotion               |
//! | [`scorer`]  | `EmotionScorer`, `MoodScorer`                              |
//! | [`config`]  | `MoodConfig`, `EmotionDecayConfig`                         |
//! | [`error`]   | `MoodError`, `MoodResult<T>`                               |
//!
//! # Value model
//!
//! Every emotion holds a value in `[-1, 1]`.  `MoodManager::update(now)`
//! runs once at the start of each tick: it applies decay and records the
//! value into a bounded history, so scorers can look at how an emotion
//! moved over the last few ticks or seconds as well as where it is now.

pub mod config;
pub mod emotion;
pub mod error;
pub mod manager;
pub mod scorer;


pub use config::{EmotionDecayConfig, MoodConfig};
pub use emotion::{Emotion, EmotionType, HistorySample};
pub use error::{MoodError, MoodResult};
pub use manager::MoodManager;
pub use scorer::{EmotionScorer, MoodScorer, TRACK_DELTA_WINDOW_SECS};
