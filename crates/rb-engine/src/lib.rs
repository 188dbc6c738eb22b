//! `rb-engine`: the top-level tick loop of the robot behavior engine.
//!
//! # Tick loop
//!
//! ```text
//! every tick:
//!   ① Clock    : advance one tick; MoodManager::update(now).
//!   ② Actions  : ActionList::update(now) advances every slot.
//!   ③ Completed: completion messages go to every behavior, so the acting
//!                one fires its callback.
//!   ④ Events   : queued EngineEvents go to subscribed behaviors
//!                (always_handle, then running / not-running hook).
//!   ⑤ Active   : update the active behavior; Complete/Failure stops it.
//!   ⑥ Choose   : every choose_interval_ticks, or when nothing is active,
//!                re-score and switch if a different behavior wins.
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rb_engine::{BehaviorManagerBuilder, EngineConfig, NoopObserver};
//!
//! let mut engine = BehaviorManagerBuilder::new(EngineConfig::default())
//!     .add_behavior(NoneBehavior::new(BehaviorConfig::new("Idle").with_flat_score(0.1))?)
//!     .build()?;
//! engine.run_ticks(100, &mut NoopObserver);
//! ```

pub mod builder;
pub mod chooser;
pub mod config;
pub mod error;
pub mod manager;
pub mod observer;

#[cfg(test)]
mod tests;

pub use builder::BehaviorManagerBuilder;
pub use chooser::{BehaviorChooser, BehaviorEntry, ScoringChooser};
pub use config::{EngineConfig, DEFAULT_CHOOSE_INTERVAL_TICKS, DEFAULT_TIE_EPSILON};
pub use error::{EngineError, EngineResult};
pub use manager::{BehaviorManager, MAX_EVENT_ROUNDS};
pub use observer::{EngineObserver, NoopObserver};
