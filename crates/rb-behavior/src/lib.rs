//! `rb-behavior`: behaviors, the robot they act on, and how they delegate
//! actions.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                       |
//! |--------------|----------------------------------------------------------------|
//! | [`robot`]    | `Robot`: clock, action list, mood, RNG, trigger bookkeeping    |
//! | [`events`]   | `EngineEvent`, `EventTag`, `ReactionTrigger`, `BehaviorObjective` |
//! | [`config`]   | `BehaviorConfig`, `BehaviorGroup`                              |
//! | [`base`]     | `BehaviorCore`: per-behavior state and `smart_*` helpers       |
//! | [`model`]    | `BehaviorModel` (hooks), `Behavior` (object-safe lifecycle)    |
//! | [`acting`]   | `Acting`: `start_acting` / `stop_acting` delegation            |
//! | [`strategy`] | `ActivityStrategy`: start/end rules for long activities        |
//! | [`noop`]     | `NoneBehavior`: does nothing, runs forever                     |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                           |
//!
//! # Mutability
//!
//! A behavior may mutate the robot only while it is running.  The hooks
//! encode this in their signatures: `handle_while_running` receives
//! `&mut Robot`, `always_handle` and `handle_while_not_running` receive
//! `&Robot`.

pub mod acting;
pub mod base;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod noop;
pub mod robot;
pub mod strategy;


pub use acting::{Acting, RefuseReason, Refused, StartActingResult};
pub use base::{
    ActingCallback, BehaviorCore, COOLDOWN_FROM_CLIFF_RESUMES_SECS, MAX_RESUMES_FROM_CLIFF,
    SKIP_REPETITION_PENALTY_SECS,
};
pub use config::{BehaviorConfig, BehaviorGroup};
pub use error::{BehaviorError, BehaviorResult};
pub use events::{BehaviorObjective, EngineEvent, EventTag, GameTag, ReactionTrigger, RobotTag};
pub use model::{Behavior, BehaviorModel, BehaviorStatus};
pub use noop::NoneBehavior;
pub use robot::Robot;
pub use strategy::{ActivityStrategy, ActivityStrategyConfig};
