//! `rb-action`: the action lifecycle and the queues that run actions.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`result`]     | `ActionResult`, `RobotActionType`, `QueueActionPosition`      |
//! | [`action`]     | `Action` trait (the extension point), `ActionContext`         |
//! | [`runner`]     | `ActionRunner`: retry/delay/timeout/interrupt state machine   |
//! | [`completion`] | `ActionCompleted`, `CompletionInfo`                           |
//! | [`tag`]        | `TagAllocator`, `TagLease`                                    |
//! | [`locks`]      | `TrackLocks`: name-keyed claims on robot tracks               |
//! | [`queue`]      | `ActionQueue`: one slot's current + pending actions           |
//! | [`list`]       | `ActionList`: slot registry and per-tick driver               |
//! | [`basic`]      | `WaitAction`, `WaitForLambdaAction`                           |
//! | [`compound`]   | `SequentialAction`, `ParallelAction`                          |
//! | [`error`]      | `ActionError`                                                 |
//!
//! # Tick model
//!
//! Nothing here blocks.  An action "waits" by returning
//! [`ActionResult::Running`] and being updated again next tick.  Each
//! [`ActionQueue`] updates at most one action per tick, and several slots in
//! one [`ActionList`] give the illusion of concurrency:
//!
//! ```text
//! ActionList::update(now)
//!   for slot in ascending order:
//!     ActionQueue::update
//!       ① give interrupted entries their final INTERRUPTED tick
//!       ② promote the pending front to current if idle
//!       ③ ActionRunner::update(current)  → drop it once terminal
//!   erase slots whose queue emptied
//! ```
//!
//! Completion messages are buffered in the list and drained by the owner
//! (the robot) once per tick for broadcast.

pub mod action;
pub mod basic;
pub mod completion;
pub mod compound;
pub mod error;
pub mod list;
pub mod locks;
pub mod queue;
pub mod result;
pub mod runner;
pub mod tag;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionContext, DEFAULT_TIMEOUT_SECS};
pub use basic::{WaitAction, WaitForLambdaAction};
pub use completion::{ActionCompleted, CompletionInfo};
pub use compound::{ParallelAction, SequentialAction};
pub use error::ActionError;
pub use list::ActionList;
pub use locks::TrackLocks;
pub use queue::{ActionQueue, ResumeState};
pub use result::{ActionResult, QueueActionPosition, RobotActionType};
pub use runner::{ActionRunner, CompletionCallback};
pub use tag::{TagAllocator, TagLease};
