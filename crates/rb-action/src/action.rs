//! The `Action` trait: the extension point for concrete robot actions.

use rb_core::AnimTrackFlags;

use crate::{ActionCompleted, ActionResult, CompletionInfo, RobotActionType, TrackLocks};

/// Timeout applied when an action does not override
/// [`Action::timeout_secs`].
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Per-update view of the robot handed to actions.
///
/// Carries the current engine time, the track lock table and the buffer
/// completion messages are written into.
pub struct ActionContext<'a> {
    pub now_secs: f64,
    pub tracks:   &'a mut TrackLocks,
    completed:    &'a mut Vec<ActionCompleted>,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        now_secs:  f64,
        tracks:    &'a mut TrackLocks,
        completed: &'a mut Vec<ActionCompleted>,
    ) -> Self {
        Self { now_secs, tracks, completed }
    }

    /// Queue a completion message for broadcast.
    pub(crate) fn emit(&mut self, msg: ActionCompleted) {
        self.completed.push(msg);
    }
}

/// A unit of robot-directed work.
///
/// Implementors describe *what* the action does; the surrounding
/// [`ActionRunner`][crate::ActionRunner] owns the lifecycle (delays, retries,
/// timeout, track locking, completion).
///
/// # Required methods
///
/// [`name`][Self::name], [`action_type`][Self::action_type] and
/// [`check_if_done`][Self::check_if_done].  Everything else has a default.
///
/// # Example
///
/// ```rust,ignore
/// struct Beep { done: bool }
///
/// impl Action for Beep {
///     fn name(&self) -> &str { "Beep" }
///     fn action_type(&self) -> RobotActionType { RobotActionType::SayText }
///     fn tracks(&self) -> AnimTrackFlags { AnimTrackFlags::AUDIO }
///     fn check_if_done(&mut self, _ctx: &mut ActionContext<'_>) -> ActionResult {
///         if self.done { ActionResult::Success } else { ActionResult::Running }
///     }
/// }
/// ```
pub trait Action {
    fn name(&self) -> &str;

    fn action_type(&self) -> RobotActionType;

    /// Tracks locked while the action runs.
    fn tracks(&self) -> AnimTrackFlags {
        AnimTrackFlags::NONE
    }

    /// Seconds to wait after the first update before calling `init`.
    fn start_delay_secs(&self) -> f64 {
        0.0
    }

    /// Seconds to wait after `init` succeeds before the first `check_if_done`.
    fn check_if_done_delay_secs(&self) -> f64 {
        0.0
    }

    /// Seconds from the first update after which the action times out.
    ///
    /// The limit applies per attempt: a retry (or a resume after an
    /// interrupt) starts the clock again, so with `n` retries the action may
    /// run for up to `(n + 1) * timeout_secs` in total.
    fn timeout_secs(&self) -> f64 {
        DEFAULT_TIMEOUT_SECS
    }

    /// Check preconditions and kick the work off.  Return `Running` to be
    /// called again next tick, `Success` to proceed to `check_if_done`.
    fn init(&mut self, _ctx: &mut ActionContext<'_>) -> ActionResult {
        ActionResult::Success
    }

    /// Report progress.  Called every tick once `init` has succeeded.
    fn check_if_done(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult;

    /// Pause in a resumable way.  Return `false` to refuse, in which case the
    /// caller falls back to cancelling.
    fn interrupt_internal(&mut self) -> bool {
        false
    }

    /// Forget progress so `init` can run again (retry or resume).
    fn reset(&mut self) {}

    /// Release anything the action still holds.  Runs once, just before the
    /// completion message is built.
    fn on_complete(&mut self, _result: ActionResult, _ctx: &mut ActionContext<'_>) {}

    fn completion_info(&self) -> CompletionInfo {
        CompletionInfo::None
    }
}
