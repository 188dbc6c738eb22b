//! Action outcome, action type, and queue insertion policy enums.

use std::fmt;

/// State of an action, and the value every `update` returns.
///
/// `FailureRetry` never escapes an [`ActionRunner`][crate::ActionRunner]:
/// the runner either restarts the action or converts it to `FailureAbort`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum ActionResult {
    #[default]
    NotStarted,
    Running,
    Success,
    FailureAbort,
    FailureRetry,
    Cancelled,
    Interrupted,
    Timeout,
}

impl ActionResult {
    /// `true` for results that end the action for good.
    ///
    /// `Interrupted` is not terminal: the action resumes later.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ActionResult::Success
                | ActionResult::FailureAbort
                | ActionResult::Cancelled
                | ActionResult::Timeout
        )
    }

    /// Terminal results other than `Success` and `Cancelled`.
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(
            self,
            ActionResult::FailureAbort | ActionResult::FailureRetry | ActionResult::Timeout
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionResult::NotStarted   => "NOT_STARTED",
            ActionResult::Running      => "RUNNING",
            ActionResult::Success      => "SUCCESS",
            ActionResult::FailureAbort => "FAILURE_ABORT",
            ActionResult::FailureRetry => "FAILURE_RETRY",
            ActionResult::Cancelled    => "CANCELLED",
            ActionResult::Interrupted  => "INTERRUPTED",
            ActionResult::Timeout      => "TIMEOUT",
        }
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of robot action.  `Unknown` doubles as the cancel-by-type wildcard.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum RobotActionType {
    #[default]
    Unknown,
    Wait,
    WaitForLambda,
    CompoundSequential,
    CompoundParallel,
    TurnInPlace,
    DriveStraight,
    MoveHeadToAngle,
    MoveLiftToHeight,
    PlayAnimation,
    SayText,
}

impl RobotActionType {
    /// `true` if cancelling by `self` should remove an action of type `other`.
    #[inline]
    pub fn matches(self, other: RobotActionType) -> bool {
        self == RobotActionType::Unknown || self == other
    }
}

/// Where `ActionList::queue_action` inserts a new action within a slot.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum QueueActionPosition {
    /// Cancel the current action; the new one starts on the next update.
    #[default]
    Now,
    /// Interrupt the current action and resume it after the new one.
    NowAndResume,
    /// Cancel the current action and everything pending.
    NowAndClearRemaining,
    /// Run right after the current action.
    Next,
    /// Append after everything already queued.
    AtEnd,
    /// Run in a freshly allocated slot of its own.
    InParallel,
}
