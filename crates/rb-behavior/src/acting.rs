//! Action delegation: a behavior hands one action at a time to the robot
//! and optionally gets called back when it completes.
//!
//! The delegated action runs in the default slot and replaces whatever was
//! there (`NowAndClearRemaining`).  The callback fires only while the
//! behavior is still running; stopping the behavior drops it unrun.

use std::fmt;

use rb_action::{ActionCompleted, ActionResult, ActionRunner, QueueActionPosition};
use rb_core::{ActionTag, SlotHandle};
use tracing::{debug, warn};

use crate::{ActingCallback, BehaviorModel, Robot};

/// Why `start_acting` declined.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RefuseReason {
    NotRunning,
    /// `stop_on_next_action_complete` was requested.
    StopRequested,
    AlreadyActing,
}

impl fmt::Display for RefuseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefuseReason::NotRunning    => "behavior is not running",
            RefuseReason::StopRequested => "behavior was asked to stop",
            RefuseReason::AlreadyActing => "behavior is already acting",
        })
    }
}

/// A declined `start_acting` call.  The action is handed back unqueued.
#[derive(Debug)]
pub struct Refused {
    pub reason: RefuseReason,
    pub runner: ActionRunner,
}

pub type StartActingResult = Result<ActionTag, Box<Refused>>;

/// Acting helpers available on every [`BehaviorModel`].
pub trait Acting: BehaviorModel {
    /// Delegate `runner` to the robot with no completion callback.
    fn start_acting(&mut self, robot: &mut Robot, runner: ActionRunner) -> StartActingResult;

    /// Delegate `runner`; `callback` receives the completion message.
    fn start_acting_then(
        &mut self,
        robot:    &mut Robot,
        runner:   ActionRunner,
        callback: impl FnOnce(&mut Self, &ActionCompleted, &mut Robot) + 'static,
    ) -> StartActingResult;

    /// Delegate `runner`; `callback` receives only the result.
    fn start_acting_with_result(
        &mut self,
        robot:    &mut Robot,
        runner:   ActionRunner,
        callback: impl FnOnce(&mut Self, ActionResult, &mut Robot) + 'static,
    ) -> StartActingResult;

    /// Delegate `runner`; `callback` runs on completion whatever the result.
    fn start_acting_and_continue(
        &mut self,
        robot:    &mut Robot,
        runner:   ActionRunner,
        callback: impl FnOnce(&mut Self, &mut Robot) + 'static,
    ) -> StartActingResult;

    /// Delegate `runner` and add `extra` to the running score until it
    /// completes.
    fn start_acting_extra_score(
        &mut self,
        robot:  &mut Robot,
        runner: ActionRunner,
        extra:  f32,
    ) -> StartActingResult;

    /// Cancel the delegated action.  With `allow_callback` the completion
    /// is delivered before this returns.  Returns whether anything was
    /// cancelled.
    fn stop_acting(&mut self, allow_callback: bool, robot: &mut Robot) -> bool;

    /// Route a completion message; acts only on the delegated action's tag.
    fn handle_action_completed(&mut self, msg: &ActionCompleted, robot: &mut Robot);
}

fn refuse_reason<B>(core: &crate::BehaviorCore<B>) -> Option<RefuseReason> {
    if !core.running {
        Some(RefuseReason::NotRunning)
    } else if !core.can_start_acting {
        Some(RefuseReason::StopRequested)
    } else if core.is_acting() {
        Some(RefuseReason::AlreadyActing)
    } else {
        None
    }
}

fn start<B: BehaviorModel>(
    behavior: &mut B,
    robot:    &mut Robot,
    runner:   ActionRunner,
    callback: Option<ActingCallback<B>>,
) -> StartActingResult {
    let core = behavior.core_mut();
    if let Some(reason) = refuse_reason(core) {
        warn!(behavior = %core.name, action = runner.name(), %reason, "cannot start acting");
        return Err(Box::new(Refused { reason, runner }));
    }

    let tag = runner.tag();
    debug!(behavior = %core.name, %tag, action = runner.name(), "start acting");
    core.acting_tag = Some(tag);
    core.acting_callback = callback;
    core.extra_running_score = 0.0;

    let retries = runner.retries_remaining();
    robot.action_list.queue_action(
        SlotHandle::DEFAULT,
        QueueActionPosition::NowAndClearRemaining,
        runner,
        retries,
    );
    Ok(tag)
}

impl<B: BehaviorModel> Acting for B {
    fn start_acting(&mut self, robot: &mut Robot, runner: ActionRunner) -> StartActingResult {
        start(self, robot, runner, None)
    }

    fn start_acting_then(
        &mut self,
        robot:    &mut Robot,
        runner:   ActionRunner,
        callback: impl FnOnce(&mut Self, &ActionCompleted, &mut Robot) + 'static,
    ) -> StartActingResult {
        start(self, robot, runner, Some(Box::new(callback)))
    }

    fn start_acting_with_result(
        &mut self,
        robot:    &mut Robot,
        runner:   ActionRunner,
        callback: impl FnOnce(&mut Self, ActionResult, &mut Robot) + 'static,
    ) -> StartActingResult {
        let wrapped = move |this: &mut Self, msg: &ActionCompleted, robot: &mut Robot| {
            callback(this, msg.result, robot)
        };
        start(self, robot, runner, Some(Box::new(wrapped)))
    }

    fn start_acting_and_continue(
        &mut self,
        robot:    &mut Robot,
        runner:   ActionRunner,
        callback: impl FnOnce(&mut Self, &mut Robot) + 'static,
    ) -> StartActingResult {
        let wrapped = move |this: &mut Self, _: &ActionCompleted, robot: &mut Robot| callback(this, robot);
        start(self, robot, runner, Some(Box::new(wrapped)))
    }

    fn start_acting_extra_score(
        &mut self,
        robot:  &mut Robot,
        runner: ActionRunner,
        extra:  f32,
    ) -> StartActingResult {
        let tag = start(self, robot, runner, None)?;
        self.core_mut().increase_score_while_acting(extra);
        Ok(tag)
    }

    fn stop_acting(&mut self, allow_callback: bool, robot: &mut Robot) -> bool {
        let core = self.core_mut();
        core.extra_running_score = 0.0;
        let Some(tag) = core.acting_tag else {
            return false;
        };
        if !allow_callback {
            core.acting_tag = None;
            core.acting_callback = None;
        }

        let cancelled = robot.action_list.cancel_by_tag(tag, None);
        if allow_callback {
            if let Some(msg) = robot.action_list.completion_for(tag).cloned() {
                self.handle_action_completed(&msg, robot);
            }
        }

        // The callback may have started a new action; only clear our own.
        let core = self.core_mut();
        if core.acting_tag == Some(tag) {
            core.acting_tag = None;
            core.acting_callback = None;
        }
        cancelled
    }

    fn handle_action_completed(&mut self, msg: &ActionCompleted, robot: &mut Robot) {
        let core = self.core_mut();
        if core.acting_tag != Some(msg.tag) {
            return;
        }
        core.acting_tag = None;
        core.extra_running_score = 0.0;
        let callback = core.acting_callback.take();
        let running = core.running;
        debug!(behavior = %core.name, tag = %msg.tag, result = %msg.result, "delegated action completed");

        match callback {
            Some(callback) if running => callback(self, msg, robot),
            Some(_) => debug!(tag = %msg.tag, "behavior no longer running; dropping callback"),
            None => {}
        }
    }
}
