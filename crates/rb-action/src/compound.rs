//! Compound actions: several child actions run as one.
//!
//! The parent locks the union of its children's tracks; children run with
//! track locking suppressed and keep their completion messages to
//! themselves.  The parent's completion payload lists the child results.

use rb_core::AnimTrackFlags;

use crate::{Action, ActionContext, ActionResult, ActionRunner, CompletionInfo, RobotActionType};

fn adopt(mut children: Vec<ActionRunner>) -> Vec<ActionRunner> {
    for child in &mut children {
        child.set_suppress_track_locking(true);
        child.set_emit_completion(false);
    }
    children
}

fn union_tracks(children: &[ActionRunner]) -> AnimTrackFlags {
    children.iter().fold(AnimTrackFlags::NONE, |acc, c| acc | c.tracks())
}

fn cancel_unfinished(children: &mut [ActionRunner], ctx: &mut ActionContext<'_>) {
    for child in children.iter_mut().filter(|c| !c.is_complete() && c.has_started()) {
        child.cancel();
        child.finish_cancelled(ctx);
    }
}

fn child_results(children: &[ActionRunner]) -> Vec<ActionResult> {
    children.iter().map(ActionRunner::state).collect()
}

// ── SequentialAction ──────────────────────────────────────────────────────────

/// Runs children one after another; fails as soon as one fails.
pub struct SequentialAction {
    name:     String,
    children: Vec<ActionRunner>,
    index:    usize,
}

impl SequentialAction {
    pub fn new(name: impl Into<String>, children: Vec<ActionRunner>) -> Self {
        Self { name: name.into(), children: adopt(children), index: 0 }
    }
}

impl Action for SequentialAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn action_type(&self) -> RobotActionType {
        RobotActionType::CompoundSequential
    }

    fn tracks(&self) -> AnimTrackFlags {
        union_tracks(&self.children)
    }

    fn timeout_secs(&self) -> f64 {
        self.children.iter().map(|c| c.timeout_secs()).sum()
    }

    fn check_if_done(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult {
        // A finished child hands over to the next one within the same tick.
        while let Some(child) = self.children.get_mut(self.index) {
            match child.update(ctx) {
                ActionResult::Success => self.index += 1,
                ActionResult::Running => return ActionResult::Running,
                failure => return failure,
            }
        }
        ActionResult::Success
    }

    fn reset(&mut self) {
        self.index = 0;
        for child in &mut self.children {
            child.rewind();
        }
    }

    fn on_complete(&mut self, _result: ActionResult, ctx: &mut ActionContext<'_>) {
        cancel_unfinished(&mut self.children, ctx);
    }

    fn completion_info(&self) -> CompletionInfo {
        CompletionInfo::Compound { results: child_results(&self.children) }
    }
}

// ── ParallelAction ────────────────────────────────────────────────────────────

/// Runs all children every tick; succeeds when all have succeeded and fails
/// as soon as any fails.
pub struct ParallelAction {
    name:     String,
    children: Vec<ActionRunner>,
}

impl ParallelAction {
    pub fn new(name: impl Into<String>, children: Vec<ActionRunner>) -> Self {
        Self { name: name.into(), children: adopt(children) }
    }
}

impl Action for ParallelAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn action_type(&self) -> RobotActionType {
        RobotActionType::CompoundParallel
    }

    fn tracks(&self) -> AnimTrackFlags {
        union_tracks(&self.children)
    }

    fn timeout_secs(&self) -> f64 {
        self.children.iter().map(|c| c.timeout_secs()).fold(0.0, f64::max)
    }

    fn check_if_done(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let mut all_done = true;
        for child in self.children.iter_mut().filter(|c| !c.is_complete()) {
            match child.update(ctx) {
                ActionResult::Success => {}
                ActionResult::Running => all_done = false,
                failure => return failure,
            }
        }
        if all_done { ActionResult::Success } else { ActionResult::Running }
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.rewind();
        }
    }

    fn on_complete(&mut self, _result: ActionResult, ctx: &mut ActionContext<'_>) {
        cancel_unfinished(&mut self.children, ctx);
    }

    fn completion_info(&self) -> CompletionInfo {
        CompletionInfo::Compound { results: child_results(&self.children) }
    }
}
