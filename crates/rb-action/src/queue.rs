//! `ActionQueue`: one slot's current action plus its pending actions.
//!
//! # Layout
//!
//! ```text
//! current: Option<Entry>          ← the action that owns the slot
//! pending: [Entry, Entry, ...]    ← run in order once current finishes
//! ```
//!
//! An entry interrupted by `queue_at_front` moves from `current` to the
//! front of `pending` in state [`ResumeState::InterruptedAwaitingFinalTick`].
//! The next `update` gives it one last tick (reporting `Interrupted`) and
//! marks it [`ResumeState::Resumed`]; it then waits behind the interrupting
//! action and starts over with `init` when it becomes current again.

use std::collections::VecDeque;

use rb_core::ActionTag;
use tracing::{debug, warn};

use crate::{ActionContext, ActionResult, ActionRunner, QueueActionPosition, RobotActionType};

/// Per-entry interrupt/resume state.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum ResumeState {
    #[default]
    Queued,
    InterruptedAwaitingFinalTick,
    Resumed,
}

#[derive(Debug)]
struct Entry {
    runner: ActionRunner,
    resume: ResumeState,
    /// Put at the head by `queue_now` and not yet promoted to `current`.
    queued_now: bool,
}

impl Entry {
    fn new(runner: ActionRunner) -> Self {
        Entry { runner, resume: ResumeState::Queued, queued_now: false }
    }

    fn queued_now(runner: ActionRunner) -> Self {
        Entry { queued_now: true, ..Entry::new(runner) }
    }
}

#[derive(Debug, Default)]
pub struct ActionQueue {
    current: Option<Entry>,
    pending: VecDeque<Entry>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Insert according to `position`.  `InParallel` is resolved by the
    /// list (it allocates a new slot) and behaves like `AtEnd` here.
    pub fn queue(
        &mut self,
        position: QueueActionPosition,
        runner:   ActionRunner,
        ctx:      &mut ActionContext<'_>,
    ) {
        match position {
            QueueActionPosition::Now => self.queue_now(runner, ctx),
            QueueActionPosition::NowAndResume => self.queue_at_front(runner, ctx),
            QueueActionPosition::NowAndClearRemaining => {
                self.queue_now_and_clear_remaining(runner, ctx)
            }
            QueueActionPosition::Next => self.queue_next(runner),
            QueueActionPosition::AtEnd | QueueActionPosition::InParallel => {
                self.queue_at_end(runner)
            }
        }
    }

    /// Append after everything pending.
    pub fn queue_at_end(&mut self, runner: ActionRunner) {
        self.pending.push_back(Entry::new(runner));
    }

    /// Run right after the current action.
    pub fn queue_next(&mut self, runner: ActionRunner) {
        if self.current.is_some() || self.pending.is_empty() {
            self.pending.push_front(Entry::new(runner));
        } else {
            // The pending front becomes current on the next update.
            self.pending.insert(1, Entry::new(runner));
        }
    }

    /// Cancel the current action; `runner` becomes current.
    ///
    /// With no current action the new one goes to the front of `pending`,
    /// ahead of anything queued earlier.  A head placed there by an earlier
    /// `queue_now` counts as current: it is cancelled and replaced, so of
    /// two back-to-back `queue_now` calls only the later action ever runs.
    pub fn queue_now(&mut self, runner: ActionRunner, ctx: &mut ActionContext<'_>) {
        let old = match self.current.take() {
            Some(old) => Some(old),
            None if self.pending.front().is_some_and(|e| e.queued_now) => self.pending.pop_front(),
            None => None,
        };
        match old {
            Some(mut old) => {
                debug!(
                    cancelled = %old.runner.tag(),
                    replacement = %runner.tag(),
                    "queue now: cancelling current action"
                );
                old.runner.cancel();
                old.runner.finish_cancelled(ctx);
                self.current = Some(Entry::new(runner));
            }
            None => self.pending.push_front(Entry::queued_now(runner)),
        }
    }

    /// Interrupt the current action and run `runner` first; the interrupted
    /// action resumes afterwards.  Falls back to [`ActionQueue::queue_now`]
    /// when the current action refuses to be interrupted.
    pub fn queue_at_front(&mut self, runner: ActionRunner, ctx: &mut ActionContext<'_>) {
        let Some(mut old) = self.current.take() else {
            self.pending.push_front(Entry::new(runner));
            return;
        };

        if !old.runner.has_started() {
            self.pending.push_front(old);
            self.current = Some(Entry::new(runner));
            return;
        }

        if old.runner.interrupt(ctx.tracks) {
            old.resume = ResumeState::InterruptedAwaitingFinalTick;
            self.pending.push_front(old);
            self.current = Some(Entry::new(runner));
        } else {
            debug!(tag = %old.runner.tag(), "current action refused interrupt; cancelling instead");
            self.current = Some(old);
            self.queue_now(runner, ctx);
        }
    }

    /// Cancel the current action and everything pending, then queue `runner`.
    pub fn queue_now_and_clear_remaining(
        &mut self,
        runner: ActionRunner,
        ctx:    &mut ActionContext<'_>,
    ) {
        let old = self.current.take().into_iter().chain(self.pending.drain(..));
        for mut entry in old.collect::<Vec<_>>() {
            entry.runner.cancel();
            entry.runner.finish_cancelled(ctx);
        }
        self.current = Some(Entry::new(runner));
    }

    // ── Update ────────────────────────────────────────────────────────────

    /// Advance the slot by one tick.
    ///
    /// Returns the result of the current action's update, or `None` when
    /// the queue was empty.
    pub fn update(&mut self, ctx: &mut ActionContext<'_>) -> Option<ActionResult> {
        for entry in self.pending.iter_mut() {
            if entry.resume == ResumeState::InterruptedAwaitingFinalTick {
                let result = entry.runner.update(ctx);
                if result != ActionResult::Interrupted {
                    warn!(tag = %entry.runner.tag(), %result, "interrupted action did not report INTERRUPTED");
                }
                entry.resume = ResumeState::Resumed;
            }
        }

        if self.current.is_none() {
            self.current = self.pending.pop_front();
            if let Some(entry) = self.current.as_mut() {
                entry.queued_now = false;
            }
        }
        let entry = self.current.as_mut()?;
        let result = entry.runner.update(ctx);
        if result != ActionResult::Running {
            if result.is_failure() {
                debug!(tag = %entry.runner.tag(), name = entry.runner.name(), %result, "action failed");
            }
            self.current = None;
        }
        Some(result)
    }

    // ── Cancellation ──────────────────────────────────────────────────────

    /// Cancel every action whose type matches (`Unknown` matches all).
    pub fn cancel_by_type(&mut self, action_type: RobotActionType, ctx: &mut ActionContext<'_>) -> bool {
        self.cancel_where(ctx, |r| action_type.matches(r.action_type())) > 0
    }

    /// Cancel the action carrying `tag`.
    pub fn cancel_by_tag(&mut self, tag: ActionTag, ctx: &mut ActionContext<'_>) -> bool {
        let removed = self.cancel_where(ctx, |r| r.tag() == tag);
        if removed > 1 {
            warn!(%tag, removed, "more than one queued action carried the same tag");
        }
        removed > 0
    }

    fn cancel_where(
        &mut self,
        ctx:     &mut ActionContext<'_>,
        matches: impl Fn(&ActionRunner) -> bool,
    ) -> usize {
        let mut removed = Vec::new();
        if self.current.as_ref().is_some_and(|e| matches(&e.runner)) {
            removed.extend(self.current.take());
        }
        let mut kept = VecDeque::with_capacity(self.pending.len());
        for entry in self.pending.drain(..) {
            if matches(&entry.runner) {
                removed.push(entry);
            } else {
                kept.push_back(entry);
            }
        }
        self.pending = kept;

        for entry in &mut removed {
            entry.runner.cancel();
            entry.runner.finish_cancelled(ctx);
        }
        removed.len()
    }

    /// Drop everything without running completion.  Tracks are released.
    pub fn clear(&mut self, ctx: &mut ActionContext<'_>) {
        for entry in self.current.take().into_iter().chain(self.pending.drain(..)) {
            entry.runner.discard(ctx.tracks);
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Current action plus pending actions.
    pub fn len(&self) -> usize {
        self.current.is_some() as usize + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// The action that runs on the next update: current, else pending front.
    pub fn current(&self) -> Option<&ActionRunner> {
        self.current.as_ref().or(self.pending.front()).map(|e| &e.runner)
    }

    pub fn is_current_action(&self, name: &str) -> bool {
        self.current().is_some_and(|r| r.name() == name)
    }

    /// Every action in run order.
    pub fn iter(&self) -> impl Iterator<Item = &ActionRunner> {
        self.current.iter().chain(self.pending.iter()).map(|e| &e.runner)
    }

    pub fn resume_state(&self, tag: ActionTag) -> Option<ResumeState> {
        self.current
            .iter()
            .chain(self.pending.iter())
            .find(|e| e.runner.tag() == tag)
            .map(|e| e.resume)
    }

    pub fn find(&self, tag: ActionTag) -> Option<&ActionRunner> {
        self.iter().find(|r| r.tag() == tag)
    }
}
