//! `ActionList`: the robot's slot registry.
//!
//! Maps [`SlotHandle`] → [`ActionQueue`].  Slots are created on first use
//! and erased as soon as their queue empties, so per-tick work is
//! proportional to the number of *active* slots, not every slot ever used.
//!
//! The list also owns the pieces every action needs while it runs: the tag
//! allocator, the track lock table and the buffer of completion messages
//! produced since the last [`ActionList::drain_completions`].

use std::collections::BTreeMap;

use rb_core::{ActionTag, SlotHandle};
use tracing::debug;

use crate::{
    ActionCompleted, ActionContext, ActionQueue, ActionResult, ActionRunner, QueueActionPosition,
    RobotActionType, TagAllocator, TrackLocks,
};

#[derive(Debug, Default)]
pub struct ActionList {
    queues:    BTreeMap<SlotHandle, ActionQueue>,
    tags:      TagAllocator,
    tracks:    TrackLocks,
    completed: Vec<ActionCompleted>,
    now_secs:  f64,
}

impl ActionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an existing tag pool (e.g. with actions built elsewhere).
    pub fn with_tags(tags: TagAllocator) -> Self {
        Self { tags, ..Self::default() }
    }

    pub fn tags(&self) -> &TagAllocator {
        &self.tags
    }

    pub fn tracks(&self) -> &TrackLocks {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut TrackLocks {
        &mut self.tracks
    }

    // ── Queueing ──────────────────────────────────────────────────────────

    /// Queue `runner` into `slot` using `position`, with `retries` retries.
    ///
    /// The slot is created if needed.  `InParallel` ignores `slot` and runs
    /// the action in a freshly allocated one.  Returns the slot used.
    pub fn queue_action(
        &mut self,
        slot:     SlotHandle,
        position: QueueActionPosition,
        mut runner: ActionRunner,
        retries:  u8,
    ) -> SlotHandle {
        runner.set_num_retries(retries);
        if position == QueueActionPosition::InParallel {
            return self.add_concurrent_action(runner);
        }
        debug!(%slot, ?position, tag = %runner.tag(), name = runner.name(), "queueing action");
        let mut ctx = ActionContext::new(self.now_secs, &mut self.tracks, &mut self.completed);
        self.queues.entry(slot).or_default().queue(position, runner, &mut ctx);
        slot
    }

    /// Shorthand for `queue_action(SlotHandle::DEFAULT, Now, runner, 0)`.
    pub fn queue_action_now(&mut self, runner: ActionRunner) -> SlotHandle {
        self.queue_action(SlotHandle::DEFAULT, QueueActionPosition::Now, runner, 0)
    }

    /// Run `runner` in the lowest unused slot above the default one.
    pub fn add_concurrent_action(&mut self, runner: ActionRunner) -> SlotHandle {
        let mut slot = SlotHandle(SlotHandle::DEFAULT.0 + 1);
        while self.queues.contains_key(&slot) {
            slot = SlotHandle(slot.0 + 1);
        }
        debug!(%slot, tag = %runner.tag(), name = runner.name(), "adding concurrent action");
        self.queues.entry(slot).or_default().queue_at_end(runner);
        slot
    }

    // ── Update ────────────────────────────────────────────────────────────

    /// Advance every slot by one tick and erase the ones left empty.
    ///
    /// Returns the per-slot results (slots that were idle are skipped).
    pub fn update(&mut self, now_secs: f64) -> Vec<(SlotHandle, ActionResult)> {
        self.now_secs = now_secs;
        let mut ctx = ActionContext::new(now_secs, &mut self.tracks, &mut self.completed);
        let mut results = Vec::with_capacity(self.queues.len());
        self.queues.retain(|&slot, queue| {
            if let Some(result) = queue.update(&mut ctx) {
                results.push((slot, result));
            }
            !queue.is_empty()
        });
        results
    }

    // ── Cancellation ──────────────────────────────────────────────────────

    /// Cancel by type in `slot`, or in every slot when `slot` is `None`.
    pub fn cancel_by_type(&mut self, slot: Option<SlotHandle>, action_type: RobotActionType) -> bool {
        let mut ctx = ActionContext::new(self.now_secs, &mut self.tracks, &mut self.completed);
        let mut any = false;
        for (handle, queue) in self.queues.iter_mut() {
            if slot.is_none_or(|s| s == *handle) {
                any |= queue.cancel_by_type(action_type, &mut ctx);
            }
        }
        self.queues.retain(|_, q| !q.is_empty());
        any
    }

    /// Cancel the action carrying `tag`, searching `slot` or every slot.
    ///
    /// When searching every slot, slots are visited in ascending handle
    /// order and the search stops at the first slot that removed something.
    pub fn cancel_by_tag(&mut self, tag: ActionTag, slot: Option<SlotHandle>) -> bool {
        let mut ctx = ActionContext::new(self.now_secs, &mut self.tracks, &mut self.completed);
        let mut found = false;
        for (handle, queue) in self.queues.iter_mut() {
            if slot.is_none_or(|s| s == *handle) && queue.cancel_by_tag(tag, &mut ctx) {
                found = true;
                break;
            }
        }
        self.queues.retain(|_, q| !q.is_empty());
        found
    }

    /// Drop every action in every slot without completion messages.
    pub fn clear(&mut self) {
        let mut ctx = ActionContext::new(self.now_secs, &mut self.tracks, &mut self.completed);
        for queue in self.queues.values_mut() {
            queue.clear(&mut ctx);
        }
        self.queues.clear();
    }

    // ── Completion messages ───────────────────────────────────────────────

    /// Take every completion message produced since the last drain.
    pub fn drain_completions(&mut self) -> Vec<ActionCompleted> {
        std::mem::take(&mut self.completed)
    }

    /// Peek at an undrained completion message.
    pub fn completion_for(&self, tag: ActionTag) -> Option<&ActionCompleted> {
        self.completed.iter().rev().find(|m| m.tag == tag)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn num_queues(&self) -> usize {
        self.queues.len()
    }

    /// Current plus pending actions in `slot`; zero for unknown slots.
    pub fn queue_length(&self, slot: SlotHandle) -> usize {
        self.queues.get(&slot).map_or(0, ActionQueue::len)
    }

    pub fn total_actions(&self) -> usize {
        self.queues.values().map(ActionQueue::len).sum()
    }

    pub fn queue(&self, slot: SlotHandle) -> Option<&ActionQueue> {
        self.queues.get(&slot)
    }

    pub fn current_action(&self, slot: SlotHandle) -> Option<&ActionRunner> {
        self.queues.get(&slot).and_then(ActionQueue::current)
    }

    /// `true` if any slot's current action is named `name`.
    pub fn is_current_action(&self, name: &str) -> bool {
        self.queues.values().any(|q| q.is_current_action(name))
    }

    pub fn find(&self, tag: ActionTag) -> Option<(SlotHandle, &ActionRunner)> {
        self.queues
            .iter()
            .find_map(|(slot, q)| q.find(tag).map(|r| (*slot, r)))
    }

    /// `true` while an action holding `tag` sits in any slot.
    pub fn is_tag_in_use(&self, tag: ActionTag) -> bool {
        self.find(tag).is_some()
    }

    pub fn slots(&self) -> impl Iterator<Item = SlotHandle> + '_ {
        self.queues.keys().copied()
    }
}
