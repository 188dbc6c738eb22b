//! Unit tests for rb-action.

// ── Helpers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod helpers {
    use std::cell::Cell;
    use std::rc::Rc;

    use rb_core::AnimTrackFlags;

    use crate::{Action, ActionContext, ActionResult, RobotActionType, DEFAULT_TIMEOUT_SECS};

    /// Action whose `check_if_done` result is driven from outside.
    pub struct TestAction {
        pub name:          &'static str,
        pub action_type:   RobotActionType,
        pub tracks:        AnimTrackFlags,
        pub result:        Rc<Cell<ActionResult>>,
        pub inits:         Rc<Cell<u32>>,
        pub interruptible: bool,
        pub timeout:       f64,
        pub start_delay:   f64,
        pub check_delay:   f64,
    }

    impl TestAction {
        pub fn new(name: &'static str) -> Self {
            TestAction {
                name,
                action_type: RobotActionType::TurnInPlace,
                tracks: AnimTrackFlags::NONE,
                result: Rc::new(Cell::new(ActionResult::Running)),
                inits: Rc::new(Cell::new(0)),
                interruptible: false,
                timeout: DEFAULT_TIMEOUT_SECS,
                start_delay: 0.0,
                check_delay: 0.0,
            }
        }

        pub fn tracks(mut self, tracks: AnimTrackFlags) -> Self {
            self.tracks = tracks;
            self
        }

        pub fn interruptible(mut self) -> Self {
            self.interruptible = true;
            self
        }

        /// Handles to the shared result cell and init counter.
        pub fn handles(&self) -> (Rc<Cell<ActionResult>>, Rc<Cell<u32>>) {
            (Rc::clone(&self.result), Rc::clone(&self.inits))
        }
    }

    impl Action for TestAction {
        fn name(&self) -> &str {
            self.name
        }

        fn action_type(&self) -> RobotActionType {
            self.action_type
        }

        fn tracks(&self) -> AnimTrackFlags {
            self.tracks
        }

        fn start_delay_secs(&self) -> f64 {
            self.start_delay
        }

        fn check_if_done_delay_secs(&self) -> f64 {
            self.check_delay
        }

        fn timeout_secs(&self) -> f64 {
            self.timeout
        }

        fn init(&mut self, _ctx: &mut ActionContext<'_>) -> ActionResult {
            self.inits.set(self.inits.get() + 1);
            ActionResult::Success
        }

        fn check_if_done(&mut self, _ctx: &mut ActionContext<'_>) -> ActionResult {
            self.result.get()
        }

        fn interrupt_internal(&mut self) -> bool {
            self.interruptible
        }
    }

    pub fn names(queue: Option<&crate::ActionQueue>) -> Vec<String> {
        queue
            .map(|q| q.iter().map(|r| r.name().to_owned()).collect())
            .unwrap_or_default()
    }
}

// ── Tags ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tags {
    use rb_core::ActionTag;

    use crate::{ActionError, ActionRunner, TagAllocator};
    use super::helpers::TestAction;

    #[test]
    fn automatic_tags_are_unique_and_released_on_drop() {
        let tags = TagAllocator::new();
        let a = tags.allocate();
        let b = tags.allocate();
        assert_eq!(a.tag(), ActionTag(1));
        assert_ne!(a.tag(), b.tag());
        assert_eq!(tags.num_in_use(), 2);

        drop(a);
        assert!(!tags.is_in_use(ActionTag(1)));
        assert_eq!(tags.num_in_use(), 1);
    }

    #[test]
    fn custom_tag_conflicts() {
        let tags = TagAllocator::new();
        let _held = tags.reserve(ActionTag(5)).unwrap();
        assert_eq!(tags.reserve(ActionTag(5)).unwrap_err(), ActionError::TagInUse(ActionTag(5)));
        assert_eq!(
            tags.reserve(ActionTag::INVALID).unwrap_err(),
            ActionError::ReservedTag(ActionTag::INVALID)
        );
    }

    #[test]
    fn automatic_allocation_skips_custom_tags() {
        let tags = TagAllocator::new();
        let _custom = tags.reserve(ActionTag(1)).unwrap();
        assert_eq!(tags.allocate().tag(), ActionTag(2));
    }

    #[test]
    fn runner_releases_tag_when_dropped() {
        let tags = TagAllocator::new();
        let runner = ActionRunner::with_custom_tag(TestAction::new("A"), &tags, ActionTag(9)).unwrap();
        assert!(tags.is_in_use(ActionTag(9)));
        assert!(ActionRunner::with_custom_tag(TestAction::new("B"), &tags, ActionTag(9)).is_err());
        drop(runner);
        assert!(!tags.is_in_use(ActionTag(9)));
    }
}

// ── Queue positions ───────────────────────────────────────────────────────────

#[cfg(test)]
mod queueing {
    use rb_core::{AnimTrackFlags, SlotHandle};

    use crate::{
        ActionList, ActionResult, ActionRunner, QueueActionPosition, ResumeState,
    };
    use super::helpers::{names, TestAction};

    const SLOT: SlotHandle = SlotHandle::DEFAULT;

    #[test]
    fn single_action_slot_lifecycle() {
        let mut list = ActionList::new();
        let action = TestAction::new("Test");
        let (result, _) = action.handles();
        list.queue_action_now(ActionRunner::new(action, list.tags()));

        list.update(0.0);
        assert_eq!(list.current_action(SLOT).map(|r| r.name()), Some("Test"));
        assert!(!list.is_empty());

        result.set(ActionResult::Success);
        let results = list.update(0.1);
        assert_eq!(results, vec![(SLOT, ActionResult::Success)]);
        assert!(list.queue(SLOT).is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn now_without_current_goes_ahead_of_queued_actions() {
        let mut list = ActionList::new();
        for name in ["T1", "T2"] {
            let runner = ActionRunner::new(TestAction::new(name), list.tags());
            list.queue_action(SLOT, QueueActionPosition::AtEnd, runner, 0);
        }
        list.queue_action_now(ActionRunner::new(TestAction::new("T3"), list.tags()));
        assert_eq!(names(list.queue(SLOT)), ["T3", "T1", "T2"]);
        assert!(list.drain_completions().is_empty());
    }

    #[test]
    fn back_to_back_now_runs_only_the_later_action() {
        let mut list = ActionList::new();
        let queued = ActionRunner::new(TestAction::new("X"), list.tags());
        list.queue_action(SLOT, QueueActionPosition::AtEnd, queued, 0);

        let a = TestAction::new("A");
        let (a_result, a_inits) = a.handles();
        let a = ActionRunner::new(a, list.tags());
        let a_tag = a.tag();
        list.queue_action_now(a);

        let b = TestAction::new("B");
        let (b_result, b_inits) = b.handles();
        list.queue_action_now(ActionRunner::new(b, list.tags()));
        assert_eq!(names(list.queue(SLOT)), ["B", "X"]);

        a_result.set(ActionResult::Success);
        b_result.set(ActionResult::Success);
        for step in 0..10 {
            list.update(f64::from(step) * 0.1);
        }

        assert_eq!(a_inits.get(), 0);
        assert_eq!(b_inits.get(), 1);
        let done: Vec<_> = list
            .drain_completions()
            .into_iter()
            .map(|m| (m.name, m.result))
            .collect();
        assert_eq!(done[0], ("A".to_owned(), ActionResult::Cancelled));
        assert_eq!(done[1], ("B".to_owned(), ActionResult::Success));
        assert!(!list.is_tag_in_use(a_tag));
    }

    #[test]
    fn now_cancels_the_current_action() {
        let mut list = ActionList::new();
        let first = ActionRunner::new(TestAction::new("T1"), list.tags());
        let first_tag = first.tag();
        list.queue_action_now(first);
        list.update(0.0);

        list.queue_action_now(ActionRunner::new(TestAction::new("T2"), list.tags()));
        assert_eq!(list.queue_length(SLOT), 1);
        assert_eq!(names(list.queue(SLOT)), ["T2"]);

        let done = list.drain_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].tag, first_tag);
        assert_eq!(done[0].result, ActionResult::Cancelled);
    }

    #[test]
    fn next_goes_behind_the_current_action() {
        let mut list = ActionList::new();
        for name in ["T1", "T2"] {
            let runner = ActionRunner::new(TestAction::new(name), list.tags());
            list.queue_action(SLOT, QueueActionPosition::AtEnd, runner, 0);
        }
        let runner = ActionRunner::new(TestAction::new("T3"), list.tags());
        list.queue_action(SLOT, QueueActionPosition::Next, runner, 0);
        assert_eq!(names(list.queue(SLOT)), ["T1", "T3", "T2"]);

        list.update(0.0);
        let runner = ActionRunner::new(TestAction::new("T4"), list.tags());
        list.queue_action(SLOT, QueueActionPosition::Next, runner, 0);
        assert_eq!(names(list.queue(SLOT)), ["T1", "T4", "T3", "T2"]);
    }

    #[test]
    fn now_and_resume_interrupts_then_resumes() {
        let mut list = ActionList::new();
        let first = TestAction::new("T1").tracks(AnimTrackFlags::HEAD).interruptible();
        let (_, first_inits) = first.handles();
        let first = ActionRunner::new(first, list.tags());
        let first_tag = first.tag();
        list.queue_action_now(first);
        list.update(0.0);
        assert!(list.tracks().are_all_locked(AnimTrackFlags::HEAD));

        let second = TestAction::new("T2");
        let (second_result, _) = second.handles();
        let runner = ActionRunner::new(second, list.tags());
        list.queue_action(SLOT, QueueActionPosition::NowAndResume, runner, 0);

        assert_eq!(list.queue_length(SLOT), 2);
        assert!(!list.tracks().are_any_locked(AnimTrackFlags::HEAD));
        let queue = list.queue(SLOT).unwrap();
        assert_eq!(queue.resume_state(first_tag), Some(ResumeState::InterruptedAwaitingFinalTick));
        assert_eq!(list.current_action(SLOT).map(|r| r.name()), Some("T2"));

        list.update(0.1);
        let queue = list.queue(SLOT).unwrap();
        assert_eq!(queue.resume_state(first_tag), Some(ResumeState::Resumed));
        assert!(list.drain_completions().is_empty());

        second_result.set(ActionResult::Success);
        list.update(0.2);
        assert_eq!(names(list.queue(SLOT)), ["T1"]);

        list.update(0.3);
        assert_eq!(first_inits.get(), 2);
        assert!(list.tracks().are_all_locked(AnimTrackFlags::HEAD));
    }

    #[test]
    fn now_and_resume_falls_back_to_cancel_when_refused() {
        let mut list = ActionList::new();
        list.queue_action_now(ActionRunner::new(TestAction::new("T1"), list.tags()));
        list.update(0.0);

        let runner = ActionRunner::new(TestAction::new("T2"), list.tags());
        list.queue_action(SLOT, QueueActionPosition::NowAndResume, runner, 0);
        assert_eq!(names(list.queue(SLOT)), ["T2"]);
        let done = list.drain_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].result, ActionResult::Cancelled);
    }

    #[test]
    fn now_and_clear_remaining_cancels_everything() {
        let mut list = ActionList::new();
        for name in ["T1", "T2"] {
            let runner = ActionRunner::new(TestAction::new(name), list.tags());
            list.queue_action(SLOT, QueueActionPosition::AtEnd, runner, 0);
        }
        list.update(0.0);

        let runner = ActionRunner::new(TestAction::new("T3"), list.tags());
        list.queue_action(SLOT, QueueActionPosition::NowAndClearRemaining, runner, 0);
        assert_eq!(names(list.queue(SLOT)), ["T3"]);

        let done: Vec<_> = list.drain_completions().into_iter().map(|m| (m.name, m.result)).collect();
        assert_eq!(
            done,
            vec![
                ("T1".to_owned(), ActionResult::Cancelled),
                ("T2".to_owned(), ActionResult::Cancelled),
            ]
        );
    }

    #[test]
    fn in_parallel_allocates_lowest_free_slot() {
        let mut list = ActionList::new();
        let a = TestAction::new("A");
        let (a_result, _) = a.handles();
        let slot_a = list.queue_action(SLOT, QueueActionPosition::InParallel, ActionRunner::new(a, list.tags()), 0);
        let b = ActionRunner::new(TestAction::new("B"), list.tags());
        let slot_b = list.queue_action(SLOT, QueueActionPosition::InParallel, b, 0);
        assert_eq!(slot_a, SlotHandle(1));
        assert_eq!(slot_b, SlotHandle(2));
        assert_eq!(list.num_queues(), 2);

        list.update(0.0);
        a_result.set(ActionResult::Success);
        list.update(0.1);
        assert_eq!(list.num_queues(), 1);

        let c = ActionRunner::new(TestAction::new("C"), list.tags());
        assert_eq!(list.add_concurrent_action(c), SlotHandle(1));
    }

    #[test]
    fn slots_update_independently() {
        let mut list = ActionList::new();
        list.queue_action_now(ActionRunner::new(TestAction::new("Main"), list.tags()));
        list.add_concurrent_action(ActionRunner::new(TestAction::new("Side"), list.tags()));
        list.update(0.0);
        assert!(list.is_current_action("Main"));
        assert!(list.is_current_action("Side"));
        assert_eq!(list.total_actions(), 2);
    }
}

// ── Cancellation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancel {
    use rb_core::{ActionTag, AnimTrackFlags, SlotHandle};

    use crate::{ActionList, ActionResult, ActionRunner, QueueActionPosition, RobotActionType, WaitAction};
    use super::helpers::{names, TestAction};

    const SLOT: SlotHandle = SlotHandle::DEFAULT;

    #[test]
    fn by_type_only_removes_matching_actions() {
        let mut list = ActionList::new();
        let wait = ActionRunner::new(WaitAction::new(5.0), list.tags());
        list.queue_action(SLOT, QueueActionPosition::AtEnd, wait, 0);
        let turn = ActionRunner::new(TestAction::new("Turn"), list.tags());
        list.queue_action(SLOT, QueueActionPosition::AtEnd, turn, 0);
        list.update(0.0);

        assert!(list.cancel_by_type(None, RobotActionType::Wait));
        assert_eq!(names(list.queue(SLOT)), ["Turn"]);
        assert!(!list.cancel_by_type(None, RobotActionType::SayText));
    }

    #[test]
    fn by_unknown_type_removes_everything() {
        let mut list = ActionList::new();
        list.queue_action_now(ActionRunner::new(WaitAction::new(5.0), list.tags()));
        list.add_concurrent_action(ActionRunner::new(TestAction::new("Turn"), list.tags()));
        assert!(list.cancel_by_type(None, RobotActionType::Unknown));
        assert!(list.is_empty());
        assert_eq!(list.drain_completions().len(), 2);
    }

    #[test]
    fn by_type_in_one_slot_leaves_others() {
        let mut list = ActionList::new();
        list.queue_action_now(ActionRunner::new(TestAction::new("Main"), list.tags()));
        let side = list.add_concurrent_action(ActionRunner::new(TestAction::new("Side"), list.tags()));
        assert!(list.cancel_by_type(Some(side), RobotActionType::Unknown));
        assert_eq!(list.num_queues(), 1);
        assert_eq!(list.queue_length(SLOT), 1);
    }

    #[test]
    fn by_tag_searches_all_slots() {
        let mut list = ActionList::new();
        list.queue_action_now(ActionRunner::new(TestAction::new("Main"), list.tags()));
        let side = ActionRunner::new(TestAction::new("Side"), list.tags());
        let side_tag = side.tag();
        let side_slot = list.add_concurrent_action(side);
        list.update(0.0);

        assert_eq!(list.find(side_tag).map(|(slot, _)| slot), Some(side_slot));
        assert!(list.is_tag_in_use(side_tag));
        assert!(list.cancel_by_tag(side_tag, None));
        assert!(list.queue(side_slot).is_none());
        assert!(!list.is_tag_in_use(side_tag));
        assert!(!list.cancel_by_tag(side_tag, None));
        assert!(!list.cancel_by_tag(ActionTag(999), None));
        assert_eq!(list.queue_length(SLOT), 1);
    }

    #[test]
    fn by_tag_in_wrong_slot_finds_nothing() {
        let mut list = ActionList::new();
        let runner = ActionRunner::new(TestAction::new("Main"), list.tags());
        let tag = runner.tag();
        list.queue_action_now(runner);
        assert!(!list.cancel_by_tag(tag, Some(SlotHandle(3))));
        assert!(list.cancel_by_tag(tag, Some(SLOT)));
    }

    #[test]
    fn cancel_before_start_still_reports_cancelled() {
        let mut list = ActionList::new();
        let runner = ActionRunner::new(TestAction::new("Never"), list.tags());
        let tag = runner.tag();
        list.queue_action_now(runner);
        assert!(list.cancel_by_tag(tag, None));
        let msg = list.completion_for(tag).cloned().unwrap();
        assert_eq!(msg.result, ActionResult::Cancelled);
    }

    #[test]
    fn clear_emits_nothing_and_releases_tracks() {
        let mut list = ActionList::new();
        let a = TestAction::new("A").tracks(AnimTrackFlags::BODY);
        list.queue_action_now(ActionRunner::new(a, list.tags()));
        list.add_concurrent_action(ActionRunner::new(TestAction::new("B"), list.tags()));
        list.update(0.0);
        assert!(list.tracks().are_any_locked(AnimTrackFlags::BODY));

        list.clear();
        assert!(list.is_empty());
        assert!(list.drain_completions().is_empty());
        assert_eq!(list.tracks().locked(), AnimTrackFlags::NONE);
        assert_eq!(list.tags().num_in_use(), 0);
    }
}

// ── Runner lifecycle ──────────────────────────────────────────────────────────

#[cfg(test)]
mod runner {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rb_core::{AnimTrackFlags, SlotHandle};

    use crate::{ActionList, ActionResult, ActionRunner, QueueActionPosition};
    use super::helpers::TestAction;

    const SLOT: SlotHandle = SlotHandle::DEFAULT;

    #[test]
    fn retries_then_aborts() {
        let mut list = ActionList::new();
        let action = TestAction::new("Flaky");
        let (result, inits) = action.handles();
        result.set(ActionResult::FailureRetry);
        let runner = ActionRunner::new(action, list.tags());
        list.queue_action(SLOT, QueueActionPosition::Now, runner, 2);

        assert_eq!(list.update(0.0), vec![(SLOT, ActionResult::Running)]);
        assert_eq!(list.update(0.1), vec![(SLOT, ActionResult::Running)]);
        assert_eq!(list.update(0.2), vec![(SLOT, ActionResult::FailureAbort)]);
        assert_eq!(inits.get(), 3);

        let done = list.drain_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].result, ActionResult::FailureAbort);
    }

    #[test]
    fn retry_can_succeed() {
        let mut list = ActionList::new();
        let action = TestAction::new("Flaky");
        let (result, _) = action.handles();
        result.set(ActionResult::FailureRetry);
        list.queue_action(SLOT, QueueActionPosition::Now, ActionRunner::new(action, list.tags()), 1);

        list.update(0.0);
        result.set(ActionResult::Success);
        assert_eq!(list.update(0.1), vec![(SLOT, ActionResult::Success)]);
    }

    #[test]
    fn times_out_from_first_update() {
        let mut list = ActionList::new();
        let mut action = TestAction::new("Slow");
        action.timeout = 1.0;
        list.queue_action_now(ActionRunner::new(action, list.tags()));

        list.update(10.0);
        list.update(10.5);
        assert_eq!(list.update(11.5), vec![(SLOT, ActionResult::Timeout)]);
        assert_eq!(list.drain_completions()[0].result, ActionResult::Timeout);
    }

    #[test]
    fn retry_restarts_the_timeout() {
        let mut list = ActionList::new();
        let mut action = TestAction::new("Flaky");
        action.timeout = 1.0;
        let (result, inits) = action.handles();
        result.set(ActionResult::FailureRetry);
        list.queue_action(SLOT, QueueActionPosition::Now, ActionRunner::new(action, list.tags()), 1);

        assert_eq!(list.update(0.0), vec![(SLOT, ActionResult::Running)]);
        result.set(ActionResult::Running);
        list.update(0.9);
        assert_eq!(inits.get(), 2);
        assert_eq!(list.update(1.5), vec![(SLOT, ActionResult::Running)]);
        assert_eq!(list.update(2.0), vec![(SLOT, ActionResult::Timeout)]);
    }

    #[test]
    fn start_delay_postpones_init() {
        let mut list = ActionList::new();
        let mut action = TestAction::new("Delayed");
        action.start_delay = 1.0;
        let (_, inits) = action.handles();
        list.queue_action_now(ActionRunner::new(action, list.tags()));

        list.update(0.0);
        list.update(0.5);
        assert_eq!(inits.get(), 0);
        list.update(1.0);
        assert_eq!(inits.get(), 1);
    }

    #[test]
    fn check_delay_postpones_check_if_done() {
        let mut list = ActionList::new();
        let mut action = TestAction::new("Checked");
        action.check_delay = 0.5;
        let (result, _) = action.handles();
        result.set(ActionResult::Success);
        list.queue_action_now(ActionRunner::new(action, list.tags()));

        assert_eq!(list.update(0.0), vec![(SLOT, ActionResult::Running)]);
        assert_eq!(list.update(0.25), vec![(SLOT, ActionResult::Running)]);
        assert_eq!(list.update(0.5), vec![(SLOT, ActionResult::Success)]);
    }

    #[test]
    fn locked_tracks_abort_a_new_action() {
        let mut list = ActionList::new();
        let holder = TestAction::new("Holder").tracks(AnimTrackFlags::HEAD);
        let (holder_result, _) = holder.handles();
        list.queue_action_now(ActionRunner::new(holder, list.tags()));
        list.update(0.0);

        let blocked = TestAction::new("Blocked").tracks(AnimTrackFlags::HEAD | AnimTrackFlags::LIFT);
        let (_, blocked_inits) = blocked.handles();
        let blocked_slot = list.add_concurrent_action(ActionRunner::new(blocked, list.tags()));
        let results = list.update(0.1);
        assert!(results.contains(&(blocked_slot, ActionResult::FailureAbort)));
        assert_eq!(blocked_inits.get(), 0);

        holder_result.set(ActionResult::Success);
        list.update(0.2);
        assert_eq!(list.tracks().locked(), AnimTrackFlags::NONE);
    }

    #[test]
    fn callbacks_fire_once_with_the_message() {
        let mut list = ActionList::new();
        let action = TestAction::new("Cb");
        let (result, _) = action.handles();
        let mut runner = ActionRunner::new(action, list.tags());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        runner.add_completion_callback(move |msg| sink.borrow_mut().push(msg.result));
        let tag = runner.tag();
        list.queue_action_now(runner);

        list.update(0.0);
        result.set(ActionResult::Success);
        list.update(0.1);
        list.update(0.2);
        assert_eq!(*seen.borrow(), vec![ActionResult::Success]);
        assert_eq!(list.completion_for(tag).map(|m| m.result), Some(ActionResult::Success));
        assert_eq!(list.drain_completions().len(), 1);
        assert!(list.completion_for(tag).is_none());
    }

    #[test]
    fn cancel_is_a_no_op_before_start() {
        let list = ActionList::new();
        let mut runner = ActionRunner::new(TestAction::new("Idle"), list.tags());
        assert!(!runner.cancel());
        assert_eq!(runner.state(), ActionResult::NotStarted);
    }
}

// ── Built-in actions ──────────────────────────────────────────────────────────

#[cfg(test)]
mod basic {
    use std::cell::Cell;
    use std::rc::Rc;

    use rb_core::SlotHandle;

    use crate::{ActionList, ActionResult, ActionRunner, WaitAction, WaitForLambdaAction};

    const SLOT: SlotHandle = SlotHandle::DEFAULT;

    #[test]
    fn wait_action_waits() {
        let mut list = ActionList::new();
        let runner = ActionRunner::new(WaitAction::new(1.0), list.tags());
        assert_eq!(runner.name(), "Wait1.00Seconds");
        list.queue_action_now(runner);

        assert_eq!(list.update(0.0), vec![(SLOT, ActionResult::Running)]);
        assert_eq!(list.update(0.9), vec![(SLOT, ActionResult::Running)]);
        assert_eq!(list.update(1.0), vec![(SLOT, ActionResult::Success)]);
    }

    #[test]
    fn wait_for_lambda_polls_predicate() {
        let mut list = ActionList::new();
        let ready = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ready);
        let action = WaitForLambdaAction::new(move |_| flag.get());
        list.queue_action_now(ActionRunner::new(action, list.tags()));

        assert_eq!(list.update(0.0), vec![(SLOT, ActionResult::Running)]);
        ready.set(true);
        assert_eq!(list.update(0.1), vec![(SLOT, ActionResult::Success)]);
    }

    #[test]
    fn wait_for_lambda_times_out() {
        let mut list = ActionList::new();
        let action = WaitForLambdaAction::new(|_| false).with_timeout(0.5);
        list.queue_action_now(ActionRunner::new(action, list.tags()));
        list.update(0.0);
        assert_eq!(list.update(1.0), vec![(SLOT, ActionResult::Timeout)]);
    }
}

// ── Compound actions ──────────────────────────────────────────────────────────

#[cfg(test)]
mod compound {
    use rb_core::{AnimTrackFlags, SlotHandle};

    use crate::{
        ActionList, ActionResult, ActionRunner, CompletionInfo, ParallelAction, SequentialAction,
    };
    use super::helpers::TestAction;

    const SLOT: SlotHandle = SlotHandle::DEFAULT;

    #[test]
    fn sequential_runs_children_in_order() {
        let mut list = ActionList::new();
        let first = TestAction::new("First").tracks(AnimTrackFlags::HEAD);
        let (first_result, _) = first.handles();
        first_result.set(ActionResult::Success);
        let second = TestAction::new("Second").tracks(AnimTrackFlags::LIFT);
        let (second_result, second_inits) = second.handles();
        let children = vec![
            ActionRunner::new(first, list.tags()),
            ActionRunner::new(second, list.tags()),
        ];
        list.queue_action_now(ActionRunner::new(SequentialAction::new("Seq", children), list.tags()));

        assert_eq!(list.update(0.0), vec![(SLOT, ActionResult::Running)]);
        assert_eq!(second_inits.get(), 1);
        assert!(list.tracks().are_all_locked(AnimTrackFlags::HEAD | AnimTrackFlags::LIFT));

        second_result.set(ActionResult::Success);
        assert_eq!(list.update(0.1), vec![(SLOT, ActionResult::Success)]);

        let done = list.drain_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].name, "Seq");
        assert_eq!(
            done[0].info,
            CompletionInfo::Compound { results: vec![ActionResult::Success, ActionResult::Success] }
        );
        assert_eq!(list.tracks().locked(), AnimTrackFlags::NONE);
    }

    #[test]
    fn parallel_fails_fast_and_cancels_the_rest() {
        let mut list = ActionList::new();
        let slow = TestAction::new("Slow");
        let broken = TestAction::new("Broken");
        let (broken_result, _) = broken.handles();
        let children = vec![
            ActionRunner::new(slow, list.tags()),
            ActionRunner::new(broken, list.tags()),
        ];
        list.queue_action_now(ActionRunner::new(ParallelAction::new("Par", children), list.tags()));

        list.update(0.0);
        broken_result.set(ActionResult::FailureAbort);
        assert_eq!(list.update(0.1), vec![(SLOT, ActionResult::FailureAbort)]);

        let done = list.drain_completions();
        assert_eq!(done.len(), 1);
        assert_eq!(
            done[0].info,
            CompletionInfo::Compound {
                results: vec![ActionResult::Cancelled, ActionResult::FailureAbort],
            }
        );
    }

    #[test]
    fn parallel_waits_for_all_children() {
        let mut list = ActionList::new();
        let a = TestAction::new("A");
        let b = TestAction::new("B");
        let (a_result, _) = a.handles();
        let (b_result, _) = b.handles();
        let children = vec![ActionRunner::new(a, list.tags()), ActionRunner::new(b, list.tags())];
        list.queue_action_now(ActionRunner::new(ParallelAction::new("Par", children), list.tags()));

        a_result.set(ActionResult::Success);
        assert_eq!(list.update(0.0), vec![(SLOT, ActionResult::Running)]);
        b_result.set(ActionResult::Success);
        assert_eq!(list.update(0.1), vec![(SLOT, ActionResult::Success)]);
    }
}
