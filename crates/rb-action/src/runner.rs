//! `ActionRunner`: drives one [`Action`] through its lifecycle.
//!
//! ```text
//!              first update            init ok               check_if_done
//! NotStarted ───────────────▶ Running ─(start delay)─▶ ... ─(check delay)─▶ result
//!     ▲                          │
//!     └──── FailureRetry ────────┘   (while retries remain)
//! ```
//!
//! Every exit from `Running` except an interrupt goes through
//! `prep_for_completion`, which runs once: it releases tracks, fills the
//! completion payload, fires callbacks and emits the completion message.

use rb_core::{ActionTag, AnimTrackFlags};
use tracing::{debug, warn};

use crate::{
    Action, ActionCompleted, ActionContext, ActionError, ActionResult, RobotActionType,
    TagAllocator, TagLease, TrackLocks,
};

/// Callback invoked with the completion message when the action finishes.
pub type CompletionCallback = Box<dyn FnOnce(&ActionCompleted)>;

/// Owns an action and its lifecycle state.
pub struct ActionRunner {
    action:                 Box<dyn Action>,
    lease:                  TagLease,
    state:                  ActionResult,
    retries_remaining:      u8,
    suppress_track_locking: bool,
    emit_completion:        bool,
    first_update_secs:      Option<f64>,
    init_done_secs:         Option<f64>,
    tracks_locked:          bool,
    interrupted:            bool,
    completion:             Option<ActionCompleted>,
    callbacks:              Vec<CompletionCallback>,
}

impl ActionRunner {
    /// Wrap `action` and reserve an automatic tag for it.
    pub fn new(action: impl Action + 'static, tags: &TagAllocator) -> Self {
        Self::from_box(Box::new(action), tags.allocate())
    }

    /// Wrap `action` under a caller-chosen tag.  Fails if the tag is taken.
    pub fn with_custom_tag(
        action: impl Action + 'static,
        tags:   &TagAllocator,
        tag:    ActionTag,
    ) -> Result<Self, ActionError> {
        Ok(Self::from_box(Box::new(action), tags.reserve(tag)?))
    }

    pub fn from_box(action: Box<dyn Action>, lease: TagLease) -> Self {
        Self {
            action,
            lease,
            state: ActionResult::NotStarted,
            retries_remaining: 0,
            suppress_track_locking: false,
            emit_completion: true,
            first_update_secs: None,
            init_done_secs: None,
            tracks_locked: false,
            interrupted: false,
            completion: None,
            callbacks: Vec::new(),
        }
    }

    // ── Configuration ─────────────────────────────────────────────────────

    pub fn with_retries(mut self, retries: u8) -> Self {
        self.retries_remaining = retries;
        self
    }

    pub fn set_num_retries(&mut self, retries: u8) {
        self.retries_remaining = retries;
    }

    /// Run without claiming the action's tracks (children of a compound
    /// action, whose parent holds the union).
    pub fn set_suppress_track_locking(&mut self, suppress: bool) {
        self.suppress_track_locking = suppress;
    }

    /// Keep the completion message out of the broadcast buffer.
    pub fn set_emit_completion(&mut self, emit: bool) {
        self.emit_completion = emit;
    }

    pub fn add_completion_callback(&mut self, callback: impl FnOnce(&ActionCompleted) + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn tag(&self) -> ActionTag {
        self.lease.tag()
    }

    pub fn name(&self) -> &str {
        self.action.name()
    }

    pub fn action_type(&self) -> RobotActionType {
        self.action.action_type()
    }

    pub fn tracks(&self) -> AnimTrackFlags {
        self.action.tracks()
    }

    /// Per-attempt limit; see [`Action::timeout_secs`].
    pub fn timeout_secs(&self) -> f64 {
        self.action.timeout_secs()
    }

    #[inline]
    pub fn state(&self) -> ActionResult {
        self.state
    }

    pub fn retries_remaining(&self) -> u8 {
        self.retries_remaining
    }

    /// `true` once the first update has run (and until a retry/resume reset).
    pub fn has_started(&self) -> bool {
        self.first_update_secs.is_some()
    }

    /// `true` between an accepted interrupt and its final update.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// The completion message, once the action has finished.
    pub fn completion(&self) -> Option<&ActionCompleted> {
        self.completion.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.completion.is_some()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Advance the action by one tick.
    pub fn update(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult {
        if self.completion.is_some() {
            return self.state;
        }
        if self.interrupted {
            self.interrupted = false;
            self.rewind();
            debug!(tag = %self.tag(), name = self.name(), "final tick after interrupt");
            return ActionResult::Interrupted;
        }
        if self.state.is_terminal() {
            // Cancelled between updates; finish now.
            let result = self.state;
            self.prep_for_completion(ctx);
            return result;
        }

        match self.step(ctx) {
            ActionResult::Running | ActionResult::NotStarted | ActionResult::Interrupted => {
                self.state = ActionResult::Running;
                ActionResult::Running
            }
            ActionResult::FailureRetry if self.retries_remaining > 0 => {
                self.retries_remaining -= 1;
                debug!(
                    tag = %self.tag(),
                    name = self.name(),
                    retries_left = self.retries_remaining,
                    "action failed, retrying"
                );
                self.release_tracks(ctx.tracks);
                self.rewind();
                ActionResult::Running
            }
            ActionResult::FailureRetry => self.finish(ActionResult::FailureAbort, ctx),
            result => self.finish(result, ctx),
        }
    }

    fn step(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult {
        let now = ctx.now_secs;
        let first = *self.first_update_secs.get_or_insert(now);
        if now - first > self.action.timeout_secs() {
            warn!(tag = %self.tag(), name = self.name(), "action timed out");
            return ActionResult::Timeout;
        }

        let init_done = match self.init_done_secs {
            Some(t) => t,
            None => {
                if now - first < self.action.start_delay_secs() {
                    return ActionResult::Running;
                }
                let tracks = self.action.tracks();
                if !self.suppress_track_locking && ctx.tracks.are_any_locked(tracks) {
                    warn!(
                        tag = %self.tag(),
                        name = self.name(),
                        %tracks,
                        locked = %ctx.tracks.locked(),
                        "required tracks are locked"
                    );
                    return ActionResult::FailureAbort;
                }
                match self.action.init(ctx) {
                    ActionResult::Success => {}
                    other => return other,
                }
                if !self.suppress_track_locking && !tracks.is_empty() {
                    ctx.tracks.lock(tracks, &TrackLocks::action_holder(self.tag()));
                    self.tracks_locked = true;
                }
                self.init_done_secs = Some(now);
                now
            }
        };

        if now - init_done < self.action.check_if_done_delay_secs() {
            return ActionResult::Running;
        }
        self.action.check_if_done(ctx)
    }

    /// Mark the action cancelled.  No-op before it started or once finished.
    ///
    /// The completion path runs on the next `update` (or immediately via
    /// [`ActionRunner::finish_cancelled`]).
    pub fn cancel(&mut self) -> bool {
        if !self.has_started() || self.completion.is_some() {
            return false;
        }
        self.state = ActionResult::Cancelled;
        true
    }

    /// Finish the action as `Cancelled` right now, started or not.
    ///
    /// Used when a queue removes an action; the completion message is still
    /// produced so whoever started it learns it will never run.
    pub fn finish_cancelled(&mut self, ctx: &mut ActionContext<'_>) {
        if self.completion.is_none() {
            self.finish(ActionResult::Cancelled, ctx);
        }
    }

    /// Ask the action to pause.  On success its tracks are released and the
    /// next `update` reports `Interrupted` and rewinds it for resumption.
    pub fn interrupt(&mut self, tracks: &mut TrackLocks) -> bool {
        if self.state != ActionResult::Running || self.completion.is_some() {
            return false;
        }
        if !self.action.interrupt_internal() {
            return false;
        }
        self.release_tracks(tracks);
        self.interrupted = true;
        debug!(tag = %self.tag(), name = self.name(), "action interrupted");
        true
    }

    /// Drop without completion.  Only tracks are released.
    pub fn discard(mut self, tracks: &mut TrackLocks) {
        self.release_tracks(tracks);
    }

    fn finish(&mut self, result: ActionResult, ctx: &mut ActionContext<'_>) -> ActionResult {
        self.state = result;
        self.prep_for_completion(ctx);
        result
    }

    fn prep_for_completion(&mut self, ctx: &mut ActionContext<'_>) {
        if self.completion.is_some() {
            return;
        }
        self.release_tracks(ctx.tracks);
        self.action.on_complete(self.state, ctx);

        let msg = ActionCompleted {
            tag:         self.tag(),
            action_type: self.action.action_type(),
            name:        self.action.name().to_owned(),
            result:      self.state,
            info:        self.action.completion_info(),
        };
        debug!(tag = %msg.tag, name = %msg.name, result = %msg.result, "action completed");

        for callback in std::mem::take(&mut self.callbacks) {
            callback(&msg);
        }
        if self.emit_completion {
            ctx.emit(msg.clone());
        }
        self.completion = Some(msg);
    }

    fn release_tracks(&mut self, tracks: &mut TrackLocks) {
        if self.tracks_locked {
            tracks.unlock(self.action.tracks(), &TrackLocks::action_holder(self.tag()));
            self.tracks_locked = false;
        }
    }

    /// Back to `NotStarted` with the same tag; the action forgets progress
    /// and its timeout restarts on the next update.
    pub(crate) fn rewind(&mut self) {
        self.state = ActionResult::NotStarted;
        self.first_update_secs = None;
        self.init_done_secs = None;
        self.completion = None;
        self.action.reset();
    }
}

impl std::fmt::Debug for ActionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRunner")
            .field("tag", &self.tag())
            .field("name", &self.name())
            .field("state", &self.state)
            .finish()
    }
}
