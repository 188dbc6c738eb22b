//! `BehaviorCore`: the state every behavior carries.
//!
//! A concrete behavior embeds one `BehaviorCore<Self>` and exposes it via
//! [`BehaviorModel::core`][crate::BehaviorModel::core].  The lifecycle,
//! scoring and acting logic in this crate reads and writes it; concrete
//! behaviors mostly use the query methods and the `smart_*` helpers.

use std::collections::BTreeSet;
use std::fmt;

use rb_action::ActionCompleted;
use rb_core::{ActionTag, AnimTrackFlags, Graph2d};
use rb_mood::MoodScorer;
use rustc_hash::FxHashMap;
use tracing::{debug, error, warn};

use crate::{
    BehaviorConfig, BehaviorGroup, BehaviorObjective, BehaviorResult, EngineEvent,
    ReactionTrigger, Robot,
};

/// Resumes from a cliff or unexpected movement allowed before the behavior
/// refuses and cools down.
pub const MAX_RESUMES_FROM_CLIFF: u32 = 2;

/// How long a behavior stays unrunnable after too many cliff resumes.
pub const COOLDOWN_FROM_CLIFF_RESUMES_SECS: f64 = 15.0;

/// Window after `stop_without_immediate_repetition_penalty` during which the
/// repetition penalty is skipped.
pub const SKIP_REPETITION_PENALTY_SECS: f64 = 1.0;

/// Callback run when the action started by `start_acting` completes.
pub type ActingCallback<B> = Box<dyn FnOnce(&mut B, &ActionCompleted, &mut Robot)>;

pub struct BehaviorCore<B> {
    // ── Configuration ─────────────────────────────────────────────────────
    pub(crate) name:                                String,
    pub(crate) groups:                              Vec<BehaviorGroup>,
    pub(crate) executable_type:                     Option<String>,
    pub(crate) required_unlock:                     Option<String>,
    pub(crate) required_process:                    Option<String>,
    pub(crate) required_recent_drive_off_secs:      f64,
    pub(crate) required_recent_parent_switch_secs:  f64,
    pub(crate) mood_scorer:                         MoodScorer,
    pub(crate) flat_score:                          f32,
    pub(crate) repetition_penalty:                  Graph2d,
    pub(crate) running_penalty:                     Graph2d,
    pub(crate) cooldown_on_objective:               Option<BehaviorObjective>,

    // ── Runtime ───────────────────────────────────────────────────────────
    pub(crate) running:                  bool,
    pub(crate) can_start_acting:         bool,
    pub(crate) start_count:              u32,
    pub(crate) last_run_secs:            Option<f64>,
    pub(crate) started_running_secs:     f64,
    pub(crate) extra_running_score:      f32,
    pub(crate) repetition_penalty_from:  f64,
    pub(crate) acting_tag:               Option<ActionTag>,
    pub(crate) acting_callback:          Option<ActingCallback<B>>,
    pub(crate) cliff_resumes:            u32,
    pub(crate) cliff_cooldown_until:     f64,

    // ── Smart-held robot resources, released on stop ──────────────────────
    pub(crate) disabled_triggers:        BTreeSet<ReactionTrigger>,
    pub(crate) tap_disabled:             bool,
    pub(crate) locked_tracks:            FxHashMap<String, AnimTrackFlags>,
}

impl<B> BehaviorCore<B> {
    pub fn new(config: BehaviorConfig) -> BehaviorResult<Self> {
        let config = config.normalized()?;
        Ok(BehaviorCore {
            name: config.name,
            groups: config.behavior_groups,
            executable_type: config.executable_behavior_type,
            required_unlock: config.required_unlock_id,
            required_process: config.required_process,
            required_recent_drive_off_secs: config.required_recent_drive_off_charger_secs,
            required_recent_parent_switch_secs: config.required_recent_switch_to_parent_secs,
            mood_scorer: config.emotion_scorers,
            flat_score: config.flat_score.unwrap_or(0.0),
            repetition_penalty: config.repetition_penalty,
            running_penalty: config.running_penalty,
            cooldown_on_objective: config.consider_this_has_run_for_behavior_objective,
            running: false,
            can_start_acting: false,
            start_count: 0,
            last_run_secs: None,
            started_running_secs: 0.0,
            extra_running_score: 0.0,
            repetition_penalty_from: 0.0,
            acting_tag: None,
            acting_callback: None,
            cliff_resumes: 0,
            cliff_cooldown_until: 0.0,
            disabled_triggers: BTreeSet::new(),
            tap_disabled: false,
            locked_tracks: FxHashMap::default(),
        })
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &[BehaviorGroup] {
        &self.groups
    }

    pub fn in_group(&self, group: BehaviorGroup) -> bool {
        self.groups.contains(&group)
    }

    pub fn executable_type(&self) -> Option<&str> {
        self.executable_type.as_deref()
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_acting(&self) -> bool {
        self.acting_tag.is_some()
    }

    pub fn acting_tag(&self) -> Option<ActionTag> {
        self.acting_tag
    }

    pub fn start_count(&self) -> u32 {
        self.start_count
    }

    pub fn last_run_secs(&self) -> Option<f64> {
        self.last_run_secs
    }

    pub fn started_running_secs(&self) -> f64 {
        self.started_running_secs
    }

    pub fn extra_running_score(&self) -> f32 {
        self.extra_running_score
    }

    pub fn mood_scorer(&self) -> &MoodScorer {
        &self.mood_scorer
    }

    pub fn flat_score(&self) -> f32 {
        self.flat_score
    }

    pub fn repetition_penalty(&self) -> &Graph2d {
        &self.repetition_penalty
    }

    pub fn running_penalty(&self) -> &Graph2d {
        &self.running_penalty
    }

    pub fn disabled_triggers(&self) -> impl Iterator<Item = ReactionTrigger> + '_ {
        self.disabled_triggers.iter().copied()
    }

    // ── Scoring helpers ───────────────────────────────────────────────────

    /// Mood scorer if configured, otherwise the flat score.
    pub fn base_score(&self, robot: &Robot) -> f32 {
        if self.mood_scorer.is_empty() {
            self.flat_score
        } else {
            self.mood_scorer.evaluate(&robot.mood)
        }
    }

    /// Repetition penalty at the time since the last run.  `1.0` when the
    /// behavior never ran or the penalty is being skipped.
    pub fn repetition_multiplier(&self, now_secs: f64) -> f32 {
        match self.last_run_secs {
            Some(last) if now_secs >= self.repetition_penalty_from => {
                self.repetition_penalty.evaluate((now_secs - last) as f32)
            }
            _ => 1.0,
        }
    }

    /// Running penalty at the time since the behavior started.
    pub fn running_multiplier(&self, now_secs: f64) -> f32 {
        self.running_penalty.evaluate((now_secs - self.started_running_secs) as f32)
    }

    // ── Runnability ───────────────────────────────────────────────────────

    /// Checks shared by every behavior: required process and unlock,
    /// recent drive-off-charger and chooser-switch windows, cliff cooldown.
    pub fn base_runnable(&self, robot: &Robot) -> bool {
        if self.running {
            return true;
        }
        if let Some(process) = &self.required_process {
            if !robot.is_process_running(process) {
                error!(behavior = %self.name, process, "required analysis process is not running");
                return false;
            }
        }
        if let Some(unlock) = &self.required_unlock {
            if !robot.is_unlocked(unlock) {
                return false;
            }
        }
        let now = robot.now_secs();
        if self.required_recent_drive_off_secs >= 0.0 {
            match robot.last_drive_off_charger_secs() {
                Some(t) if now <= t + self.required_recent_drive_off_secs => {}
                _ => return false,
            }
        }
        if self.required_recent_parent_switch_secs >= 0.0 {
            match robot.last_parent_switch_secs() {
                Some(t) if now - t <= self.required_recent_parent_switch_secs => {}
                _ => return false,
            }
        }
        now >= self.cliff_cooldown_until
    }

    // ── Smart helpers ─────────────────────────────────────────────────────

    /// Disable a reaction trigger until re-enabled or the behavior stops.
    pub fn smart_disable_reaction_trigger(&mut self, robot: &mut Robot, trigger: ReactionTrigger) {
        robot.request_enable_reaction_trigger(&self.name, trigger, false);
        self.disabled_triggers.insert(trigger);
    }

    pub fn smart_disable_reaction_triggers(
        &mut self,
        robot:    &mut Robot,
        triggers: impl IntoIterator<Item = ReactionTrigger>,
    ) {
        for trigger in triggers {
            self.smart_disable_reaction_trigger(robot, trigger);
        }
    }

    /// Re-enable a trigger disabled with
    /// [`smart_disable_reaction_trigger`][Self::smart_disable_reaction_trigger].
    pub fn smart_re_enable_reaction_trigger(
        &mut self,
        robot:   &mut Robot,
        trigger: ReactionTrigger,
    ) -> bool {
        if !self.disabled_triggers.remove(&trigger) {
            error!(behavior = %self.name, ?trigger, "re-enabling a reaction trigger this behavior did not disable");
            return false;
        }
        robot.request_enable_reaction_trigger(&self.name, trigger, true)
    }

    pub fn smart_disable_tap_interaction(&mut self, robot: &mut Robot) {
        if !self.tap_disabled {
            robot.set_tap_interaction_disabled(&self.name, true);
            self.tap_disabled = true;
        }
    }

    pub fn smart_re_enable_tap_interaction(&mut self, robot: &mut Robot) {
        if self.tap_disabled {
            robot.set_tap_interaction_disabled(&self.name, false);
            self.tap_disabled = false;
        }
    }

    /// Lock `tracks` under the key `who` until unlocked or the behavior
    /// stops.  Returns `false` if `who` already holds a lock.
    pub fn smart_lock_tracks(&mut self, robot: &mut Robot, tracks: AnimTrackFlags, who: &str) -> bool {
        if self.locked_tracks.contains_key(who) {
            warn!(behavior = %self.name, who, "track lock key already in use");
            return false;
        }
        robot.action_list.tracks_mut().lock(tracks, who);
        self.locked_tracks.insert(who.to_owned(), tracks);
        true
    }

    pub fn smart_unlock_tracks(&mut self, robot: &mut Robot, who: &str) -> bool {
        match self.locked_tracks.remove(who) {
            Some(tracks) => {
                robot.action_list.tracks_mut().unlock(tracks, who);
                true
            }
            None => {
                warn!(behavior = %self.name, who, "no track lock under this key");
                false
            }
        }
    }

    /// Add to the running score until the current action completes.  No-op
    /// when not acting.  Repeated calls accumulate.
    pub fn increase_score_while_acting(&mut self, extra: f32) {
        if self.is_acting() {
            self.extra_running_score += extra;
        }
    }

    /// Refuse further `start_acting` calls; the behavior completes once
    /// its current action finishes.
    pub fn stop_on_next_action_complete(&mut self) {
        self.can_start_acting = false;
    }

    /// Announce that this behavior reached `objective`.
    pub fn behavior_objective_achieved(&self, robot: &mut Robot, objective: BehaviorObjective) {
        debug!(behavior = %self.name, ?objective, "behavior objective achieved");
        robot.broadcast(EngineEvent::BehaviorObjectiveAchieved(objective));
    }

    /// Undo every smart helper still in effect.
    pub(crate) fn release_smart_holds(&mut self, robot: &mut Robot) {
        for trigger in std::mem::take(&mut self.disabled_triggers) {
            robot.request_enable_reaction_trigger(&self.name, trigger, true);
        }
        self.smart_re_enable_tap_interaction(robot);
        for (who, tracks) in std::mem::take(&mut self.locked_tracks) {
            robot.action_list.tracks_mut().unlock(tracks, &who);
        }
    }
}

impl<B> fmt::Debug for BehaviorCore<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorCore")
            .field("name", &self.name)
            .field("running", &self.running)
            .field("acting_tag", &self.acting_tag)
            .field("start_count", &self.start_count)
            .finish()
    }
}
