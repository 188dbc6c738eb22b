//! `Robot`: the mutable world a behavior acts on.
//!
//! Owns the clock, the action list, the mood manager and the RNG, plus the
//! bookkeeping behaviors read when deciding whether they may run: which
//! reaction triggers are disabled and by whom, granted unlocks, running
//! analysis processes, and the charger/chooser timestamps.
//!
//! Running behaviors get `&mut Robot`; everything else sees `&Robot`.

use std::collections::VecDeque;

use rb_action::ActionList;
use rb_core::{EngineClock, EngineRng};
use rb_mood::MoodManager;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::{EngineEvent, ReactionTrigger};

#[derive(Debug)]
pub struct Robot {
    pub clock:       EngineClock,
    pub action_list: ActionList,
    pub mood:        MoodManager,
    pub rng:         EngineRng,

    /// Trigger → names of everyone currently disabling it.
    reaction_disablers: FxHashMap<ReactionTrigger, FxHashSet<String>>,
    tap_disablers:      FxHashSet<String>,
    unlocks:            FxHashSet<String>,
    processes:          FxHashSet<String>,

    last_drive_off_charger_secs: Option<f64>,
    last_parent_switch_secs:     Option<f64>,

    pending_events: VecDeque<EngineEvent>,
}

impl Robot {
    pub fn new(clock: EngineClock, mood: MoodManager, rng: EngineRng) -> Self {
        Robot {
            clock,
            action_list: ActionList::new(),
            mood,
            rng,
            reaction_disablers: FxHashMap::default(),
            tap_disablers: FxHashSet::default(),
            unlocks: FxHashSet::default(),
            processes: FxHashSet::default(),
            last_drive_off_charger_secs: None,
            last_parent_switch_secs: None,
            pending_events: VecDeque::new(),
        }
    }

    /// Default clock and mood, RNG seeded with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineClock::default(), MoodManager::default(), EngineRng::new(seed))
    }

    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.clock.now_secs()
    }

    // ── Events ────────────────────────────────────────────────────────────

    /// Queue an event for delivery to every behavior on the next routing
    /// pass.
    pub fn broadcast(&mut self, event: EngineEvent) {
        self.pending_events.push_back(event);
    }

    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        self.pending_events.drain(..).collect()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ── Reaction triggers ─────────────────────────────────────────────────

    /// Enable or disable `trigger` on behalf of `who`.
    ///
    /// Returns `false` (and logs) when `who` re-enables a trigger it never
    /// disabled.
    pub fn request_enable_reaction_trigger(
        &mut self,
        who:     &str,
        trigger: ReactionTrigger,
        enable:  bool,
    ) -> bool {
        if enable {
            let removed = self
                .reaction_disablers
                .get_mut(&trigger)
                .is_some_and(|set| set.remove(who));
            if !removed {
                warn!(who, ?trigger, "re-enabling a reaction trigger that was not disabled by this holder");
                return false;
            }
            if self.reaction_disablers.get(&trigger).is_some_and(|set| set.is_empty()) {
                self.reaction_disablers.remove(&trigger);
            }
        } else {
            self.reaction_disablers.entry(trigger).or_default().insert(who.to_owned());
        }
        debug!(who, ?trigger, enable, "reaction trigger request");
        true
    }

    pub fn is_reaction_trigger_enabled(&self, trigger: ReactionTrigger) -> bool {
        !self.reaction_disablers.contains_key(&trigger)
    }

    // ── Tap interaction ───────────────────────────────────────────────────

    pub fn set_tap_interaction_disabled(&mut self, who: &str, disabled: bool) {
        if disabled {
            self.tap_disablers.insert(who.to_owned());
        } else if !self.tap_disablers.remove(who) {
            warn!(who, "re-enabling tap interaction that was not disabled by this holder");
        }
    }

    pub fn is_tap_interaction_enabled(&self) -> bool {
        self.tap_disablers.is_empty()
    }

    // ── Progression and analysis processes ────────────────────────────────

    /// Grant an unlock and broadcast it.
    pub fn grant_unlock(&mut self, id: &str) {
        if self.unlocks.insert(id.to_owned()) {
            self.broadcast(EngineEvent::UnlockGranted(id.to_owned()));
        }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocks.contains(id)
    }

    pub fn start_process(&mut self, name: &str) {
        self.processes.insert(name.to_owned());
    }

    pub fn stop_process(&mut self, name: &str) {
        self.processes.remove(name);
    }

    pub fn is_process_running(&self, name: &str) -> bool {
        self.processes.contains(name)
    }

    // ── Timestamps ────────────────────────────────────────────────────────

    pub fn mark_drove_off_charger(&mut self) {
        self.last_drive_off_charger_secs = Some(self.now_secs());
    }

    pub fn last_drive_off_charger_secs(&self) -> Option<f64> {
        self.last_drive_off_charger_secs
    }

    /// Record that the chooser switched behaviors.
    pub fn mark_parent_switch(&mut self) {
        self.last_parent_switch_secs = Some(self.now_secs());
    }

    pub fn last_parent_switch_secs(&self) -> Option<f64> {
        self.last_parent_switch_secs
    }
}

impl Default for Robot {
    fn default() -> Self {
        Self::with_seed(0)
    }
}
