//! The `BehaviorManager` and its tick loop.

use rb_behavior::{Behavior, BehaviorStatus, EngineEvent, ReactionTrigger, Robot};
use rb_core::{BehaviorId, Tick};
use tracing::{debug, info, warn};

use crate::{BehaviorChooser, BehaviorEntry, EngineConfig, EngineError, EngineObserver, EngineResult};

/// Events a single tick may chain (an event handler broadcasting another
/// event, and so on) before the rest are deferred to the next tick.
pub const MAX_EVENT_ROUNDS: usize = 8;

/// A behavior set aside by a reflex reaction, waiting to be resumed.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Interrupted {
    id:      BehaviorId,
    trigger: ReactionTrigger,
}

/// Owns the robot and the behavior registry and drives both, one tick at a
/// time.
///
/// Each tick:
///
/// 1. advance the clock and tick the mood manager,
/// 2. update every action slot,
/// 3. deliver the resulting completion messages to every behavior,
/// 4. route queued events to subscribed behaviors,
/// 5. update the active behavior, stopping it on `Complete`/`Failure` or
///    when its activity strategy says it is done,
/// 6. every `choose_interval_ticks` (or right after the active behavior
///    ended) ask the chooser and switch if it picks someone else.
///
/// Create via [`BehaviorManagerBuilder`][crate::BehaviorManagerBuilder].
pub struct BehaviorManager<C: BehaviorChooser> {
    pub config: EngineConfig,

    /// Clock, actions, mood and RNG.  Tests and demos poke at it directly.
    pub robot: Robot,

    pub(crate) entries:     Vec<BehaviorEntry>,
    pub(crate) chooser:     C,
    pub(crate) active:      Option<BehaviorId>,
    pub(crate) interrupted: Option<Interrupted>,
}

impl<C: BehaviorChooser> BehaviorManager<C> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run `n` ticks.
    pub fn run_ticks<O: EngineObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick(observer);
        }
    }

    /// Queue an external event; it is routed on the next tick.
    pub fn push_event(&mut self, event: EngineEvent) {
        self.robot.broadcast(event);
    }

    pub fn current_tick(&self) -> Tick {
        self.robot.clock.current_tick
    }

    pub fn active_id(&self) -> Option<BehaviorId> {
        self.active
    }

    pub fn active_behavior(&self) -> Option<&dyn Behavior> {
        self.active.map(|id| self.entries[id.index()].behavior.as_ref())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active_behavior().map(|b| b.name())
    }

    pub fn behavior_id(&self, name: &str) -> Option<BehaviorId> {
        self.entries
            .iter()
            .position(|e| e.behavior.name() == name)
            .and_then(|i| BehaviorId::try_from(i).ok())
    }

    pub fn behavior(&self, name: &str) -> Option<&dyn Behavior> {
        self.behavior_id(name).map(|id| self.entries[id.index()].behavior.as_ref())
    }

    pub fn behaviors(&self) -> impl Iterator<Item = &dyn Behavior> + '_ {
        self.entries.iter().map(|e| e.behavior.as_ref())
    }

    pub fn num_behaviors(&self) -> usize {
        self.entries.len()
    }

    /// Switch to the named behavior now, bypassing the chooser.
    pub fn force_behavior<O: EngineObserver>(&mut self, name: &str, observer: &mut O) -> EngineResult<()> {
        let id = self
            .behavior_id(name)
            .ok_or_else(|| EngineError::UnknownBehavior(name.to_owned()))?;
        if self.active != Some(id) {
            self.stop_active(None, observer);
            self.start(id, observer)?;
        }
        Ok(())
    }

    /// A reflex reaction pre-empts the active behavior.
    ///
    /// Returns `false` without touching anything when `trigger` is
    /// currently disabled or nothing is active.  Otherwise the active
    /// behavior is stopped and remembered for
    /// [`resume_after_reaction`][Self::resume_after_reaction].
    pub fn interrupt_for_reaction<O: EngineObserver>(
        &mut self,
        trigger:  ReactionTrigger,
        observer: &mut O,
    ) -> bool {
        if !self.robot.is_reaction_trigger_enabled(trigger) {
            debug!(?trigger, "reaction trigger disabled; not interrupting");
            return false;
        }
        let Some(id) = self.active else {
            return false;
        };
        info!(?trigger, behavior = self.entries[id.index()].behavior.name(), "interrupted by reaction");
        self.stop_active(None, observer);
        self.interrupted = Some(Interrupted { id, trigger });
        true
    }

    /// Resume the behavior set aside by the last reaction, stopping
    /// whatever the chooser started meanwhile.  On refusal the robot stays
    /// idle and the next tick chooses afresh.
    pub fn resume_after_reaction<O: EngineObserver>(&mut self, observer: &mut O) -> EngineResult<()> {
        let Some(Interrupted { id, trigger }) = self.interrupted.take() else {
            return Ok(());
        };
        self.stop_active(None, observer);
        self.robot.mark_parent_switch();
        let entry = &mut self.entries[id.index()];
        entry.behavior.resume(&mut self.robot, Some(trigger))?;
        self.active = Some(id);
        observer.on_behavior_started(self.robot.clock.current_tick, entry.behavior.name());
        Ok(())
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    pub fn tick<O: EngineObserver>(&mut self, observer: &mut O) {
        // ── 1: time and mood ──────────────────────────────────────────────
        self.robot.clock.advance();
        let tick = self.robot.clock.current_tick;
        let now = self.robot.now_secs();
        self.robot.mood.update(now);
        observer.on_tick_start(tick);

        // ── 2: actions ────────────────────────────────────────────────────
        self.robot.action_list.update(now);

        // ── 3: completion messages ────────────────────────────────────────
        for msg in self.robot.action_list.drain_completions() {
            observer.on_action_completed(tick, &msg);
            self.route(&EngineEvent::ActionCompleted(msg));
        }

        // ── 4: queued events ──────────────────────────────────────────────
        let mut rounds = 0;
        while self.robot.has_pending_events() {
            if rounds == MAX_EVENT_ROUNDS {
                warn!(%tick, "event routing did not settle; deferring the rest");
                break;
            }
            for event in self.robot.take_events() {
                self.route(&event);
            }
            rounds += 1;
        }

        // ── 5: active behavior ────────────────────────────────────────────
        let mut must_choose = self.active.is_none();
        if let Some(id) = self.active {
            let status = self.entries[id.index()].behavior.update(&mut self.robot);
            if status != BehaviorStatus::Running {
                self.stop_active(Some(status), observer);
                must_choose = true;
            } else if self.entries[id.index()].strategy_wants_to_end(now) {
                debug!(behavior = self.entries[id.index()].behavior.name(), "activity ended by strategy");
                self.stop_active(None, observer);
                must_choose = true;
            }
        }

        // ── 6: choose ─────────────────────────────────────────────────────
        if must_choose || tick.0.is_multiple_of(self.config.choose_interval_ticks) {
            self.choose(observer);
        }

        observer.on_tick_end(tick, self.active_name());
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn route(&mut self, event: &EngineEvent) {
        for entry in &mut self.entries {
            entry.behavior.handle_event(event, &mut self.robot);
        }
    }

    fn choose<O: EngineObserver>(&mut self, observer: &mut O) {
        let choice = self.chooser.choose(&self.entries, self.active, &self.robot);
        if choice == self.active {
            return;
        }
        self.stop_active(None, observer);
        if let Some(id) = choice {
            if let Err(err) = self.start(id, observer) {
                warn!(%err, "chosen behavior failed to start; idling");
            }
        }
    }

    fn start<O: EngineObserver>(&mut self, id: BehaviorId, observer: &mut O) -> EngineResult<()> {
        self.robot.mark_parent_switch();
        let entry = &mut self.entries[id.index()];
        entry.behavior.init(&mut self.robot)?;
        info!(behavior = entry.behavior.name(), "behavior started");
        self.active = Some(id);
        observer.on_behavior_started(self.robot.clock.current_tick, entry.behavior.name());
        Ok(())
    }

    fn stop_active<O: EngineObserver>(&mut self, status: Option<BehaviorStatus>, observer: &mut O) {
        let Some(id) = self.active.take() else {
            return;
        };
        let behavior = &mut self.entries[id.index()].behavior;
        behavior.stop(&mut self.robot);
        info!(behavior = behavior.name(), ?status, "behavior stopped");
        observer.on_behavior_stopped(self.robot.clock.current_tick, behavior.name(), status);
    }
}
