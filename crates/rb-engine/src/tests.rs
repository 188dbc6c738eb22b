//! Integration tests for rb-engine.

use std::cell::Cell;
use std::rc::Rc;

use rb_action::{ActionCompleted, ActionRunner, WaitAction};
use rb_behavior::{
    Acting, ActivityStrategy, ActivityStrategyConfig, BehaviorConfig, BehaviorCore, BehaviorError,
    BehaviorModel, BehaviorResult, BehaviorStatus, EngineEvent, EventTag, Robot,
};
use rb_core::{Graph2d, Tick};

use crate::{BehaviorManager, BehaviorManagerBuilder, EngineConfig, EngineObserver, ScoringChooser};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(seed: u64) -> EngineConfig {
    EngineConfig {
        tick_duration_secs:    0.25,
        seed,
        choose_interval_ticks: 5,
        tie_epsilon:           1e-3,
    }
}

/// Behavior whose shape is set per test: endless by default, optionally
/// acting once from `init` and completing when the action does.
struct Scripted {
    core:       BehaviorCore<Self>,
    act_secs:   Option<f64>,
    fail_init:  bool,
    subscribed: Vec<EventTag>,
    seen:       Rc<Cell<u32>>,
}

impl Scripted {
    fn new(config: BehaviorConfig) -> Self {
        Scripted {
            core: BehaviorCore::new(config).unwrap(),
            act_secs: None,
            fail_init: false,
            subscribed: Vec::new(),
            seen: Rc::default(),
        }
    }

    fn flat(name: &str, score: f32) -> Self {
        Self::new(BehaviorConfig::new(name).with_flat_score(score))
    }
}

impl BehaviorModel for Scripted {
    fn core(&self) -> &BehaviorCore<Self> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore<Self> {
        &mut self.core
    }

    fn init_internal(&mut self, robot: &mut Robot) -> BehaviorResult<()> {
        if self.fail_init {
            return Err(BehaviorError::InitFailed { name: self.core.name().into(), reason: "scripted".into() });
        }
        if let Some(secs) = self.act_secs {
            let runner = ActionRunner::new(WaitAction::new(secs), robot.action_list.tags());
            self.start_acting(robot, runner).map_err(|refused| BehaviorError::InitFailed {
                name: self.core.name().into(),
                reason: refused.reason.to_string(),
            })?;
        }
        Ok(())
    }

    fn update_internal(&mut self, _robot: &mut Robot) -> BehaviorStatus {
        match self.act_secs {
            Some(_) if !self.core.is_acting() => BehaviorStatus::Complete,
            _ => BehaviorStatus::Running,
        }
    }

    fn subscribed_tags(&self) -> &[EventTag] {
        &self.subscribed
    }

    fn always_handle(&mut self, _event: &EngineEvent, _robot: &Robot) {
        self.seen.set(self.seen.get() + 1);
    }
}

#[derive(Default)]
struct Recorder {
    started:   Vec<(Tick, String)>,
    stopped:   Vec<(String, Option<BehaviorStatus>)>,
    completed: Vec<ActionCompleted>,
}

impl EngineObserver for Recorder {
    fn on_action_completed(&mut self, _tick: Tick, msg: &ActionCompleted) {
        self.completed.push(msg.clone());
    }

    fn on_behavior_started(&mut self, tick: Tick, name: &str) {
        self.started.push((tick, name.to_owned()));
    }

    fn on_behavior_stopped(&mut self, _tick: Tick, name: &str, status: Option<BehaviorStatus>) {
        self.stopped.push((name.to_owned(), status));
    }
}

fn engine(behaviors: Vec<Scripted>) -> BehaviorManager<ScoringChooser> {
    behaviors
        .into_iter()
        .fold(BehaviorManagerBuilder::new(test_config(42)), |b, behavior| b.add_behavior(behavior))
        .build()
        .unwrap()
}

// ── Builder and config ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::EngineError;

    #[test]
    fn empty_registry_is_rejected() {
        let result = BehaviorManagerBuilder::new(test_config(1)).build();
        assert!(matches!(result, Err(EngineError::NoBehaviors)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = BehaviorManagerBuilder::new(test_config(1))
            .add_behavior(Scripted::flat("Explore", 0.5))
            .add_behavior(Scripted::flat("Explore", 0.2))
            .build();
        assert!(matches!(result, Err(EngineError::DuplicateBehavior(name)) if name == "Explore"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig { choose_interval_ticks: 0, ..test_config(1) };
        let result = BehaviorManagerBuilder::new(config)
            .add_behavior(Scripted::flat("Explore", 0.5))
            .build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn config_fields_default_when_missing() {
        let config: EngineConfig = serde_json::from_value(serde_json::json!({ "seed": 7 })).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config, EngineConfig { seed: 7, ..EngineConfig::default() });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn lookup_by_name() {
        let e = engine(vec![Scripted::flat("A", 0.5), Scripted::flat("B", 0.2)]);
        assert_eq!(e.num_behaviors(), 2);
        assert_eq!(e.behavior_id("B").map(|id| id.0), Some(1));
        assert!(e.behavior("C").is_none());
        assert_eq!(e.behaviors().map(|b| b.name()).collect::<Vec<_>>(), vec!["A", "B"]);
    }
}

// ── Choosing ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod choosing {
    use super::*;
    use crate::NoopObserver;

    #[test]
    fn highest_score_wins_on_first_tick() {
        let mut e = engine(vec![Scripted::flat("Low", 0.3), Scripted::flat("High", 0.7)]);
        let mut rec = Recorder::default();
        e.tick(&mut rec);
        assert_eq!(e.active_name(), Some("High"));
        assert_eq!(rec.started, vec![(Tick(1), "High".to_owned())]);
    }

    #[test]
    fn zero_scores_leave_the_robot_idle() {
        let mut e = engine(vec![Scripted::flat("A", 0.0), Scripted::flat("B", 0.0)]);
        e.run_ticks(10, &mut NoopObserver);
        assert_eq!(e.active_name(), None);
    }

    #[test]
    fn ties_are_deterministic_per_seed_and_sticky() {
        let build = || engine(vec![Scripted::flat("C", 0.5), Scripted::flat("D", 0.5)]);
        let mut first = build();
        let mut second = build();
        first.tick(&mut NoopObserver);
        second.tick(&mut NoopObserver);
        let chosen = first.active_name().map(str::to_owned);
        assert!(chosen.is_some());
        assert_eq!(second.active_name().map(str::to_owned), chosen);

        first.run_ticks(30, &mut NoopObserver);
        assert_eq!(first.active_name().map(str::to_owned), chosen);
    }

    #[test]
    fn switches_only_on_choose_interval() {
        let mut gated = BehaviorConfig::new("Toy").with_flat_score(0.8);
        gated.required_unlock_id = Some("Toy".into());
        let mut e = engine(vec![Scripted::flat("Idle", 0.3), Scripted::new(gated)]);

        e.run_ticks(2, &mut NoopObserver);
        assert_eq!(e.active_name(), Some("Idle"));
        e.robot.grant_unlock("Toy");
        e.run_ticks(2, &mut NoopObserver);
        assert_eq!(e.active_name(), Some("Idle"));
        e.tick(&mut NoopObserver);
        assert_eq!(e.current_tick(), Tick(5));
        assert_eq!(e.active_name(), Some("Toy"));
    }

    #[test]
    fn completed_behavior_is_replaced_immediately() {
        let mut finite = BehaviorConfig::new("Finite").with_flat_score(0.9);
        finite.repetition_penalty = Graph2d::new(&[(0.0, 0.0), (100.0, 1.0)]).unwrap();
        let mut finite = Scripted::new(finite);
        finite.act_secs = Some(0.5);
        let mut e = engine(vec![finite, Scripted::flat("Fallback", 0.2)]);
        let mut rec = Recorder::default();

        e.run_ticks(4, &mut rec);
        assert_eq!(e.active_name(), Some("Fallback"));
        assert_eq!(rec.stopped, vec![("Finite".to_owned(), Some(BehaviorStatus::Complete))]);
        assert_eq!(rec.completed.len(), 1);
        assert_eq!(rec.started.iter().map(|(_, n)| n.as_str()).collect::<Vec<_>>(), vec!["Finite", "Fallback"]);
    }

    #[test]
    fn failed_init_leaves_robot_idle() {
        let mut broken = Scripted::flat("Broken", 0.9);
        broken.fail_init = true;
        let mut e = engine(vec![broken, Scripted::flat("Other", 0.3)]);
        let mut rec = Recorder::default();
        e.run_ticks(3, &mut rec);
        assert_eq!(e.active_name(), None);
        assert!(rec.started.is_empty());
    }

    #[test]
    fn force_behavior_bypasses_the_chooser() {
        let mut e = engine(vec![Scripted::flat("A", 0.9), Scripted::flat("B", 0.1)]);
        e.tick(&mut NoopObserver);
        e.force_behavior("B", &mut NoopObserver).unwrap();
        assert_eq!(e.active_name(), Some("B"));
        assert!(e.force_behavior("Nope", &mut NoopObserver).is_err());
    }
}

// ── Activity strategies ───────────────────────────────────────────────────────

#[cfg(test)]
mod strategies {
    use super::*;
    use crate::NoopObserver;

    #[test]
    fn strategy_ends_activity_and_enforces_cooldown() {
        let strategy = ActivityStrategy::new(ActivityStrategyConfig {
            max_duration_secs: 1.0,
            cooldown_secs: 10.0,
            ..ActivityStrategyConfig::default()
        })
        .unwrap();
        let mut e = BehaviorManagerBuilder::new(test_config(3))
            .add_behavior_with_strategy(Scripted::flat("Play", 0.9), strategy)
            .add_behavior(Scripted::flat("Rest", 0.2))
            .build()
            .unwrap();

        e.tick(&mut NoopObserver);
        assert_eq!(e.active_name(), Some("Play"));
        e.run_ticks(4, &mut NoopObserver);
        assert_eq!(e.active_name(), Some("Rest"));

        // Cooldown ends 10 s after Play stopped at tick 5.
        e.run_ticks(35, &mut NoopObserver);
        assert_eq!(e.current_tick(), Tick(40));
        assert_eq!(e.active_name(), Some("Rest"));
        e.run_ticks(5, &mut NoopObserver);
        assert_eq!(e.active_name(), Some("Play"));
    }
}

// ── Events and reactions ──────────────────────────────────────────────────────

#[cfg(test)]
mod events {
    use super::*;
    use crate::{EngineError, NoopObserver};
    use rb_behavior::{GameTag, ReactionTrigger};

    #[test]
    fn pushed_events_reach_subscribers_next_tick() {
        let mut listener = Scripted::flat("Listener", 0.1);
        listener.subscribed = vec![EventTag::Game(GameTag::ObjectTapped)];
        let seen = Rc::clone(&listener.seen);
        let mut e = engine(vec![listener, Scripted::flat("Deaf", 0.5)]);

        e.push_event(EngineEvent::ObjectTapped { object_id: 1 });
        e.push_event(EngineEvent::CliffDetected);
        e.push_event(EngineEvent::ObjectTapped { object_id: 2 });
        assert_eq!(seen.get(), 0);
        e.tick(&mut NoopObserver);
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn reaction_interrupts_and_resume_is_limited() {
        let mut e = engine(vec![Scripted::flat("Explore", 0.5)]);
        e.tick(&mut NoopObserver);

        assert!(e.interrupt_for_reaction(ReactionTrigger::CliffDetected, &mut NoopObserver));
        assert_eq!(e.active_name(), None);
        e.resume_after_reaction(&mut NoopObserver).unwrap();
        assert_eq!(e.active_name(), Some("Explore"));

        assert!(e.interrupt_for_reaction(ReactionTrigger::CliffDetected, &mut NoopObserver));
        let err = e.resume_after_reaction(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, EngineError::Behavior(BehaviorError::TooManyResumes { .. })));

        // Cooling down: nothing else to run.
        e.tick(&mut NoopObserver);
        assert_eq!(e.active_name(), None);
    }

    #[test]
    fn disabled_trigger_does_not_interrupt() {
        let mut e = engine(vec![Scripted::flat("Explore", 0.5)]);
        e.tick(&mut NoopObserver);
        e.robot.request_enable_reaction_trigger("test", ReactionTrigger::PickedUp, false);

        assert!(!e.interrupt_for_reaction(ReactionTrigger::PickedUp, &mut NoopObserver));
        assert_eq!(e.active_name(), Some("Explore"));
    }
}
