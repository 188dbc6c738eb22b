//! The demo's behaviors.  Each one is a thin `BehaviorModel` over a
//! `BehaviorCore`; the JSON `kind` picks which.

use rb_action::{ActionResult, ActionRunner, SequentialAction, WaitAction};
use rb_behavior::{
    Acting, Behavior, BehaviorConfig, BehaviorCore, BehaviorError, BehaviorModel, BehaviorObjective,
    BehaviorResult, EngineEvent, EventTag, GameTag, NoneBehavior, ReactionTrigger,
    Refused, Robot,
};
use rb_core::AnimTrackFlags;
use rb_mood::EmotionType;
use serde::Deserialize;
use tracing::debug;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Deserialize)]
pub enum DemoKind {
    LookAround,
    PlayWithCube,
    Nap,
    Idle,
}

pub fn build_behavior(kind: DemoKind, config: BehaviorConfig) -> BehaviorResult<Box<dyn Behavior>> {
    Ok(match kind {
        DemoKind::LookAround   => Box::new(LookAround::new(config)?),
        DemoKind::PlayWithCube => Box::new(PlayWithCube::new(config)?),
        DemoKind::Nap          => Box::new(Nap::new(config)?),
        DemoKind::Idle         => Box::new(NoneBehavior::new(config)?),
    })
}

fn refused(name: &str) -> impl FnOnce(Box<Refused>) -> BehaviorError + '_ {
    move |refused| BehaviorError::InitFailed { name: name.to_owned(), reason: refused.reason.to_string() }
}

fn wait(robot: &Robot, secs: f64) -> ActionRunner {
    ActionRunner::new(WaitAction::new(secs), robot.action_list.tags())
}

// ── LookAround ────────────────────────────────────────────────────────────────

const LOOK_TURNS: usize = 3;
const LOOK_TURN_SECS: f64 = 0.5;

/// Glances around a few times, then reports the room explored.
#[derive(Debug)]
pub struct LookAround {
    core: BehaviorCore<Self>,
}

impl LookAround {
    pub fn new(config: BehaviorConfig) -> BehaviorResult<Self> {
        Ok(LookAround { core: BehaviorCore::new(config)? })
    }
}

impl BehaviorModel for LookAround {
    fn core(&self) -> &BehaviorCore<Self> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore<Self> {
        &mut self.core
    }

    fn init_internal(&mut self, robot: &mut Robot) -> BehaviorResult<()> {
        let turns = (0..LOOK_TURNS).map(|_| wait(robot, LOOK_TURN_SECS)).collect();
        let look = ActionRunner::new(SequentialAction::new("LookAround", turns), robot.action_list.tags());
        let name = self.core.name().to_owned();
        self.start_acting_with_result(robot, look, |this, result, robot| {
            if result == ActionResult::Success {
                robot.mood.add_to_emotion(EmotionType::Stimulated, 0.4, "LookAround");
                this.core.behavior_objective_achieved(robot, BehaviorObjective::Explored);
            }
        })
        .map(|_| ())
        .map_err(refused(&name))
    }
}

// ── PlayWithCube ──────────────────────────────────────────────────────────────

const PLAY_ROUNDS: u32 = 3;
const PLAY_ROUND_SECS: f64 = 1.0;

/// Plays a few rounds with the cube.  Taps on the cube while playing cheer
/// the robot up; the behavior wraps up after its last round.
#[derive(Debug)]
pub struct PlayWithCube {
    core:        BehaviorCore<Self>,
    rounds_left: u32,
    taps_seen:   u32,
}

impl PlayWithCube {
    pub fn new(config: BehaviorConfig) -> BehaviorResult<Self> {
        Ok(PlayWithCube { core: BehaviorCore::new(config)?, rounds_left: 0, taps_seen: 0 })
    }

    fn play_round(&mut self, robot: &mut Robot) -> Result<(), Box<Refused>> {
        let round = wait(robot, PLAY_ROUND_SECS);
        self.start_acting_with_result(robot, round, |this, result, robot| {
            if result != ActionResult::Success {
                return;
            }
            robot.mood.add_to_emotion(EmotionType::Happy, 0.3, "CubePlay");
            this.rounds_left = this.rounds_left.saturating_sub(1);
            if this.rounds_left == 0 {
                this.core.behavior_objective_achieved(robot, BehaviorObjective::PlayedWithCube);
            } else if let Err(refused) = this.play_round(robot) {
                debug!(reason = %refused.reason, "next cube round refused");
            }
        })?;
        // Mid-game the robot is reluctant to switch away.
        self.core.increase_score_while_acting(0.2);
        if self.rounds_left == 1 {
            self.core.stop_on_next_action_complete();
        }
        Ok(())
    }
}

impl BehaviorModel for PlayWithCube {
    fn core(&self) -> &BehaviorCore<Self> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore<Self> {
        &mut self.core
    }

    fn init_internal(&mut self, robot: &mut Robot) -> BehaviorResult<()> {
        self.rounds_left = PLAY_ROUNDS;
        let name = self.core.name().to_owned();
        self.play_round(robot).map_err(refused(&name))
    }

    fn subscribed_tags(&self) -> &[EventTag] {
        &[EventTag::Game(GameTag::ObjectTapped)]
    }

    fn always_handle(&mut self, _event: &EngineEvent, _robot: &Robot) {
        self.taps_seen += 1;
    }

    fn handle_while_running(&mut self, event: &EngineEvent, robot: &mut Robot) {
        if let EngineEvent::ObjectTapped { object_id } = event {
            debug!(object_id, taps = self.taps_seen, "cube tapped mid-game");
            robot.mood.add_to_emotion(EmotionType::Social, 0.2, "CubeTap");
        }
    }
}

// ── Nap ───────────────────────────────────────────────────────────────────────

const NAP_STRETCH_SECS: f64 = 2.0;

/// Dozes in short stretches until its activity strategy ends the nap.
/// Being picked up does not wake it, and nobody else may move its head or
/// lift meanwhile.
#[derive(Debug)]
pub struct Nap {
    core: BehaviorCore<Self>,
}

impl Nap {
    pub fn new(config: BehaviorConfig) -> BehaviorResult<Self> {
        Ok(Nap { core: BehaviorCore::new(config)? })
    }

    fn doze(&mut self, robot: &mut Robot) -> Result<(), Box<Refused>> {
        let stretch = wait(robot, NAP_STRETCH_SECS);
        self.start_acting_and_continue(robot, stretch, |this, robot| {
            robot.mood.add_to_emotion(EmotionType::Calm, 0.15, "Nap");
            if let Err(refused) = this.doze(robot) {
                debug!(reason = %refused.reason, "nap stretch refused");
            }
        })
        .map(|_| ())
    }
}

impl BehaviorModel for Nap {
    fn core(&self) -> &BehaviorCore<Self> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore<Self> {
        &mut self.core
    }

    fn init_internal(&mut self, robot: &mut Robot) -> BehaviorResult<()> {
        self.core.smart_disable_reaction_trigger(robot, ReactionTrigger::PickedUp);
        let who = self.core.name().to_owned();
        self.core.smart_lock_tracks(robot, AnimTrackFlags::HEAD | AnimTrackFlags::LIFT, &who);
        self.doze(robot).map_err(refused(&who))
    }

    fn stop_internal(&mut self, robot: &mut Robot) {
        self.core.behavior_objective_achieved(robot, BehaviorObjective::Napped);
    }
}

#[cfg(test)]
mod tests {
    use rb_behavior::BehaviorStatus;
    use rb_core::{EngineClock, EngineRng};
    use rb_mood::MoodManager;

    use super::*;

    fn robot() -> Robot {
        Robot::new(EngineClock::new(0.25), MoodManager::default(), EngineRng::new(3))
    }

    fn config(name: &str) -> BehaviorConfig {
        serde_json::from_value(serde_json::json!({ "name": name, "flatScore": 0.5 }))
            .expect("valid config")
    }

    fn run(behavior: &mut dyn Behavior, robot: &mut Robot, ticks: usize) -> BehaviorStatus {
        let mut status = BehaviorStatus::Running;
        for _ in 0..ticks {
            robot.clock.advance();
            let now = robot.now_secs();
            robot.mood.update(now);
            robot.action_list.update(now);
            for msg in robot.action_list.drain_completions() {
                behavior.handle_event(&EngineEvent::ActionCompleted(msg), robot);
            }
            status = behavior.update(robot);
            if status != BehaviorStatus::Running {
                break;
            }
        }
        status
    }

    #[test]
    fn look_around_explores_then_completes() {
        let mut robot = robot();
        let mut look = LookAround::new(config("LookAround")).unwrap();
        look.init(&mut robot).unwrap();
        assert_eq!(run(&mut look, &mut robot, 20), BehaviorStatus::Complete);
        assert!(robot.mood.emotion_value(EmotionType::Stimulated) > 0.0);
        let events = robot.take_events();
        assert!(events.contains(&EngineEvent::BehaviorObjectiveAchieved(BehaviorObjective::Explored)));
    }

    #[test]
    fn cube_play_runs_its_rounds() {
        let mut robot = robot();
        let mut play = PlayWithCube::new(config("PlayWithCube")).unwrap();
        play.init(&mut robot).unwrap();
        assert_eq!(run(&mut play, &mut robot, 40), BehaviorStatus::Complete);
        assert_eq!(play.rounds_left, 0);
        assert!(robot.mood.emotion_value(EmotionType::Happy) > 0.0);
    }

    #[test]
    fn nap_holds_pickup_until_stopped() {
        let mut robot = robot();
        let mut nap = Nap::new(config("Nap")).unwrap();
        nap.init(&mut robot).unwrap();
        assert!(!robot.is_reaction_trigger_enabled(ReactionTrigger::PickedUp));
        assert_eq!(run(&mut nap, &mut robot, 30), BehaviorStatus::Running);
        assert!(robot.mood.emotion_value(EmotionType::Calm) > 0.0);

        nap.stop(&mut robot);
        assert!(robot.is_reaction_trigger_enabled(ReactionTrigger::PickedUp));
    }
}
