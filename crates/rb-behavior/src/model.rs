//! The behavior traits.
//!
//! * [`BehaviorModel`] is what concrete behaviors implement: hooks with
//!   sensible defaults plus access to their embedded [`BehaviorCore`].
//! * [`Behavior`] is the object-safe lifecycle the engine drives through
//!   `Box<dyn Behavior>`.  Every `BehaviorModel` gets it from the blanket
//!   impl below, so the lifecycle rules live in one place.
//!
//! ```text
//!   not running ──init()──▶ running ──update()→Complete/Failure──▶ stop()
//!        ▲                     │
//!        └──── resume() ◀──────┘   (after a reflex reaction)
//! ```

use tracing::{debug, warn};

use crate::{
    Acting, BehaviorCore, BehaviorError, BehaviorGroup, BehaviorResult, EngineEvent, EventTag,
    ReactionTrigger, Robot, COOLDOWN_FROM_CLIFF_RESUMES_SECS, MAX_RESUMES_FROM_CLIFF,
    SKIP_REPETITION_PENALTY_SECS,
};

/// Result of one behavior update.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum BehaviorStatus {
    Running,
    Complete,
    Failure,
}

/// User-implemented behavior hooks.
///
/// # Required methods
///
/// [`core`][Self::core], [`core_mut`][Self::core_mut] and
/// [`init_internal`][Self::init_internal].
///
/// # Example
///
/// ```rust,ignore
/// struct LookAround { core: BehaviorCore<Self> }
///
/// impl BehaviorModel for LookAround {
///     fn core(&self) -> &BehaviorCore<Self> { &self.core }
///     fn core_mut(&mut self) -> &mut BehaviorCore<Self> { &mut self.core }
///
///     fn init_internal(&mut self, robot: &mut Robot) -> BehaviorResult<()> {
///         let turn = ActionRunner::new(TurnInPlace::new(90.0), robot.action_list.tags());
///         self.start_acting_then(robot, turn, |this, _msg, robot| {
///             this.core_mut().stop_on_next_action_complete();
///         })
///         .map(|_| ())
///         .map_err(|refused| BehaviorError::InitFailed {
///             name: "LookAround".into(),
///             reason: refused.reason.to_string(),
///         })
///     }
/// }
/// ```
pub trait BehaviorModel: Sized + 'static {
    fn core(&self) -> &BehaviorCore<Self>;

    fn core_mut(&mut self) -> &mut BehaviorCore<Self>;

    /// Start the behavior.  Called with the behavior already marked running,
    /// so it may `start_acting`.
    fn init_internal(&mut self, robot: &mut Robot) -> BehaviorResult<()>;

    /// Continue after a reflex reaction interrupted the behavior.  Defaults
    /// to starting over.
    fn resume_internal(&mut self, robot: &mut Robot) -> BehaviorResult<()> {
        self.init_internal(robot)
    }

    /// Default: keep running while an action is in flight.
    fn update_internal(&mut self, _robot: &mut Robot) -> BehaviorStatus {
        if self.core().is_acting() {
            BehaviorStatus::Running
        } else {
            BehaviorStatus::Complete
        }
    }

    fn stop_internal(&mut self, _robot: &mut Robot) {}

    fn is_runnable_internal(&self, _robot: &Robot) -> bool {
        true
    }

    fn evaluate_score_internal(&self, robot: &Robot) -> f32 {
        self.core().base_score(robot)
    }

    fn evaluate_running_score_internal(&self, robot: &Robot) -> f32 {
        self.evaluate_score_internal(robot)
    }

    /// Event tags delivered to the `handle_*` hooks.
    fn subscribed_tags(&self) -> &[EventTag] {
        &[]
    }

    /// Runs for every subscribed event, before the running/not-running hook.
    fn always_handle(&mut self, _event: &EngineEvent, _robot: &Robot) {}

    fn handle_while_running(&mut self, _event: &EngineEvent, _robot: &mut Robot) {}

    fn handle_while_not_running(&mut self, _event: &EngineEvent, _robot: &Robot) {}
}

/// Object-safe behavior lifecycle driven by the engine.
pub trait Behavior {
    fn name(&self) -> &str;

    fn groups(&self) -> &[BehaviorGroup];

    fn is_running(&self) -> bool;

    fn is_acting(&self) -> bool;

    fn start_count(&self) -> u32;

    /// When the behavior last stopped (or was credited with an objective).
    fn last_run_secs(&self) -> Option<f64>;

    fn started_running_secs(&self) -> f64;

    fn init(&mut self, robot: &mut Robot) -> BehaviorResult<()>;

    fn resume(&mut self, robot: &mut Robot, reason: Option<ReactionTrigger>) -> BehaviorResult<()>;

    fn update(&mut self, robot: &mut Robot) -> BehaviorStatus;

    fn stop(&mut self, robot: &mut Robot);

    /// Stop, and skip the repetition penalty for a short while so the
    /// behavior may be chosen again right away.
    fn stop_without_immediate_repetition_penalty(&mut self, robot: &mut Robot);

    fn is_runnable(&self, robot: &Robot) -> bool;

    fn evaluate_score(&self, robot: &Robot) -> f32;

    fn handle_event(&mut self, event: &EngineEvent, robot: &mut Robot);
}

impl<B: BehaviorModel> Behavior for B {
    fn name(&self) -> &str {
        self.core().name()
    }

    fn groups(&self) -> &[BehaviorGroup] {
        self.core().groups()
    }

    fn is_running(&self) -> bool {
        self.core().is_running()
    }

    fn is_acting(&self) -> bool {
        self.core().is_acting()
    }

    fn start_count(&self) -> u32 {
        self.core().start_count()
    }

    fn last_run_secs(&self) -> Option<f64> {
        self.core().last_run_secs()
    }

    fn started_running_secs(&self) -> f64 {
        self.core().started_running_secs()
    }

    fn init(&mut self, robot: &mut Robot) -> BehaviorResult<()> {
        let now = robot.now_secs();
        let core = self.core_mut();
        debug!(behavior = %core.name, now, "init");
        core.running = true;
        core.can_start_acting = true;
        core.acting_callback = None;
        core.started_running_secs = now;
        core.cliff_resumes = 0;

        match self.init_internal(robot) {
            Ok(()) => {
                self.core_mut().start_count += 1;
                Ok(())
            }
            Err(err) => {
                warn!(behavior = self.name(), %err, "init failed");
                self.stop_acting(false, robot);
                self.core_mut().running = false;
                Err(err)
            }
        }
    }

    fn resume(&mut self, robot: &mut Robot, reason: Option<ReactionTrigger>) -> BehaviorResult<()> {
        let now = robot.now_secs();
        if reason.is_some_and(ReactionTrigger::may_loop_on_resume) {
            let core = self.core_mut();
            core.cliff_resumes += 1;
            if core.cliff_resumes >= MAX_RESUMES_FROM_CLIFF {
                let resumes = core.cliff_resumes;
                core.cliff_resumes = 0;
                core.cliff_cooldown_until = now + COOLDOWN_FROM_CLIFF_RESUMES_SECS;
                warn!(behavior = %core.name, resumes, "too many resumes from cliff or movement; cooling down");
                return Err(BehaviorError::TooManyResumes { name: core.name.clone(), resumes });
            }
        }
        if !self.is_runnable(robot) {
            return Err(BehaviorError::NotRunnable(self.name().to_owned()));
        }

        let core = self.core_mut();
        debug!(behavior = %core.name, ?reason, "resume");
        core.running = true;
        core.can_start_acting = true;
        core.started_running_secs = now;
        let result = self.resume_internal(robot);
        if result.is_err() {
            self.stop_acting(false, robot);
            self.core_mut().running = false;
        }
        result
    }

    fn update(&mut self, robot: &mut Robot) -> BehaviorStatus {
        let core = self.core();
        if !core.running {
            warn!(behavior = %core.name, "update called on a behavior that is not running");
            return BehaviorStatus::Failure;
        }
        if !core.can_start_acting && !core.is_acting() {
            // Stop was requested and the last action finished.
            self.update_internal(robot);
            return BehaviorStatus::Complete;
        }
        self.update_internal(robot)
    }

    fn stop(&mut self, robot: &mut Robot) {
        debug!(behavior = self.name(), "stop");
        self.core_mut().running = false;
        self.stop_internal(robot);
        self.core_mut().last_run_secs = Some(robot.now_secs());
        self.stop_acting(false, robot);
        let core = self.core_mut();
        core.can_start_acting = false;
        core.release_smart_holds(robot);
    }

    fn stop_without_immediate_repetition_penalty(&mut self, robot: &mut Robot) {
        self.core_mut().repetition_penalty_from = robot.now_secs() + SKIP_REPETITION_PENALTY_SECS;
        self.stop(robot);
    }

    fn is_runnable(&self, robot: &Robot) -> bool {
        self.core().base_runnable(robot) && self.is_runnable_internal(robot)
    }

    fn evaluate_score(&self, robot: &Robot) -> f32 {
        let now = robot.now_secs();
        let core = self.core();
        if core.running {
            let score = self.evaluate_running_score_internal(robot) + core.extra_running_score;
            score * core.running_multiplier(now)
        } else if self.is_runnable(robot) {
            self.evaluate_score_internal(robot) * core.repetition_multiplier(now)
        } else {
            0.0
        }
    }

    fn handle_event(&mut self, event: &EngineEvent, robot: &mut Robot) {
        match event {
            EngineEvent::BehaviorObjectiveAchieved(objective)
                if self.core().cooldown_on_objective == Some(*objective) =>
            {
                self.core_mut().last_run_secs = Some(robot.now_secs());
            }
            EngineEvent::ActionCompleted(msg) => self.handle_action_completed(msg, robot),
            _ => {}
        }

        if !self.subscribed_tags().contains(&event.tag()) {
            return;
        }
        self.always_handle(event, robot);
        if self.core().is_running() {
            self.handle_while_running(event, robot);
        } else {
            self.handle_while_not_running(event, robot);
        }
    }
}
