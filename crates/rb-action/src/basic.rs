//! Built-in actions that need no robot hardware.

use crate::{Action, ActionContext, ActionResult, DEFAULT_TIMEOUT_SECS, RobotActionType};

// ── WaitAction ────────────────────────────────────────────────────────────────

/// Succeeds once `wait_secs` have passed since `init`.
#[derive(Debug)]
pub struct WaitAction {
    name:      String,
    wait_secs: f64,
    done_at:   Option<f64>,
}

impl WaitAction {
    pub fn new(wait_secs: f64) -> Self {
        Self {
            name: format!("Wait{wait_secs:.2}Seconds"),
            wait_secs,
            done_at: None,
        }
    }
}

impl Action for WaitAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn action_type(&self) -> RobotActionType {
        RobotActionType::Wait
    }

    fn timeout_secs(&self) -> f64 {
        self.wait_secs + DEFAULT_TIMEOUT_SECS
    }

    fn init(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult {
        self.done_at = Some(ctx.now_secs + self.wait_secs);
        ActionResult::Success
    }

    fn check_if_done(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult {
        match self.done_at {
            Some(t) if ctx.now_secs >= t => ActionResult::Success,
            Some(_) => ActionResult::Running,
            None => ActionResult::FailureAbort,
        }
    }

    fn interrupt_internal(&mut self) -> bool {
        true
    }

    fn reset(&mut self) {
        self.done_at = None;
    }
}

// ── WaitForLambdaAction ───────────────────────────────────────────────────────

type Predicate = Box<dyn FnMut(&ActionContext<'_>) -> bool>;

/// Succeeds on the first tick `predicate` returns `true`.
pub struct WaitForLambdaAction {
    predicate:    Predicate,
    timeout_secs: f64,
}

impl WaitForLambdaAction {
    pub fn new(predicate: impl FnMut(&ActionContext<'_>) -> bool + 'static) -> Self {
        Self { predicate: Box::new(predicate), timeout_secs: f64::INFINITY }
    }

    pub fn with_timeout(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

impl Action for WaitForLambdaAction {
    fn name(&self) -> &str {
        "WaitForLambda"
    }

    fn action_type(&self) -> RobotActionType {
        RobotActionType::WaitForLambda
    }

    fn timeout_secs(&self) -> f64 {
        self.timeout_secs
    }

    fn check_if_done(&mut self, ctx: &mut ActionContext<'_>) -> ActionResult {
        if (self.predicate)(ctx) {
            ActionResult::Success
        } else {
            ActionResult::Running
        }
    }

    fn interrupt_internal(&mut self) -> bool {
        true
    }
}
