use crate::{BehaviorConfig, BehaviorCore, BehaviorModel, BehaviorResult, BehaviorStatus, Robot};

/// A behavior that does nothing and never completes on its own.
///
/// Useful as the idle fallback of a chooser and in tests.
#[derive(Debug)]
pub struct NoneBehavior {
    core: BehaviorCore<Self>,
}

impl NoneBehavior {
    pub fn new(config: BehaviorConfig) -> BehaviorResult<Self> {
        Ok(NoneBehavior { core: BehaviorCore::new(config)? })
    }
}

impl BehaviorModel for NoneBehavior {
    fn core(&self) -> &BehaviorCore<Self> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore<Self> {
        &mut self.core
    }

    fn init_internal(&mut self, _robot: &mut Robot) -> BehaviorResult<()> {
        Ok(())
    }

    fn update_internal(&mut self, _robot: &mut Robot) -> BehaviorStatus {
        BehaviorStatus::Running
    }
}
