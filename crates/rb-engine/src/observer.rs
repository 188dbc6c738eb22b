//! Engine observer trait for progress reporting and tracing of choices.

use rb_action::ActionCompleted;
use rb_behavior::BehaviorStatus;
use rb_core::Tick;

/// Callbacks invoked by [`BehaviorManager::tick`][crate::BehaviorManager::tick].
///
/// All methods default to no-ops so implementors override only what they
/// need.
///
/// # Example: switch logger
///
/// ```rust,ignore
/// struct SwitchLog(Vec<String>);
///
/// impl EngineObserver for SwitchLog {
///     fn on_behavior_started(&mut self, tick: Tick, name: &str) {
///         self.0.push(format!("{tick}: {name}"));
///     }
/// }
/// ```
pub trait EngineObserver {
    /// Called at the start of each tick, after the clock advanced.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per completion message before it is routed to behaviors.
    fn on_action_completed(&mut self, _tick: Tick, _msg: &ActionCompleted) {}

    /// A behavior was initialised (or resumed) and is now active.
    fn on_behavior_started(&mut self, _tick: Tick, _name: &str) {}

    /// The active behavior was stopped.  `status` is the update result that
    /// ended it, or `None` when it was switched out or pre-empted.
    fn on_behavior_stopped(&mut self, _tick: Tick, _name: &str, _status: Option<BehaviorStatus>) {}

    /// Called at the end of each tick with the name of the active behavior.
    fn on_tick_end(&mut self, _tick: Tick, _active: Option<&str>) {}
}

/// An [`EngineObserver`] that does nothing.
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}
