//! Fluent builder for constructing a [`BehaviorManager`].

use rb_behavior::{ActivityStrategy, Behavior, Robot};
use rb_core::{BehaviorId, EngineRng};
use rb_mood::MoodManager;
use rustc_hash::FxHashSet;

use crate::{
    BehaviorChooser, BehaviorEntry, BehaviorManager, EngineConfig, EngineError, EngineResult,
    ScoringChooser,
};

/// Offset of the chooser's RNG stream under the master seed.
const CHOOSER_RNG_STREAM: u64 = 1;

/// Fluent builder for [`BehaviorManager`].
///
/// # Optional inputs (have defaults)
///
/// | Method         | Default                                            |
/// |----------------|----------------------------------------------------|
/// | `.mood(m)`     | `MoodManager::default()`                           |
/// | `.chooser(c)`  | `ScoringChooser` with the config's `tieEpsilon`    |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = BehaviorManagerBuilder::new(config)
///     .add_behavior(Explore::new(explore_cfg)?)
///     .add_behavior_with_strategy(Nap::new(nap_cfg)?, ActivityStrategy::new(nap_strategy)?)
///     .build()?;
/// engine.run_ticks(1_000, &mut NoopObserver);
/// ```
pub struct BehaviorManagerBuilder<C: BehaviorChooser = ScoringChooser> {
    config:  EngineConfig,
    entries: Vec<BehaviorEntry>,
    mood:    Option<MoodManager>,
    chooser: C,
}

impl BehaviorManagerBuilder<ScoringChooser> {
    pub fn new(config: EngineConfig) -> Self {
        let chooser_rng = EngineRng::new(config.seed).child(CHOOSER_RNG_STREAM);
        let chooser = ScoringChooser::new(config.tie_epsilon, chooser_rng);
        BehaviorManagerBuilder { config, entries: Vec::new(), mood: None, chooser }
    }
}

impl<C: BehaviorChooser> BehaviorManagerBuilder<C> {
    pub fn add_behavior(self, behavior: impl Behavior + 'static) -> Self {
        self.add_boxed(Box::new(behavior), None)
    }

    pub fn add_behavior_with_strategy(
        self,
        behavior: impl Behavior + 'static,
        strategy: ActivityStrategy,
    ) -> Self {
        self.add_boxed(Box::new(behavior), Some(strategy))
    }

    pub fn add_boxed(mut self, behavior: Box<dyn Behavior>, strategy: Option<ActivityStrategy>) -> Self {
        self.entries.push(BehaviorEntry { behavior, strategy });
        self
    }

    pub fn mood(mut self, mood: MoodManager) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Replace the default scoring chooser.
    pub fn chooser<C2: BehaviorChooser>(self, chooser: C2) -> BehaviorManagerBuilder<C2> {
        BehaviorManagerBuilder {
            config:  self.config,
            entries: self.entries,
            mood:    self.mood,
            chooser,
        }
    }

    /// Validate inputs and return a ready-to-tick manager.
    pub fn build(self) -> EngineResult<BehaviorManager<C>> {
        self.config.validate()?;
        if self.entries.is_empty() {
            return Err(EngineError::NoBehaviors);
        }
        if self.entries.len() > usize::from(BehaviorId::INVALID) {
            return Err(EngineError::Config(format!("too many behaviors: {}", self.entries.len())));
        }
        let mut names = FxHashSet::default();
        for entry in &self.entries {
            let name = entry.behavior.name();
            if !names.insert(name) {
                return Err(EngineError::DuplicateBehavior(name.to_owned()));
            }
        }

        // The first draw from the master stream seeded the chooser in `new`.
        let mut master = EngineRng::new(self.config.seed);
        let _ = master.child(CHOOSER_RNG_STREAM);
        let robot = Robot::new(self.config.make_clock(), self.mood.unwrap_or_default(), master);

        Ok(BehaviorManager {
            config: self.config,
            robot,
            entries: self.entries,
            chooser: self.chooser,
            active: None,
            interrupted: None,
        })
    }
}
