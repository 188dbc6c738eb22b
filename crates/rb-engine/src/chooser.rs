//! Picking which behavior owns the robot.

use rb_behavior::{ActivityStrategy, Behavior, BehaviorGroup, Robot};
use rb_core::{BehaviorId, EngineRng};
use tracing::trace;

/// One registered behavior plus its optional activity strategy.
pub struct BehaviorEntry {
    pub behavior: Box<dyn Behavior>,
    pub strategy: Option<ActivityStrategy>,
}

impl BehaviorEntry {
    pub fn new(behavior: Box<dyn Behavior>) -> Self {
        BehaviorEntry { behavior, strategy: None }
    }

    /// Whether the strategy asks the running behavior to end now.
    pub fn strategy_wants_to_end(&self, now_secs: f64) -> bool {
        self.behavior.is_running()
            && self
                .strategy
                .as_ref()
                .is_some_and(|s| s.wants_to_end(now_secs, self.behavior.started_running_secs()))
    }

    fn strategy_allows_start(&self, robot: &Robot) -> bool {
        self.strategy.as_ref().is_none_or(|s| {
            s.wants_to_start(robot.now_secs(), self.behavior.last_run_secs(), &robot.mood)
        })
    }
}

/// Decides which behavior should be active.
pub trait BehaviorChooser {
    /// Return the behavior that should be active, or `None` to idle.
    /// `current` is the active behavior, if any.
    fn choose(
        &mut self,
        entries: &[BehaviorEntry],
        current: Option<BehaviorId>,
        robot:   &Robot,
    ) -> Option<BehaviorId>;
}

/// Highest `evaluate_score` wins.
///
/// Candidates scoring within `tie_epsilon` of the best are tied.  The
/// active behavior keeps the robot when it is among them; otherwise the
/// chooser's own RNG picks one, so a given seed always makes the same
/// choices.  Behaviors scoring 0 are never chosen.
#[derive(Debug)]
pub struct ScoringChooser {
    tie_epsilon: f32,
    groups:      Option<Vec<BehaviorGroup>>,
    rng:         EngineRng,
}

impl ScoringChooser {
    pub fn new(tie_epsilon: f32, rng: EngineRng) -> Self {
        ScoringChooser { tie_epsilon, groups: None, rng }
    }

    /// Only consider behaviors belonging to at least one of `groups`.
    pub fn with_groups(mut self, groups: Vec<BehaviorGroup>) -> Self {
        self.groups = Some(groups);
        self
    }

    fn eligible(&self, entry: &BehaviorEntry, robot: &Robot) -> bool {
        if let Some(groups) = &self.groups {
            if !entry.behavior.groups().iter().any(|g| groups.contains(g)) {
                return false;
            }
        }
        if entry.behavior.is_running() {
            !entry.strategy_wants_to_end(robot.now_secs())
        } else {
            entry.strategy_allows_start(robot)
        }
    }
}

impl BehaviorChooser for ScoringChooser {
    fn choose(
        &mut self,
        entries: &[BehaviorEntry],
        current: Option<BehaviorId>,
        robot:   &Robot,
    ) -> Option<BehaviorId> {
        let mut scored: Vec<(BehaviorId, f32)> = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let Ok(id) = BehaviorId::try_from(i) else { break };
            if !self.eligible(entry, robot) {
                continue;
            }
            let score = entry.behavior.evaluate_score(robot);
            trace!(behavior = entry.behavior.name(), score, "scored");
            if score > 0.0 {
                scored.push((id, score));
            }
        }

        let best = scored.iter().map(|&(_, s)| s).fold(f32::NEG_INFINITY, f32::max);
        let tied: Vec<BehaviorId> = scored
            .iter()
            .filter(|&&(_, s)| s >= best - self.tie_epsilon)
            .map(|&(id, _)| id)
            .collect();

        match tied.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ if current.is_some_and(|c| tied.contains(&c)) => current,
            _ => self.rng.choose(&tied).copied(),
        }
    }
}
