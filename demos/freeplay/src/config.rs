//! The demo's JSON file: engine knobs, mood tuning, and the behavior roster.

use rb_behavior::{ActivityStrategyConfig, BehaviorConfig};
use rb_engine::EngineConfig;
use rb_mood::MoodConfig;
use serde::Deserialize;

use crate::behaviors::DemoKind;

/// Built into the binary; `--config` replaces it.
pub const DEFAULT_CONFIG: &str = include_str!("../freeplay.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeplayConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub mood: MoodConfig,

    pub behaviors: Vec<RosterEntry>,
}

/// One behavior: which implementation, its record, and an optional
/// activity strategy.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub kind: DemoKind,

    #[serde(default)]
    pub strategy: Option<ActivityStrategyConfig>,

    #[serde(flatten)]
    pub behavior: BehaviorConfig,
}
