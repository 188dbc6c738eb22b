//! freeplay: a few mood-driven behaviors sharing one simulated robot.
//!
//! Every run is deterministic for a given seed.  The driver loop plays the
//! part of the outside world: it taps the cube now and then, grants the
//! `CubePlay` unlock partway through, and can push the robot toward a cliff
//! to exercise the reaction interrupt and resume path.
//!
//! ```text
//! RUST_LOG=rb_engine=debug cargo run -p freeplay -- --ticks 3000 --cliff-at 900
//! ```

mod behaviors;
mod config;

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rb_action::ActionCompleted;
use rb_behavior::{ActivityStrategy, BehaviorStatus, EngineEvent, ReactionTrigger};
use rb_core::Tick;
use rb_engine::{BehaviorManagerBuilder, EngineObserver};
use rb_mood::MoodManager;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::behaviors::build_behavior;
use crate::config::{DEFAULT_CONFIG, FreeplayConfig};

/// Ticks between the cliff interrupt and the resume attempt.
const REACTION_TICKS: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "freeplay", about = "Run the freeplay behavior demo")]
struct Args {
    /// Overrides the seed in the config file.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 2_000)]
    ticks: u64,

    /// JSON config; the built-in roster is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tap the cube every this many ticks (0 disables tapping).
    #[arg(long, default_value_t = 40)]
    tap_every: u64,

    /// Tick at which `CubePlay` is unlocked.
    #[arg(long, default_value_t = 300)]
    unlock_at: u64,

    /// Tick at which a cliff interrupts the active behavior.
    #[arg(long)]
    cliff_at: Option<u64>,

    /// Print the run summary as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

// ── Observer ─────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SwitchLog {
    switches:          Vec<(Tick, String)>,
    actions_completed: usize,
    completed:         usize,
    failed:            usize,
}

impl EngineObserver for SwitchLog {
    fn on_action_completed(&mut self, _tick: Tick, _msg: &ActionCompleted) {
        self.actions_completed += 1;
    }

    fn on_behavior_started(&mut self, tick: Tick, name: &str) {
        self.switches.push((tick, name.to_owned()));
    }

    fn on_behavior_stopped(&mut self, _tick: Tick, _name: &str, status: Option<BehaviorStatus>) {
        match status {
            Some(BehaviorStatus::Complete) => self.completed += 1,
            Some(BehaviorStatus::Failure)  => self.failed += 1,
            _ => {}
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BehaviorSummary {
    name:          String,
    starts:        u32,
    last_run_secs: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    seed:              u64,
    ticks:             u64,
    engine_secs:       f64,
    switches:          usize,
    completed:         usize,
    failed:            usize,
    actions_completed: usize,
    behaviors:         Vec<BehaviorSummary>,
    mood:              BTreeMap<&'static str, f32>,
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let text = match &args.config {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => DEFAULT_CONFIG.to_owned(),
    };
    let mut cfg: FreeplayConfig = serde_json::from_str(&text).context("parsing freeplay config")?;
    if let Some(seed) = args.seed {
        cfg.engine.seed = seed;
    }
    let seed = cfg.engine.seed;

    let mood = MoodManager::new(&cfg.mood).context("mood config")?;
    let mut builder = BehaviorManagerBuilder::new(cfg.engine).mood(mood);
    for entry in cfg.behaviors {
        let name = entry.behavior.name.clone();
        let behavior = build_behavior(entry.kind, entry.behavior)
            .with_context(|| format!("behavior '{name}'"))?;
        let strategy = entry
            .strategy
            .map(ActivityStrategy::new)
            .transpose()
            .with_context(|| format!("activity strategy of '{name}'"))?;
        builder = builder.add_boxed(behavior, strategy);
    }
    let mut engine = builder.build().context("building the behavior manager")?;

    info!(seed, behaviors = engine.num_behaviors(), ticks = args.ticks, "freeplay starting");

    let mut log = SwitchLog::default();
    for _ in 0..args.ticks {
        let upcoming = engine.current_tick().0 + 1;

        if args.tap_every > 0 && upcoming.is_multiple_of(args.tap_every) {
            engine.push_event(EngineEvent::ObjectTapped { object_id: 1 });
        }
        if upcoming == args.unlock_at {
            engine.robot.grant_unlock("CubePlay");
            engine.push_event(EngineEvent::UnlockGranted("CubePlay".to_owned()));
        }
        if let Some(cliff) = args.cliff_at {
            if upcoming == cliff {
                engine.push_event(EngineEvent::CliffDetected);
                engine.interrupt_for_reaction(ReactionTrigger::CliffDetected, &mut log);
            } else if upcoming == cliff + REACTION_TICKS {
                if let Err(err) = engine.resume_after_reaction(&mut log) {
                    warn!(%err, "could not resume after the cliff reaction");
                }
            }
        }

        engine.tick(&mut log);
    }

    let summary = RunSummary {
        seed,
        ticks:             args.ticks,
        engine_secs:       engine.robot.now_secs(),
        switches:          log.switches.len(),
        completed:         log.completed,
        failed:            log.failed,
        actions_completed: log.actions_completed,
        behaviors: engine
            .behaviors()
            .map(|b| BehaviorSummary {
                name:          b.name().to_owned(),
                starts:        b.start_count(),
                last_run_secs: b.last_run_secs(),
            })
            .collect(),
        mood: engine.robot.mood.values().map(|(e, v)| (e.as_str(), v)).collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("=== freeplay ===");
    println!("Seed: {}  |  Ticks: {}  |  Engine time: {:.1} s", summary.seed, summary.ticks, summary.engine_secs);
    println!(
        "Switches: {}  |  Completed: {}  |  Failed: {}  |  Actions: {}",
        summary.switches, summary.completed, summary.failed, summary.actions_completed,
    );
    println!();

    println!("{:<14} {:>6} {:>10}", "Behavior", "Starts", "Last run");
    println!("{}", "-".repeat(32));
    for b in &summary.behaviors {
        let last = b.last_run_secs.map_or_else(|| "-".to_owned(), |s| format!("{s:.1} s"));
        println!("{:<14} {:>6} {:>10}", b.name, b.starts, last);
    }
    println!();

    println!("{:<12} {:>7}", "Emotion", "Value");
    println!("{}", "-".repeat(20));
    for (emotion, value) in &summary.mood {
        println!("{emotion:<12} {value:>7.3}");
    }
    println!();

    println!("First switches:");
    for (tick, name) in log.switches.iter().take(10) {
        println!("  {tick}  {name}");
    }

    Ok(())
}
