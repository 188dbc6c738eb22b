//! `rb-core`: foundational types for the robot behavior engine.
//!
//! This crate is a dependency of every other `rb-*` crate.  It intentionally
//! has no `rb-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`ids`]         | `ActionTag`, `SlotHandle`, `BehaviorId`                |
//! | [`graph`]       | `Graph2d` piecewise-linear evaluator, `GraphNode`      |
//! | [`time`]        | `Tick`, `EngineClock`                                  |
//! | [`rng`]         | `EngineRng` (seedable, forkable)                       |
//! | [`tracks`]      | `AnimTrackFlags` bitmask of lockable robot subsystems  |
//! | [`error`]       | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required by the config records in `rb-mood`/`rb-behavior`. |

pub mod error;
pub mod graph;
pub mod ids;
pub mod rng;
pub mod time;
pub mod tracks;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use graph::{Graph2d, GraphNode};
pub use ids::{ActionTag, BehaviorId, SlotHandle};
pub use rng::EngineRng;
pub use time::{EngineClock, Tick};
pub use tracks::AnimTrackFlags;
