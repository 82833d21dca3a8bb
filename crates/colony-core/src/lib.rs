//! `colony-core`: foundational types for the colony simulation core.
//!
//! This crate is a dependency of every other `colony-*` crate.  It has no
//! `colony-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                  |
//! |-----------------|-----------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `ItemId`, `TargetId`, `ObstacleId`, `DefName`  |
//! | [`geo`]         | `Vec2`, tile conversion                                   |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                           |
//! | [`config`]      | `GameSpeed`, `DebugToggles`                               |
//! | [`rng`]         | `RandomSource`, `AgentRng`, `SimRng`, `ScriptedRandom`    |
//! | [`task`]        | `TaskKind`, `TargetRef` (weak task-target reference)      |
//! | [`error`]       | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod task;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DebugToggles, GameSpeed};
pub use error::{CoreError, CoreResult};
pub use geo::Vec2;
pub use ids::{AgentId, DefName, ItemId, ObstacleId, TargetId};
pub use rng::{AgentRng, RandomSource, ScriptedRandom, SimRng};
pub use task::{TargetRef, TaskKind};
pub use time::{SimClock, SimConfig, Tick};
