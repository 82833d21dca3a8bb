//! `colony-sim`: tick loop orchestrator for the colony core.
//!
//! # One step
//!
//! ```text
//! dt = tick_duration * game_speed        (paused: the step does nothing)
//!   ① Claims  : colonists that want a better weapon bid for floor items;
//!                resolved nearest-first so no item is granted twice.
//!   ② Agents  : AgentFsm::tick for every agent in ascending AgentId.
//!   ③ Damage  : queued hits and starvation are applied (godmode spares
//!                colonists); claims of the newly dead are released.
//!   ④ Raids   : every `raid.interval_secs` a raid spawns at the map edge.
//!   ⑤ Observe : events, tick summary, periodic snapshot; clock advances.
//! ```
//!
//! A fatal FSM error in one agent does not stop the others: the step
//! finishes and then returns [`SimError::Invariant`].
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use colony_agent::{AgentSpawn, AgentStoreBuilder};
//! use colony_core::{SimConfig, Vec2};
//! use colony_sim::{NoopObserver, SimBuilder};
//! use colony_world::World;
//!
//! let (store, rngs) = AgentStoreBuilder::new(42)
//!     .spawn(AgentSpawn::colonist(Vec2::new(10.5, 10.5)))
//!     .build();
//! let mut sim = SimBuilder::new(SimConfig::default(), World::new(40, 40), store, rngs).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod command;
pub mod error;
pub mod observer;
pub mod raid;
pub mod sim;


pub use builder::SimBuilder;
pub use command::Command;
pub use error::{CommandError, SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use raid::RaidConfig;
pub use sim::Sim;
