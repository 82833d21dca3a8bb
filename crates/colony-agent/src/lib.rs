//! `colony-agent`: Structure-of-Arrays agent storage.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`state`]       | `AgentKind`, `StateId`, declared state sets                |
//! | [`vitals`]      | `Vitals` (health, hunger, fatigue)                         |
//! | [`inventory`]   | `Slot`, `HeldItem`, `Inventory`                            |
//! | [`store`]       | `AgentStore` (SoA arrays), `AgentRngs` (per-agent RNG)     |
//! | [`builder`]     | `AgentSpawn`, `AgentStoreBuilder`                          |
//! | [`snapshot`]    | `AgentSnapshot`: what renderers and UIs may read          |
//!
//! The store is the only owner of agent state.  Every write of a state tag
//! goes through [`AgentStore::set_state`], which refuses tags outside the
//! agent kind's declared set.

pub mod builder;
pub mod error;
pub mod inventory;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod vitals;

#[cfg(test)]
mod tests;

pub use builder::{AgentSpawn, AgentStoreBuilder};
pub use error::{AgentError, AgentResult};
pub use inventory::{HeldItem, Inventory, Slot};
pub use snapshot::AgentSnapshot;
pub use state::{AgentKind, StateId};
pub use store::{AgentRngs, AgentStore, StateScratch};
pub use vitals::Vitals;
