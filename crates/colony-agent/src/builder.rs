//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use colony_agent::{AgentSpawn, AgentStoreBuilder};
//! use colony_core::Vec2;
//!
//! let (store, rngs) = AgentStoreBuilder::new(42)
//!     .spawn(AgentSpawn::colonist(Vec2::new(5.0, 5.0)))
//!     .spawn(AgentSpawn::enemy(Vec2::new(30.0, 5.0)))
//!     .build();
//!
//! assert_eq!(store.count, 2);
//! assert_eq!(rngs.len(), 2);
//! ```

use colony_core::Vec2;

use crate::inventory::HeldItem;
use crate::state::AgentKind;
use crate::{AgentRngs, AgentStore};

/// Initial values for one agent.
#[derive(Clone, Debug)]
pub struct AgentSpawn {
    pub kind:            AgentKind,
    pub position:        Vec2,
    pub max_health:      f32,
    pub work_speed:      f32,
    pub weapon:          Option<HeldItem>,
    pub spawned_at_secs: f64,
}

impl AgentSpawn {
    pub fn colonist(position: Vec2) -> Self {
        Self {
            kind: AgentKind::Colonist,
            position,
            max_health: 100.0,
            work_speed: 1.0,
            weapon: None,
            spawned_at_secs: 0.0,
        }
    }

    pub fn enemy(position: Vec2) -> Self {
        Self {
            kind: AgentKind::Enemy,
            position,
            max_health: 80.0,
            work_speed: 0.0,
            weapon: None,
            spawned_at_secs: 0.0,
        }
    }

    pub fn with_weapon(mut self, weapon: HeldItem) -> Self {
        self.weapon = Some(weapon);
        self
    }

    pub fn with_health(mut self, max_health: f32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn with_work_speed(mut self, work_speed: f32) -> Self {
        self.work_speed = work_speed;
        self
    }

    pub fn at_time(mut self, secs: f64) -> Self {
        self.spawned_at_secs = secs;
        self
    }
}

/// Fluent builder for [`AgentStore`] + [`AgentRngs`].
pub struct AgentStoreBuilder {
    seed:   u64,
    spawns: Vec<AgentSpawn>,
}

impl AgentStoreBuilder {
    /// Create a builder using `seed` as the global RNG seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, spawns: Vec::new() }
    }

    pub fn spawn(mut self, spawn: AgentSpawn) -> Self {
        self.spawns.push(spawn);
        self
    }

    pub fn spawn_all(mut self, spawns: impl IntoIterator<Item = AgentSpawn>) -> Self {
        self.spawns.extend(spawns);
        self
    }

    /// Construct `AgentStore` and `AgentRngs`.  Agents get ids in spawn
    /// order, which is also their tick order.
    pub fn build(self) -> (AgentStore, AgentRngs) {
        let mut store = AgentStore::with_capacity(self.spawns.len());
        for spawn in self.spawns {
            store.push(spawn);
        }
        let rngs = AgentRngs::new(store.count, self.seed);
        (store, rngs)
    }
}
