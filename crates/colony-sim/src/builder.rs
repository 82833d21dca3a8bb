//! Fluent builder for constructing a [`Sim`].

use colony_agent::{AgentRngs, AgentStore};
use colony_combat::WeaponCatalog;
use colony_core::{DebugToggles, SimConfig, SimRng};
use colony_equip::ClaimTable;
use colony_fsm::{AgentFsm, Effects, FsmConfig};
use colony_world::{NearestWork, WorkProvider, World};

use crate::raid::{unknown_weapon, RaidConfig};
use crate::{Sim, SimError, SimResult};

/// Seed offset of the sim-level RNG stream, so it never mirrors an agent's.
const SIM_RNG_OFFSET: u64 = 0xC0_10_4E;

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick duration, total ticks, seed, game speed
/// - [`World`]: terrain, obstacles, items, sites, stockpile
/// - [`AgentStore`] + [`AgentRngs`]: from [`colony_agent::AgentStoreBuilder`]
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                     |
/// |--------------------------|-----------------------------|
/// | `.fsm_config(c)`         | `FsmConfig::default()`      |
/// | `.catalog(c)`            | `WeaponCatalog::standard()` |
/// | `.work_provider(p)`      | `NearestWork::default()`    |
/// | `.raids(r)`              | `RaidConfig::default()`     |
/// | `.toggles(t)`            | all off                     |
pub struct SimBuilder {
    config:   SimConfig,
    world:    World,
    agents:   AgentStore,
    rngs:     AgentRngs,
    fsm:      Option<FsmConfig>,
    catalog:  Option<WeaponCatalog>,
    work:     Option<Box<dyn WorkProvider>>,
    raids:    Option<RaidConfig>,
    toggles:  DebugToggles,
}

impl SimBuilder {
    pub fn new(config: SimConfig, world: World, agents: AgentStore, rngs: AgentRngs) -> Self {
        Self {
            config,
            world,
            agents,
            rngs,
            fsm:     None,
            catalog: None,
            work:    None,
            raids:   None,
            toggles: DebugToggles::default(),
        }
    }

    pub fn fsm_config(mut self, cfg: FsmConfig) -> Self {
        self.fsm = Some(cfg);
        self
    }

    pub fn catalog(mut self, catalog: WeaponCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Replace the default nearest-first work assignment.
    pub fn work_provider(mut self, provider: impl WorkProvider + 'static) -> Self {
        self.work = Some(Box::new(provider));
        self
    }

    pub fn raids(mut self, raids: RaidConfig) -> Self {
        self.raids = Some(raids);
        self
    }

    pub fn toggles(mut self, toggles: DebugToggles) -> Self {
        self.toggles = toggles;
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        let tick = self.config.tick_duration_secs;
        if tick.is_nan() || tick <= 0.0 {
            return Err(SimError::Config(format!(
                "tick_duration_secs must be positive, got {tick}"
            )));
        }
        if self.rngs.len() != self.agents.count {
            return Err(SimError::Config(format!(
                "{} agent RNGs for {} agents",
                self.rngs.len(),
                self.agents.count
            )));
        }

        let catalog = self.catalog.unwrap_or_else(WeaponCatalog::standard);
        for inv in &self.agents.inventory {
            if let Some(w) = inv.equipped_weapon() {
                if catalog.get(&w.def).is_none() {
                    return Err(SimError::Config(format!("agent carries unknown weapon '{}'", w.def)));
                }
            }
        }
        let raids = self.raids.unwrap_or_default();
        if let Some(def) = unknown_weapon(&raids, |d| catalog.get(d).is_some()) {
            return Err(SimError::Config(format!("raid weapon '{def}' is not in the catalog")));
        }

        let mut rng = SimRng::new(self.config.seed);
        let rng = rng.child(SIM_RNG_OFFSET);
        let next_raid_secs = raids.interval_secs;

        Ok(Sim {
            clock:   self.config.make_clock(),
            config:  self.config,
            agents:  self.agents,
            rngs:    self.rngs,
            world:   self.world,
            claims:  ClaimTable::new(),
            catalog,
            fsm:     AgentFsm::new(self.fsm.unwrap_or_default()),
            toggles: self.toggles,
            raids,
            work:    self.work.unwrap_or_else(|| Box::new(NearestWork::default())),
            rng,
            effects: Effects::new(),
            next_raid_secs,
        })
    }
}
