//! Scenario file: map size, tuning, starting agents and a command schedule.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use colony_agent::{AgentSpawn, HeldItem};
use colony_combat::WeaponCatalog;
use colony_core::{DebugToggles, DefName, SimConfig, Vec2};
use colony_fsm::FsmConfig;
use colony_sim::{Command, RaidConfig};
use colony_world::{TerrainQuery, World};

pub const DEFAULT_SCENARIO: &str = include_str!("../data/scenario.json");

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub width:     i32,
    pub height:    i32,
    pub sim:       SimConfig,
    pub fsm:       FsmConfig,
    pub raids:     RaidConfig,
    pub toggles:   DebugToggles,
    pub colonists: Vec<StartingAgent>,
    pub raiders:   Vec<StartingAgent>,
    pub commands:  Vec<ScheduledCommand>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            width:     40,
            height:    30,
            sim:       SimConfig::default(),
            fsm:       FsmConfig::default(),
            raids:     RaidConfig::default(),
            toggles:   DebugToggles::default(),
            colonists: Vec::new(),
            raiders:   Vec::new(),
            commands:  Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartingAgent {
    pub x:      f32,
    pub y:      f32,
    #[serde(default)]
    pub weapon: Option<String>,
}

/// A debug-console command issued before the step of `tick`.
#[derive(Debug, Deserialize)]
pub struct ScheduledCommand {
    pub tick:    u64,
    pub command: Command,
}

impl Scenario {
    /// Load from `path`, or the embedded default scenario when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut scenario: Scenario = match path {
            Some(p) => {
                let text = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing {}", p.display()))?
            }
            None => serde_json::from_str(DEFAULT_SCENARIO).context("parsing embedded scenario")?,
        };
        if scenario.width <= 0 || scenario.height <= 0 {
            bail!("map must be at least 1×1, got {}×{}", scenario.width, scenario.height);
        }
        scenario.commands.sort_by_key(|c| c.tick);
        Ok(scenario)
    }

    /// Spawn records for every starting agent, colonists first.  Weapons get
    /// item ids from the world so they never collide with floor items.
    pub fn spawns(&self, world: &mut World, catalog: &WeaponCatalog) -> Result<Vec<AgentSpawn>> {
        let colonists = self.colonists.iter().map(|a| (a, AgentSpawn::colonist(Vec2::new(a.x, a.y))));
        let raiders = self
            .raiders
            .iter()
            .map(|a| (a, AgentSpawn::enemy(Vec2::new(a.x, a.y)).with_health(self.raids.health)));

        let mut spawns = Vec::with_capacity(self.colonists.len() + self.raiders.len());
        for (agent, mut spawn) in colonists.chain(raiders) {
            if !world.is_passable_at(spawn.position) {
                bail!("starting agent at ({}, {}) is not on a passable tile", agent.x, agent.y);
            }
            if let Some(name) = &agent.weapon {
                let def = DefName::new(name.as_str());
                if catalog.get(&def).is_none() {
                    bail!("unknown starting weapon '{name}'");
                }
                spawn = spawn.with_weapon(HeldItem { id: world.items.mint_id(), def });
            }
            spawns.push(spawn);
        }
        Ok(spawns)
    }
}
