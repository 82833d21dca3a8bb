//! Periodic raids at the map edge.

use tracing::{debug, info};

use colony_agent::{AgentSpawn, AgentStore, AgentRngs, HeldItem};
use colony_core::{AgentId, DefName, SimRng, Vec2};
use colony_world::{TerrainQuery, World};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RaidConfig {
    /// Seconds between raids.  0 disables raids.
    pub interval_secs: f64,
    /// Raiders per raid.
    pub size:          usize,
    /// Each raider carries one of these, chosen at random.  Empty means
    /// raiders fight with their fists.
    pub weapons:       Vec<DefName>,
    pub health:        f32,
}

impl Default for RaidConfig {
    fn default() -> Self {
        Self {
            interval_secs: 120.0,
            size:          3,
            weapons:       vec![DefName::from("club"), DefName::from("pistol")],
            health:        80.0,
        }
    }
}

/// Placement attempts per raider before it is dropped from the raid.
const PLACEMENT_TRIES: usize = 16;

/// A passable point on a random map edge.
fn edge_point(world: &World, rng: &mut SimRng) -> Option<Vec2> {
    let (w, h) = (world.grid.width, world.grid.height);
    if w <= 0 || h <= 0 {
        return None;
    }
    (0..PLACEMENT_TRIES).find_map(|_| {
        let (tx, ty) = match rng.gen_range(0..4u8) {
            0 => (rng.gen_range(0..w), 0),
            1 => (rng.gen_range(0..w), h - 1),
            2 => (0, rng.gen_range(0..h)),
            _ => (w - 1, rng.gen_range(0..h)),
        };
        world.is_passable(tx, ty).then(|| Vec2::tile_center(tx, ty))
    })
}

/// Spawn one raid.  Returns the new agents.
pub(crate) fn spawn_raid(
    cfg: &RaidConfig,
    now: f64,
    world: &mut World,
    store: &mut AgentStore,
    rngs: &mut AgentRngs,
    rng: &mut SimRng,
) -> Vec<AgentId> {
    let mut raiders = Vec::with_capacity(cfg.size);
    for _ in 0..cfg.size {
        let Some(pos) = edge_point(world, rng) else {
            debug!("no passable edge tile for a raider");
            continue;
        };
        let mut spawn = AgentSpawn::enemy(pos).with_health(cfg.health).at_time(now);
        if !cfg.weapons.is_empty() {
            let def = cfg.weapons[rng.gen_range(0..cfg.weapons.len())].clone();
            spawn = spawn.with_weapon(HeldItem { id: world.items.mint_id(), def });
        }
        let agent = store.push(spawn);
        rngs.push(agent);
        raiders.push(agent);
    }
    if !raiders.is_empty() {
        info!(count = raiders.len(), at_secs = now, "raid arrived");
    }
    raiders
}

/// Make sure every raid weapon exists; used by the builder.
pub(crate) fn unknown_weapon<'a>(cfg: &'a RaidConfig, known: impl Fn(&DefName) -> bool) -> Option<&'a DefName> {
    cfg.weapons.iter().find(|d| !known(d))
}

