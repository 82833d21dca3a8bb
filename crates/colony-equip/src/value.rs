//! Weapon scoring and the upgrade decision.

use colony_core::{AgentId, DefName, ItemId, Vec2};
use colony_combat::{WeaponCatalog, WeaponCategory, WeaponDef};
use colony_world::FloorItems;

use crate::ClaimTable;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EquipConfig {
    /// A candidate must be worth this many times the current weapon.
    pub upgrade_multiplier: f32,
    /// Floor weapons farther than this are ignored.
    pub max_pickup_radius:  f32,
    pub ranged_weight:      f32,
    pub melee_weight:       f32,
    pub base_priority:      u8,
    /// Added to `base_priority` while the agent is unarmed.
    pub unarmed_bonus:      u8,
}

impl Default for EquipConfig {
    fn default() -> Self {
        Self {
            upgrade_multiplier: 1.5,
            max_pickup_radius:  30.0,
            ranged_weight:      1.0,
            melee_weight:       0.8,
            base_priority:      45,
            unarmed_bonus:      30,
        }
    }
}

/// Damage weighted by category.
#[inline]
pub fn weapon_value(def: &WeaponDef, cfg: &EquipConfig) -> f32 {
    let weight = match def.category {
        WeaponCategory::Ranged => cfg.ranged_weight,
        WeaponCategory::Melee  => cfg.melee_weight,
    };
    def.damage * weight
}

/// Priority of the `equipment` state for an agent that is (un)armed.
#[inline]
pub fn equipment_priority(armed: bool, cfg: &EquipConfig) -> u8 {
    if armed { cfg.base_priority } else { cfg.base_priority.saturating_add(cfg.unarmed_bonus) }
}

/// A floor weapon worth going for.
#[derive(Clone, Debug, PartialEq)]
pub struct UpgradeCandidate {
    pub item:     ItemId,
    pub def:      DefName,
    pub pos:      Vec2,
    pub value:    f32,
    pub distance: f32,
}

/// The nearest unclaimed floor weapon that beats `current`.
///
/// An unarmed agent (`current == None`) takes any known weapon; an armed one
/// needs `value > current_value * upgrade_multiplier`.  Claims held by
/// `agent` itself do not exclude an item.  Items with a definition missing
/// from the catalog are skipped.
pub fn evaluate_upgrade(
    agent: AgentId,
    pos: Vec2,
    current: Option<&WeaponDef>,
    items: &FloorItems,
    catalog: &WeaponCatalog,
    claims: &ClaimTable,
    cfg: &EquipConfig,
) -> Option<UpgradeCandidate> {
    let floor = current.map(|w| weapon_value(w, cfg) * cfg.upgrade_multiplier);
    items
        .nearby_items(pos, cfg.max_pickup_radius, |it| {
            it.kind.weapon_def().is_some() && claims.holder(it.id).is_none_or(|h| h == agent)
        })
        .into_iter()
        .find_map(|it| {
            let def = catalog.get(it.kind.weapon_def()?)?;
            let value = weapon_value(def, cfg);
            if floor.is_some_and(|f| value <= f) {
                return None;
            }
            Some(UpgradeCandidate {
                item: it.id,
                def: def.def_name.clone(),
                pos: it.pos,
                value,
                distance: it.pos.distance(pos),
            })
        })
}
