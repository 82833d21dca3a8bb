//! Picking up a claimed weapon.

use tracing::info;

use colony_agent::{HeldItem, Inventory};
use colony_core::{AgentId, DefName, ItemId, Vec2};
use colony_world::{FloorItems, ItemKind};

use crate::{ClaimTable, EquipError, EquipResult};

#[derive(Clone, Debug, PartialEq)]
pub struct EquipSwap {
    pub equipped: ItemId,
    pub def:      DefName,
    /// Floor id of the weapon that was in hand, if any.
    pub dropped:  Option<ItemId>,
}

/// Move the claimed `item` from the floor into `inventory`'s weapon slot.
///
/// The previous weapon, if any, is dropped at `pos` as a fresh floor item.
/// The claim is released on success.  On failure nothing is changed except
/// that a claim on a vanished item is forgotten.
pub fn pick_up_and_equip(
    agent: AgentId,
    pos: Vec2,
    item: ItemId,
    inventory: &mut Inventory,
    items: &mut FloorItems,
    claims: &mut ClaimTable,
) -> EquipResult<EquipSwap> {
    if claims.holder(item) != Some(agent) {
        return Err(EquipError::NotClaimed { agent, item });
    }
    let Some(floor) = items.get(item) else {
        claims.forget_item(item);
        return Err(EquipError::ItemGone(item));
    };
    let def = floor.kind.weapon_def().cloned().ok_or(EquipError::NotAWeapon(item))?;

    items.remove_item(item).map_err(|_| EquipError::ItemGone(item))?;
    claims.release(item, agent);

    let dropped = inventory
        .equip(HeldItem { id: item, def: def.clone() })
        .map(|old| items.drop_item(ItemKind::Weapon(old.def), pos));
    info!(%agent, %item, weapon = %def, ?dropped, "weapon equipped");
    Ok(EquipSwap { equipped: item, def, dropped })
}
