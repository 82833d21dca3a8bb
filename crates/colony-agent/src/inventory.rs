//! Slot → item mapping.

use std::collections::BTreeMap;

use colony_core::{DefName, ItemId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    Weapon,
    Pack,
}

/// An item held by an agent.  Keeps the `ItemId` it had on the floor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeldItem {
    pub id:  ItemId,
    pub def: DefName,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    slots: BTreeMap<Slot, HeldItem>,
}

impl Inventory {
    #[inline]
    pub fn get(&self, slot: Slot) -> Option<&HeldItem> {
        self.slots.get(&slot)
    }

    #[inline]
    pub fn equipped_weapon(&self) -> Option<&HeldItem> {
        self.get(Slot::Weapon)
    }

    /// Put `item` in the weapon slot, returning whatever was there.
    pub fn equip(&mut self, item: HeldItem) -> Option<HeldItem> {
        self.slots.insert(Slot::Weapon, item)
    }

    pub fn take(&mut self, slot: Slot) -> Option<HeldItem> {
        self.slots.remove(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Slot, &HeldItem)> {
        self.slots.iter()
    }
}
