//! Floor item registry.
//!
//! Items on the floor are unowned.  Picking one up removes it from this
//! registry; the `ItemId` travels with it into the agent's inventory.
//! Dropping creates a fresh floor item with a new id.

use std::collections::BTreeMap;

use colony_core::{DefName, ItemId, Vec2};

use crate::{WorldError, WorldResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemKind {
    Weapon(DefName),
}

impl ItemKind {
    pub fn weapon_def(&self) -> Option<&DefName> {
        match self {
            ItemKind::Weapon(def) => Some(def),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloorItem {
    pub id:   ItemId,
    pub kind: ItemKind,
    pub pos:  Vec2,
}

#[derive(Clone, Debug, Default)]
pub struct FloorItems {
    items:   BTreeMap<ItemId, FloorItem>,
    next_id: u32,
}

impl FloorItems {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, id: ItemId) -> Option<&FloorItem> {
        self.items.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FloorItem> {
        self.items.values()
    }

    /// Items within `radius` of `pos` passing `filter`, nearest first
    /// (ties by `ItemId`).
    pub fn nearby_items(
        &self,
        pos: Vec2,
        radius: f32,
        filter: impl Fn(&FloorItem) -> bool,
    ) -> Vec<&FloorItem> {
        let r2 = radius * radius;
        let mut found: Vec<(f32, &FloorItem)> = self
            .items
            .values()
            .filter_map(|it| {
                let d2 = it.pos.distance_sq(pos);
                (d2 <= r2 && filter(it)).then_some((d2, it))
            })
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));
        found.into_iter().map(|(_, it)| it).collect()
    }

    pub fn remove_item(&mut self, id: ItemId) -> WorldResult<FloorItem> {
        self.items.remove(&id).ok_or(WorldError::UnknownItem(id))
    }

    /// Place a new item on the floor and return its id.
    pub fn drop_item(&mut self, kind: ItemKind, pos: Vec2) -> ItemId {
        let id = self.mint_id();
        self.items.insert(id, FloorItem { id, kind, pos });
        id
    }

    /// Allocate an id for an item that starts out held (spawned gear), so
    /// held and floor items never share an id.
    pub fn mint_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }
}
