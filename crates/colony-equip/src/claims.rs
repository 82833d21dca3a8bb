//! Exclusive floor-item claims.

use rustc_hash::FxHashMap;
use tracing::debug;

use colony_core::{AgentId, ItemId};

use crate::ClaimConflict;

/// Single-owner locks keyed by item identity.
///
/// An agent holds at most one claim; claiming a second item releases the
/// first.  Both directions are indexed so `claim_of` stays O(1) on the hot
/// per-tick trigger check.
#[derive(Clone, Debug, Default)]
pub struct ClaimTable {
    by_item:  FxHashMap<ItemId, AgentId>,
    by_agent: FxHashMap<AgentId, ItemId>,
}

impl ClaimTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `item` for `agent`.  Succeeds if the item is free or already
    /// held by `agent`.
    pub fn try_claim(&mut self, item: ItemId, agent: AgentId) -> Result<(), ClaimConflict> {
        match self.by_item.get(&item) {
            Some(&holder) if holder == agent => return Ok(()),
            Some(&holder) => return Err(ClaimConflict { item, holder }),
            None => {}
        }
        if let Some(prev) = self.by_agent.insert(agent, item) {
            self.by_item.remove(&prev);
        }
        self.by_item.insert(item, agent);
        debug!(%agent, %item, "weapon claimed");
        Ok(())
    }

    /// Release `item` if `agent` holds it.  Returns whether anything changed.
    pub fn release(&mut self, item: ItemId, agent: AgentId) -> bool {
        if self.by_item.get(&item) != Some(&agent) {
            return false;
        }
        self.by_item.remove(&item);
        self.by_agent.remove(&agent);
        debug!(%agent, %item, "weapon claim released");
        true
    }

    /// Release whatever `agent` holds.
    pub fn release_all_for(&mut self, agent: AgentId) -> Option<ItemId> {
        let item = self.by_agent.remove(&agent)?;
        self.by_item.remove(&item);
        debug!(%agent, %item, "weapon claim released");
        Some(item)
    }

    /// Drop the claim on an item that no longer exists, whoever holds it.
    pub fn forget_item(&mut self, item: ItemId) {
        if let Some(agent) = self.by_item.remove(&item) {
            self.by_agent.remove(&agent);
        }
    }

    #[inline]
    pub fn holder(&self, item: ItemId) -> Option<AgentId> {
        self.by_item.get(&item).copied()
    }

    #[inline]
    pub fn claim_of(&self, agent: AgentId) -> Option<ItemId> {
        self.by_agent.get(&agent).copied()
    }

    #[inline]
    pub fn is_claimed(&self, item: ItemId) -> bool {
        self.by_item.contains_key(&item)
    }

    pub fn len(&self) -> usize {
        self.by_item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_item.is_empty()
    }
}
