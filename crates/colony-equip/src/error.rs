//! Equipment error types.

use thiserror::Error;

use colony_core::{AgentId, ItemId};

/// Another agent already holds the claim on `item`.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("{item} is already claimed by {holder}")]
pub struct ClaimConflict {
    pub item:   ItemId,
    pub holder: AgentId,
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum EquipError {
    #[error(transparent)]
    Claim(#[from] ClaimConflict),

    /// The agent tried to pick up an item it never claimed.
    #[error("{agent} holds no claim on {item}")]
    NotClaimed { agent: AgentId, item: ItemId },

    /// The item left the floor before pickup.
    #[error("{0} is no longer on the floor")]
    ItemGone(ItemId),

    #[error("{0} is not a weapon")]
    NotAWeapon(ItemId),
}

pub type EquipResult<T> = Result<T, EquipError>;
