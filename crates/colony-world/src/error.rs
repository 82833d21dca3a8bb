//! World-subsystem error type.

use thiserror::Error;

use colony_core::{AgentId, ItemId, TargetId};

use crate::stockpile::Cost;

/// Errors produced by `colony-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("tile ({x}, {y}) is outside the map")]
    OutOfBounds { x: i32, y: i32 },

    #[error("work site {0} does not exist")]
    UnknownSite(TargetId),

    #[error("floor item {0} does not exist")]
    UnknownItem(ItemId),

    #[error("work site {0} cannot be completed")]
    NotCompletable(TargetId),

    #[error("work site {site} is reserved by {by}")]
    SiteReserved { site: TargetId, by: AgentId },

    #[error("stockpile cannot cover {0}")]
    InsufficientResources(Cost),

    #[error("layout parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorldResult<T> = Result<T, WorldError>;
