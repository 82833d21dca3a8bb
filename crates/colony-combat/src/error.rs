//! Combat-subsystem error type.

use thiserror::Error;

use colony_core::DefName;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("weapon definition '{0}' is not in the catalog")]
    UnknownWeapon(DefName),

    #[error("invalid weapon definition '{def}': {reason}")]
    InvalidWeapon { def: DefName, reason: String },

    #[error("catalog parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CombatResult<T> = Result<T, CombatError>;
