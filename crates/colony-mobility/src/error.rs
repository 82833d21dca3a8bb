//! Mobility error type.

use thiserror::Error;

use colony_core::Vec2;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MobilityError {
    /// No progress toward `target` for `ticks` consecutive ticks.
    #[error("stuck for {ticks} ticks moving to {target}")]
    Stuck { target: Vec2, ticks: u32 },
}

pub type MobilityResult<T> = Result<T, MobilityError>;
