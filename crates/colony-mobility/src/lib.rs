//! `colony-mobility`: moving agents across the tile grid.
//!
//! There is no global path planner.  Each tick an agent steps straight
//! toward its target; if the destination tile is blocked it tries the best
//! passable neighbouring tile instead.  A counter of consecutive ticks
//! without progress bounds how long an agent can push against an obstacle:
//! after `stuck_limit` of them the move fails with [`MobilityError::Stuck`]
//! and the caller falls back to looking for other work.

pub mod engine;
pub mod error;
pub mod state;


pub use engine::{step, MobilityConfig, MoveOutcome};
pub use error::{MobilityError, MobilityResult};
pub use state::{MoveTarget, MovementState};
