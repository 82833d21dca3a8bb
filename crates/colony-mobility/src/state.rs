//! Per-agent movement state.

use colony_core::Vec2;

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveTarget {
    pub pos:            Vec2,
    /// Arrived once within this distance.
    pub arrival_radius: f32,
}

/// Movement target plus stuck bookkeeping.
///
/// `best_distance` is the closest the agent has come to the current target;
/// `stuck_ticks` counts consecutive ticks that failed to improve on it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovementState {
    pub target:        Option<MoveTarget>,
    pub stuck_ticks:   u32,
    pub best_distance: f32,
}

impl Default for MovementState {
    fn default() -> Self {
        Self { target: None, stuck_ticks: 0, best_distance: f32::INFINITY }
    }
}

/// Goal moves up to this far, in tiles, keep the current destination.
pub const RETARGET_SLACK: f32 = 1.0;

impl MovementState {
    /// Head for `pos`.
    ///
    /// A goal within [`RETARGET_SLACK`] of the previous one is the same
    /// destination drifting (a walking target), so the stuck counter and best
    /// distance carry over.  A farther jump starts a fresh move.
    pub fn set_target(&mut self, pos: Vec2, arrival_radius: f32) {
        let same = self.target.is_some_and(|t| t.pos.distance(pos) <= RETARGET_SLACK);
        self.target = Some(MoveTarget { pos, arrival_radius });
        if !same {
            self.stuck_ticks = 0;
            self.best_distance = f32::INFINITY;
        }
    }

    pub fn clear(&mut self) {
        *self = MovementState::default();
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.target.is_some()
    }
}
