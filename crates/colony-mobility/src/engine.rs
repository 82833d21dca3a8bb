//! One movement step.

use tracing::debug;

use colony_core::Vec2;
use colony_world::TerrainQuery;

use crate::{MobilityError, MobilityResult, MovementState};

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MobilityConfig {
    /// Consecutive no-progress ticks before a move is abandoned.
    pub stuck_limit:  u32,
    /// Minimum improvement on the best distance that counts as progress, in
    /// tiles.  Clamped to half a step so slow game speeds never look stuck.
    pub progress_eps: f32,
}

impl Default for MobilityConfig {
    fn default() -> Self {
        Self { stuck_limit: 20, progress_eps: 0.05 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    /// No movement target.
    Idle,
    Arrived,
    /// Stepped straight toward the target.
    Moved,
    /// Straight step was blocked; stepped toward a neighbouring tile instead.
    Detoured,
    /// Nowhere to go this tick.
    Blocked,
}

/// Neighbour offsets in a fixed order so detour choice is deterministic.
const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0), (0, 1), (-1, 0), (0, -1),
    (1, 1), (-1, 1), (-1, -1), (1, -1),
];

/// A step from `from` to `to` is legal if it stays in the current tile or
/// ends on a passable one.
fn step_ok(terrain: &impl TerrainQuery, from: Vec2, to: Vec2) -> bool {
    to.tile() == from.tile() || terrain.is_passable_at(to)
}

fn detour(terrain: &impl TerrainQuery, pos: Vec2, goal: Vec2, max_step: f32) -> Option<Vec2> {
    let (tx, ty) = pos.tile();
    NEIGHBOURS
        .iter()
        .filter(|&&(dx, dy)| {
            terrain.is_passable(tx + dx, ty + dy)
                // no cutting corners between two blocked orthogonals
                && (dx == 0 || dy == 0 || (terrain.is_passable(tx + dx, ty) && terrain.is_passable(tx, ty + dy)))
        })
        .map(|&(dx, dy)| pos.step_toward(Vec2::tile_center(tx + dx, ty + dy), max_step))
        .filter(|&p| step_ok(terrain, pos, p))
        .min_by(|a, b| a.distance_sq(goal).total_cmp(&b.distance_sq(goal)))
}

/// Advance `pos` one tick toward the movement target.
///
/// On [`MobilityError::Stuck`] the target has already been cleared.
pub fn step(
    pos: &mut Vec2,
    state: &mut MovementState,
    speed: f32,
    dt: f32,
    terrain: &impl TerrainQuery,
    cfg: &MobilityConfig,
) -> MobilityResult<MoveOutcome> {
    let Some(target) = state.target else {
        return Ok(MoveOutcome::Idle);
    };
    if pos.distance(target.pos) <= target.arrival_radius {
        state.clear();
        return Ok(MoveOutcome::Arrived);
    }

    let max_step = (speed * dt).max(0.0);
    let direct = pos.step_toward(target.pos, max_step);
    let outcome = if step_ok(terrain, *pos, direct) {
        *pos = direct;
        MoveOutcome::Moved
    } else if let Some(p) = detour(terrain, *pos, target.pos, max_step) {
        *pos = p;
        MoveOutcome::Detoured
    } else {
        MoveOutcome::Blocked
    };

    let dist = pos.distance(target.pos);
    let eps = cfg.progress_eps.min(max_step * 0.5);
    if dist < state.best_distance - eps {
        state.best_distance = dist;
        state.stuck_ticks = 0;
    } else {
        state.stuck_ticks += 1;
    }

    if dist <= target.arrival_radius {
        state.clear();
        return Ok(MoveOutcome::Arrived);
    }
    if state.stuck_ticks >= cfg.stuck_limit {
        let ticks = state.stuck_ticks;
        state.clear();
        debug!(target = %target.pos, ticks, "movement abandoned");
        return Err(MobilityError::Stuck { target: target.pos, ticks });
    }
    Ok(outcome)
}
