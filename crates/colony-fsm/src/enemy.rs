//! Raider states.
//!
//! Raiders have no needs and no tasks: they wander until a colonist comes
//! within detection range, hunt it down, attack in weapon range, and run for
//! the map edge when badly hurt.

use tracing::debug;

use colony_agent::{AgentKind, StateId};
use colony_combat::EngagementStep;
use colony_core::{AgentId, Vec2};
use colony_intent::InterruptReason;
use colony_mobility::MoveOutcome;
use colony_world::TerrainQuery;

use crate::actions::{dead_trigger, engage, enter_dead, exit_common, move_toward, nearest_hostile, reach};
use crate::{Flow, FsmCtx, FsmError, FsmResult, StateDef, StateTable};

const EDGE_RADIUS: f32 = 0.5;
const WANDER_ARRIVAL: f32 = 0.5;
/// Pause between wander legs, seconds.
const WANDER_PAUSE: (f32, f32) = (1.0, 3.0);

pub fn table() -> StateTable {
    StateTable::new(AgentKind::Enemy, vec![
        StateDef::new(StateId::Dead, 100, |_, _| Ok(Flow::Stay))
            .uninterruptible()
            .exempt(InterruptReason::Death)
            .trigger(dead_trigger)
            .on_enter(enter_dead),
        StateDef::new(StateId::Flee, 100, flee_tick)
            .exempt(InterruptReason::Flee)
            .trigger(wounded)
            .on_exit(exit_common),
        StateDef::new(StateId::Attack, 80, attack_tick)
            .trigger(attack_trigger)
            .on_exit(exit_common),
        StateDef::new(StateId::Hunt, 50, hunt_tick)
            .trigger(|a, ctx| nearest_hostile(a, ctx.cfg.enemy_detection_radius, ctx).is_some())
            .on_exit(exit_common),
        StateDef::new(StateId::Wander, 12, wander_tick).on_exit(exit_common),
        StateDef::new(StateId::Idle, 10, idle_tick).on_exit(exit_common),
    ])
}

fn wounded(agent: AgentId, ctx: &FsmCtx<'_>) -> bool {
    ctx.store.vitals[agent.index()].health_fraction() < ctx.cfg.flee_health_fraction
}

/// Closest point on the map border.
fn nearest_edge(pos: Vec2, ctx: &FsmCtx<'_>) -> Vec2 {
    let w = ctx.world.grid.width as f32;
    let h = ctx.world.grid.height as f32;
    let candidates = [
        Vec2::new(0.0, pos.y),
        Vec2::new(w, pos.y),
        Vec2::new(pos.x, 0.0),
        Vec2::new(pos.x, h),
    ];
    let edge = candidates
        .into_iter()
        .min_by(|a, b| a.distance_sq(pos).total_cmp(&b.distance_sq(pos)))
        .unwrap_or(pos);
    ctx.world.grid.clamp(edge)
}

fn flee_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    if !wounded(agent, ctx) {
        return Ok(Flow::Switch(StateId::Wander));
    }
    let i = agent.index();
    let goal = match ctx.store.scratch[i].spot {
        Some(spot) => spot,
        None => {
            let edge = nearest_edge(ctx.store.position[i], ctx);
            ctx.store.scratch[i].spot = Some(edge);
            edge
        }
    };
    if move_toward(agent, goal, EDGE_RADIUS, ctx)? == MoveOutcome::Arrived {
        debug!(%agent, position = %goal, "raider reached the map edge");
    }
    Ok(Flow::Stay)
}

fn attack_trigger(agent: AgentId, ctx: &FsmCtx<'_>) -> bool {
    !wounded(agent, ctx) && reach(agent, ctx).is_ok_and(|r| nearest_hostile(agent, r, ctx).is_some())
}

fn attack_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let r = reach(agent, ctx)?;
    let target = nearest_hostile(agent, r, ctx).map(|(t, _)| t);
    if target.is_none() {
        if nearest_hostile(agent, ctx.cfg.enemy_detection_radius, ctx).is_some() {
            return Ok(Flow::Switch(StateId::Hunt));
        }
        return Ok(Flow::Switch(StateId::Wander));
    }
    match engage(agent, target, ctx.cfg.flee_health_fraction, ctx)? {
        EngagementStep::Flee => Ok(Flow::Switch(StateId::Flee)),
        _ => Ok(Flow::Stay),
    }
}

fn hunt_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let Some((prey, _)) = nearest_hostile(agent, ctx.cfg.enemy_detection_radius, ctx) else {
        return Ok(Flow::Switch(StateId::Wander));
    };
    let goal = ctx.store.position[prey.index()];
    let radius = reach(agent, ctx)? * 0.8;
    match move_toward(agent, goal, radius, ctx) {
        Ok(_) => Ok(Flow::Stay),
        Err(FsmError::Unreachable { ticks }) => {
            debug!(%agent, %prey, ticks, "lost the trail");
            Ok(Flow::Switch(StateId::Wander))
        }
        Err(e) => Err(e),
    }
}

fn wander_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    if ctx.store.scratch[i].timer > 0.0 {
        ctx.store.scratch[i].timer -= ctx.dt;
        return Ok(Flow::Stay);
    }
    let Some(spot) = ctx.store.scratch[i].spot else {
        let r = ctx.cfg.wander_radius;
        let pos = ctx.store.position[i];
        let dx = ctx.rng.uniform_range(-r, r);
        let dy = ctx.rng.uniform_range(-r, r);
        let p = ctx.world.grid.clamp(pos + Vec2::new(dx, dy));
        if ctx.world.is_passable_at(p) {
            ctx.store.scratch[i].spot = Some(p);
        }
        return Ok(Flow::Stay);
    };
    let arrived = match move_toward(agent, spot, WANDER_ARRIVAL, ctx) {
        Ok(outcome) => outcome == MoveOutcome::Arrived,
        Err(FsmError::Unreachable { .. }) => true,
        Err(e) => return Err(e),
    };
    if arrived {
        let (lo, hi) = WANDER_PAUSE;
        ctx.store.scratch[i].spot = None;
        ctx.store.scratch[i].timer = ctx.rng.uniform_range(lo, hi);
    }
    Ok(Flow::Stay)
}

fn idle_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    ctx.store.scratch[i].timer += ctx.dt;
    if ctx.store.scratch[i].timer >= ctx.cfg.idle_secs {
        return Ok(Flow::Switch(StateId::Wander));
    }
    Ok(Flow::Stay)
}
