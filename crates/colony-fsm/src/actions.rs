//! Building blocks shared by colonist and enemy state bodies.

use tracing::{debug, info};

use colony_agent::{AgentKind, Slot};
use colony_combat::cover::find_cover_positions_where;
use colony_combat::{EngageInput, EngagementStep, WeaponDef};
use colony_core::{AgentId, TargetRef, TaskKind, Vec2};
use colony_intent::{IntentPhase, IntentTick};
use colony_mobility::{step, MobilityError, MoveOutcome};
use colony_world::{ItemKind, Obstacle, TerrainQuery};

use crate::{Damage, FsmCtx, FsmError, FsmEvent, FsmResult};

/// Movement arrival radius as a fraction of the task radius, so walking
/// stops inside the radius rather than on its edge.
const ARRIVAL_SLACK: f32 = 0.8;
/// Line-of-fire search margin for cover obstacles.
const FIRE_LINE_MARGIN: f32 = 1.0;

#[inline]
pub(crate) fn hostile_kind(kind: AgentKind) -> AgentKind {
    match kind {
        AgentKind::Colonist => AgentKind::Enemy,
        AgentKind::Enemy    => AgentKind::Colonist,
    }
}

// ── Movement ──────────────────────────────────────────────────────────────────

/// One movement step toward `goal`.  Giving up maps to `Unreachable`.
pub(crate) fn move_toward(agent: AgentId, goal: Vec2, radius: f32, ctx: &mut FsmCtx<'_>) -> FsmResult<MoveOutcome> {
    let i = agent.index();
    let speed = ctx.cfg.speed(ctx.store.kind[i]);
    ctx.store.movement[i].set_target(goal, radius);
    step(
        &mut ctx.store.position[i],
        &mut ctx.store.movement[i],
        speed,
        ctx.dt,
        &*ctx.world,
        &ctx.cfg.mobility,
    )
    .map_err(|MobilityError::Stuck { ticks, .. }| FsmError::Unreachable { ticks })
}

// ── Targets ───────────────────────────────────────────────────────────────────

/// Liveness lookup.  A target that no longer resolves is `InvalidTarget`.
pub(crate) fn resolve_target(target: TargetRef, ctx: &FsmCtx<'_>) -> FsmResult<Vec2> {
    let pos = match target {
        TargetRef::Site(id) => ctx.world.site_position(id),
        TargetRef::Item(id) => ctx.world.items.get(id).map(|it| it.pos),
        TargetRef::Agent(id) => ctx.store.is_alive(id).then(|| ctx.store.position[id.index()]),
        TargetRef::Spot(p) => Some(p),
    };
    pos.ok_or(FsmError::InvalidTarget(target))
}

/// Nearest living hostile within `radius`.
pub(crate) fn nearest_hostile(agent: AgentId, radius: f32, ctx: &FsmCtx<'_>) -> Option<(AgentId, f32)> {
    let i = agent.index();
    ctx.store.nearest_living(hostile_kind(ctx.store.kind[i]), ctx.store.position[i], radius, None)
}

// ── Weapons ───────────────────────────────────────────────────────────────────

/// The definition the agent fights with (fists when unarmed).
pub(crate) fn wielded<'a>(agent: AgentId, ctx: &FsmCtx<'a>) -> FsmResult<&'a WeaponDef> {
    let catalog = ctx.catalog;
    let def = ctx.store.inventory[agent.index()].equipped_weapon().map(|w| &w.def);
    catalog.wielded(def).map_err(|e| FsmError::Weapon(e.to_string()))
}

#[inline]
pub(crate) fn is_armed(agent: AgentId, ctx: &FsmCtx<'_>) -> bool {
    ctx.store.inventory[agent.index()].equipped_weapon().is_some()
}

pub(crate) fn reach(agent: AgentId, ctx: &FsmCtx<'_>) -> FsmResult<f32> {
    Ok(ctx.cfg.combat.reach(wielded(agent, ctx)?))
}

/// One engagement tick against `target`.  Fired shots queue their damage.
pub(crate) fn engage(
    agent: AgentId,
    target: Option<AgentId>,
    flee_below: f32,
    ctx: &mut FsmCtx<'_>,
) -> FsmResult<EngagementStep> {
    let i = agent.index();
    let weapon = wielded(agent, ctx)?;
    let shooter = ctx.store.position[i];
    let target = target
        .filter(|t| ctx.store.is_alive(*t))
        .map(|t| (t, ctx.store.position[t.index()]));
    let obstacles: Vec<&Obstacle> = match target {
        Some((_, p)) => ctx.world.obstacles.near_segment(shooter, p, FIRE_LINE_MARGIN),
        None => Vec::new(),
    };
    let input = EngageInput {
        shooter,
        target,
        weapon,
        obstacles: &obstacles,
        health_fraction: ctx.store.vitals[i].health_fraction(),
        flee_below,
        dt: ctx.dt,
    };
    let outcome = ctx.store.engagement[i].tick(&input, &mut ctx.store.aim[i], &mut *ctx.rng, &ctx.cfg.combat);

    if let EngagementStep::Fired { target, outcome } = outcome {
        debug!(shooter = %agent, %target, hit = outcome.hit, accuracy = outcome.effective_accuracy, cover = outcome.cover, "shot");
        if outcome.hit {
            ctx.effects.damage.push(Damage { source: agent, target, amount: outcome.damage });
        }
        ctx.effects.events.push(FsmEvent::Shot {
            shooter: agent,
            target,
            hit: outcome.hit,
            damage: outcome.damage,
            cover: outcome.cover,
        });
    }
    Ok(outcome)
}

/// Best standable cover spot near `agent` against a threat at `threat`,
/// optionally limited to spots within `max_threat_dist` of the threat.
pub(crate) fn cover_spot(agent: AgentId, threat: Vec2, max_threat_dist: Option<f32>, ctx: &FsmCtx<'_>) -> Option<Vec2> {
    let pos = ctx.store.position[agent.index()];
    let obstacles = ctx.world.obstacles.within_radius(pos, ctx.cfg.cover_search_radius);
    if obstacles.is_empty() {
        return None;
    }
    let world = &*ctx.world;
    find_cover_positions_where(pos, threat, &obstacles, ctx.cfg.cover_candidates, |p| world.is_passable_at(p))
        .into_iter()
        .find(|c| c.cover > 0.0 && max_threat_dist.is_none_or(|d| c.pos.distance(threat) <= d))
        .map(|c| c.pos)
}

// ── Intent lifecycle ──────────────────────────────────────────────────────────

/// Where a task-bearing state is in its intent this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum TaskStep {
    Travelling,
    Dwelling,
    /// Committed this tick; work starts next tick.
    JustCommitted,
    Working,
    Interrupted,
}

/// Start a fresh intent with the configured cancel policy.
pub(crate) fn begin_intent(agent: AgentId, target: TargetRef, task: TaskKind, ctx: &mut FsmCtx<'_>) {
    let i = agent.index();
    ctx.store.intent[i] = Some(ctx.intents.begin_default(target, task));
    ctx.store.movement[i].clear();
}

/// Walk toward `goal` while the intent is moving, then dwell, then commit.
///
/// Work side effects are the caller's business and only allowed on
/// [`TaskStep::Working`].
pub(crate) fn drive_intent(agent: AgentId, goal: Vec2, ctx: &mut FsmCtx<'_>) -> FsmResult<TaskStep> {
    let i = agent.index();
    let state = ctx.store.state(agent);
    let phase = ctx.store.intent[i].as_ref().map(|it| it.phase).ok_or(FsmError::MissingIntent(state))?;

    match phase {
        IntentPhase::Interrupted => return Ok(TaskStep::Interrupted),
        IntentPhase::Committed => return Ok(TaskStep::Working),
        IntentPhase::Moving => {
            let radius = ctx.intents.config.task_radius * ARRIVAL_SLACK;
            move_toward(agent, goal, radius, ctx)?;
        }
        IntentPhase::Deciding => {}
    }

    let distance = ctx.store.position[i].distance(goal);
    let intents = ctx.intents;
    let intent = ctx.store.intent[i].as_mut().ok_or(FsmError::MissingIntent(state))?;
    let step = match intents.tick(intent, distance, ctx.dt) {
        IntentTick::Moving | IntentTick::LeftRadius => TaskStep::Travelling,
        IntentTick::Arrived | IntentTick::Deciding => TaskStep::Dwelling,
        IntentTick::DwellComplete => {
            intents.commit(intent)?;
            TaskStep::JustCommitted
        }
        IntentTick::Committed => TaskStep::Working,
        IntentTick::Interrupted => TaskStep::Interrupted,
    };
    if matches!(step, TaskStep::Dwelling | TaskStep::JustCommitted) {
        ctx.store.movement[i].clear();
    }
    Ok(step)
}

/// Target of the current intent.
pub(crate) fn intent_target(agent: AgentId, ctx: &FsmCtx<'_>) -> FsmResult<TargetRef> {
    ctx.store.intent[agent.index()]
        .as_ref()
        .map(|it| it.target)
        .ok_or(FsmError::MissingIntent(ctx.store.state(agent)))
}

/// Destroy the intent and release whatever it held.
pub(crate) fn release_task(agent: AgentId, ctx: &mut FsmCtx<'_>) {
    let i = agent.index();
    if let Some(intent) = ctx.store.intent[i].take() {
        match intent.target {
            TargetRef::Site(id) => ctx.world.sites.release(id, agent),
            TargetRef::Item(id) => {
                ctx.claims.release(id, agent);
            }
            TargetRef::Agent(_) | TargetRef::Spot(_) => {}
        }
    }
    ctx.store.movement[i].clear();
}

/// Exit hook shared by most states.
pub(crate) fn exit_common(agent: AgentId, ctx: &mut FsmCtx<'_>) {
    release_task(agent, ctx);
    ctx.store.engagement[agent.index()].reset();
}

// ── Death ─────────────────────────────────────────────────────────────────────

/// Entry hook of `dead`: drop the weapon, let go of everything.
pub(crate) fn enter_dead(agent: AgentId, _: Option<TargetRef>, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
    let i = agent.index();
    let pos = ctx.store.position[i];
    if let Some(weapon) = ctx.store.inventory[i].take(Slot::Weapon) {
        ctx.world.items.drop_item(ItemKind::Weapon(weapon.def), pos);
    }
    ctx.claims.release_all_for(agent);
    ctx.world.sites.release_all_for(agent);
    ctx.store.aim[i].clear();
    ctx.store.engagement[i].reset();
    ctx.store.movement[i].clear();
    ctx.store.drafted[i] = false;
    ctx.store.draft_target[i] = None;
    ctx.store.move_order[i] = None;
    info!(%agent, kind = ctx.store.kind[i].name(), position = %pos, "agent died");
    ctx.effects.events.push(FsmEvent::Died { agent });
    Ok(())
}

pub(crate) fn dead_trigger(agent: AgentId, ctx: &FsmCtx<'_>) -> bool {
    ctx.store.vitals[agent.index()].is_dead()
}
