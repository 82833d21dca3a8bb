//! Colonist states.
//!
//! | State       | Priority | Entered by                          | Intent |
//! |-------------|----------|-------------------------------------|--------|
//! | `dead`      | 100      | health ≤ 0 (exempt)                 |        |
//! | `flee`      | 100      | wounded, enemy near (exempt)        |        |
//! | `drafted`   | 99       | draft flag (exempt)                 |        |
//! | `combat`    | 85       | armed, enemy in reach               |        |
//! | `eat`       | 65       | hungry, table and meal available    | eat    |
//! | `sleep`     | 60       | tired                               | sleep  |
//! | `equipment` | 45 (+30) | holds a weapon claim                | equip  |
//! | `build`     | 45       | `seek_task`                         | build  |
//! | `mine`      | 42       | `seek_task`                         | mine   |
//! | `chop`      | 40       | `seek_task`                         | chop   |
//! | `move`      | 25       | move order                          |        |
//! | `socialize` | 20       | `seek_task`, by chance              | chat   |
//! | `seek_task` | 15       | fallback                            |        |
//! | `idle`      | 10       | declared only, back to `seek_task`  |        |

use tracing::debug;

use colony_agent::{AgentKind, StateId};
use colony_combat::EngagementStep;
use colony_core::{AgentId, TargetRef, TaskKind, Vec2};
use colony_equip::{equipment_priority, pick_up_and_equip};
use colony_intent::InterruptReason;
use colony_mobility::MoveOutcome;
use colony_world::SiteKind;

use crate::actions::{
    begin_intent, cover_spot, dead_trigger, drive_intent, engage, enter_dead, exit_common, intent_target,
    is_armed, move_toward, nearest_hostile, reach, resolve_target, TaskStep,
};
use crate::{Flow, FsmCtx, FsmError, FsmEvent, FsmResult, StateDef, StateTable};

/// Arrival radius for plain moves and cover spots.
const SPOT_RADIUS: f32 = 0.3;
/// Distance a colonist runs when there is no cover to run to.
const BOLT_DISTANCE: f32 = 6.0;

pub fn table() -> StateTable {
    StateTable::new(AgentKind::Colonist, vec![
        StateDef::new(StateId::Dead, 100, stay)
            .uninterruptible()
            .exempt(InterruptReason::Death)
            .trigger(dead_trigger)
            .on_enter(enter_dead),
        StateDef::new(StateId::Flee, 100, flee_tick)
            .exempt(InterruptReason::Flee)
            .trigger(flee_trigger)
            .on_enter(flee_enter)
            .on_exit(exit_common),
        StateDef::new(StateId::Drafted, 99, drafted_tick)
            .exempt(InterruptReason::Drafted)
            .trigger(|a, ctx| ctx.store.drafted[a.index()])
            .on_exit(drafted_exit),
        StateDef::new(StateId::Combat, 85, combat_tick)
            .trigger(combat_trigger)
            .on_enter(combat_enter)
            .on_exit(exit_common),
        StateDef::new(StateId::Eat, 65, eat_tick)
            .task(TaskKind::Eat)
            .trigger(eat_trigger)
            .on_enter(eat_enter)
            .on_exit(exit_common),
        StateDef::new(StateId::Sleep, 60, sleep_tick)
            .task(TaskKind::Sleep)
            .trigger(|a, ctx| ctx.store.vitals[a.index()].fatigue >= ctx.cfg.sleep_threshold)
            .on_enter(sleep_enter)
            .on_exit(exit_common),
        StateDef::new(StateId::Equipment, 45, equipment_tick)
            .task(TaskKind::Equip)
            .trigger(|a, ctx| ctx.claims.claim_of(a).is_some())
            .priority_fn(|a, ctx| equipment_priority(is_armed(a, ctx), &ctx.cfg.equip))
            .on_enter(equipment_enter)
            .on_exit(exit_common),
        StateDef::new(StateId::Build, 45, work_tick)
            .task(TaskKind::Build)
            .on_enter(|a, t, ctx| work_enter(a, t, TaskKind::Build, ctx))
            .on_exit(exit_common),
        StateDef::new(StateId::Mine, 42, work_tick)
            .task(TaskKind::Mine)
            .on_enter(|a, t, ctx| work_enter(a, t, TaskKind::Mine, ctx))
            .on_exit(exit_common),
        StateDef::new(StateId::Chop, 40, work_tick)
            .task(TaskKind::Chop)
            .on_enter(|a, t, ctx| work_enter(a, t, TaskKind::Chop, ctx))
            .on_exit(exit_common),
        StateDef::new(StateId::Move, 25, move_tick)
            .trigger(|a, ctx| ctx.store.move_order[a.index()].is_some() && !ctx.store.drafted[a.index()])
            .on_exit(move_exit),
        StateDef::new(StateId::Socialize, 20, socialize_tick)
            .task(TaskKind::Socialize)
            .on_enter(socialize_enter)
            .on_exit(exit_common),
        StateDef::new(StateId::SeekTask, 15, seek_task_tick).on_exit(exit_common),
        StateDef::new(StateId::Idle, 10, idle_tick).on_exit(exit_common),
    ])
}

fn stay(_: AgentId, _: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    Ok(Flow::Stay)
}

fn wounded(agent: AgentId, ctx: &FsmCtx<'_>) -> bool {
    ctx.store.vitals[agent.index()].health_fraction() < ctx.cfg.flee_health_fraction
}

// ── flee ──────────────────────────────────────────────────────────────────────

fn flee_trigger(agent: AgentId, ctx: &FsmCtx<'_>) -> bool {
    !ctx.store.drafted[agent.index()]
        && wounded(agent, ctx)
        && nearest_hostile(agent, ctx.cfg.threat_radius, ctx).is_some()
}

/// Cover from `threat`, or a straight run away from it.
fn flee_spot(agent: AgentId, threat: Vec2, ctx: &FsmCtx<'_>) -> Vec2 {
    cover_spot(agent, threat, None, ctx).unwrap_or_else(|| {
        let pos = ctx.store.position[agent.index()];
        let away = (pos - threat).normalized();
        ctx.world.grid.clamp(pos + away * BOLT_DISTANCE)
    })
}

fn flee_enter(agent: AgentId, _: Option<TargetRef>, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
    if let Some((threat, _)) = nearest_hostile(agent, ctx.cfg.flee_clear_radius, ctx) {
        let spot = flee_spot(agent, ctx.store.position[threat.index()], ctx);
        let i = agent.index();
        ctx.store.scratch[i].spot = Some(spot);
        ctx.store.scratch[i].partner = Some(threat);
        ctx.store.aim[i].clear();
    }
    Ok(())
}

fn flee_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    let Some((threat, _)) = nearest_hostile(agent, ctx.cfg.flee_clear_radius, ctx) else {
        return Ok(Flow::Switch(StateId::SeekTask));
    };
    if !wounded(agent, ctx) {
        return Ok(Flow::Switch(StateId::SeekTask));
    }
    if ctx.store.scratch[i].partner != Some(threat) || ctx.store.scratch[i].spot.is_none() {
        let spot = flee_spot(agent, ctx.store.position[threat.index()], ctx);
        ctx.store.scratch[i].spot = Some(spot);
        ctx.store.scratch[i].partner = Some(threat);
    }
    if let Some(spot) = ctx.store.scratch[i].spot {
        match move_toward(agent, spot, SPOT_RADIUS, ctx) {
            Ok(_) => {}
            // Boxed in: hold still and look again next tick.
            Err(FsmError::Unreachable { .. }) => ctx.store.scratch[i].spot = None,
            Err(e) => return Err(e),
        }
    }
    Ok(Flow::Stay)
}

// ── drafted ───────────────────────────────────────────────────────────────────

fn drafted_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    if !ctx.store.drafted[i] {
        return Ok(Flow::Switch(StateId::SeekTask));
    }
    if let Some(goal) = ctx.store.draft_target[i] {
        match move_toward(agent, goal, SPOT_RADIUS, ctx) {
            Ok(MoveOutcome::Arrived) => ctx.store.draft_target[i] = None,
            Ok(_) => {}
            Err(FsmError::Unreachable { ticks }) => {
                debug!(%agent, ticks, "draft position unreachable, holding");
                ctx.store.draft_target[i] = None;
            }
            Err(e) => return Err(e),
        }
    }
    let target = nearest_hostile(agent, reach(agent, ctx)?, ctx).map(|(t, _)| t);
    engage(agent, target, 0.0, ctx)?;
    Ok(Flow::Stay)
}

fn drafted_exit(agent: AgentId, ctx: &mut FsmCtx<'_>) {
    ctx.store.draft_target[agent.index()] = None;
    exit_common(agent, ctx);
}

// ── combat ────────────────────────────────────────────────────────────────────

fn combat_trigger(agent: AgentId, ctx: &FsmCtx<'_>) -> bool {
    if ctx.store.drafted[agent.index()] || !is_armed(agent, ctx) || wounded(agent, ctx) {
        return false;
    }
    reach(agent, ctx).is_ok_and(|r| nearest_hostile(agent, r, ctx).is_some())
}

fn combat_enter(agent: AgentId, _: Option<TargetRef>, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
    let r = reach(agent, ctx)?;
    let Some((enemy, _)) = nearest_hostile(agent, r, ctx) else {
        return Err(FsmError::NoTarget(StateId::Combat));
    };
    let spot = cover_spot(agent, ctx.store.position[enemy.index()], Some(r), ctx);
    let i = agent.index();
    ctx.store.scratch[i].partner = Some(enemy);
    ctx.store.scratch[i].spot = spot;
    Ok(())
}

fn combat_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    let r = reach(agent, ctx)?;
    let Some((enemy, _)) = nearest_hostile(agent, r, ctx) else {
        return Ok(Flow::Switch(StateId::SeekTask));
    };
    ctx.store.scratch[i].partner = Some(enemy);

    if let Some(spot) = ctx.store.scratch[i].spot {
        match move_toward(agent, spot, SPOT_RADIUS, ctx) {
            Ok(MoveOutcome::Arrived) => ctx.store.scratch[i].spot = None,
            Ok(_) => return Ok(Flow::Stay),
            Err(FsmError::Unreachable { .. }) => ctx.store.scratch[i].spot = None,
            Err(e) => return Err(e),
        }
    }

    match engage(agent, Some(enemy), ctx.cfg.flee_health_fraction, ctx)? {
        EngagementStep::Flee => Ok(Flow::Switch(StateId::Flee)),
        _ => Ok(Flow::Stay),
    }
}

// ── eat ───────────────────────────────────────────────────────────────────────

fn eat_trigger(agent: AgentId, ctx: &FsmCtx<'_>) -> bool {
    ctx.store.vitals[agent.index()].hunger >= ctx.cfg.eat_threshold
        && ctx.world.stockpile.meals > 0
        && ctx.world.sites.iter().any(|s| s.kind == SiteKind::Table)
}

fn eat_enter(agent: AgentId, _: Option<TargetRef>, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
    let pos = ctx.store.position[agent.index()];
    let table = ctx
        .world
        .sites
        .nearest(pos, |s| s.kind == SiteKind::Table)
        .map(|s| s.id)
        .ok_or(FsmError::NoTarget(StateId::Eat))?;
    begin_intent(agent, TargetRef::Site(table), TaskKind::Eat, ctx);
    Ok(())
}

fn eat_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    let goal = resolve_target(intent_target(agent, ctx)?, ctx)?;
    match drive_intent(agent, goal, ctx)? {
        TaskStep::Interrupted => return Ok(Flow::Switch(StateId::SeekTask)),
        TaskStep::Working => {}
        _ => return Ok(Flow::Stay),
    }
    ctx.store.scratch[i].timer += ctx.dt;
    if ctx.store.scratch[i].timer < ctx.cfg.eat_duration_secs {
        return Ok(Flow::Stay);
    }
    if ctx.world.stockpile.take_meal() {
        ctx.store.vitals[i].add_needs(-ctx.cfg.meal_value, 0.0);
        debug!(%agent, hunger = ctx.store.vitals[i].hunger, "meal eaten");
    }
    Ok(Flow::Switch(StateId::SeekTask))
}

// ── sleep ─────────────────────────────────────────────────────────────────────

fn sleep_enter(agent: AgentId, _: Option<TargetRef>, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
    let pos = ctx.store.position[agent.index()];
    let bed = ctx
        .world
        .sites
        .nearest(pos, |s| s.kind == SiteKind::Bed && s.is_free_for(agent))
        .map(|s| s.id);
    let target = match bed {
        Some(id) => {
            ctx.world.sites.reserve(id, agent).map_err(|e| FsmError::from_world(e, TargetRef::Site(id)))?;
            TargetRef::Site(id)
        }
        None => TargetRef::Spot(pos),
    };
    begin_intent(agent, target, TaskKind::Sleep, ctx);
    Ok(())
}

fn sleep_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    let target = intent_target(agent, ctx)?;
    let goal = resolve_target(target, ctx)?;
    match drive_intent(agent, goal, ctx)? {
        TaskStep::Interrupted => return Ok(Flow::Switch(StateId::SeekTask)),
        TaskStep::Working => {}
        _ => return Ok(Flow::Stay),
    }
    let rate = match target {
        TargetRef::Site(_) => ctx.cfg.bed_rest_rate,
        _ => ctx.cfg.ground_rest_rate,
    };
    let rest = match ctx.store.intent[i].as_ref() {
        Some(intent) => ctx.intents.work_progress(intent, rate, ctx.dt, 1.0),
        None => 0.0,
    };
    ctx.store.vitals[i].add_needs(0.0, -rest);
    if ctx.store.vitals[i].fatigue <= ctx.cfg.wake_fatigue {
        debug!(%agent, "woke up");
        return Ok(Flow::Switch(StateId::SeekTask));
    }
    Ok(Flow::Stay)
}

// ── equipment ─────────────────────────────────────────────────────────────────

fn equipment_enter(agent: AgentId, _: Option<TargetRef>, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
    let item = ctx.claims.claim_of(agent).ok_or(FsmError::NoTarget(StateId::Equipment))?;
    if !ctx.world.items.contains(item) {
        ctx.claims.forget_item(item);
        return Err(FsmError::InvalidTarget(TargetRef::Item(item)));
    }
    begin_intent(agent, TargetRef::Item(item), TaskKind::Equip, ctx);
    Ok(())
}

fn equipment_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    let target = intent_target(agent, ctx)?;
    let TargetRef::Item(item) = target else {
        return Err(FsmError::InvalidTarget(target));
    };
    let goal = resolve_target(target, ctx)?;
    match drive_intent(agent, goal, ctx)? {
        TaskStep::Interrupted => return Ok(Flow::Switch(StateId::SeekTask)),
        TaskStep::Working => {}
        _ => return Ok(Flow::Stay),
    }
    let pos = ctx.store.position[i];
    let swap = pick_up_and_equip(agent, pos, item, &mut ctx.store.inventory[i], &mut ctx.world.items, &mut *ctx.claims)?;
    ctx.effects.events.push(FsmEvent::Equipped {
        agent,
        item: swap.equipped,
        def: swap.def,
        dropped: swap.dropped,
    });
    Ok(Flow::Switch(StateId::SeekTask))
}

// ── build / mine / chop ───────────────────────────────────────────────────────

/// Enter a site task.  Without a target (a forced state) the work provider
/// is asked for a site of the right kind.
fn work_enter(agent: AgentId, target: Option<TargetRef>, task: TaskKind, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
    let target = match target {
        Some(t) => t,
        None => {
            let pos = ctx.store.position[agent.index()];
            ctx.work
                .find_task_for(agent, pos, ctx.world, ctx.toggles)
                .filter(|d| d.task == task)
                .map(|d| d.target)
                .ok_or(FsmError::NoTarget(ctx.store.state(agent)))?
        }
    };
    let TargetRef::Site(id) = target else {
        return Err(FsmError::InvalidTarget(target));
    };
    let site = ctx.world.sites.get(id).ok_or(FsmError::InvalidTarget(target))?;
    if site.kind.task() != task {
        return Err(FsmError::InvalidTarget(target));
    }
    ctx.world.sites.reserve(id, agent).map_err(|e| FsmError::from_world(e, target))?;
    begin_intent(agent, target, task, ctx);
    Ok(())
}

fn work_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    let target = intent_target(agent, ctx)?;
    let TargetRef::Site(site) = target else {
        return Err(FsmError::InvalidTarget(target));
    };
    let goal = resolve_target(target, ctx)?;
    match drive_intent(agent, goal, ctx)? {
        TaskStep::Interrupted => return Ok(Flow::Switch(StateId::SeekTask)),
        TaskStep::Working => {}
        _ => return Ok(Flow::Stay),
    }

    let amount = match ctx.store.intent[i].as_ref() {
        Some(intent) => {
            let rate = ctx.cfg.work_rate(intent.task);
            ctx.intents.work_progress(intent, rate, ctx.dt, ctx.store.work_speed[i])
        }
        None => return Err(FsmError::MissingIntent(ctx.store.state(agent))),
    };
    let done = ctx.world.sites.apply_work(site, amount).map_err(|e| FsmError::from_world(e, target))?;
    if !done {
        return Ok(Flow::Stay);
    }
    let completion = ctx.world.complete_site(site, ctx.toggles).map_err(|e| FsmError::from_world(e, target))?;
    ctx.effects.events.push(FsmEvent::SiteCompleted { agent, site, completion });
    Ok(Flow::Switch(StateId::SeekTask))
}

// ── move ──────────────────────────────────────────────────────────────────────

fn move_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let Some(goal) = ctx.store.move_order[agent.index()] else {
        return Ok(Flow::Switch(StateId::SeekTask));
    };
    match move_toward(agent, goal, SPOT_RADIUS, ctx)? {
        MoveOutcome::Arrived => Ok(Flow::Switch(StateId::SeekTask)),
        _ => Ok(Flow::Stay),
    }
}

fn move_exit(agent: AgentId, ctx: &mut FsmCtx<'_>) {
    ctx.store.move_order[agent.index()] = None;
    exit_common(agent, ctx);
}

// ── socialize ─────────────────────────────────────────────────────────────────

fn nearest_friend(agent: AgentId, ctx: &FsmCtx<'_>) -> Option<AgentId> {
    let pos = ctx.store.position[agent.index()];
    ctx.store
        .nearest_living(AgentKind::Colonist, pos, f32::INFINITY, Some(agent))
        .map(|(a, _)| a)
}

fn socialize_enter(agent: AgentId, target: Option<TargetRef>, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
    let partner = match target {
        Some(TargetRef::Agent(p)) => p,
        Some(other) => return Err(FsmError::InvalidTarget(other)),
        None => nearest_friend(agent, ctx).ok_or(FsmError::NoTarget(StateId::Socialize))?,
    };
    ctx.store.scratch[agent.index()].partner = Some(partner);
    begin_intent(agent, TargetRef::Agent(partner), TaskKind::Socialize, ctx);
    Ok(())
}

fn socialize_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    let goal = resolve_target(intent_target(agent, ctx)?, ctx)?;
    match drive_intent(agent, goal, ctx)? {
        TaskStep::Interrupted => return Ok(Flow::Switch(StateId::SeekTask)),
        TaskStep::Working => {}
        _ => return Ok(Flow::Stay),
    }
    ctx.store.scratch[i].timer += ctx.dt;
    if ctx.store.scratch[i].timer >= ctx.cfg.socialize_secs {
        return Ok(Flow::Switch(StateId::SeekTask));
    }
    Ok(Flow::Stay)
}

// ── seek_task / idle ──────────────────────────────────────────────────────────

fn state_for(task: TaskKind) -> Option<StateId> {
    match task {
        TaskKind::Chop  => Some(StateId::Chop),
        TaskKind::Mine  => Some(StateId::Mine),
        TaskKind::Build => Some(StateId::Build),
        _ => None,
    }
}

fn seek_task_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    let pos = ctx.store.position[i];
    if let Some(desc) = ctx.work.find_task_for(agent, pos, ctx.world, ctx.toggles) {
        if let Some(state) = state_for(desc.task) {
            debug!(%agent, task = %desc.task, target = %desc.target, "task found");
            return Ok(Flow::Begin(state, desc.target));
        }
    }
    if ctx.rng.chance(ctx.cfg.socialize_chance_per_sec * ctx.dt) {
        if let Some(partner) = nearest_friend(agent, ctx) {
            return Ok(Flow::Begin(StateId::Socialize, TargetRef::Agent(partner)));
        }
    }
    Ok(Flow::Stay)
}

fn idle_tick(agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<Flow> {
    let i = agent.index();
    ctx.store.scratch[i].timer += ctx.dt;
    if ctx.store.scratch[i].timer >= ctx.cfg.idle_secs {
        return Ok(Flow::Switch(StateId::SeekTask));
    }
    Ok(Flow::Stay)
}

