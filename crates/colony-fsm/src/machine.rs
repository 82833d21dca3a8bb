//! The tick algorithm and every state transition.

use tracing::{debug, error, warn};

use colony_agent::{AgentKind, StateId, Vitals};
use colony_core::{AgentId, TargetRef};
use colony_intent::{IntentController, InterruptReason};

use crate::table::{Flow, Rank, StateDef, StateTable};
use crate::{colonist, enemy, Damage, FsmConfig, FsmCtx, FsmError, FsmEvent, FsmResult};

/// Result of a forced state request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ForceOutcome {
    /// The agent is now in the requested state.
    Applied,
    /// The state is not one the agent's kind can be in.
    Undeclared,
    /// The current state ranks at least as high as the requested one.
    Outranked,
    /// The current state or its intent refused the interrupt.
    NotInterruptible,
}

/// Owns both state tables and drives one agent at a time.
#[derive(Debug)]
pub struct AgentFsm {
    pub cfg:     FsmConfig,
    pub intents: IntentController,
    colonist:    StateTable,
    enemy:       StateTable,
}

impl AgentFsm {
    pub fn new(cfg: FsmConfig) -> Self {
        let intents = IntentController::new(cfg.intent.clone());
        Self { cfg, intents, colonist: colonist::table(), enemy: enemy::table() }
    }

    #[inline]
    pub fn table(&self, kind: AgentKind) -> &StateTable {
        match kind {
            AgentKind::Colonist => &self.colonist,
            AgentKind::Enemy    => &self.enemy,
        }
    }

    /// Tick one agent.  Recoverable failures are absorbed here: the agent
    /// drops to its fallback state and a [`FsmEvent::Recovered`] is
    /// recorded.  Only fatal errors come back.
    pub fn tick(&self, agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
        ctx.store.check(agent).map_err(FsmError::from_agent)?;
        match self.tick_inner(agent, ctx) {
            Ok(()) => Ok(()),
            Err(e) if e.is_recoverable() => self.recover(agent, e, ctx),
            Err(e) => {
                error!(%agent, error = %e, "fatal state machine error");
                Err(e)
            }
        }
    }

    fn tick_inner(&self, agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
        let i = agent.index();
        let kind = ctx.store.kind[i];
        let table = self.table(kind);
        let state = ctx.store.state(agent);
        let current = table.get(state).ok_or(FsmError::InvariantViolation { agent, kind, state })?;

        if state == StateId::Dead {
            return Ok(());
        }

        if kind == AgentKind::Colonist {
            let dt = ctx.dt;
            let vitals = &mut ctx.store.vitals[i];
            vitals.add_needs(ctx.cfg.hunger_rate * dt, ctx.cfg.fatigue_rate * dt);
            if vitals.hunger >= Vitals::NEED_MAX {
                ctx.effects.damage.push(Damage {
                    source: agent,
                    target: agent,
                    amount: ctx.cfg.starvation_damage_per_sec * dt,
                });
            }
        }
        if !matches!(state, StateId::Combat | StateId::Drafted | StateId::Attack) {
            ctx.store.aim[i].lose_target(ctx.dt, ctx.cfg.combat.aim_grace_secs);
        }

        // An interrupted intent leaves before its body runs again.
        if ctx.store.intent[i].as_ref().is_some_and(|it| it.is_interrupted()) {
            debug!(%agent, %state, "intent interrupted, leaving state");
            return self.switch(agent, kind.fallback_state(), None, ctx);
        }

        if let Some(next) = self.preemptor(agent, current, ctx)? {
            return self.preempt(agent, next, InterruptReason::CompetingTask, ctx);
        }

        match (current.on_tick)(agent, ctx)? {
            Flow::Stay => Ok(()),
            Flow::Switch(to) => self.switch(agent, to, None, ctx),
            Flow::Begin(to, target) => self.switch(agent, to, Some(target), ctx),
        }
    }

    /// The highest-ranked triggered state that outranks and may preempt
    /// `current`.
    fn preemptor<'t>(&'t self, agent: AgentId, current: &StateDef, ctx: &FsmCtx<'_>) -> FsmResult<Option<&'t StateDef>> {
        let kind = ctx.store.kind[agent.index()];
        let table = self.table(kind);
        let here = self.rank_of(table, current.id, agent, ctx)?;
        for (rank, def) in table.ranked(agent, ctx) {
            if rank <= here {
                break;
            }
            let Some(trigger) = def.trigger else { continue };
            if !trigger(agent, ctx) {
                continue;
            }
            if def.exempt.is_some() || self.yields(agent, current, InterruptReason::CompetingTask, ctx) {
                return Ok(Some(def));
            }
            debug!(%agent, state = %current.id, wanted = %def.id, "preemption refused");
            return Ok(None);
        }
        Ok(None)
    }

    /// Whether `current` lets an ordinary `reason` take the agent away.
    fn yields(&self, agent: AgentId, current: &StateDef, reason: InterruptReason, ctx: &FsmCtx<'_>) -> bool {
        current.interruptible
            && ctx.store.intent[agent.index()].as_ref().is_none_or(|it| it.permits(reason))
    }

    fn rank_of(&self, table: &StateTable, state: StateId, agent: AgentId, ctx: &FsmCtx<'_>) -> FsmResult<Rank> {
        table.rank(state, agent, ctx).ok_or(FsmError::InvariantViolation { agent, kind: table.kind(), state })
    }

    /// Interrupt the running intent on behalf of `next`, then switch.
    fn preempt(&self, agent: AgentId, next: &StateDef, ordinary: InterruptReason, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
        let reason = next.exempt.unwrap_or(ordinary);
        if let Some(intent) = ctx.store.intent[agent.index()].as_mut() {
            ctx.intents.force_interrupt(intent, reason);
        }
        debug!(%agent, to = %next.id, ?reason, "preempted");
        self.switch(agent, next.id, None, ctx)
    }

    /// Exit the current state, write the tag, enter `to`.
    fn switch(&self, agent: AgentId, to: StateId, target: Option<TargetRef>, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
        let kind = ctx.store.kind[agent.index()];
        let table = self.table(kind);
        let from = ctx.store.state(agent);
        let old = table.get(from).ok_or(FsmError::InvariantViolation { agent, kind, state: from })?;
        let new = table.get(to).ok_or(FsmError::InvariantViolation { agent, kind, state: to })?;

        (old.on_exit)(agent, ctx);
        ctx.store.set_state(agent, to, ctx.now).map_err(FsmError::from_agent)?;
        debug!(%agent, %from, %to, "state change");
        ctx.effects.events.push(FsmEvent::StateChanged { agent, from, to });
        (new.on_enter)(agent, target, ctx)
    }

    /// Send the agent to its fallback after a recoverable error.
    fn recover(&self, agent: AgentId, err: FsmError, ctx: &mut FsmCtx<'_>) -> FsmResult<()> {
        let state = ctx.store.state(agent);
        let fallback = ctx.store.kind[agent.index()].fallback_state();
        warn!(%agent, %state, %fallback, error = %err, "state failed, falling back");
        ctx.effects.events.push(FsmEvent::Recovered { agent, state, error: err });
        self.switch(agent, fallback, None, ctx)
    }

    /// Request a state from outside the organic flow (a debug command).
    ///
    /// Same rules as preemption: the requested state must outrank the
    /// current one, and an ordinary request needs an interruptible state
    /// whose intent permits a command interrupt.  If the new state cannot
    /// start, the agent falls back and the error is returned.
    pub fn force_state(&self, agent: AgentId, to: StateId, ctx: &mut FsmCtx<'_>) -> FsmResult<ForceOutcome> {
        ctx.store.check(agent).map_err(FsmError::from_agent)?;
        let kind = ctx.store.kind[agent.index()];
        let table = self.table(kind);
        let Some(next) = table.get(to) else {
            return Ok(ForceOutcome::Undeclared);
        };
        let from = ctx.store.state(agent);
        let current = table.get(from).ok_or(FsmError::InvariantViolation { agent, kind, state: from })?;

        if self.rank_of(table, to, agent, ctx)? <= self.rank_of(table, from, agent, ctx)? {
            return Ok(ForceOutcome::Outranked);
        }
        if next.exempt.is_none() && !self.yields(agent, current, InterruptReason::Command, ctx) {
            return Ok(ForceOutcome::NotInterruptible);
        }
        match self.preempt(agent, next, InterruptReason::Command, ctx) {
            Ok(()) => Ok(ForceOutcome::Applied),
            Err(e) if e.is_recoverable() => {
                self.recover(agent, e.clone(), ctx)?;
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Interrupt the agent's intent on command.  The state leaves on its
    /// next tick.
    pub fn force_interrupt(&self, agent: AgentId, ctx: &mut FsmCtx<'_>) -> FsmResult<bool> {
        ctx.store.check(agent).map_err(FsmError::from_agent)?;
        let Some(intent) = ctx.store.intent[agent.index()].as_mut() else {
            return Ok(false);
        };
        Ok(ctx.intents.force_interrupt(intent, InterruptReason::Command))
    }
}
