//! The state table: one [`StateDef`] per declared state, in declaration
//! order.
//!
//! A state is a tag ([`StateId`]) plus a row of function pointers.  There is
//! no per-state object and no virtual dispatch; the compiler checks every
//! `match` over `StateId`, and the table constructor checks that the rows
//! line up with the kind's declared set.

use std::cmp::Reverse;

use colony_agent::{AgentKind, StateId};
use colony_core::{AgentId, TargetRef, TaskKind};
use colony_intent::InterruptReason;

use crate::{FsmCtx, FsmResult};

/// Entry condition checked during preemption.
pub type Trigger = fn(AgentId, &FsmCtx<'_>) -> bool;
/// Per-agent priority override (the equipment bonus).
pub type PriorityFn = fn(AgentId, &FsmCtx<'_>) -> u8;
pub type EnterFn = fn(AgentId, Option<TargetRef>, &mut FsmCtx<'_>) -> FsmResult<()>;
pub type TickFn = fn(AgentId, &mut FsmCtx<'_>) -> FsmResult<Flow>;
pub type ExitFn = fn(AgentId, &mut FsmCtx<'_>);

/// What a body asks for at the end of its tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Flow {
    Stay,
    Switch(StateId),
    /// Switch and hand the new state its target.
    Begin(StateId, TargetRef),
}

/// Total order over states: priority first, then earlier declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rank {
    pub priority: u8,
    pub order:    Reverse<usize>,
}

fn enter_nothing(_: AgentId, _: Option<TargetRef>, _: &mut FsmCtx<'_>) -> FsmResult<()> {
    Ok(())
}

fn exit_nothing(_: AgentId, _: &mut FsmCtx<'_>) {}

/// One row of the state table.
#[derive(Copy, Clone)]
pub struct StateDef {
    pub id:            StateId,
    pub priority:      u8,
    pub interruptible: bool,
    /// `Some` for policy-exempt triggered states; the reason recorded on the
    /// interrupted intent.
    pub exempt:        Option<InterruptReason>,
    /// `Some` for task-bearing states.
    pub task:          Option<TaskKind>,
    pub trigger:       Option<Trigger>,
    pub priority_fn:   Option<PriorityFn>,
    pub on_enter:      EnterFn,
    pub on_tick:       TickFn,
    pub on_exit:       ExitFn,
}

impl StateDef {
    /// An interruptible, untriggered state with no-op hooks.
    pub fn new(id: StateId, priority: u8, on_tick: TickFn) -> Self {
        Self {
            id,
            priority,
            interruptible: true,
            exempt: None,
            task: None,
            trigger: None,
            priority_fn: None,
            on_enter: enter_nothing,
            on_tick,
            on_exit: exit_nothing,
        }
    }

    pub fn uninterruptible(mut self) -> Self {
        self.interruptible = false;
        self
    }

    pub fn exempt(mut self, reason: InterruptReason) -> Self {
        self.exempt = Some(reason);
        self
    }

    pub fn task(mut self, task: TaskKind) -> Self {
        self.task = Some(task);
        self
    }

    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn priority_fn(mut self, f: PriorityFn) -> Self {
        self.priority_fn = Some(f);
        self
    }

    pub fn on_enter(mut self, f: EnterFn) -> Self {
        self.on_enter = f;
        self
    }

    pub fn on_exit(mut self, f: ExitFn) -> Self {
        self.on_exit = f;
        self
    }
}

impl std::fmt::Debug for StateDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDef")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .field("interruptible", &self.interruptible)
            .field("exempt", &self.exempt)
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}

/// All rows for one agent kind.
#[derive(Debug)]
pub struct StateTable {
    kind: AgentKind,
    defs: Vec<StateDef>,
}

impl StateTable {
    /// Build a table.  Panics if the rows are not exactly the kind's
    /// declared states in declaration order; a mismatch is a programming
    /// error caught by the first test that builds the table.
    pub fn new(kind: AgentKind, defs: Vec<StateDef>) -> Self {
        let ids: Vec<StateId> = defs.iter().map(|d| d.id).collect();
        assert_eq!(ids.as_slice(), kind.declared_states(), "state table out of line with {kind:?} declarations");
        Self { kind, defs }
    }

    #[inline]
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    #[inline]
    pub fn get(&self, state: StateId) -> Option<&StateDef> {
        self.defs.iter().find(|d| d.id == state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateDef> {
        self.defs.iter()
    }

    /// The static priority table: `(state, base priority)` in declaration
    /// order.
    pub fn priorities(&self) -> impl Iterator<Item = (StateId, u8)> + '_ {
        self.defs.iter().map(|d| (d.id, d.priority))
    }

    /// Priority of `def` for this agent right now.
    #[inline]
    pub fn effective_priority(def: &StateDef, agent: AgentId, ctx: &FsmCtx<'_>) -> u8 {
        def.priority_fn.map_or(def.priority, |f| f(agent, ctx))
    }

    pub fn rank(&self, state: StateId, agent: AgentId, ctx: &FsmCtx<'_>) -> Option<Rank> {
        let order = self.defs.iter().position(|d| d.id == state)?;
        let def = &self.defs[order];
        Some(Rank { priority: Self::effective_priority(def, agent, ctx), order: Reverse(order) })
    }

    /// Every row with its rank for `agent`, best first.
    pub fn ranked(&self, agent: AgentId, ctx: &FsmCtx<'_>) -> Vec<(Rank, &StateDef)> {
        let mut rows: Vec<(Rank, &StateDef)> = self
            .defs
            .iter()
            .enumerate()
            .map(|(order, def)| {
                (Rank { priority: Self::effective_priority(def, agent, ctx), order: Reverse(order) }, def)
            })
            .collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        rows
    }
}
