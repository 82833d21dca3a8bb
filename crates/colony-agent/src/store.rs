//! Core agent storage: `AgentStore` (SoA data) and `AgentRngs` (per-agent RNG).
//!
//! # Why two structs?
//!
//! An agent's FSM tick needs `&mut AgentRng` for its own draws while it reads
//! other agents' positions and health out of the store.  Keeping the RNGs in
//! a separate `AgentRngs` lets the tick loop hold `&mut rngs.inner[i]` next
//! to a borrow of `AgentStore` without fighting the borrow checker.

use colony_combat::{AimState, Engagement};
use colony_core::{AgentId, AgentRng, Vec2};
use colony_intent::IntentRecord;
use colony_mobility::MovementState;

use crate::inventory::Inventory;
use crate::snapshot::AgentSnapshot;
use crate::state::{AgentKind, StateId};
use crate::vitals::Vitals;
use crate::{AgentError, AgentResult};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG state, separated from [`AgentStore`].
pub struct AgentRngs {
    pub inner: Vec<AgentRng>,
    seed:      u64,
}

impl AgentRngs {
    /// Allocate and seed `count` per-agent RNGs from `global_seed`.
    pub(crate) fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32)
            .map(|i| AgentRng::new(global_seed, AgentId(i)))
            .collect();
        Self { inner, seed: global_seed }
    }

    /// Seed the RNG for a newly appended agent.
    pub fn push(&mut self, agent: AgentId) {
        debug_assert_eq!(agent.index(), self.inner.len());
        self.inner.push(AgentRng::new(self.seed, agent));
    }

    /// Mutable reference to one agent's RNG.
    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        &mut self.inner[agent.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── StateScratch ──────────────────────────────────────────────────────────────

/// Per-state working memory, reset on every state change.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateScratch {
    /// General-purpose timer (eating, chatting, wander pauses).
    pub timer:   f32,
    /// A chosen spot (cover position, wander point, sleep spot).
    pub spot:    Option<Vec2>,
    /// The agent this state is about (combat target, chat partner).
    pub partner: Option<AgentId>,
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Structure-of-Arrays storage for all agent state.
///
/// Every `Vec` field has exactly `count` elements; the `AgentId` value is the
/// index into all of them:
///
/// ```ignore
/// let pos = store.position[agent.index()];
/// ```
///
/// Agents are never removed.  Dead agents stay in the store in the `Dead`
/// state so ids remain stable for the whole run.
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Identity and placement ────────────────────────────────────────────
    pub kind:     Vec<AgentKind>,
    pub position: Vec<Vec2>,

    // ── FSM ───────────────────────────────────────────────────────────────
    /// Current state.  Written only through [`AgentStore::set_state`].
    state:                  Vec<StateId>,
    /// Elapsed sim seconds at which the current state was entered.
    pub state_entered_secs: Vec<f64>,
    pub scratch:            Vec<StateScratch>,
    /// The task wrapper of the current task-bearing state, if any.
    pub intent:             Vec<Option<IntentRecord>>,

    // ── Body ──────────────────────────────────────────────────────────────
    pub vitals:     Vec<Vitals>,
    pub inventory:  Vec<Inventory>,
    /// Work rate multiplier applied to every work deduction.
    pub work_speed: Vec<f32>,

    // ── Combat ────────────────────────────────────────────────────────────
    pub aim:        Vec<AimState>,
    pub engagement: Vec<Engagement>,

    // ── Orders ────────────────────────────────────────────────────────────
    pub drafted:      Vec<bool>,
    /// Where a drafted colonist was told to stand.
    pub draft_target: Vec<Option<Vec2>>,
    /// Player move order for an undrafted colonist.
    pub move_order:   Vec<Option<Vec2>>,

    // ── Movement ──────────────────────────────────────────────────────────
    pub movement: Vec<MovementState>,
}

impl AgentStore {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            count:              0,
            kind:               Vec::with_capacity(capacity),
            position:           Vec::with_capacity(capacity),
            state:              Vec::with_capacity(capacity),
            state_entered_secs: Vec::with_capacity(capacity),
            scratch:            Vec::with_capacity(capacity),
            intent:             Vec::with_capacity(capacity),
            vitals:             Vec::with_capacity(capacity),
            inventory:          Vec::with_capacity(capacity),
            work_speed:         Vec::with_capacity(capacity),
            aim:                Vec::with_capacity(capacity),
            engagement:         Vec::with_capacity(capacity),
            drafted:            Vec::with_capacity(capacity),
            draft_target:       Vec::with_capacity(capacity),
            move_order:         Vec::with_capacity(capacity),
            movement:           Vec::with_capacity(capacity),
        }
    }

    /// Append one agent in `kind`'s initial state; returns its id.
    pub fn push(&mut self, spawn: crate::AgentSpawn) -> AgentId {
        let id = AgentId(self.count as u32);
        let mut inventory = Inventory::default();
        if let Some(weapon) = spawn.weapon {
            inventory.equip(weapon);
        }
        self.kind.push(spawn.kind);
        self.position.push(spawn.position);
        self.state.push(spawn.kind.initial_state());
        self.state_entered_secs.push(spawn.spawned_at_secs);
        self.scratch.push(StateScratch::default());
        self.intent.push(None);
        self.vitals.push(Vitals::new(spawn.max_health));
        self.inventory.push(inventory);
        self.work_speed.push(spawn.work_speed);
        self.aim.push(AimState::default());
        self.engagement.push(Engagement::default());
        self.drafted.push(false);
        self.draft_target.push(None);
        self.move_order.push(None);
        self.movement.push(MovementState::default());
        self.count += 1;
        id
    }

    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        agent.index() < self.count
    }

    pub fn check(&self, agent: AgentId) -> AgentResult<()> {
        if self.contains(agent) { Ok(()) } else { Err(AgentError::UnknownAgent(agent)) }
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    // ── State tag ─────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self, agent: AgentId) -> StateId {
        self.state[agent.index()]
    }

    /// Write a new state tag.  Refuses states outside the kind's declared
    /// set; on success resets the per-state scratch and entry time.
    pub fn set_state(&mut self, agent: AgentId, state: StateId, now_secs: f64) -> AgentResult<()> {
        self.check(agent)?;
        let i = agent.index();
        let kind = self.kind[i];
        if !kind.declares(state) {
            return Err(AgentError::UndeclaredState { agent, kind, state });
        }
        self.state[i] = state;
        self.state_entered_secs[i] = now_secs;
        self.scratch[i] = StateScratch::default();
        Ok(())
    }

    /// Seconds spent in the current state.
    #[inline]
    pub fn time_in_state(&self, agent: AgentId, now_secs: f64) -> f64 {
        (now_secs - self.state_entered_secs[agent.index()]).max(0.0)
    }

    // ── Liveness ──────────────────────────────────────────────────────────

    /// Alive means health above zero and not yet in the `Dead` state.
    #[inline]
    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.contains(agent)
            && self.state[agent.index()] != StateId::Dead
            && !self.vitals[agent.index()].is_dead()
    }

    /// Living agents of `kind`, ascending id.
    pub fn living(&self, kind: AgentKind) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_ids()
            .filter(move |a| self.kind[a.index()] == kind && self.is_alive(*a))
    }

    /// Nearest living agent of `kind` within `radius` of `from`, excluding
    /// `exclude`.  Ties go to the lower id.
    pub fn nearest_living(
        &self,
        kind: AgentKind,
        from: Vec2,
        radius: f32,
        exclude: Option<AgentId>,
    ) -> Option<(AgentId, f32)> {
        self.living(kind)
            .filter(|a| Some(*a) != exclude)
            .map(|a| (a, self.position[a.index()].distance(from)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|x, y| x.1.total_cmp(&y.1).then(x.0.cmp(&y.0)))
    }

    // ── Snapshot ──────────────────────────────────────────────────────────

    pub fn snapshot(&self, agent: AgentId) -> AgentResult<AgentSnapshot> {
        self.check(agent)?;
        let i = agent.index();
        let weapon = self.inventory[i].equipped_weapon();
        Ok(AgentSnapshot {
            id:              agent,
            kind:            self.kind[i],
            state:           self.state[i],
            position:        self.position[i],
            health:          self.vitals[i].health,
            is_aiming:       self.aim[i].is_aiming,
            aim_angle:       self.aim[i].aim_angle,
            is_drafted:      self.drafted[i],
            equipped_weapon: weapon.map(|w| w.id),
            weapon_def:      weapon.map(|w| w.def.clone()),
            intent_phase:    self.intent[i].as_ref().map(|it| it.phase),
        })
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.agent_ids().filter_map(|a| self.snapshot(a).ok()).collect()
    }
}
