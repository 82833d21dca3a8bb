//! The `Sim` struct and its tick loop.

use tracing::{debug, error, info, warn};

use colony_agent::{AgentKind, AgentRngs, AgentSnapshot, AgentStore, StateId};
use colony_combat::WeaponCatalog;
use colony_core::{AgentId, DebugToggles, SimClock, SimConfig, SimRng, Tick};
use colony_equip::{resolve_claims, ClaimTable, Seeker};
use colony_fsm::{AgentFsm, Effects, FsmCtx, FsmError, FsmEvent};
use colony_world::{WorkProvider, World};

use crate::raid::{spawn_raid, RaidConfig};
use crate::{SimError, SimObserver, SimResult, TickSummary};

/// States in which a colonist does not shop for weapons.
const NO_CLAIM_STATES: [StateId; 4] = [StateId::Dead, StateId::Flee, StateId::Drafted, StateId::Combat];

/// The main simulation runner.  Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (tick duration, total ticks, seed, game speed).
    pub config:  SimConfig,
    pub clock:   SimClock,
    /// Agent state (SoA arrays).
    pub agents:  AgentStore,
    /// Per-agent deterministic RNGs, separated for the split-borrow pattern.
    pub rngs:    AgentRngs,
    pub world:   World,
    /// The one contested resource: floor weapons.
    pub claims:  ClaimTable,
    pub catalog: WeaponCatalog,
    pub fsm:     AgentFsm,
    /// Debug toggles, passed into every tick.
    pub toggles: DebugToggles,
    pub raids:   RaidConfig,
    pub(crate) work:           Box<dyn WorkProvider>,
    pub(crate) rng:            SimRng,
    pub(crate) effects:        Effects,
    pub(crate) next_raid_secs: f64,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.  Stops early if the
    /// game is paused, since a paused step makes no progress.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            if !self.step(observer)? {
                warn!(tick = %self.clock.current_tick, "game paused, run stopped");
                break;
            }
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` steps from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Advance one step.  Returns `false` without touching anything when
    /// paused.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        let Some(dt) = self.clock.scaled_dt(self.config.game_speed) else {
            return Ok(false);
        };
        let tick = self.clock.current_tick;
        observer.on_tick_start(tick);

        self.claim_phase();
        let fatal = self.tick_agents(dt);
        self.apply_damage();
        self.release_dead_claims();

        let (mut shots, mut hits) = (0, 0);
        for event in self.effects.events.drain(..) {
            if let FsmEvent::Shot { hit, .. } = event {
                shots += 1;
                hits += usize::from(hit);
            }
            observer.on_event(tick, &event);
        }

        let raiders = self.maybe_raid(dt);
        if !raiders.is_empty() {
            observer.on_raid(tick, &raiders);
        }

        self.clock.advance(dt);
        let summary = TickSummary {
            tick,
            sim_secs: self.clock.elapsed_secs,
            colonists_alive: self.agents.living(AgentKind::Colonist).count(),
            enemies_alive: self.agents.living(AgentKind::Enemy).count(),
            shots,
            hits,
        };
        observer.on_tick_end(tick, &summary);
        if self.config.output_interval_ticks > 0 && tick.0.is_multiple_of(self.config.output_interval_ticks) {
            observer.on_snapshot(tick, &self.agents);
        }

        match fatal {
            Some(e) => Err(SimError::Invariant(e)),
            None => Ok(true),
        }
    }

    /// Read-only view of every agent.
    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents.snapshots()
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    // ── Phases ────────────────────────────────────────────────────────────

    /// Colonists looking for a better weapon bid for floor items.  All bids
    /// are settled here, before any agent ticks, so two agents never win
    /// the same item.
    fn claim_phase(&mut self) {
        let agents = &self.agents;
        let claims = &self.claims;
        let catalog = &self.catalog;
        let seekers: Vec<Seeker<'_>> = agents
            .living(AgentKind::Colonist)
            .filter(|&a| {
                !agents.drafted[a.index()]
                    && claims.claim_of(a).is_none()
                    && !NO_CLAIM_STATES.contains(&agents.state(a))
            })
            .map(|a| Seeker {
                agent:   a,
                pos:     agents.position[a.index()],
                current: agents.inventory[a.index()].equipped_weapon().and_then(|w| catalog.get(&w.def)),
            })
            .collect();
        if seekers.is_empty() || self.world.items.is_empty() {
            return;
        }
        for (agent, item) in resolve_claims(&seekers, &self.world.items, catalog, &mut self.claims, &self.fsm.cfg.equip) {
            debug!(%agent, %item, "weapon claim granted");
        }
    }

    /// Tick every agent in registration order.  Returns the first fatal
    /// error, after all agents have ticked.
    fn tick_agents(&mut self, dt: f32) -> Option<FsmError> {
        let now = self.clock.elapsed_secs;
        let mut fatal = None;
        for i in 0..self.agents.count {
            let agent = AgentId(i as u32);
            let mut ctx = FsmCtx {
                store:   &mut self.agents,
                rng:     &mut self.rngs.inner[i],
                world:   &mut self.world,
                claims:  &mut self.claims,
                catalog: &self.catalog,
                work:    self.work.as_ref(),
                intents: &self.fsm.intents,
                cfg:     &self.fsm.cfg,
                toggles: self.toggles,
                now,
                dt,
                effects: &mut self.effects,
            };
            if let Err(e) = self.fsm.tick(agent, &mut ctx) {
                error!(%agent, error = %e, "agent tick failed fatally");
                fatal.get_or_insert(e);
            }
        }
        fatal
    }

    fn apply_damage(&mut self) {
        for d in self.effects.damage.drain(..) {
            let i = d.target.index();
            if !self.agents.is_alive(d.target) {
                continue;
            }
            if self.toggles.godmode && self.agents.kind[i] == AgentKind::Colonist {
                continue;
            }
            self.agents.vitals[i].damage(d.amount);
            if self.agents.vitals[i].is_dead() {
                info!(agent = %d.target, source = %d.source, "agent killed");
            }
        }
    }

    /// Agents killed this step let go of their claim right away; the rest of
    /// their cleanup happens when they enter `dead` next tick.
    fn release_dead_claims(&mut self) {
        for a in self.agents.agent_ids() {
            if self.agents.vitals[a.index()].is_dead() {
                if let Some(item) = self.claims.release_all_for(a) {
                    debug!(agent = %a, %item, "claim released on death");
                }
            }
        }
    }

    fn maybe_raid(&mut self, dt: f32) -> Vec<AgentId> {
        if self.raids.interval_secs <= 0.0 || self.clock.elapsed_secs + f64::from(dt) < self.next_raid_secs {
            return Vec::new();
        }
        self.next_raid_secs += self.raids.interval_secs;
        if self.toggles.enemy_spawns_disabled {
            debug!("raid skipped, enemy spawns disabled");
            return Vec::new();
        }
        let now = self.clock.elapsed_secs + f64::from(dt);
        spawn_raid(&self.raids, now, &mut self.world, &mut self.agents, &mut self.rngs, &mut self.rng)
    }

    // ── Command plumbing ──────────────────────────────────────────────────

    /// Run `f` against a tick context for `agent`, as the FSM would see it.
    pub(crate) fn with_ctx<R>(&mut self, agent: AgentId, f: impl FnOnce(&AgentFsm, &mut FsmCtx<'_>) -> R) -> R {
        let dt = self.clock.tick_duration_secs;
        let mut ctx = FsmCtx {
            store:   &mut self.agents,
            rng:     &mut self.rngs.inner[agent.index()],
            world:   &mut self.world,
            claims:  &mut self.claims,
            catalog: &self.catalog,
            work:    self.work.as_ref(),
            intents: &self.fsm.intents,
            cfg:     &self.fsm.cfg,
            toggles: self.toggles,
            now:     self.clock.elapsed_secs,
            dt,
            effects: &mut self.effects,
        };
        f(&self.fsm, &mut ctx)
    }
}
