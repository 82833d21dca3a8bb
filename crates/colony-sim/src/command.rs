//! External control: debug console and UI commands.
//!
//! Every command goes through the same rules as organic behaviour.  Killing
//! an agent only zeroes its health and lets the `dead` trigger fire; a forced
//! state must outrank the current one and be allowed to interrupt it; an
//! equip order is a weapon claim that the `equipment` state then acts on,
//! and it cannot pull the claim out from under a running equip task that
//! refuses the interrupt.

use tracing::info;

use colony_agent::{AgentKind, StateId};
use colony_core::{AgentId, ItemId, TaskKind, Vec2};
use colony_equip::ClaimConflict;
use colony_fsm::ForceOutcome;
use colony_intent::InterruptReason;
use colony_world::TerrainQuery;

use crate::{CommandError, Sim};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Heal(AgentId),
    Kill(AgentId),
    SetGodmode(bool),
    SetUnlimitedResources(bool),
    /// `true` enables raids.
    SetEnemySpawns(bool),
    Draft { agent: AgentId, drafted: bool },
    /// Send a drafted colonist to a position.
    DraftMove { agent: AgentId, to: Vec2 },
    MoveTo { agent: AgentId, to: Vec2 },
    ForceState { agent: AgentId, state: StateId },
    ForceInterrupt(AgentId),
    AssignEquip { agent: AgentId, item: ItemId },
}

impl Sim {
    /// Carry out `cmd` now.  Effects of the command (state changes, events)
    /// are reported with the next step.
    pub fn apply_command(&mut self, cmd: Command) -> Result<(), CommandError> {
        info!(?cmd, tick = %self.clock.current_tick, "command");
        match cmd {
            Command::Heal(agent) => {
                self.living(agent)?;
                self.agents.vitals[agent.index()].heal_full();
            }
            Command::Kill(agent) => {
                self.living(agent)?;
                self.agents.vitals[agent.index()].health = 0.0;
            }
            Command::SetGodmode(on) => self.toggles.godmode = on,
            Command::SetUnlimitedResources(on) => self.toggles.unlimited_resources = on,
            Command::SetEnemySpawns(on) => self.toggles.enemy_spawns_disabled = !on,
            Command::Draft { agent, drafted } => {
                self.colonist(agent)?;
                let i = agent.index();
                self.agents.drafted[i] = drafted;
                if !drafted {
                    self.agents.draft_target[i] = None;
                }
            }
            Command::DraftMove { agent, to } => {
                self.colonist(agent)?;
                if !self.agents.drafted[agent.index()] {
                    return Err(CommandError::NotDrafted(agent));
                }
                self.passable(to)?;
                self.agents.draft_target[agent.index()] = Some(to);
            }
            Command::MoveTo { agent, to } => {
                self.colonist(agent)?;
                self.passable(to)?;
                self.agents.move_order[agent.index()] = Some(to);
            }
            Command::ForceState { agent, state } => {
                self.living(agent)?;
                let outcome = self.with_ctx(agent, |fsm, ctx| fsm.force_state(agent, state, ctx))?;
                if outcome != ForceOutcome::Applied {
                    return Err(CommandError::Refused { agent, state, outcome });
                }
            }
            Command::ForceInterrupt(agent) => {
                self.living(agent)?;
                if !self.with_ctx(agent, |fsm, ctx| fsm.force_interrupt(agent, ctx))? {
                    return Err(CommandError::NotInterrupted(agent));
                }
            }
            Command::AssignEquip { agent, item } => {
                self.colonist(agent)?;
                let known = self
                    .world
                    .items
                    .get(item)
                    .and_then(|it| it.kind.weapon_def())
                    .is_some_and(|def| self.catalog.get(def).is_some());
                if !known {
                    return Err(CommandError::NotAWeapon(item));
                }
                if let Some(holder) = self.claims.holder(item).filter(|&h| h != agent) {
                    return Err(ClaimConflict { item, holder }.into());
                }
                if self.claims.claim_of(agent) != Some(item) {
                    self.yield_equip_intent(agent)?;
                    self.claims.try_claim(item, agent)?;
                }
            }
        }
        Ok(())
    }

    fn living(&self, agent: AgentId) -> Result<(), CommandError> {
        if !self.agents.contains(agent) {
            return Err(CommandError::UnknownAgent(agent));
        }
        if !self.agents.is_alive(agent) {
            return Err(CommandError::Dead(agent));
        }
        Ok(())
    }

    fn colonist(&self, agent: AgentId) -> Result<(), CommandError> {
        self.living(agent)?;
        if self.agents.kind[agent.index()] != AgentKind::Colonist {
            return Err(CommandError::NotAColonist(agent));
        }
        Ok(())
    }

    /// A running equip intent must let go before its claim is moved.
    fn yield_equip_intent(&mut self, agent: AgentId) -> Result<(), CommandError> {
        let Some(intent) = self.agents.intent[agent.index()].as_mut() else {
            return Ok(());
        };
        if intent.task != TaskKind::Equip || self.fsm.intents.force_interrupt(intent, InterruptReason::Command) {
            return Ok(());
        }
        Err(CommandError::NotInterruptible(agent))
    }

    fn passable(&self, to: Vec2) -> Result<(), CommandError> {
        if self.world.is_passable_at(to) { Ok(()) } else { Err(CommandError::Impassable(to)) }
    }
}
