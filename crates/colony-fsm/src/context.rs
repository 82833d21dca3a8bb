//! What a state body sees during one agent's tick.

use colony_agent::{AgentStore, StateId};
use colony_combat::WeaponCatalog;
use colony_core::{AgentId, DebugToggles, DefName, ItemId, RandomSource, TargetId};
use colony_equip::ClaimTable;
use colony_intent::IntentController;
use colony_world::{SiteCompletion, WorkProvider, World};

use crate::{FsmConfig, FsmError};

/// Mutable tick context for one agent.
///
/// The store is borrowed mutably, but a body may only write its own agent's
/// columns.  Everything that affects another agent goes through
/// [`Effects`].  `rng` is the ticking agent's own stream.
pub struct FsmCtx<'a> {
    pub store:   &'a mut AgentStore,
    pub rng:     &'a mut dyn RandomSource,
    pub world:   &'a mut World,
    pub claims:  &'a mut ClaimTable,
    pub catalog: &'a WeaponCatalog,
    pub work:    &'a dyn WorkProvider,
    pub intents: &'a IntentController,
    pub cfg:     &'a FsmConfig,
    pub toggles: DebugToggles,
    /// Elapsed sim seconds at the start of this step.
    pub now:     f64,
    /// Scaled timestep.
    pub dt:      f32,
    pub effects: &'a mut Effects,
}

/// Damage queued for application after all agents have ticked.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Damage {
    pub source: AgentId,
    pub target: AgentId,
    pub amount: f32,
}

/// Something observers may want to know about.
#[derive(Clone, Debug, PartialEq)]
pub enum FsmEvent {
    StateChanged { agent: AgentId, from: StateId, to: StateId },
    Shot { shooter: AgentId, target: AgentId, hit: bool, damage: f32, cover: f32 },
    Died { agent: AgentId },
    Equipped { agent: AgentId, item: ItemId, def: DefName, dropped: Option<ItemId> },
    SiteCompleted { agent: AgentId, site: TargetId, completion: SiteCompletion },
    /// A recoverable error sent the agent to its fallback state.
    Recovered { agent: AgentId, state: StateId, error: FsmError },
}

/// Side effects accumulated over one step.
#[derive(Clone, Debug, Default)]
pub struct Effects {
    pub damage: Vec<Damage>,
    pub events: Vec<FsmEvent>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.damage.is_empty() && self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.damage.clear();
        self.events.clear();
    }
}
