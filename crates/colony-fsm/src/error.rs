//! FSM error taxonomy.

use thiserror::Error;
use tracing::debug;

use colony_agent::{AgentError, AgentKind, StateId};
use colony_core::{AgentId, TargetRef};
use colony_equip::{ClaimConflict, EquipError};
use colony_intent::IntentError;
use colony_world::WorldError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FsmError {
    /// The task target was destroyed, taken, or never existed.
    #[error("target {0} is no longer valid")]
    InvalidTarget(TargetRef),

    /// Movement gave up after the stuck limit.
    #[error("movement made no progress for {ticks} ticks")]
    Unreachable { ticks: u32 },

    #[error(transparent)]
    ClaimConflict(#[from] ClaimConflict),

    /// A state was entered with nothing to act on.
    #[error("state '{0}' has nothing to act on")]
    NoTarget(StateId),

    /// A task-bearing state lost its intent record.
    #[error("state '{0}' is running without an intent")]
    MissingIntent(StateId),

    #[error(transparent)]
    Intent(#[from] IntentError),

    #[error("weapon lookup failed: {0}")]
    Weapon(String),

    /// An id past the end of the agent store.  Fatal.
    #[error("agent {0} is not in the store")]
    UnknownAgent(AgentId),

    /// A state outside the kind's declared set, or a state with no table
    /// entry.  Fatal.
    #[error("invariant violated: {kind:?} agent {agent} in undeclared state '{state}'")]
    InvariantViolation { agent: AgentId, kind: AgentKind, state: StateId },
}

impl FsmError {
    /// Everything except an invariant violation or an unknown agent is
    /// recovered inside the agent's tick.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, FsmError::InvariantViolation { .. } | FsmError::UnknownAgent(_))
    }

    pub(crate) fn from_agent(err: AgentError) -> Self {
        match err {
            AgentError::UndeclaredState { agent, kind, state } => FsmError::InvariantViolation { agent, kind, state },
            AgentError::UnknownAgent(agent) => FsmError::UnknownAgent(agent),
        }
    }

    /// A world-registry refusal on `target` means the target is not usable.
    pub(crate) fn from_world(err: WorldError, target: TargetRef) -> Self {
        debug!(error = %err, %target, "world rejected task target");
        FsmError::InvalidTarget(target)
    }
}

impl From<EquipError> for FsmError {
    fn from(err: EquipError) -> Self {
        match err {
            EquipError::Claim(c) => FsmError::ClaimConflict(c),
            EquipError::NotClaimed { item, .. }
            | EquipError::ItemGone(item)
            | EquipError::NotAWeapon(item) => FsmError::InvalidTarget(TargetRef::Item(item)),
        }
    }
}

pub type FsmResult<T> = Result<T, FsmError>;
