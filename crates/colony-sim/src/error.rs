use thiserror::Error;

use colony_agent::StateId;
use colony_core::{AgentId, ItemId, Vec2};
use colony_equip::ClaimConflict;
use colony_fsm::{ForceOutcome, FsmError};

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    /// An agent's state machine hit a fatal error.  The rest of the step
    /// still ran.
    #[error("state machine invariant violated: {0}")]
    Invariant(#[from] FsmError),
}

pub type SimResult<T> = Result<T, SimError>;

/// Why an external command was not carried out.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CommandError {
    #[error("no such agent: {0}")]
    UnknownAgent(AgentId),

    #[error("{0} is dead")]
    Dead(AgentId),

    #[error("{0} is not a colonist")]
    NotAColonist(AgentId),

    #[error("{0} is not drafted")]
    NotDrafted(AgentId),

    #[error("destination {0} is not passable")]
    Impassable(Vec2),

    #[error("{agent} cannot be put in '{state}': {outcome:?}")]
    Refused { agent: AgentId, state: StateId, outcome: ForceOutcome },

    #[error("{0} has no interruptible intent")]
    NotInterrupted(AgentId),

    /// The agent's running task refuses a command interrupt.
    #[error("{0} is busy with a task that cannot be interrupted")]
    NotInterruptible(AgentId),

    #[error("item {0} is not a known weapon on the floor")]
    NotAWeapon(ItemId),

    #[error(transparent)]
    ClaimConflict(#[from] ClaimConflict),

    #[error(transparent)]
    Fsm(#[from] FsmError),
}
