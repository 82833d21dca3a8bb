//! Agent-store error type.

use thiserror::Error;

use colony_core::AgentId;

use crate::{AgentKind, StateId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AgentError {
    #[error("agent {0} not found")]
    UnknownAgent(AgentId),

    /// A state outside the kind's declared set was about to be written.
    #[error("state '{}' is not declared for {kind:?} agent {agent}", state.name())]
    UndeclaredState { agent: AgentId, kind: AgentKind, state: StateId },
}

pub type AgentResult<T> = Result<T, AgentError>;
