//! Intent error type.

use thiserror::Error;

use crate::IntentPhase;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntentError {
    #[error("cannot commit from phase {phase:?} (dwell {elapsed:.2}/{dwell:.2}s)")]
    NotReady { phase: IntentPhase, elapsed: f32, dwell: f32 },
}

pub type IntentResult<T> = Result<T, IntentError>;
