//! `colony-intent`: the interruptible-task wrapper.
//!
//! Every task-bearing FSM state owns one [`IntentRecord`] for as long as it
//! is active.  The record moves through three phases:
//!
//! | Phase         | Ends when                                         | Work accrues? |
//! |---------------|---------------------------------------------------|---------------|
//! | `Moving`      | distance to target ≤ task radius                  | no            |
//! | `Deciding`    | dwell elapsed *and* the state calls `commit`      | no            |
//! | `Committed`   | task done or interrupted                          | yes           |
//! | `Interrupted` | owning state exits on its next tick               | no            |
//!
//! Leaving the task radius while deciding drops back to `Moving`, so simply
//! walking past a site never turns into progress on it.

pub mod controller;
pub mod error;
pub mod record;

#[cfg(test)]
mod tests;

pub use controller::{IntentConfig, IntentController, IntentTick};
pub use error::{IntentError, IntentResult};
pub use record::{IntentPhase, IntentRecord, InterruptReason};
