//! `colony-fsm`: the per-agent priority state machine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`config`]     | `FsmConfig`: every FSM tunable with its default                |
//! | [`context`]    | `FsmCtx<'a>` (what a state body sees), `Effects`, `FsmEvent`    |
//! | [`table`]      | `StateDef`, `StateTable`, `Rank`, `Flow`                        |
//! | [`machine`]    | `AgentFsm`: tick algorithm, transitions, forced states         |
//! | [`colonist`]   | Colonist state table and bodies                                 |
//! | [`enemy`]      | Enemy state table and bodies                                    |
//! | [`error`]      | `FsmError`, `FsmResult<T>`                                      |
//!
//! # Tick algorithm
//!
//! For one agent, once per step:
//!
//! 1. Dead agents do nothing.
//! 2. Needs rise (colonists); aim fades outside combat states.
//! 3. An intent already marked `Interrupted` makes the state exit now.
//! 4. Candidate states are ranked by `(priority, declaration order)`.  The
//!    highest-ranked triggered state above the current one preempts it if
//!    it is policy-exempt, or if the current state is interruptible and its
//!    intent's cancel policy allows a competing task.
//! 5. The current state's body runs and may switch state itself.
//!
//! A recoverable [`FsmError`] never leaves the agent's tick: the agent is
//! moved to its kind's fallback state and an event is recorded.  Only an
//! invariant violation is returned to the caller.
//!
//! Each body mutates only its own agent's fields.  Damage to other agents is
//! queued in [`Effects`] and applied by the simulation after every agent has
//! ticked.

pub mod colonist;
pub mod config;
pub mod context;
pub mod enemy;
pub mod error;
pub mod machine;
pub mod table;

mod actions;

#[cfg(test)]
mod tests;

pub use config::FsmConfig;
pub use context::{Damage, Effects, FsmCtx, FsmEvent};
pub use error::{FsmError, FsmResult};
pub use machine::{AgentFsm, ForceOutcome};
pub use table::{Flow, Rank, StateDef, StateTable};
