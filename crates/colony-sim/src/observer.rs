//! Simulation observer trait for progress reporting and data collection.

use colony_agent::AgentStore;
use colony_core::{AgentId, Tick};
use colony_fsm::FsmEvent;

/// Aggregates for one completed step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TickSummary {
    pub tick:            Tick,
    /// Elapsed scaled seconds at the end of the step.
    pub sim_secs:        f64,
    pub colonists_alive: usize,
    pub enemies_alive:   usize,
    pub shots:           usize,
    pub hits:            usize,
}

/// Callbacks invoked by [`Sim::step`][crate::Sim::step] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: casualty counter
///
/// ```rust,ignore
/// struct Casualties(usize);
///
/// impl SimObserver for Casualties {
///     fn on_event(&mut self, _tick: Tick, event: &FsmEvent) {
///         if matches!(event, FsmEvent::Died { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each unpaused step.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per event recorded during the step, in order.
    fn on_event(&mut self, _tick: Tick, _event: &FsmEvent) {}

    /// Called when a raid arrives.
    fn on_raid(&mut self, _tick: Tick, _raiders: &[AgentId]) {}

    /// Called at the end of each step.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with read-only access to every agent.
    fn on_snapshot(&mut self, _tick: Tick, _agents: &AgentStore) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
