//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use colony_agent::AgentStore;
use colony_core::Tick;
use colony_fsm::FsmEvent;
use colony_sim::{SimObserver, TickSummary};

use crate::row::{AgentSnapshotRow, EventRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that records snapshots, tick summaries and events to
/// any [`OutputWriter`] backend.
///
/// `SimObserver` hooks cannot fail, so writer errors are stored; check
/// [`take_error`][Self::take_error] after `sim.run()` returns.  Events are
/// buffered per step and written at the end of it.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<EventRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), last_error: None }
    }

    /// The first write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_event(&mut self, tick: Tick, event: &FsmEvent) {
        self.pending.push(EventRow::from_event(tick, event));
    }

    fn on_tick_end(&mut self, _tick: Tick, summary: &TickSummary) {
        if !self.pending.is_empty() {
            let rows = std::mem::take(&mut self.pending);
            let result = self.writer.write_events(&rows);
            self.store_err(result);
        }
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentStore) {
        let rows: Vec<AgentSnapshotRow> =
            agents.snapshots().iter().map(|s| AgentSnapshotRow::from_snapshot(tick, s)).collect();
        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
