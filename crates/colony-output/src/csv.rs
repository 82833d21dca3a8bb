//! CSV output backend.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, EventRow, OutputResult, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 12] = [
    "agent_id", "tick", "kind", "state", "x", "y", "health", "is_aiming", "aim_angle", "drafted", "weapon",
    "intent_phase",
];
pub const SUMMARY_HEADER: [&str; 6] = ["tick", "sim_secs", "colonists_alive", "enemies_alive", "shots", "hits"];
pub const EVENT_HEADER: [&str; 5] = ["tick", "agent", "kind", "other", "detail"];

/// Writes simulation output to three CSV files in one directory.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    events:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;
        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(EVENT_HEADER)?;

        Ok(Self { snapshots, summaries, events, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.kind.to_owned(),
                row.state.to_owned(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                format!("{:.1}", row.health),
                (row.is_aiming as u8).to_string(),
                format!("{:.3}", row.aim_angle),
                (row.drafted as u8).to_string(),
                row.weapon.clone(),
                row.intent_phase.to_owned(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.3}", row.sim_secs),
            row.colonists_alive.to_string(),
            row.enemies_alive.to_string(),
            row.shots.to_string(),
            row.hits.to_string(),
        ])?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.agent.to_string(),
                row.kind.to_owned(),
                row.other.to_string(),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
