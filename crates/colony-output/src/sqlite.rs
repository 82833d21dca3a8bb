//! SQLite output backend (feature `sqlite`).
//!
//! Creates `output.db` in the output directory with three tables:
//! `agent_snapshots`, `tick_summaries` and `events`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, EventRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id     INTEGER NOT NULL,
                 tick         INTEGER NOT NULL,
                 kind         TEXT    NOT NULL,
                 state        TEXT    NOT NULL,
                 x            REAL    NOT NULL,
                 y            REAL    NOT NULL,
                 health       REAL    NOT NULL,
                 is_aiming    INTEGER NOT NULL,
                 aim_angle    REAL    NOT NULL,
                 drafted      INTEGER NOT NULL,
                 weapon       TEXT    NOT NULL,
                 intent_phase TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick            INTEGER PRIMARY KEY,
                 sim_secs        REAL    NOT NULL,
                 colonists_alive INTEGER NOT NULL,
                 enemies_alive   INTEGER NOT NULL,
                 shots           INTEGER NOT NULL,
                 hits            INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS events (
                 tick   INTEGER NOT NULL,
                 agent  INTEGER NOT NULL,
                 kind   TEXT    NOT NULL,
                 other  INTEGER NOT NULL,
                 detail TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (agent_id, tick, kind, state, x, y, health, is_aiming, aim_angle, drafted, weapon, intent_phase) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick,
                    row.kind,
                    row.state,
                    f64::from(row.x),
                    f64::from(row.y),
                    f64::from(row.health),
                    row.is_aiming as i64,
                    f64::from(row.aim_angle),
                    row.drafted as i64,
                    row.weapon,
                    row.intent_phase,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, sim_secs, colonists_alive, enemies_alive, shots, hits) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![row.tick, row.sim_secs, row.colonists_alive, row.enemies_alive, row.shots, row.hits],
        )?;
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (tick, agent, kind, other, detail) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.tick, row.agent, row.kind, row.other, row.detail])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
