//! Integration tests for colony-output.

#[cfg(test)]
mod row_tests {
    use colony_agent::{AgentKind, AgentSnapshot, StateId};
    use colony_core::{AgentId, DefName, ItemId, Tick, Vec2};
    use colony_fsm::FsmEvent;
    use colony_intent::IntentPhase;

    use crate::row::{AgentSnapshotRow, EventRow};

    #[test]
    fn snapshot_row_flattens_names() {
        let snap = AgentSnapshot {
            id:              AgentId(4),
            kind:            AgentKind::Colonist,
            state:           StateId::Chop,
            position:        Vec2::new(3.5, 7.25),
            health:          64.0,
            is_aiming:       false,
            aim_angle:       0.0,
            is_drafted:      false,
            equipped_weapon: Some(ItemId(9)),
            weapon_def:      Some(DefName::from("knife")),
            intent_phase:    Some(IntentPhase::Committed),
        };
        let row = AgentSnapshotRow::from_snapshot(Tick(12), &snap);
        assert_eq!(row.agent_id, 4);
        assert_eq!(row.tick, 12);
        assert_eq!((row.kind, row.state, row.intent_phase), ("colonist", "chop", "committed"));
        assert_eq!(row.weapon, "knife");

        let bare = AgentSnapshot { weapon_def: None, intent_phase: None, ..snap };
        let row = AgentSnapshotRow::from_snapshot(Tick(12), &bare);
        assert_eq!((row.weapon.as_str(), row.intent_phase), ("", ""));
    }

    #[test]
    fn event_rows_name_both_parties_of_a_shot() {
        let shot = FsmEvent::Shot { shooter: AgentId(1), target: AgentId(2), hit: true, damage: 12.0, cover: 0.5 };
        let row = EventRow::from_event(Tick(3), &shot);
        assert_eq!((row.agent, row.kind, row.other), (1, "shot", 2));
        assert_eq!(row.detail, "hit 12.0 cover 0.50");

        let died = EventRow::from_event(Tick(3), &FsmEvent::Died { agent: AgentId(2) });
        assert_eq!((died.kind, died.other), ("died", u32::MAX));

        let change = FsmEvent::StateChanged { agent: AgentId(0), from: StateId::SeekTask, to: StateId::Chop };
        assert_eq!(EventRow::from_event(Tick(0), &change).detail, "seek_task->chop");
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvWriter, EVENT_HEADER, SNAPSHOT_HEADER, SUMMARY_HEADER};
    use crate::row::{AgentSnapshotRow, EventRow, TickSummaryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn snap_row(agent_id: u32, tick: u64) -> AgentSnapshotRow {
        AgentSnapshotRow {
            agent_id,
            tick,
            kind:         "enemy",
            state:        "hunt",
            x:            1.5,
            y:            2.0,
            health:       80.0,
            is_aiming:    true,
            aim_angle:    1.25,
            drafted:      false,
            weapon:       "club".to_owned(),
            intent_phase: "",
        }
    }

    fn headers(dir: &TempDir, file: &str) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(dir.path().join(file)).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_and_headers() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(&dir, "agent_snapshots.csv"), SNAPSHOT_HEADER);
        assert_eq!(headers(&dir, "tick_summaries.csv"), SUMMARY_HEADER);
        assert_eq!(headers(&dir, "events.csv"), EVENT_HEADER);
    }

    #[test]
    fn csv_snapshot_rows() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_snapshots(&[snap_row(0, 5), snap_row(1, 5)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "1");
        assert_eq!(&rows[1][3], "hunt");
        assert_eq!(&rows[1][4], "1.500");
        assert_eq!(&rows[1][7], "1"); // is_aiming
        assert_eq!(&rows[1][8], "1.250");
        assert_eq!(&rows[1][11], "");
    }

    #[test]
    fn csv_summary_and_events() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick: 3, sim_secs: 0.4, colonists_alive: 2, enemies_alive: 1, shots: 4, hits: 1,
        })
        .unwrap();
        w.write_events(&[EventRow { tick: 3, agent: 0, kind: "died", other: u32::MAX, detail: String::new() }])
            .unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.iter().map(|r| r.iter().collect::<Vec<_>>()).collect::<Vec<_>>(), vec![vec![
            "3", "0.400", "2", "1", "4", "1"
        ]]);

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][2], "died");
        assert_eq!(&rows[0][3], "4294967295");
    }

    #[test]
    fn integration_csv() {
        use colony_agent::{AgentSpawn, AgentStoreBuilder, HeldItem};
        use colony_core::{DefName, ItemId, SimConfig, Vec2};
        use colony_sim::{RaidConfig, SimBuilder};
        use colony_world::World;

        use crate::observer::SimOutputObserver;

        let config = SimConfig { total_ticks: 30, output_interval_ticks: 10, seed: 7, ..SimConfig::default() };
        let rifle = HeldItem { id: ItemId(100), def: DefName::from("rifle") };
        let (store, rngs) = AgentStoreBuilder::new(7)
            .spawn(AgentSpawn::colonist(Vec2::new(4.5, 4.5)).with_weapon(rifle))
            .spawn(AgentSpawn::enemy(Vec2::new(14.5, 4.5)))
            .build();
        let mut sim = SimBuilder::new(config, World::new(20, 10), store, rngs)
            .raids(RaidConfig { interval_secs: 0.0, ..RaidConfig::default() })
            .build()
            .unwrap();

        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // Snapshots at ticks 0, 10, 20: 3 × 2 agents.
        let mut rdr = csv::Reader::from_path(dir.path().join("agent_snapshots.csv")).unwrap();
        assert_eq!(rdr.records().count(), 6);
        let mut rdr = csv::Reader::from_path(dir.path().join("tick_summaries.csv")).unwrap();
        assert_eq!(rdr.records().count(), 30);
        // The colonist opens fire inside its rifle range.
        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let kinds: Vec<String> = rdr.records().map(|r| r.unwrap()[2].to_owned()).collect();
        assert!(kinds.iter().any(|k| k == "state"));
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use crate::row::{AgentSnapshotRow, EventRow, TickSummaryRow};
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn open(dir: &TempDir) -> rusqlite::Connection {
        rusqlite::Connection::open(dir.path().join("output.db")).unwrap()
    }

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("output.db").exists());
    }

    #[test]
    fn sqlite_snapshots_keep_names_and_flags() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let row = |agent_id, drafted| AgentSnapshotRow {
            agent_id,
            tick: 1,
            kind: "colonist",
            state: "drafted",
            x: 0.5,
            y: 0.5,
            health: 100.0,
            is_aiming: false,
            aim_angle: 0.0,
            drafted,
            weapon: String::new(),
            intent_phase: "",
        };
        w.write_snapshots(&[row(0, true), row(1, false), row(2, true)]).unwrap();
        w.finish().unwrap();

        let conn = open(&dir);
        let drafted: i64 = conn
            .query_row("SELECT COUNT(*) FROM agent_snapshots WHERE drafted = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(drafted, 2);
        let state: String = conn
            .query_row("SELECT state FROM agent_snapshots WHERE agent_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(state, "drafted");
    }

    #[test]
    fn sqlite_tick_summary() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow {
            tick: 7, sim_secs: 0.8, colonists_alive: 3, enemies_alive: 0, shots: 9, hits: 4,
        })
        .unwrap();
        w.finish().unwrap();

        let (shots, hits): (i64, i64) = open(&dir)
            .query_row("SELECT shots, hits FROM tick_summaries WHERE tick = 7", [], |r| Ok((r.get(0)?, r.get(1)?)))
            .unwrap();
        assert_eq!((shots, hits), (9, 4));
    }

    #[test]
    fn sqlite_events() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_events(&[
            EventRow { tick: 1, agent: 0, kind: "shot", other: 1, detail: "miss cover 0.00".to_owned() },
            EventRow { tick: 2, agent: 1, kind: "died", other: u32::MAX, detail: String::new() },
        ])
        .unwrap();
        w.finish().unwrap();

        let other: i64 = open(&dir)
            .query_row("SELECT other FROM events WHERE kind = 'died'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(other, u32::MAX as i64);
    }
}
