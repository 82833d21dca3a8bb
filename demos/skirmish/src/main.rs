//! skirmish: a headless colony run.
//!
//! Loads a scenario (map layout, weapons, starting agents and a schedule of
//! debug-console commands), runs it, and records every snapshot, summary and
//! event under the output directory.
//!
//! ```text
//! skirmish [scenario.json] [output_dir]
//! RUST_LOG=colony_fsm=debug skirmish
//! ```

mod scenario;

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use colony_agent::{AgentKind, AgentStore, AgentStoreBuilder};
use colony_combat::load_catalog_reader;
use colony_core::{AgentId, Tick};
use colony_fsm::FsmEvent;
use colony_output::{CsvWriter, OutputWriter, SimOutputObserver};
use colony_sim::{SimBuilder, SimObserver, TickSummary};
use colony_world::load_layout_reader;

use scenario::Scenario;

const LAYOUT_CSV:  &str = include_str!("../data/layout.csv");
const WEAPONS_CSV: &str = include_str!("../data/weapons.csv");

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Logs the fights as they happen and keeps running totals, then forwards
/// everything to the output observer.
struct CombatLog<W: OutputWriter> {
    inner:  SimOutputObserver<W>,
    shots:  usize,
    hits:   usize,
    deaths: usize,
    raids:  usize,
}

impl<W: OutputWriter> CombatLog<W> {
    fn new(inner: SimOutputObserver<W>) -> Self {
        Self { inner, shots: 0, hits: 0, deaths: 0, raids: 0 }
    }
}

impl<W: OutputWriter> SimObserver for CombatLog<W> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_event(&mut self, tick: Tick, event: &FsmEvent) {
        match event {
            FsmEvent::Died { agent } => {
                self.deaths += 1;
                info!(%tick, %agent, "died");
            }
            FsmEvent::Equipped { agent, def, .. } => info!(%tick, %agent, weapon = %def, "equipped"),
            FsmEvent::Recovered { agent, error, .. } => warn!(%tick, %agent, %error, "recovered"),
            _ => {}
        }
        self.inner.on_event(tick, event);
    }

    fn on_raid(&mut self, tick: Tick, raiders: &[AgentId]) {
        self.raids += 1;
        info!(%tick, count = raiders.len(), "raid");
        self.inner.on_raid(tick, raiders);
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.shots += summary.shots;
        self.hits += summary.hits;
        self.inner.on_tick_end(tick, summary);
    }

    fn on_snapshot(&mut self, tick: Tick, agents: &AgentStore) {
        self.inner.on_snapshot(tick, agents);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let scenario_path = args.next().map(PathBuf::from);
    let output_dir = args.next().map_or_else(|| PathBuf::from("output"), PathBuf::from);

    // 1. Scenario, map and weapons.
    let scenario = Scenario::load(scenario_path.as_deref())?;
    let catalog = load_catalog_reader(Cursor::new(WEAPONS_CSV)).context("loading weapon catalog")?;
    let mut world =
        load_layout_reader(Cursor::new(LAYOUT_CSV), scenario.width, scenario.height).context("loading layout")?;
    info!(
        width = scenario.width,
        height = scenario.height,
        sites = world.sites.len(),
        floor_weapons = world.items.len(),
        weapons = catalog.len(),
        "world loaded"
    );

    // 2. Agents.
    let spawns = scenario.spawns(&mut world, &catalog)?;
    let (agents, rngs) = AgentStoreBuilder::new(scenario.sim.seed).spawn_all(spawns).build();
    let colonists = agents.living(AgentKind::Colonist).count();
    let raiders = agents.living(AgentKind::Enemy).count();
    info!(colonists, raiders, seed = scenario.sim.seed, "agents spawned");

    // 3. Sim.
    let mut sim = SimBuilder::new(scenario.sim.clone(), world, agents, rngs)
        .fsm_config(scenario.fsm.clone())
        .catalog(catalog)
        .raids(scenario.raids.clone())
        .toggles(scenario.toggles)
        .build()?;

    std::fs::create_dir_all(&output_dir).with_context(|| format!("creating {}", output_dir.display()))?;
    let mut obs = CombatLog::new(SimOutputObserver::new(CsvWriter::new(&output_dir)?));

    // 4. Run, issuing scheduled commands before their tick.
    let started = Instant::now();
    let end = sim.config.end_tick();
    let mut pending = scenario.commands.into_iter().peekable();
    while sim.current_tick() < end {
        let tick = sim.current_tick();
        while let Some(scheduled) = pending.next_if(|c| Tick(c.tick) <= tick) {
            if let Err(e) = sim.apply_command(scheduled.command) {
                warn!(%tick, error = %e, "command rejected");
            }
        }
        if !sim.step(&mut obs)? {
            warn!(%tick, "paused, stopping");
            break;
        }
    }
    obs.on_sim_end(sim.current_tick());
    let elapsed = started.elapsed();

    if let Some(e) = obs.inner.take_error() {
        warn!(error = %e, "output incomplete");
    }
    report(&sim, &obs, elapsed.as_secs_f64(), &output_dir);
    Ok(())
}

fn report<W: OutputWriter>(sim: &colony_sim::Sim, log: &CombatLog<W>, wall_secs: f64, out: &Path) {
    let accuracy = if log.shots > 0 { 100.0 * log.hits as f64 / log.shots as f64 } else { 0.0 };
    println!();
    println!("=== skirmish ===");
    println!("Ticks run:        {}  ({:.1} sim s, {wall_secs:.2} wall s)", sim.current_tick(), sim.clock.elapsed_secs);
    println!("Raids:            {}", log.raids);
    println!("Shots / hits:     {} / {}  ({accuracy:.0}%)", log.shots, log.hits);
    println!("Deaths:           {}", log.deaths);
    println!("Colonists alive:  {}", sim.agents.living(AgentKind::Colonist).count());
    println!("Raiders alive:    {}", sim.agents.living(AgentKind::Enemy).count());
    println!("Stockpile:        {:?}", sim.world.stockpile);
    println!("Output:           {}", out.display());
}
