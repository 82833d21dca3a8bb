//! Plain data row types written by output backends.

use colony_agent::AgentSnapshot;
use colony_core::Tick;
use colony_fsm::FsmEvent;
use colony_sim::TickSummary;

/// One agent at one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:     u32,
    pub tick:         u64,
    pub kind:         &'static str,
    pub state:        &'static str,
    pub x:            f32,
    pub y:            f32,
    pub health:       f32,
    pub is_aiming:    bool,
    /// Radians; meaningful only while aiming.
    pub aim_angle:    f32,
    pub drafted:      bool,
    /// Catalog name of the equipped weapon; empty for fists.
    pub weapon:       String,
    /// Empty when the state carries no intent.
    pub intent_phase: &'static str,
}

impl AgentSnapshotRow {
    pub fn from_snapshot(tick: Tick, s: &AgentSnapshot) -> Self {
        Self {
            agent_id:     s.id.0,
            tick:         tick.0,
            kind:         s.kind.name(),
            state:        s.state.name(),
            x:            s.position.x,
            y:            s.position.y,
            health:       s.health,
            is_aiming:    s.is_aiming,
            aim_angle:    s.aim_angle,
            drafted:      s.is_drafted,
            weapon:       s.weapon_def.as_ref().map(|d| d.as_str().to_owned()).unwrap_or_default(),
            intent_phase: s.intent_phase.map(|p| p.name()).unwrap_or(""),
        }
    }
}

/// Summary statistics for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:            u64,
    pub sim_secs:        f64,
    pub colonists_alive: u32,
    pub enemies_alive:   u32,
    pub shots:           u32,
    pub hits:            u32,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:            s.tick.0,
            sim_secs:        s.sim_secs,
            colonists_alive: s.colonists_alive as u32,
            enemies_alive:   s.enemies_alive as u32,
            shots:           s.shots as u32,
            hits:            s.hits as u32,
        }
    }
}

/// One FSM event, flattened.  `other` is the second agent involved (the
/// shot's target), or `u32::MAX`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub tick:   u64,
    pub agent:  u32,
    pub kind:   &'static str,
    pub other:  u32,
    pub detail: String,
}

impl EventRow {
    pub fn from_event(tick: Tick, event: &FsmEvent) -> Self {
        let (agent, kind, other, detail) = match event {
            FsmEvent::StateChanged { agent, from, to } => (*agent, "state", None, format!("{from}->{to}")),
            FsmEvent::Shot { shooter, target, hit, damage, cover } => (
                *shooter,
                "shot",
                Some(*target),
                if *hit { format!("hit {damage:.1} cover {cover:.2}") } else { format!("miss cover {cover:.2}") },
            ),
            FsmEvent::Died { agent } => (*agent, "died", None, String::new()),
            FsmEvent::Equipped { agent, def, .. } => (*agent, "equipped", None, def.as_str().to_owned()),
            FsmEvent::SiteCompleted { agent, site, .. } => (*agent, "site_completed", None, site.to_string()),
            FsmEvent::Recovered { agent, error, .. } => (*agent, "recovered", None, error.to_string()),
        };
        Self { tick: tick.0, agent: agent.0, kind, other: other.map_or(u32::MAX, |a| a.0), detail }
    }
}
