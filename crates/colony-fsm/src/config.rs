//! FSM tunables.

use colony_agent::AgentKind;
use colony_combat::CombatConfig;
use colony_core::TaskKind;
use colony_equip::EquipConfig;
use colony_intent::IntentConfig;
use colony_mobility::MobilityConfig;

/// Every number the state bodies use.  Needs are on a `0..=100` scale where
/// higher is worse; rates are per second of scaled sim time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FsmConfig {
    // ── Survival ──────────────────────────────────────────────────────────
    /// Health fraction below which agents flee.
    pub flee_health_fraction:      f32,
    /// A wounded colonist flees only with an enemy this close.
    pub threat_radius:             f32,
    /// Fleeing ends once no threat is this close.
    pub flee_clear_radius:         f32,
    pub hunger_rate:               f32,
    pub fatigue_rate:              f32,
    pub eat_threshold:             f32,
    pub sleep_threshold:           f32,
    pub eat_duration_secs:         f32,
    pub meal_value:                f32,
    pub bed_rest_rate:             f32,
    pub ground_rest_rate:          f32,
    pub wake_fatigue:              f32,
    pub starvation_damage_per_sec: f32,

    // ── Work ──────────────────────────────────────────────────────────────
    pub chop_rate:  f32,
    pub mine_rate:  f32,
    pub build_rate: f32,

    // ── Movement ──────────────────────────────────────────────────────────
    pub colonist_speed: f32,
    pub enemy_speed:    f32,
    pub wander_radius:  f32,

    // ── Social / idle ─────────────────────────────────────────────────────
    pub socialize_chance_per_sec: f32,
    pub socialize_secs:           f32,
    pub idle_secs:                f32,

    // ── Combat ────────────────────────────────────────────────────────────
    pub enemy_detection_radius: f32,
    pub cover_search_radius:    f32,
    pub cover_candidates:       usize,

    // ── Sub-systems ───────────────────────────────────────────────────────
    pub intent:   IntentConfig,
    pub combat:   CombatConfig,
    pub mobility: MobilityConfig,
    pub equip:    EquipConfig,
}

impl Default for FsmConfig {
    fn default() -> Self {
        Self {
            flee_health_fraction:      0.25,
            threat_radius:             12.0,
            flee_clear_radius:         18.0,
            hunger_rate:               0.5,
            fatigue_rate:              0.35,
            eat_threshold:             70.0,
            sleep_threshold:           75.0,
            eat_duration_secs:         3.0,
            meal_value:                60.0,
            bed_rest_rate:             8.0,
            ground_rest_rate:          4.0,
            wake_fatigue:              5.0,
            starvation_damage_per_sec: 1.0,
            chop_rate:                 10.0,
            mine_rate:                 8.0,
            build_rate:                12.0,
            colonist_speed:            3.0,
            enemy_speed:               2.8,
            wander_radius:             8.0,
            socialize_chance_per_sec:  0.05,
            socialize_secs:            5.0,
            idle_secs:                 2.0,
            enemy_detection_radius:    20.0,
            cover_search_radius:       6.0,
            cover_candidates:          5,
            intent:                    IntentConfig::default(),
            combat:                    CombatConfig::default(),
            mobility:                  MobilityConfig::default(),
            equip:                     EquipConfig::default(),
        }
    }
}

impl FsmConfig {
    #[inline]
    pub fn speed(&self, kind: AgentKind) -> f32 {
        match kind {
            AgentKind::Colonist => self.colonist_speed,
            AgentKind::Enemy    => self.enemy_speed,
        }
    }

    /// Work per second for a site task; zero for anything else.
    pub fn work_rate(&self, task: TaskKind) -> f32 {
        match task {
            TaskKind::Chop  => self.chop_rate,
            TaskKind::Mine  => self.mine_rate,
            TaskKind::Build => self.build_rate,
            _ => 0.0,
        }
    }
}
