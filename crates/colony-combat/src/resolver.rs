//! Hit resolution and per-agent aim tracking.
//!
//! `effective = base(weapon, distance) * (1 - cover)`, and an attack hits
//! iff the uniform draw is strictly below `effective`.  Given the same draw
//! the outcome is always the same; the only randomness is the draw itself,
//! which comes from an injected [`RandomSource`].

use colony_core::{AgentId, RandomSource, Vec2};
use colony_world::Obstacle;

use crate::cover::cover_fraction;
use crate::weapon::WeaponDef;

// ── CombatConfig ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Time spent aiming before the first shot at a newly acquired target.
    pub aim_time_secs:  f32,
    /// How long aim fields survive without a valid target.
    pub aim_grace_secs: f32,
    /// Fixed reach of every melee weapon.
    pub melee_range:    f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self { aim_time_secs: 0.3, aim_grace_secs: 0.5, melee_range: 1.5 }
    }
}

impl CombatConfig {
    /// Maximum attack distance for `weapon`.
    #[inline]
    pub fn reach(&self, weapon: &WeaponDef) -> f32 {
        if weapon.is_melee() { self.melee_range } else { weapon.range }
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AttackOutcome {
    pub hit:                bool,
    /// Weapon damage on a hit, `0` on a miss.
    pub damage:             f32,
    pub effective_accuracy: f32,
    pub cover:              f32,
    pub draw:               f32,
}

/// Weapon accuracy at `distance` before cover.  Zero beyond reach.  Melee
/// weapons have no falloff inside their reach.
pub fn base_accuracy(weapon: &WeaponDef, distance: f32, cfg: &CombatConfig) -> f32 {
    if distance > cfg.reach(weapon) {
        return 0.0;
    }
    if weapon.is_melee() {
        weapon.accuracy.at(0.0)
    } else {
        weapon.accuracy.at(distance)
    }
}

#[inline]
pub fn effective_accuracy(base: f32, cover: f32) -> f32 {
    base * (1.0 - cover.clamp(0.0, 1.0))
}

/// Resolve one attack against a known draw.
pub fn resolve_with_draw<'a, I>(
    shooter: Vec2,
    target: Vec2,
    weapon: &WeaponDef,
    obstacles: I,
    draw: f32,
    cfg: &CombatConfig,
) -> AttackOutcome
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    let cover = cover_fraction(shooter, target, obstacles);
    let effective = effective_accuracy(base_accuracy(weapon, shooter.distance(target), cfg), cover);
    let hit = draw < effective;
    AttackOutcome {
        hit,
        damage: if hit { weapon.damage } else { 0.0 },
        effective_accuracy: effective,
        cover,
        draw,
    }
}

/// Resolve one attack, consuming exactly one draw from `rng`.
pub fn resolve_attack<'a, I>(
    shooter: Vec2,
    target: Vec2,
    weapon: &WeaponDef,
    obstacles: I,
    rng: &mut dyn RandomSource,
    cfg: &CombatConfig,
) -> AttackOutcome
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    let draw = rng.next_uniform();
    resolve_with_draw(shooter, target, weapon, obstacles, draw, cfg)
}

// ── AimState ──────────────────────────────────────────────────────────────────

/// What the renderer reads to draw a shooter's aim.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AimState {
    pub is_aiming:    bool,
    pub aim_target:   Option<Vec2>,
    /// `atan2(target.y - shooter.y, target.x - shooter.x)`.
    pub aim_angle:    f32,
    pub target_agent: Option<AgentId>,
    /// Seconds since the last valid target.
    pub lost_for:     f32,
}

impl AimState {
    /// Point at `target` and reset the grace timer.
    pub fn track(&mut self, shooter: Vec2, target: Vec2, target_agent: Option<AgentId>) {
        self.is_aiming = true;
        self.aim_target = Some(target);
        self.aim_angle = shooter.angle_to(target);
        self.target_agent = target_agent;
        self.lost_for = 0.0;
    }

    /// No valid target this tick.  Clears the aim once the grace period is
    /// exceeded and returns `true` on the tick it clears.
    pub fn lose_target(&mut self, dt: f32, grace_secs: f32) -> bool {
        if !self.is_aiming {
            return false;
        }
        self.lost_for += dt;
        if self.lost_for > grace_secs {
            self.clear();
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        *self = AimState::default();
    }
}
