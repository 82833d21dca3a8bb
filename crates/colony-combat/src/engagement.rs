//! Per-agent engagement state machine.
//!
//! ```text
//! Idle ──target acquired──▶ Aiming ──aim time elapsed──▶ Firing
//!   ▲                                                     │
//!   └──────────────── target lost / destroyed ────────────┘
//!
//! any phase ──health below threshold──▶ Fleeing (sticky until reset)
//! ```
//!
//! Firing is cooldown-gated: one attack attempt per `cooldown_secs`.  The
//! cooldown keeps running in every phase so switching targets never grants
//! a free shot.

use tracing::debug;

use colony_core::{AgentId, RandomSource, Vec2};
use colony_world::Obstacle;

use crate::resolver::{resolve_attack, AimState, AttackOutcome, CombatConfig};
use crate::weapon::WeaponDef;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngagementPhase {
    #[default]
    Idle,
    Aiming,
    Firing,
    Fleeing,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Engagement {
    pub phase:       EngagementPhase,
    pub aim_elapsed: f32,
    pub cooldown:    f32,
}

/// Everything one engagement tick looks at.
pub struct EngageInput<'a> {
    pub shooter:         Vec2,
    pub target:          Option<(AgentId, Vec2)>,
    pub weapon:          &'a WeaponDef,
    pub obstacles:       &'a [&'a Obstacle],
    pub health_fraction: f32,
    pub flee_below:      f32,
    pub dt:              f32,
}

/// Result of one engagement tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum EngagementStep {
    /// No target and nothing to report.
    Holding,
    /// A target was just acquired; aiming starts.
    Acquired,
    Aiming,
    /// In the firing phase but the target is beyond reach.
    OutOfRange,
    /// Waiting on the weapon cooldown.
    Cooling,
    Fired { target: AgentId, outcome: AttackOutcome },
    /// The target went away; back to idle.
    Lost,
    /// Health dropped below the flee threshold.
    Flee,
}

impl Engagement {
    pub fn tick(
        &mut self,
        input: &EngageInput<'_>,
        aim: &mut AimState,
        rng: &mut dyn RandomSource,
        cfg: &CombatConfig,
    ) -> EngagementStep {
        self.cooldown = (self.cooldown - input.dt).max(0.0);

        if self.phase == EngagementPhase::Fleeing {
            return EngagementStep::Flee;
        }
        if input.health_fraction < input.flee_below {
            debug!(from = ?self.phase, health = input.health_fraction, "engagement broken off to flee");
            self.phase = EngagementPhase::Fleeing;
            self.aim_elapsed = 0.0;
            aim.clear();
            return EngagementStep::Flee;
        }

        let Some((target, target_pos)) = input.target else {
            aim.lose_target(input.dt, cfg.aim_grace_secs);
            if self.phase == EngagementPhase::Idle {
                return EngagementStep::Holding;
            }
            debug!(from = ?self.phase, "engagement target lost");
            self.phase = EngagementPhase::Idle;
            self.aim_elapsed = 0.0;
            return EngagementStep::Lost;
        };

        let switched = aim.target_agent.is_some_and(|prev| prev != target);
        aim.track(input.shooter, target_pos, Some(target));
        if switched && self.phase != EngagementPhase::Idle {
            debug!(%target, from = ?self.phase, "engagement switched target, re-aiming");
            self.phase = EngagementPhase::Aiming;
            self.aim_elapsed = 0.0;
        }

        match self.phase {
            EngagementPhase::Idle => {
                debug!(%target, "engagement target acquired");
                self.phase = EngagementPhase::Aiming;
                self.aim_elapsed = 0.0;
                return EngagementStep::Acquired;
            }
            EngagementPhase::Aiming => {
                self.aim_elapsed += input.dt;
                if self.aim_elapsed < cfg.aim_time_secs {
                    return EngagementStep::Aiming;
                }
                debug!(%target, aim_secs = self.aim_elapsed, "aim settled, firing");
                self.phase = EngagementPhase::Firing;
            }
            EngagementPhase::Firing => {}
            EngagementPhase::Fleeing => return EngagementStep::Flee,
        }

        if input.shooter.distance(target_pos) > cfg.reach(input.weapon) {
            return EngagementStep::OutOfRange;
        }
        if self.cooldown > 0.0 {
            return EngagementStep::Cooling;
        }
        let outcome = resolve_attack(
            input.shooter,
            target_pos,
            input.weapon,
            input.obstacles.iter().copied(),
            rng,
            cfg,
        );
        self.cooldown = input.weapon.cooldown_secs;
        EngagementStep::Fired { target, outcome }
    }

    /// Drop back to idle (leaving combat or recovering from flight).
    /// The weapon cooldown is preserved.
    pub fn reset(&mut self) {
        self.phase = EngagementPhase::Idle;
        self.aim_elapsed = 0.0;
    }
}
