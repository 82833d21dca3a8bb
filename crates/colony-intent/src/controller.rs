//! Intent lifecycle driver and interrupt arbiter.

use std::collections::BTreeMap;

use tracing::debug;

use colony_core::{TargetRef, TaskKind};

use crate::record::{IntentPhase, IntentRecord, InterruptReason};
use crate::{IntentError, IntentResult};

// ── IntentConfig ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IntentConfig {
    /// Deciding-phase dwell for tasks without an override.
    pub default_dwell_secs: f32,
    pub dwell_overrides:    BTreeMap<TaskKind, f32>,
    /// Arrival radius for tasks.
    pub task_radius:        f32,
    /// Tasks that ordinary competitors may not cancel.
    pub non_cancellable:    Vec<TaskKind>,
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            default_dwell_secs: 0.5,
            dwell_overrides:    BTreeMap::new(),
            task_radius:        1.5,
            non_cancellable:    vec![TaskKind::Eat, TaskKind::Equip],
        }
    }
}

impl IntentConfig {
    pub fn dwell_for(&self, task: TaskKind) -> f32 {
        self.dwell_overrides.get(&task).copied().unwrap_or(self.default_dwell_secs)
    }

    pub fn cancel_policy(&self, task: TaskKind) -> bool {
        !self.non_cancellable.contains(&task)
    }
}

// ── IntentTick ────────────────────────────────────────────────────────────────

/// What happened to an intent during one tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IntentTick {
    /// Still travelling.
    Moving,
    /// Just entered the task radius; dwell starts.
    Arrived,
    /// Dwelling; not yet eligible to commit.
    Deciding,
    /// Left the task radius during the dwell; back to `Moving`.
    LeftRadius,
    /// Dwell finished; the state may now `commit`.
    DwellComplete,
    Committed,
    /// The owning state must exit.
    Interrupted,
}

// ── IntentController ──────────────────────────────────────────────────────────

/// Stateless driver: all per-task state lives in the [`IntentRecord`].
#[derive(Clone, Debug, Default)]
pub struct IntentController {
    pub config: IntentConfig,
}

impl IntentController {
    pub fn new(config: IntentConfig) -> Self {
        Self { config }
    }

    /// Start a new intent in the `Moving` phase.
    pub fn begin_task(&self, target: TargetRef, task: TaskKind, cancellable: bool) -> IntentRecord {
        IntentRecord {
            target,
            task,
            phase: IntentPhase::Moving,
            cancellable,
            decision_elapsed: 0.0,
            dwell_secs: self.config.dwell_for(task),
            task_radius: self.config.task_radius,
            interrupt_reason: None,
        }
    }

    /// Start an intent with the configured cancel policy for `task`.
    pub fn begin_default(&self, target: TargetRef, task: TaskKind) -> IntentRecord {
        self.begin_task(target, task, self.config.cancel_policy(task))
    }

    /// Advance the proximity-driven part of the lifecycle.
    ///
    /// `distance` is the agent's current distance to the target.  Never
    /// enters `Committed`; that takes an explicit [`commit`](Self::commit).
    pub fn tick(&self, intent: &mut IntentRecord, distance: f32, dt: f32) -> IntentTick {
        match intent.phase {
            IntentPhase::Interrupted => IntentTick::Interrupted,
            IntentPhase::Committed => IntentTick::Committed,
            IntentPhase::Moving => {
                if distance <= intent.task_radius {
                    intent.phase = IntentPhase::Deciding;
                    intent.decision_elapsed = 0.0;
                    IntentTick::Arrived
                } else {
                    IntentTick::Moving
                }
            }
            IntentPhase::Deciding => {
                if distance > intent.task_radius {
                    intent.phase = IntentPhase::Moving;
                    intent.decision_elapsed = 0.0;
                    return IntentTick::LeftRadius;
                }
                intent.decision_elapsed += dt;
                if intent.decision_elapsed >= intent.dwell_secs {
                    IntentTick::DwellComplete
                } else {
                    IntentTick::Deciding
                }
            }
        }
    }

    /// Explicitly commit after the dwell.
    pub fn commit(&self, intent: &mut IntentRecord) -> IntentResult<()> {
        if intent.phase == IntentPhase::Deciding && intent.decision_elapsed >= intent.dwell_secs {
            intent.phase = IntentPhase::Committed;
            debug!(task = %intent.task, target = %intent.target, "intent committed");
            return Ok(());
        }
        Err(IntentError::NotReady {
            phase:   intent.phase,
            elapsed: intent.decision_elapsed,
            dwell:   intent.dwell_secs,
        })
    }

    /// Try to interrupt.  Exempt reasons always succeed; others need the
    /// task to be cancellable.  Interrupting an already interrupted intent
    /// succeeds without changing its recorded reason.
    pub fn force_interrupt(&self, intent: &mut IntentRecord, reason: InterruptReason) -> bool {
        if intent.is_interrupted() {
            return true;
        }
        if !intent.permits(reason) {
            debug!(task = %intent.task, ?reason, "interrupt refused by cancel policy");
            return false;
        }
        intent.phase = IntentPhase::Interrupted;
        intent.interrupt_reason = Some(reason);
        debug!(task = %intent.task, ?reason, "intent interrupted");
        true
    }

    /// Work accrued this tick: `rate * dt * multiplier` when committed,
    /// otherwise zero.
    #[inline]
    pub fn work_progress(&self, intent: &IntentRecord, rate_per_sec: f32, dt: f32, multiplier: f32) -> f32 {
        if intent.is_committed() { rate_per_sec * dt * multiplier } else { 0.0 }
    }
}
