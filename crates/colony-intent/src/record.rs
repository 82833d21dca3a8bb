//! The intent record carried by task-bearing states.

use colony_core::{TargetRef, TaskKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntentPhase {
    Moving,
    Deciding,
    Committed,
    Interrupted,
}

impl IntentPhase {
    pub fn name(self) -> &'static str {
        match self {
            IntentPhase::Moving      => "moving",
            IntentPhase::Deciding    => "deciding",
            IntentPhase::Committed   => "committed",
            IntentPhase::Interrupted => "interrupted",
        }
    }
}

/// Why an intent was interrupted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterruptReason {
    Drafted,
    Death,
    Flee,
    /// A higher-priority organic state wants the agent.
    CompetingTask,
    /// An external control surface asked for it.
    Command,
}

impl InterruptReason {
    /// Exempt reasons ignore the task's cancel policy.
    #[inline]
    pub fn is_exempt(self) -> bool {
        matches!(self, InterruptReason::Drafted | InterruptReason::Death | InterruptReason::Flee)
    }
}

/// One task's intent.  Holds a weak target reference only.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntentRecord {
    pub target:           TargetRef,
    pub task:             TaskKind,
    pub phase:            IntentPhase,
    /// Whether ordinary competitors may interrupt this task.
    pub cancellable:      bool,
    /// Seconds spent in the current `Deciding` phase.
    pub decision_elapsed: f32,
    pub dwell_secs:       f32,
    pub task_radius:      f32,
    pub interrupt_reason: Option<InterruptReason>,
}

impl IntentRecord {
    #[inline]
    pub fn is_committed(&self) -> bool {
        self.phase == IntentPhase::Committed
    }

    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.phase == IntentPhase::Interrupted
    }

    /// Would `reason` be allowed to interrupt this intent?
    #[inline]
    pub fn permits(&self, reason: InterruptReason) -> bool {
        reason.is_exempt() || self.cancellable
    }
}
