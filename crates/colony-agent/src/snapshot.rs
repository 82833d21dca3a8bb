//! Read-only per-agent view for renderers, UIs and output writers.

use colony_core::{AgentId, DefName, ItemId, Vec2};
use colony_intent::IntentPhase;

use crate::{AgentKind, StateId};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub id:              AgentId,
    pub kind:            AgentKind,
    pub state:           StateId,
    pub position:        Vec2,
    pub health:          f32,
    pub is_aiming:       bool,
    pub aim_angle:       f32,
    pub is_drafted:      bool,
    pub equipped_weapon: Option<ItemId>,
    pub weapon_def:      Option<DefName>,
    pub intent_phase:    Option<IntentPhase>,
}
