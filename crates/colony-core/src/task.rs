//! Task vocabulary shared by work assignment, the intent controller and the
//! agent FSM.

use crate::{AgentId, ItemId, TargetId, Vec2};

/// What a task-bearing state is doing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskKind {
    Chop,
    Mine,
    Build,
    Sleep,
    Eat,
    Equip,
    Socialize,
}

impl TaskKind {
    pub const ALL: [TaskKind; 7] = [
        TaskKind::Chop,
        TaskKind::Mine,
        TaskKind::Build,
        TaskKind::Sleep,
        TaskKind::Eat,
        TaskKind::Equip,
        TaskKind::Socialize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Chop      => "chop",
            TaskKind::Mine      => "mine",
            TaskKind::Build     => "build",
            TaskKind::Sleep     => "sleep",
            TaskKind::Eat       => "eat",
            TaskKind::Equip     => "equip",
            TaskKind::Socialize => "socialize",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A weak reference to whatever a task is aimed at.
///
/// Holding a `TargetRef` never keeps the target alive.  Resolving it goes
/// through the owning registry (work sites, floor items, agent store); a
/// failed lookup means the target is gone.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRef {
    Site(TargetId),
    Item(ItemId),
    Agent(AgentId),
    /// A fixed spot on the ground; always live.
    Spot(Vec2),
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRef::Site(id)  => write!(f, "{id}"),
            TargetRef::Item(id)  => write!(f, "{id}"),
            TargetRef::Agent(id) => write!(f, "{id}"),
            TargetRef::Spot(p)   => write!(f, "spot{p}"),
        }
    }
}
