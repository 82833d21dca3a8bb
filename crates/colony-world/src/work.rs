//! Work assignment.
//!
//! `seek_task` asks a [`WorkProvider`] for something to do.  The provider is
//! a trait so applications can plug in job queues or player priorities; the
//! default [`NearestWork`] hands out the nearest unreserved site of the most
//! urgent kind that has any.

use colony_core::{AgentId, DebugToggles, TargetRef, TaskKind, Vec2};

use crate::sites::{SiteKind, WorkSite};
use crate::world::World;

/// A unit of work offered to an agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TaskDescriptor {
    pub target:   TargetRef,
    pub task:     TaskKind,
    pub priority: u8,
}

/// Pluggable work assignment.
pub trait WorkProvider {
    /// Find a task for `agent` standing at `pos`, or `None` if there is no
    /// work it can take.  Must not mutate anything.
    fn find_task_for(
        &self,
        agent: AgentId,
        pos: Vec2,
        world: &World,
        toggles: DebugToggles,
    ) -> Option<TaskDescriptor>;
}

/// Nearest-first assignment over build, mine, chop (in that order).
#[derive(Clone, Debug)]
pub struct NearestWork {
    /// Sites farther than this are ignored.
    pub max_radius: f32,
}

impl Default for NearestWork {
    fn default() -> Self {
        Self { max_radius: 200.0 }
    }
}

impl NearestWork {
    const ORDER: [(TaskKind, u8); 3] = [
        (TaskKind::Build, 45),
        (TaskKind::Mine, 42),
        (TaskKind::Chop, 40),
    ];

    fn eligible(site: &WorkSite, agent: AgentId, world: &World, toggles: DebugToggles) -> bool {
        if !site.is_free_for(agent) || site.work_left <= 0.0 {
            return false;
        }
        match site.kind {
            SiteKind::Blueprint(b) => world.stockpile.can_afford(b.cost(), toggles.unlimited_resources),
            _ => true,
        }
    }
}

impl WorkProvider for NearestWork {
    fn find_task_for(
        &self,
        agent: AgentId,
        pos: Vec2,
        world: &World,
        toggles: DebugToggles,
    ) -> Option<TaskDescriptor> {
        let r2 = self.max_radius * self.max_radius;
        Self::ORDER.iter().find_map(|&(task, priority)| {
            world
                .sites
                .nearest(pos, |s| {
                    s.kind.task() == task
                        && s.pos.distance_sq(pos) <= r2
                        && Self::eligible(s, agent, world, toggles)
                })
                .map(|s| TaskDescriptor { target: TargetRef::Site(s.id), task, priority })
        })
    }
}
