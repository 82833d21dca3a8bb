//! Work sites: the targets of task-bearing states.
//!
//! A site is looked up by `TargetId` every time it is used.  Completed or
//! demolished sites are removed from the registry, so a stale id resolves to
//! `None` and the holder takes the invalid-target path.

use std::collections::BTreeMap;

use colony_core::{AgentId, ObstacleId, TargetId, TaskKind, Vec2};

use crate::terrain::BuildingKind;
use crate::{WorldError, WorldResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SiteKind {
    Tree,
    Rock,
    Blueprint(BuildingKind),
    Bed,
    Table,
}

impl SiteKind {
    /// The task performed at this kind of site.
    pub fn task(self) -> TaskKind {
        match self {
            SiteKind::Tree         => TaskKind::Chop,
            SiteKind::Rock         => TaskKind::Mine,
            SiteKind::Blueprint(_) => TaskKind::Build,
            SiteKind::Bed          => TaskKind::Sleep,
            SiteKind::Table        => TaskKind::Eat,
        }
    }

    /// Work units needed to complete the site.  Furniture is never "done".
    pub fn initial_work(self) -> f32 {
        match self {
            SiteKind::Tree         => 50.0,
            SiteKind::Rock         => 80.0,
            SiteKind::Blueprint(_) => 60.0,
            SiteKind::Bed | SiteKind::Table => 0.0,
        }
    }

    /// Sites that only one agent may use at a time.
    pub fn is_exclusive(self) -> bool {
        !matches!(self, SiteKind::Table)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WorkSite {
    pub id:          TargetId,
    pub kind:        SiteKind,
    pub tile:        (i32, i32),
    pub pos:         Vec2,
    pub work_left:   f32,
    pub reserved_by: Option<AgentId>,
    /// Cover obstacle that disappears with the site (trees).
    pub obstacle:    Option<ObstacleId>,
}

impl WorkSite {
    #[inline]
    pub fn is_free_for(&self, agent: AgentId) -> bool {
        !self.kind.is_exclusive() || self.reserved_by.is_none_or(|a| a == agent)
    }
}

#[derive(Clone, Debug, Default)]
pub struct WorkSites {
    sites:   BTreeMap<TargetId, WorkSite>,
    next_id: u32,
}

impl WorkSites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: SiteKind, tile: (i32, i32), obstacle: Option<ObstacleId>) -> TargetId {
        let id = TargetId(self.next_id);
        self.next_id += 1;
        self.sites.insert(id, WorkSite {
            id,
            kind,
            tile,
            pos: Vec2::tile_center(tile.0, tile.1),
            work_left: kind.initial_work(),
            reserved_by: None,
            obstacle,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: TargetId) -> Option<&WorkSite> {
        self.sites.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut WorkSite> {
        self.sites.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: TargetId) -> bool {
        self.sites.contains_key(&id)
    }

    pub fn remove(&mut self, id: TargetId) -> Option<WorkSite> {
        self.sites.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkSite> {
        self.sites.values()
    }

    pub fn site_at(&self, tile: (i32, i32)) -> Option<&WorkSite> {
        self.sites.values().find(|s| s.tile == tile)
    }

    /// Reserve an exclusive site for `agent`.  Re-reserving one's own site
    /// is a no-op; non-exclusive sites always succeed.
    pub fn reserve(&mut self, id: TargetId, agent: AgentId) -> WorldResult<()> {
        let site = self.sites.get_mut(&id).ok_or(WorldError::UnknownSite(id))?;
        if !site.kind.is_exclusive() {
            return Ok(());
        }
        match site.reserved_by {
            Some(by) if by != agent => Err(WorldError::SiteReserved { site: id, by }),
            _ => {
                site.reserved_by = Some(agent);
                Ok(())
            }
        }
    }

    pub fn release(&mut self, id: TargetId, agent: AgentId) {
        if let Some(site) = self.sites.get_mut(&id) {
            if site.reserved_by == Some(agent) {
                site.reserved_by = None;
            }
        }
    }

    pub fn release_all_for(&mut self, agent: AgentId) {
        for site in self.sites.values_mut() {
            if site.reserved_by == Some(agent) {
                site.reserved_by = None;
            }
        }
    }

    /// Deduct `amount` work.  Returns `true` when the site reaches zero.
    pub fn apply_work(&mut self, id: TargetId, amount: f32) -> WorldResult<bool> {
        let site = self.sites.get_mut(&id).ok_or(WorldError::UnknownSite(id))?;
        site.work_left = (site.work_left - amount.max(0.0)).max(0.0);
        Ok(site.work_left <= 0.0)
    }

    /// Nearest site passing `filter`, ties broken by `TargetId`.
    pub fn nearest(&self, pos: Vec2, filter: impl Fn(&WorkSite) -> bool) -> Option<&WorkSite> {
        self.sites
            .values()
            .filter(|s| filter(s))
            .min_by(|a, b| {
                a.pos
                    .distance_sq(pos)
                    .total_cmp(&b.pos.distance_sq(pos))
                    .then(a.id.cmp(&b.id))
            })
    }
}
