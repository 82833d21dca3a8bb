//! The `World` aggregate and the side effects of finishing a work site.

use tracing::debug;

use colony_core::{DebugToggles, TargetId, Vec2};

use crate::items::FloorItems;
use crate::obstacle::{CoverKind, ObstacleIndex, ObstacleShape};
use crate::sites::{SiteKind, WorkSites};
use crate::stockpile::{Cost, Stockpile};
use crate::terrain::{BuildingKind, TerrainQuery, Tile, TileGrid};
use crate::{WorldError, WorldResult};

pub const TREE_RADIUS: f32 = 0.4;
pub const CHUNK_RADIUS: f32 = 0.35;
pub const WOOD_PER_TREE: u32 = 10;
pub const STONE_PER_ROCK: u32 = 8;

impl BuildingKind {
    pub fn cost(self) -> Cost {
        match self {
            BuildingKind::Wall  => Cost { wood: 0, stone: 5 },
            BuildingKind::Bed   => Cost { wood: 10, stone: 0 },
            BuildingKind::Table => Cost { wood: 8, stone: 0 },
        }
    }
}

/// What finishing a site produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SiteCompletion {
    TreeFelled { wood: u32 },
    RockMined { stone: u32 },
    Built(BuildingKind),
}

/// Everything agents act on that is not an agent.
#[derive(Default)]
pub struct World {
    pub grid:      TileGrid,
    pub obstacles: ObstacleIndex,
    pub items:     FloorItems,
    pub sites:     WorkSites,
    pub stockpile: Stockpile,
}

impl World {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            grid: TileGrid::new(width, height),
            ..Self::default()
        }
    }

    fn check_bounds(&self, (x, y): (i32, i32)) -> WorldResult<()> {
        if self.grid.in_bounds(x, y) { Ok(()) } else { Err(WorldError::OutOfBounds { x, y }) }
    }

    // ── Layout ────────────────────────────────────────────────────────────

    pub fn add_mountain(&mut self, tile: (i32, i32)) -> WorldResult<()> {
        self.grid.set_tile(tile.0, tile.1, Tile::Mountain)
    }

    /// A tree: a cover obstacle plus a choppable site.
    pub fn add_tree(&mut self, tile: (i32, i32)) -> WorldResult<TargetId> {
        self.check_bounds(tile)?;
        let center = Vec2::tile_center(tile.0, tile.1);
        let obstacle = self
            .obstacles
            .insert(CoverKind::Tree, ObstacleShape::Circle { center, radius: TREE_RADIUS });
        Ok(self.sites.add(SiteKind::Tree, tile, Some(obstacle)))
    }

    /// A mineable rock: a mountain tile with a site on it.
    pub fn add_rock(&mut self, tile: (i32, i32)) -> WorldResult<TargetId> {
        self.add_mountain(tile)?;
        Ok(self.sites.add(SiteKind::Rock, tile, None))
    }

    pub fn add_stone_chunk(&mut self, tile: (i32, i32)) -> WorldResult<()> {
        self.check_bounds(tile)?;
        let center = Vec2::tile_center(tile.0, tile.1);
        self.obstacles
            .insert(CoverKind::StoneChunk, ObstacleShape::Circle { center, radius: CHUNK_RADIUS });
        Ok(())
    }

    pub fn add_blueprint(&mut self, tile: (i32, i32), kind: BuildingKind) -> WorldResult<TargetId> {
        self.check_bounds(tile)?;
        Ok(self.sites.add(SiteKind::Blueprint(kind), tile, None))
    }

    /// Place a finished building.  Walls become cover; beds and tables
    /// become usable sites.
    pub fn place_building(&mut self, tile: (i32, i32), kind: BuildingKind) -> WorldResult<Option<TargetId>> {
        self.grid.set_building(tile.0, tile.1, kind)?;
        match kind {
            BuildingKind::Wall => {
                let y = tile.1 as f32 + 0.5;
                let a = Vec2::new(tile.0 as f32, y);
                let b = Vec2::new(tile.0 as f32 + 1.0, y);
                self.obstacles.insert(CoverKind::Wall, ObstacleShape::Segment { a, b });
                Ok(None)
            }
            BuildingKind::Bed   => Ok(Some(self.sites.add(SiteKind::Bed, tile, None))),
            BuildingKind::Table => Ok(Some(self.sites.add(SiteKind::Table, tile, None))),
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Liveness lookup for a site target.
    #[inline]
    pub fn site_position(&self, id: TargetId) -> Option<Vec2> {
        self.sites.get(id).map(|s| s.pos)
    }

    // ── Completion ────────────────────────────────────────────────────────

    /// Remove a finished site and apply its effect on the world.
    ///
    /// Beds and tables are furniture and cannot be completed.
    pub fn complete_site(&mut self, id: TargetId, toggles: DebugToggles) -> WorldResult<SiteCompletion> {
        let site = self.sites.get(id).ok_or(WorldError::UnknownSite(id))?;
        let (kind, tile, obstacle) = (site.kind, site.tile, site.obstacle);

        let outcome = match kind {
            SiteKind::Bed | SiteKind::Table => return Err(WorldError::NotCompletable(id)),
            SiteKind::Tree => {
                if let Some(obstacle) = obstacle {
                    self.obstacles.remove(obstacle);
                }
                self.stockpile.wood += WOOD_PER_TREE;
                SiteCompletion::TreeFelled { wood: WOOD_PER_TREE }
            }
            SiteKind::Rock => {
                self.grid.set_tile(tile.0, tile.1, Tile::Ground)?;
                self.add_stone_chunk(tile)?;
                self.stockpile.stone += STONE_PER_ROCK;
                SiteCompletion::RockMined { stone: STONE_PER_ROCK }
            }
            SiteKind::Blueprint(b) => {
                self.stockpile.spend(b.cost(), toggles.unlimited_resources)?;
                self.place_building(tile, b)?;
                SiteCompletion::Built(b)
            }
        };
        self.sites.remove(id);
        debug!(site = %id, ?outcome, "work site completed");
        Ok(outcome)
    }
}

impl TerrainQuery for World {
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.in_bounds(x, y)
    }

    #[inline]
    fn is_mountain(&self, x: i32, y: i32) -> bool {
        self.grid.is_mountain(x, y)
    }

    #[inline]
    fn building_at(&self, x: i32, y: i32) -> Option<BuildingKind> {
        self.grid.building_at(x, y)
    }
}
