//! Tile grid and the terrain query interface movement validation consumes.

use rustc_hash::FxHashMap;

use colony_core::Vec2;

use crate::{WorldError, WorldResult};

/// Base terrain of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Ground,
    Mountain,
}

/// A constructed building occupying one tile.  Every building footprint is
/// impassable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuildingKind {
    Wall,
    Bed,
    Table,
}

impl BuildingKind {
    pub fn name(self) -> &'static str {
        match self {
            BuildingKind::Wall  => "wall",
            BuildingKind::Bed   => "bed",
            BuildingKind::Table => "table",
        }
    }

    pub fn parse(s: &str) -> Option<BuildingKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall"  => Some(BuildingKind::Wall),
            "bed"   => Some(BuildingKind::Bed),
            "table" => Some(BuildingKind::Table),
            _ => None,
        }
    }
}

// ── TerrainQuery ──────────────────────────────────────────────────────────────

/// Read-only terrain interface.
///
/// Out-of-bounds tiles are never passable.
pub trait TerrainQuery {
    fn in_bounds(&self, x: i32, y: i32) -> bool;

    fn is_mountain(&self, x: i32, y: i32) -> bool;

    fn building_at(&self, x: i32, y: i32) -> Option<BuildingKind>;

    fn is_passable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && !self.is_mountain(x, y) && self.building_at(x, y).is_none()
    }

    /// Passability of the tile containing `p`.
    fn is_passable_at(&self, p: Vec2) -> bool {
        let (x, y) = p.tile();
        self.is_passable(x, y)
    }
}

// ── TileGrid ──────────────────────────────────────────────────────────────────

/// Row-major `width × height` terrain plus a sparse building map.
#[derive(Clone, Debug)]
pub struct TileGrid {
    pub width:  i32,
    pub height: i32,
    tiles:      Vec<Tile>,
    buildings:  FxHashMap<(i32, i32), BuildingKind>,
}

impl TileGrid {
    /// An all-ground grid.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            width:     w,
            height:    h,
            tiles:     vec![Tile::Ground; (w * h) as usize],
            buildings: FxHashMap::default(),
        }
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        self.in_bounds(x, y).then(|| (y * self.width + x) as usize)
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<Tile> {
        self.offset(x, y).map(|i| self.tiles[i])
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) -> WorldResult<()> {
        let i = self.offset(x, y).ok_or(WorldError::OutOfBounds { x, y })?;
        self.tiles[i] = tile;
        Ok(())
    }

    pub fn set_building(&mut self, x: i32, y: i32, kind: BuildingKind) -> WorldResult<()> {
        if !self.in_bounds(x, y) {
            return Err(WorldError::OutOfBounds { x, y });
        }
        self.buildings.insert((x, y), kind);
        Ok(())
    }

    pub fn clear_building(&mut self, x: i32, y: i32) -> Option<BuildingKind> {
        self.buildings.remove(&(x, y))
    }

    /// Centre of the map, in world coordinates.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    /// Clamp a world position into the map rectangle.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(0.0, (self.width as f32 - 0.01).max(0.0)),
            p.y.clamp(0.0, (self.height as f32 - 0.01).max(0.0)),
        )
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        TileGrid::new(0, 0)
    }
}

impl TerrainQuery for TileGrid {
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    #[inline]
    fn is_mountain(&self, x: i32, y: i32) -> bool {
        matches!(self.tile(x, y), Some(Tile::Mountain))
    }

    #[inline]
    fn building_at(&self, x: i32, y: i32) -> Option<BuildingKind> {
        self.buildings.get(&(x, y)).copied()
    }
}
