//! Static cover obstacles and their spatial index.
//!
//! Trees and stone chunks are circles; walls are thick line segments.  The
//! index is an `rstar` R-tree over each obstacle's bounding box (inflated by
//! its extent), so line-of-fire and cover-search queries only touch the
//! handful of obstacles near the query region.

use std::collections::BTreeMap;

use rstar::{RTree, RTreeObject, AABB};

use colony_core::{ObstacleId, Vec2};

/// Half of a wall's thickness, in tiles.
pub const WALL_HALF_THICKNESS: f32 = 0.5;

// ── CoverKind ─────────────────────────────────────────────────────────────────

/// The three obstacle types that grant cover, with their fixed fractions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CoverKind {
    Wall,
    StoneChunk,
    Tree,
}

impl CoverKind {
    /// Fraction of attack accuracy removed when the target stands behind
    /// this obstacle.  Independent of who is shooting.
    #[inline]
    pub const fn cover_fraction(self) -> f32 {
        match self {
            CoverKind::Wall       => 0.75,
            CoverKind::StoneChunk => 0.50,
            CoverKind::Tree       => 0.30,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CoverKind::Wall       => "wall",
            CoverKind::StoneChunk => "stone_chunk",
            CoverKind::Tree       => "tree",
        }
    }
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ObstacleShape {
    Circle { center: Vec2, radius: f32 },
    Segment { a: Vec2, b: Vec2 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id:    ObstacleId,
    pub kind:  CoverKind,
    pub shape: ObstacleShape,
}

impl Obstacle {
    /// How far from its centre line the obstacle reaches.
    #[inline]
    pub fn extent(&self) -> f32 {
        match self.shape {
            ObstacleShape::Circle { radius, .. } => radius,
            ObstacleShape::Segment { .. } => WALL_HALF_THICKNESS,
        }
    }

    /// Representative point: circle centre or segment midpoint.
    pub fn anchor(&self) -> Vec2 {
        match self.shape {
            ObstacleShape::Circle { center, .. } => center,
            ObstacleShape::Segment { a, b } => (a + b) * 0.5,
        }
    }

    /// Closest point of the obstacle's centre line to `p`.
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        match self.shape {
            ObstacleShape::Circle { center, .. } => center,
            ObstacleShape::Segment { a, b } => closest_on_segment(a, b, p),
        }
    }

    /// Axis-aligned bounds inflated by the extent.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        let e = self.extent();
        let (lo, hi) = match self.shape {
            ObstacleShape::Circle { center, .. } => (center, center),
            ObstacleShape::Segment { a, b } => (
                Vec2::new(a.x.min(b.x), a.y.min(b.y)),
                Vec2::new(a.x.max(b.x), a.y.max(b.y)),
            ),
        };
        (Vec2::new(lo.x - e, lo.y - e), Vec2::new(hi.x + e, hi.y + e))
    }

    /// `true` if `p` lies inside the obstacle body.
    pub fn contains(&self, p: Vec2) -> bool {
        self.closest_point(p).distance(p) <= self.extent()
    }
}

/// Closest point to `p` on segment `a..b`.
pub fn closest_on_segment(a: Vec2, b: Vec2, p: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct ObstacleEntry {
    id: ObstacleId,
    lo: [f32; 2],
    hi: [f32; 2],
}

impl ObstacleEntry {
    fn of(o: &Obstacle) -> Self {
        let (lo, hi) = o.bounds();
        Self { id: o.id, lo: [lo.x, lo.y], hi: [hi.x, hi.y] }
    }
}

impl RTreeObject for ObstacleEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.lo, self.hi)
    }
}

// ── ObstacleIndex ─────────────────────────────────────────────────────────────

/// Registry of live obstacles with an R-tree for region queries.
///
/// Query results are always returned sorted by `ObstacleId` so callers that
/// break ties by iteration order stay deterministic.
#[derive(Default)]
pub struct ObstacleIndex {
    tree:    RTree<ObstacleEntry>,
    by_id:   BTreeMap<ObstacleId, Obstacle>,
    next_id: u32,
}

impl ObstacleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from pre-made obstacles in one bulk load.
    pub fn bulk(obstacles: Vec<(CoverKind, ObstacleShape)>) -> Self {
        let mut by_id = BTreeMap::new();
        let mut entries = Vec::with_capacity(obstacles.len());
        for (i, (kind, shape)) in obstacles.into_iter().enumerate() {
            let o = Obstacle { id: ObstacleId(i as u32), kind, shape };
            entries.push(ObstacleEntry::of(&o));
            by_id.insert(o.id, o);
        }
        let next_id = by_id.len() as u32;
        Self { tree: RTree::bulk_load(entries), by_id, next_id }
    }

    pub fn insert(&mut self, kind: CoverKind, shape: ObstacleShape) -> ObstacleId {
        let id = ObstacleId(self.next_id);
        self.next_id += 1;
        let o = Obstacle { id, kind, shape };
        self.tree.insert(ObstacleEntry::of(&o));
        self.by_id.insert(id, o);
        id
    }

    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let o = self.by_id.remove(&id)?;
        self.tree.remove(&ObstacleEntry::of(&o));
        Some(o)
    }

    #[inline]
    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.by_id.values()
    }

    /// Obstacles whose inflated bounds intersect the box `lo..hi`.
    pub fn in_box(&self, lo: Vec2, hi: Vec2) -> Vec<&Obstacle> {
        let aabb = AABB::from_corners([lo.x, lo.y], [hi.x, hi.y]);
        let mut ids: Vec<ObstacleId> = self
            .tree
            .locate_in_envelope_intersecting(&aabb)
            .map(|e| e.id)
            .collect();
        ids.sort_unstable();
        ids.into_iter().filter_map(|id| self.by_id.get(&id)).collect()
    }

    /// Obstacles that could touch the segment `a..b` widened by `margin`.
    pub fn near_segment(&self, a: Vec2, b: Vec2, margin: f32) -> Vec<&Obstacle> {
        let lo = Vec2::new(a.x.min(b.x) - margin, a.y.min(b.y) - margin);
        let hi = Vec2::new(a.x.max(b.x) + margin, a.y.max(b.y) + margin);
        self.in_box(lo, hi)
    }

    /// Obstacles whose anchor lies within `radius` of `center`.
    pub fn within_radius(&self, center: Vec2, radius: f32) -> Vec<&Obstacle> {
        let r = Vec2::new(radius, radius);
        self.in_box(center - r, center + r)
            .into_iter()
            .filter(|o| o.closest_point(center).distance(center) <= radius)
            .collect()
    }
}
