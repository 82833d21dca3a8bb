//! Cover evaluation.
//!
//! Cover models "the target is standing behind something", not general
//! line-of-sight.  An obstacle only counts if it sits in the last quarter of
//! the shooter→target segment and actually straddles the line of fire.
//! Cover never stacks: the best single obstacle wins.

use std::cmp::Ordering;

use colony_core::{ObstacleId, Vec2};
use colony_world::{CoverKind, Obstacle, ObstacleShape, WALL_HALF_THICKNESS};

/// Obstacles must project at or beyond this fraction of the shot segment.
pub const COVER_ZONE_START: f32 = 0.75;

/// Gap kept between a cover position and the obstacle surface.
pub const STANDOFF: f32 = 0.6;

/// Weight of the cover term in a cover position's score.
pub const COVER_WEIGHT: f32 = 0.7;
/// Weight of the distance-from-threat term.
pub const DISTANCE_WEIGHT: f32 = 0.3;

/// The obstacle providing cover to a target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverHit {
    pub obstacle: ObstacleId,
    pub kind:     CoverKind,
    pub fraction: f32,
    /// Position along the shot segment, in `[0.75, 1]`.
    pub t:        f32,
}

// ── Line-of-fire geometry ─────────────────────────────────────────────────────

/// Intersection point of segments `p1..p2` and `q1..q2`, if any.
fn segment_intersection(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> Option<Vec2> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let qp = q1 - p1;
    let t = (qp.x * s.y - qp.y * s.x) / denom;
    let u = (qp.x * r.y - qp.y * r.x) / denom;
    ((0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)).then(|| p1 + r * t)
}

/// Where on the obstacle the shot is judged.
fn reference_point(o: &Obstacle, shooter: Vec2, target: Vec2) -> Vec2 {
    match o.shape {
        ObstacleShape::Circle { center, .. } => center,
        ObstacleShape::Segment { a, b } => {
            segment_intersection(shooter, target, a, b).unwrap_or_else(|| o.closest_point(target))
        }
    }
}

/// Evaluate one obstacle against the shot.  `None` if it does not qualify.
fn qualify(o: &Obstacle, shooter: Vec2, target: Vec2) -> Option<CoverHit> {
    let seg = target - shooter;
    let len_sq = seg.length_sq();
    if len_sq <= f32::EPSILON {
        return None;
    }
    let p = reference_point(o, shooter, target);
    let t = (p - shooter).dot(seg) / len_sq;
    if !(COVER_ZONE_START..=1.0).contains(&t) {
        return None;
    }
    let on_line = shooter + seg * t;
    if on_line.distance(p) > o.extent() {
        return None;
    }
    Some(CoverHit { obstacle: o.id, kind: o.kind, fraction: o.kind.cover_fraction(), t })
}

/// Higher fraction first, then nearer the target, then lower id.
fn better(a: &CoverHit, b: &CoverHit) -> Ordering {
    a.fraction
        .total_cmp(&b.fraction)
        .then(a.t.total_cmp(&b.t))
        .then(b.obstacle.cmp(&a.obstacle))
}

// ── Public API ────────────────────────────────────────────────────────────────

/// The single obstacle giving the most cover to `target` against `shooter`.
pub fn best_cover<'a, I>(shooter: Vec2, target: Vec2, obstacles: I) -> Option<CoverHit>
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    obstacles
        .into_iter()
        .filter_map(|o| qualify(o, shooter, target))
        .max_by(better)
}

/// Cover fraction in `[0, 1]`; `0` when nothing qualifies.
pub fn cover_fraction<'a, I>(shooter: Vec2, target: Vec2, obstacles: I) -> f32
where
    I: IntoIterator<Item = &'a Obstacle>,
{
    best_cover(shooter, target, obstacles).map_or(0.0, |h| h.fraction)
}

// ── Cover positions ───────────────────────────────────────────────────────────

/// A ranked standing position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoverCandidate {
    pub pos:      Vec2,
    pub score:    f32,
    pub cover:    f32,
    pub obstacle: ObstacleId,
}

fn candidate_points(o: &Obstacle, threat: Vec2, out: &mut Vec<(Vec2, ObstacleId)>) {
    match o.shape {
        ObstacleShape::Circle { center, radius } => {
            let r = radius + STANDOFF;
            for k in 0..8 {
                let angle = k as f32 * std::f32::consts::FRAC_PI_4;
                out.push((center + Vec2::new(angle.cos(), angle.sin()) * r, o.id));
            }
        }
        ObstacleShape::Segment { a, b } => {
            let along = b - a;
            let normal = along.perp().normalized();
            let mid = (a + b) * 0.5;
            let toward_threat = if (threat - mid).dot(normal) >= 0.0 { 1.0 } else { -1.0 };
            let offset = normal * (-toward_threat * (WALL_HALF_THICKNESS + STANDOFF));
            let steps = along.length().ceil().max(1.0) as usize;
            for i in 0..=steps {
                let p = a + along * (i as f32 / steps as f32);
                out.push((p + offset, o.id));
            }
        }
    }
}

/// Candidate positions around `obstacles` ranked for hiding from `threat`.
///
/// Each point is scored `0.7 * cover + 0.3 * normalized distance from the
/// threat` (distance normalised by the farthest candidate).  Ties go to the
/// point nearer `agent`.  At most `max_candidates` are returned.
pub fn find_cover_positions(
    agent: Vec2,
    threat: Vec2,
    obstacles: &[&Obstacle],
    max_candidates: usize,
) -> Vec<CoverCandidate> {
    find_cover_positions_where(agent, threat, obstacles, max_candidates, |_| true)
}

/// Like [`find_cover_positions`], keeping only points accepted by `standable`
/// (e.g. passable tiles).
pub fn find_cover_positions_where(
    agent: Vec2,
    threat: Vec2,
    obstacles: &[&Obstacle],
    max_candidates: usize,
    standable: impl Fn(Vec2) -> bool,
) -> Vec<CoverCandidate> {
    if max_candidates == 0 {
        return Vec::new();
    }
    let mut points = Vec::with_capacity(obstacles.len() * 8);
    for o in obstacles {
        candidate_points(o, threat, &mut points);
    }
    points.retain(|(p, _)| standable(*p) && !obstacles.iter().any(|o| o.contains(*p)));

    let max_dist = points
        .iter()
        .map(|(p, _)| p.distance(threat))
        .fold(0.0_f32, f32::max);

    let mut ranked: Vec<CoverCandidate> = points
        .into_iter()
        .map(|(pos, obstacle)| {
            let cover = cover_fraction(threat, pos, obstacles.iter().copied());
            let dist = if max_dist > 0.0 { pos.distance(threat) / max_dist } else { 0.0 };
            CoverCandidate { pos, score: COVER_WEIGHT * cover + DISTANCE_WEIGHT * dist, cover, obstacle }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.pos.distance_sq(agent).total_cmp(&b.pos.distance_sq(agent)))
            .then(a.obstacle.cmp(&b.obstacle))
    });
    ranked.truncate(max_candidates);
    ranked
}
