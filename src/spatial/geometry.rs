//! Geometry primitives: convex polygons, bounding boxes, intersection tests
//!
//! Polygon intersection uses the Separating Axis Theorem: project both
//! polygons onto every edge normal of both; a disjoint interval on any axis
//! proves separation, otherwise the polygons overlap.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

/// Convex hit-box polygon in entity-local space (centered on the entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle with the given half extents
    pub fn rectangle(half_width: f32, half_height: f32) -> Self {
        Self {
            vertices: vec![
                Vec2::new(-half_width, -half_height),
                Vec2::new(half_width, -half_height),
                Vec2::new(half_width, half_height),
                Vec2::new(-half_width, half_height),
            ],
        }
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Vertices translated to world space
    pub fn world_vertices(&self, position: Vec2) -> Vec<Vec2> {
        self.vertices.iter().map(|v| *v + position).collect()
    }

    /// Radius of the smallest origin-centered circle containing the polygon
    pub fn bounding_radius(&self) -> f32 {
        self.vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0, f32::max)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Tightest box around a set of points. Empty input collapses to a
    /// degenerate box at the origin.
    pub fn of(points: &[Vec2]) -> Self {
        if points.is_empty() {
            return Self {
                min: Vec2::default(),
                max: Vec2::default(),
            };
        }
        let mut min = Vec2::new(f32::MAX, f32::MAX);
        let mut max = Vec2::new(f32::MIN, f32::MIN);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Self { min, max }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Anything the collision kernel can test: a position plus a local hit-box
pub trait Collider {
    fn position(&self) -> Vec2;
    fn hit_box(&self) -> &Polygon;

    fn bounding_radius(&self) -> f32 {
        self.hit_box().bounding_radius()
    }

    fn world_hit_box(&self) -> Vec<Vec2> {
        self.hit_box().world_vertices(self.position())
    }

    fn aabb(&self) -> Aabb {
        Aabb::of(&self.world_hit_box())
    }
}

/// SAT intersection test over world-space vertex lists.
///
/// Touching edges (shared boundary, zero overlap) do not count as an
/// intersection. Degenerate inputs with fewer than three vertices never
/// intersect anything; zero-length edges contribute no axis.
pub fn are_polygons_intersecting(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }

    for polygon in [a, b] {
        for i1 in 0..polygon.len() {
            let i2 = (i1 + 1) % polygon.len();
            let p1 = polygon[i1];
            let p2 = polygon[i2];

            let normal = Vec2::new(p2.y - p1.y, p1.x - p2.x);
            if normal.x == 0.0 && normal.y == 0.0 {
                continue;
            }

            let (mut min_a, mut max_a) = (f32::MAX, f32::MIN);
            for v in a {
                let projected = normal.dot(v);
                min_a = min_a.min(projected);
                max_a = max_a.max(projected);
            }

            let (mut min_b, mut max_b) = (f32::MAX, f32::MIN);
            for v in b {
                let projected = normal.dot(v);
                min_b = min_b.min(projected);
                max_b = max_b.max(projected);
            }

            if max_a <= min_b || max_b <= min_a {
                return false;
            }
        }
    }

    true
}

/// Ray-cast point-in-polygon test
pub fn is_point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let length = polygon.len();
    if length < 3 {
        return false;
    }

    let mut inside = false;
    let (mut p1x, mut p1y) = (polygon[0].x, polygon[0].y);

    for i in 1..=length {
        let p2 = polygon[i % length];
        if point.y > p1y.min(p2.y) && point.y <= p1y.max(p2.y) && point.x <= p1x.max(p2.x) {
            let crosses = if p1y != p2.y {
                let xint = (point.y - p1y) * (p2.x - p1x) / (p2.y - p1y) + p1x;
                p1x == p2.x || point.x <= xint
            } else {
                p1x == p2.x
            };
            if crosses {
                inside = !inside;
            }
        }
        p1x = p2.x;
        p1y = p2.y;
    }

    inside
}
