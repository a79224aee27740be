//! Spatial subsystem: geometry primitives, spatial hashing, collision kernel

pub mod collision;
pub mod geometry;
pub mod hash;

pub use collision::{intersects, CollisionKernel};
pub use geometry::{are_polygons_intersecting, is_point_in_polygon, Aabb, Collider, Polygon};
pub use hash::SpatialHash;
