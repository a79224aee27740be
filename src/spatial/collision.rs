//! Collision kernel: broad phase plus strategy-selectable roster queries
//!
//! Checking one entity against a collection supports three interchangeable
//! strategies (brute force, spatial hash, bulk filter). Every strategy
//! returns the identical intersecting set; selection is a performance choice
//! only. The old dynamic dispatch over argument types is replaced by three
//! functions resolved at compile time: [`intersects`] for a single pair,
//! [`CollisionKernel::query`] for a collection, and
//! [`CollisionKernel::query_many`] for a collection of collections.

use rayon::prelude::*;
use std::hash::Hash;

use crate::core::config::{CollisionStrategy, SimulationConfig};
use crate::spatial::geometry::{are_polygons_intersecting, Collider};
use crate::spatial::hash::SpatialHash;

/// Cheap bounding-radius rejection before the exact polygon test.
///
/// Staged the same way as the narrow-phase caller expects: each squared
/// component is tested before the full squared distance.
fn broad_phase(a: &impl Collider, b: &impl Collider) -> bool {
    let radius = a.bounding_radius() + b.bounding_radius();
    let radius_sq = radius * radius;

    let dx = a.position().x - b.position().x;
    let dx_sq = dx * dx;
    if dx_sq > radius_sq {
        return false;
    }

    let dy = a.position().y - b.position().y;
    let dy_sq = dy * dy;
    if dy_sq > radius_sq {
        return false;
    }

    dx_sq + dy_sq <= radius_sq
}

/// Exact pair test: broad phase, then SAT on the world-space hit-boxes
pub fn intersects(a: &impl Collider, b: &impl Collider) -> bool {
    broad_phase(a, b) && are_polygons_intersecting(&a.world_hit_box(), &b.world_hit_box())
}

/// Strategy-selectable collision queries against member collections
#[derive(Debug, Clone)]
pub struct CollisionKernel {
    strategy: CollisionStrategy,
    auto_threshold: usize,
}

impl CollisionKernel {
    pub fn new(strategy: CollisionStrategy, auto_threshold: usize) -> Self {
        Self {
            strategy,
            auto_threshold,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.collision_strategy, config.collision_auto_threshold)
    }

    pub fn strategy(&self) -> CollisionStrategy {
        self.strategy
    }

    /// Members genuinely intersecting `entity`, excluding `exclude`.
    ///
    /// `resolve` maps a member key to its collider; `hash` is an optional
    /// spatial index over the same members (it must have been rebuilt since
    /// they last moved). SpatialHash strategy without an index falls back to
    /// brute force.
    pub fn query<'a, K, C, F>(
        &self,
        entity: &impl Collider,
        exclude: Option<K>,
        members: &[K],
        resolve: F,
        hash: Option<&SpatialHash<K>>,
    ) -> Vec<K>
    where
        K: Copy + Eq + Hash + Send + Sync,
        C: Collider + Sync + 'a,
        F: Fn(K) -> &'a C + Sync,
    {
        match self.strategy {
            CollisionStrategy::BruteForce => self.brute(entity, exclude, members, &resolve),
            CollisionStrategy::BulkFilter => self.bulk(entity, exclude, members, &resolve),
            CollisionStrategy::SpatialHash => match hash {
                Some(hash) => self.hashed(entity, exclude, &resolve, hash),
                None => self.brute(entity, exclude, members, &resolve),
            },
            CollisionStrategy::Auto => {
                if let Some(hash) = hash {
                    self.hashed(entity, exclude, &resolve, hash)
                } else if members.len() > self.auto_threshold {
                    self.bulk(entity, exclude, members, &resolve)
                } else {
                    self.brute(entity, exclude, members, &resolve)
                }
            }
        }
    }

    /// Query against each sub-collection in turn, concatenating the hits
    pub fn query_many<'a, K, C, F>(
        &self,
        entity: &impl Collider,
        exclude: Option<K>,
        lists: &[&[K]],
        resolve: F,
    ) -> Vec<K>
    where
        K: Copy + Eq + Hash + Send + Sync,
        C: Collider + Sync + 'a,
        F: Fn(K) -> &'a C + Sync,
    {
        let mut out = Vec::new();
        for list in lists {
            out.extend(self.query(entity, exclude, list, &resolve, None));
        }
        out
    }

    fn brute<'a, K, C, F>(
        &self,
        entity: &impl Collider,
        exclude: Option<K>,
        members: &[K],
        resolve: &F,
    ) -> Vec<K>
    where
        K: Copy + Eq,
        C: Collider + 'a,
        F: Fn(K) -> &'a C,
    {
        members
            .iter()
            .copied()
            .filter(|&k| Some(k) != exclude && intersects(entity, resolve(k)))
            .collect()
    }

    fn hashed<'a, K, C, F>(
        &self,
        entity: &impl Collider,
        exclude: Option<K>,
        resolve: &F,
        hash: &SpatialHash<K>,
    ) -> Vec<K>
    where
        K: Copy + Eq + Hash,
        C: Collider + 'a,
        F: Fn(K) -> &'a C,
    {
        hash.candidates(&entity.aabb())
            .into_iter()
            .filter(|&k| Some(k) != exclude && intersects(entity, resolve(k)))
            .collect()
    }

    /// One bounding-box pass over the whole collection, exact tests on the
    /// survivors only
    fn bulk<'a, K, C, F>(
        &self,
        entity: &impl Collider,
        exclude: Option<K>,
        members: &[K],
        resolve: &F,
    ) -> Vec<K>
    where
        K: Copy + Eq + Send + Sync,
        C: Collider + Sync + 'a,
        F: Fn(K) -> &'a C + Sync,
    {
        let query_aabb = entity.aabb();
        let survivors: Vec<K> = members
            .par_iter()
            .copied()
            .filter(|&k| Some(k) != exclude && query_aabb.overlaps(&resolve(k).aabb()))
            .collect();

        survivors
            .into_iter()
            .filter(|&k| intersects(entity, resolve(k)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::spatial::geometry::Polygon;

    struct TestBox {
        position: Vec2,
        hit_box: Polygon,
    }

    impl TestBox {
        fn new(x: f32, y: f32, half: f32) -> Self {
            Self {
                position: Vec2::new(x, y),
                hit_box: Polygon::rectangle(half, half),
            }
        }
    }

    impl Collider for TestBox {
        fn position(&self) -> Vec2 {
            self.position
        }
        fn hit_box(&self) -> &Polygon {
            &self.hit_box
        }
    }

    fn field() -> Vec<TestBox> {
        let mut boxes = Vec::new();
        // A 10x10 grid of well-separated boxes plus a tight cluster near the
        // query point
        for gx in 0..10 {
            for gy in 0..10 {
                boxes.push(TestBox::new(gx as f32 * 50.0, gy as f32 * 50.0, 4.0));
            }
        }
        boxes.push(TestBox::new(3.0, 2.0, 4.0));
        boxes.push(TestBox::new(-2.0, -3.0, 4.0));
        boxes
    }

    fn run(strategy: CollisionStrategy, with_hash: bool) -> Vec<usize> {
        let boxes = field();
        let keys: Vec<usize> = (0..boxes.len()).collect();
        let query = TestBox::new(0.0, 0.0, 5.0);

        let mut hash = SpatialHash::new(16.0);
        hash.rebuild(keys.iter().map(|&k| (k, boxes[k].aabb())));

        let kernel = CollisionKernel::new(strategy, 1500);
        let mut hits = kernel.query(
            &query,
            Some(0),
            &keys,
            |k| &boxes[k],
            if with_hash { Some(&hash) } else { None },
        );
        hits.sort_unstable();
        hits
    }

    #[test]
    fn test_all_strategies_agree() {
        let brute = run(CollisionStrategy::BruteForce, false);
        let hashed = run(CollisionStrategy::SpatialHash, true);
        let bulk = run(CollisionStrategy::BulkFilter, false);
        let auto = run(CollisionStrategy::Auto, true);

        assert!(!brute.is_empty());
        assert_eq!(brute, hashed);
        assert_eq!(brute, bulk);
        assert_eq!(brute, auto);
    }

    #[test]
    fn test_query_excludes_the_entity_itself() {
        let boxes = vec![TestBox::new(0.0, 0.0, 4.0), TestBox::new(1.0, 1.0, 4.0)];
        let keys = vec![0usize, 1];
        let kernel = CollisionKernel::new(CollisionStrategy::BruteForce, 1500);

        let hits = kernel.query(&boxes[0], Some(0), &keys, |k| &boxes[k], None);
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn test_hash_strategy_without_index_falls_back() {
        let boxes = vec![TestBox::new(0.0, 0.0, 4.0), TestBox::new(1.0, 1.0, 4.0)];
        let keys = vec![0usize, 1];
        let kernel = CollisionKernel::new(CollisionStrategy::SpatialHash, 1500);

        let hits = kernel.query(&boxes[0], Some(0), &keys, |k| &boxes[k], None);
        assert_eq!(hits, vec![1]);
    }

    #[test]
    fn test_query_many_iterates_sub_collections() {
        let boxes = vec![
            TestBox::new(0.0, 0.0, 4.0),
            TestBox::new(2.0, 0.0, 4.0),
            TestBox::new(500.0, 0.0, 4.0),
            TestBox::new(-2.0, 1.0, 4.0),
        ];
        let query = TestBox::new(0.0, 0.0, 5.0);
        let kernel = CollisionKernel::new(CollisionStrategy::BruteForce, 1500);

        let lists: Vec<&[usize]> = vec![&[1, 2], &[3]];
        let mut hits = kernel.query_many(&query, Some(0), &lists, |k| &boxes[k]);
        hits.sort_unstable();
        assert_eq!(hits, vec![1, 3]);
    }

    #[test]
    fn test_pair_intersects() {
        let a = TestBox::new(0.0, 0.0, 5.0);
        let b = TestBox::new(6.0, 6.0, 5.0);
        let c = TestBox::new(60.0, 0.0, 5.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
        assert!(!intersects(&a, &c));
    }
}
