//! Sparse hash grid for efficient spatial queries
//!
//! Space is partitioned into a uniform grid keyed by cell coordinates. A
//! member is inserted into every cell its bounding box covers, so a query
//! only needs the cells its own box touches. Members must re-hash whenever
//! they move; the simulation rebuilds the grid every tick.

use ahash::{AHashMap, AHashSet};
use std::hash::Hash;

use crate::spatial::geometry::Aabb;

/// Sparse uniform grid over bounding boxes
pub struct SpatialHash<K> {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<K>>,
}

impl<K: Copy + Eq + Hash> SpatialHash<K> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_range(&self, aabb: &Aabb) -> (i32, i32, i32, i32) {
        (
            (aabb.min.x / self.cell_size).floor() as i32,
            (aabb.min.y / self.cell_size).floor() as i32,
            (aabb.max.x / self.cell_size).floor() as i32,
            (aabb.max.y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Insert a member into every cell its bounding box covers
    pub fn insert(&mut self, key: K, aabb: Aabb) {
        let (x0, y0, x1, y1) = self.cell_range(&aabb);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells.entry((cx, cy)).or_default().push(key);
            }
        }
    }

    /// Rebuild the grid from scratch
    pub fn rebuild(&mut self, members: impl Iterator<Item = (K, Aabb)>) {
        self.clear();
        for (key, aabb) in members {
            self.insert(key, aabb);
        }
    }

    /// All members whose cells overlap the query box, deduplicated.
    ///
    /// This is a candidate set: sharing a cell does not prove intersection,
    /// the caller still runs the exact test.
    pub fn candidates(&self, aabb: &Aabb) -> Vec<K> {
        let (x0, y0, x1, y1) = self.cell_range(aabb);
        let mut seen = AHashSet::new();
        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(cell) = self.cells.get(&(cx, cy)) {
                    for &key in cell {
                        if seen.insert(key) {
                            out.push(key);
                        }
                    }
                }
            }
        }
        out
    }
}
