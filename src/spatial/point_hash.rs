use std::hash::Hash;

use glam::Vec2;
use rustc_hash::FxHashSet;

use super::buckets::CellBuckets;
use super::{cell_coords, cell_key, for_each_cell_key};

/// Grid keyed by a single point per entry: each insert lands in exactly
/// one cell. Shapes are not considered; callers verify exact overlap
/// themselves when it matters.
///
/// Buckets are pooled, so after warm-up a clear/insert cycle allocates
/// nothing.
pub struct PointHash<T> {
    cell_size: f32,
    inv_cell_size: f32,
    buckets: CellBuckets<T>,
}

impl<T: Copy> PointHash<T> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            buckets: CellBuckets::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Only the cells touched since the last clear are visited.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    pub fn insert(&mut self, pos: Vec2, item: T) {
        let (cx, cy) = cell_coords(pos, self.inv_cell_size);
        self.buckets.push(cell_key(cx, cy), item);
    }

    /// Clear `results` and append everything in the `(2r+1)^2` block
    /// around `pos`. No dedup: an item inserted twice comes back twice.
    pub fn query_nearby(&self, pos: Vec2, results: &mut Vec<T>, cell_radius: i32) {
        results.clear();
        let (cx, cy) = cell_coords(pos, self.inv_cell_size);
        for_each_cell_key(cx, cy, cell_radius, |key| {
            results.extend_from_slice(self.buckets.get(key));
        });
    }

    pub fn len(&self) -> usize {
        self.buckets.entries()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn occupied_cells(&self) -> usize {
        self.buckets.occupied_cells()
    }

    /// Bucket lists allocated over the index's lifetime.
    pub fn buckets_created(&self) -> usize {
        self.buckets.pool().created()
    }
}

impl<T: Copy + Eq + Hash> PointHash<T> {
    /// Like [`PointHash::query_nearby`] but reports each distinct item
    /// once, in first-seen order. `seen` is caller-owned scratch.
    pub fn query_nearby_unique(
        &self,
        pos: Vec2,
        results: &mut Vec<T>,
        cell_radius: i32,
        seen: &mut FxHashSet<T>,
    ) {
        results.clear();
        seen.clear();
        let (cx, cy) = cell_coords(pos, self.inv_cell_size);
        for_each_cell_key(cx, cy, cell_radius, |key| {
            for &item in self.buckets.get(key) {
                if seen.insert(item) {
                    results.push(item);
                }
            }
        });
    }
}
