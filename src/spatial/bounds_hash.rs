use std::hash::Hash;

use glam::Vec2;
use rustc_hash::FxHashSet;

use super::buckets::CellBuckets;
use super::{cell_coords, cell_key, for_each_cell_key};
use crate::geom::{Collider, HasColliders, Shape};

/// Uniform grid that files each shape under every cell its bounding box
/// touches. Queries deduplicate, so a shape spanning many cells is still
/// reported once.
///
/// Rebuilt from scratch every tick: `clear()` then `insert*()`.
pub struct BoundsHash<T> {
    cell_size: f32,
    inv_cell_size: f32,
    buckets: CellBuckets<T>,
    /// Per-query scratch for dedup. Cleared at the start of each query.
    seen: FxHashSet<T>,
}

impl<T: Copy + Eq + Hash> BoundsHash<T> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            buckets: CellBuckets::new(),
            seen: FxHashSet::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// File `item` under every cell overlapped by `shape`'s bounds.
    pub fn insert_shape(&mut self, shape: &Shape, item: T) {
        let bounds = shape.bounds();
        let (x0, y0) = cell_coords(bounds.min, self.inv_cell_size);
        let (x1, y1) = cell_coords(bounds.max, self.inv_cell_size);
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                self.buckets.push(cell_key(cx, cy), item);
            }
        }
    }

    /// Insert every collider of a body owned at `owner`.
    pub fn insert_colliders(&mut self, item: T, owner: Vec2, colliders: &[Collider]) {
        for collider in colliders {
            self.insert_shape(&collider.shape_at(owner), item);
        }
    }

    pub fn insert(&mut self, item: T, body: &impl HasColliders) {
        self.insert_colliders(item, body.position(), body.colliders());
    }

    /// Clear `results` and fill it with every item filed in the
    /// `(2 * cell_radius + 1)^2` block around `pos`, each at most once.
    ///
    /// The caller sizes `cell_radius` so that `cell_radius * cell_size`
    /// covers the largest extent it cares about.
    pub fn query_nearby(&mut self, pos: Vec2, cell_radius: i32, results: &mut Vec<T>) {
        results.clear();
        self.seen.clear();
        let (cx, cy) = cell_coords(pos, self.inv_cell_size);
        let buckets = &self.buckets;
        let seen = &mut self.seen;
        for_each_cell_key(cx, cy, cell_radius, |key| {
            for &item in buckets.get(key) {
                if seen.insert(item) {
                    results.push(item);
                }
            }
        });
    }

    /// Total (cell, item) filings since the last clear.
    pub fn filings(&self) -> usize {
        self.buckets.entries()
    }

    pub fn occupied_cells(&self) -> usize {
        self.buckets.occupied_cells()
    }

    pub fn buckets_created(&self) -> usize {
        self.buckets.pool().created()
    }
}
