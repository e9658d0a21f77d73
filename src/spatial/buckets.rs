use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::util::pool::Pool;

/// Cell key -> bucket map that only ever clears the cells it touched.
/// Emptied buckets go back to a pool instead of being freed.
pub(crate) struct CellBuckets<T> {
    cells: FxHashMap<u64, Vec<T>>,
    touched: Vec<u64>,
    pool: Pool<T>,
    entries: usize,
}

impl<T> CellBuckets<T> {
    pub(crate) fn new() -> Self {
        Self {
            cells: FxHashMap::default(),
            touched: Vec::new(),
            pool: Pool::new(),
            entries: 0,
        }
    }

    pub(crate) fn push(&mut self, key: u64, item: T) {
        match self.cells.entry(key) {
            Entry::Occupied(bucket) => bucket.into_mut().push(item),
            Entry::Vacant(slot) => {
                self.touched.push(key);
                let mut bucket = self.pool.acquire();
                bucket.push(item);
                slot.insert(bucket);
            }
        }
        self.entries += 1;
    }

    pub(crate) fn get(&self, key: u64) -> &[T] {
        self.cells.get(&key).map_or(&[], Vec::as_slice)
    }

    /// O(cells touched since the last clear).
    pub(crate) fn clear(&mut self) {
        for key in self.touched.drain(..) {
            if let Some(bucket) = self.cells.remove(&key) {
                self.pool.release(bucket);
            }
        }
        self.entries = 0;
    }

    pub(crate) fn occupied_cells(&self) -> usize {
        self.touched.len()
    }

    pub(crate) fn entries(&self) -> usize {
        self.entries
    }

    pub(crate) fn pool(&self) -> &Pool<T> {
        &self.pool
    }
}
