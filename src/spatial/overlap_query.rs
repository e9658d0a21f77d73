use glam::Vec2;
use rustc_hash::FxHashSet;

use super::{cell_radius, BoundsHash};
use crate::debug::timer::{scope, IndexOp, NoTelemetry, Telemetry};
use crate::geom::{overlaps, Population};
use crate::util::pool::Pool;

/// One (target, source) hit. Both are indices into the populations that
/// were passed to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlapPair {
    pub target: u32,
    pub source: u32,
}

/// Bounds-hash over one source population plus the scratch needed to
/// test target populations against it.
///
/// Create one per source population at setup (projectiles, auras,
/// pickups...) and keep it for the whole run; `build` reuses the grid.
pub struct OverlapQuery {
    index: BoundsHash<u32>,
    scratch: Pool<u32>,
    /// Sources already paired with the current target.
    matched: FxHashSet<u32>,
    built_len: usize,
}

impl OverlapQuery {
    pub fn new(cell_size: f32) -> Self {
        Self {
            index: BoundsHash::new(cell_size),
            scratch: Pool::with_capacity(1, 64),
            matched: FxHashSet::default(),
            built_len: 0,
        }
    }

    pub fn index(&self) -> &BoundsHash<u32> {
        &self.index
    }

    /// Clear the grid and file every collider of every source.
    pub fn build<S: Population + ?Sized>(&mut self, sources: &S) {
        self.build_with(sources, &mut NoTelemetry);
    }

    /// `build`, timed into `sink`.
    pub fn build_with<S, M>(&mut self, sources: &S, sink: &mut M)
    where
        S: Population + ?Sized,
        M: Telemetry + ?Sized,
    {
        let _t = scope(sink, IndexOp::OverlapBuild);
        self.index.clear();
        for i in 0..sources.len() {
            self.index
                .insert_colliders(i as u32, sources.position(i), sources.colliders(i));
        }
        self.built_len = sources.len();
        log::trace!(
            "overlap index built: {} sources, {} cells",
            self.built_len,
            self.index.occupied_cells()
        );
    }

    /// Clear `pairs` and fill it with every (target, source) whose colliders
    /// overlap. `sources` must be the population last passed to `build`.
    ///
    /// A pair is reported once however many collider combinations touch.
    pub fn find_overlaps_into<T, S>(&mut self, targets: &T, sources: &S, pairs: &mut Vec<OverlapPair>)
    where
        T: Population + ?Sized,
        S: Population + ?Sized,
    {
        self.find_overlaps_with(targets, sources, pairs, &mut NoTelemetry);
    }

    /// `find_overlaps_into`, timed into `sink`.
    pub fn find_overlaps_with<T, S, M>(
        &mut self,
        targets: &T,
        sources: &S,
        pairs: &mut Vec<OverlapPair>,
        sink: &mut M,
    ) where
        T: Population + ?Sized,
        S: Population + ?Sized,
        M: Telemetry + ?Sized,
    {
        let _t = scope(sink, IndexOp::OverlapFind);
        debug_assert_eq!(
            sources.len(),
            self.built_len,
            "overlap index is stale: rebuild before querying"
        );
        pairs.clear();
        if sources.is_empty() {
            return;
        }

        let cell_size = self.index.cell_size();
        let mut nearby = self.scratch.scoped();

        for t in 0..targets.len() {
            let owner = targets.position(t);
            self.matched.clear();

            for collider in targets.colliders(t) {
                let probe = collider.shape_at(owner);
                let radius = cell_radius(probe.approximate_radius(), cell_size);
                self.index.query_nearby(probe.center(), radius, &mut nearby);

                for &s in nearby.iter() {
                    if self.matched.contains(&s) {
                        continue;
                    }
                    let s_owner: Vec2 = sources.position(s as usize);
                    let hit = sources
                        .colliders(s as usize)
                        .iter()
                        .any(|c| overlaps(&probe, &c.shape_at(s_owner)));
                    if hit {
                        self.matched.insert(s);
                        pairs.push(OverlapPair {
                            target: t as u32,
                            source: s,
                        });
                    }
                }
            }
        }
    }
}
