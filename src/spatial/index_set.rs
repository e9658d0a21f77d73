use glam::Vec2;

use super::{cell_radius, PointHash};
use crate::config::GridConfig;
use crate::debug::timer::{scope, IndexOp, NoTelemetry, Telemetry};
use crate::geom::{separation_radius, Population};

/// Semantically distinct populations, each with its own point grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Category {
    Enemy = 0,
    /// Anything that damages enemies.
    Damager = 1,
    Pickup = 2,
}

impl Category {
    fn grid_op(self) -> IndexOp {
        match self {
            Self::Enemy => IndexOp::EnemyGrid,
            Self::Damager => IndexOp::DamagerGrid,
            Self::Pickup => IndexOp::PickupGrid,
        }
    }

    pub const ALL: [Category; 3] = [Self::Enemy, Self::Damager, Self::Pickup];

    pub fn label(self) -> &'static str {
        match self {
            Self::Enemy => "Enemy",
            Self::Damager => "Damager",
            Self::Pickup => "Pickup",
        }
    }
}

/// Owns every per-tick point index and refreshes them together.
///
/// Category grids hold one entry per collider (at the collider centre),
/// so each segment of a segmented body is queryable on its own. The
/// neighbor grid holds one entry per enemy at its owner position and
/// uses a coarser cell for flocking.
pub struct IndexSet {
    grids: [PointHash<u32>; 3],
    /// Largest collider `approximate_radius` seen this tick, per category.
    max_radius: [f32; 3],
    neighbors: PointHash<u32>,
    /// Largest `separation_radius` among enemies this tick.
    neighbor_radius: f32,
}

impl IndexSet {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            grids: [
                PointHash::new(config.enemy_cell),
                PointHash::new(config.damager_cell),
                PointHash::new(config.pickup_cell),
            ],
            max_radius: [0.0; 3],
            neighbors: PointHash::new(config.neighbor_cell),
            neighbor_radius: 0.0,
        }
    }

    /// Clear and rebuild every index from settled positions.
    pub fn update<E, D, P>(&mut self, enemies: &E, damagers: &D, pickups: &P)
    where
        E: Population + ?Sized,
        D: Population + ?Sized,
        P: Population + ?Sized,
    {
        self.update_with(enemies, damagers, pickups, &mut NoTelemetry);
    }

    /// `update`, timing each grid rebuild into `sink`.
    pub fn update_with<E, D, P, S>(&mut self, enemies: &E, damagers: &D, pickups: &P, sink: &mut S)
    where
        E: Population + ?Sized,
        D: Population + ?Sized,
        P: Population + ?Sized,
        S: Telemetry + ?Sized,
    {
        self.rebuild(Category::Enemy, enemies, &mut *sink);
        self.rebuild(Category::Damager, damagers, &mut *sink);
        self.rebuild(Category::Pickup, pickups, &mut *sink);

        {
            let _t = scope(&mut *sink, IndexOp::NeighborGrid);
            self.neighbors.clear();
            let mut max_r = 0.0f32;
            for i in 0..enemies.len() {
                self.neighbors.insert(enemies.position(i), i as u32);
                max_r = max_r.max(separation_radius(enemies.colliders(i)));
            }
            self.neighbor_radius = max_r;
        }

        log::trace!(
            "index set rebuilt: enemies={} damagers={} pickups={} max_r=[{:.1}, {:.1}, {:.1}]",
            self.grids[0].len(),
            self.grids[1].len(),
            self.grids[2].len(),
            self.max_radius[0],
            self.max_radius[1],
            self.max_radius[2],
        );
    }

    fn rebuild<P, S>(&mut self, category: Category, sources: &P, sink: &mut S)
    where
        P: Population + ?Sized,
        S: Telemetry + ?Sized,
    {
        let _t = scope(sink, category.grid_op());
        let idx = category as usize;
        let grid = &mut self.grids[idx];
        let mut max_r = 0.0f32;
        grid.clear();
        for i in 0..sources.len() {
            let owner = sources.position(i);
            for collider in sources.colliders(i) {
                grid.insert(collider.center_at(owner), i as u32);
                max_r = max_r.max(collider.approximate_radius());
            }
        }
        self.max_radius[idx] = max_r;
    }

    pub fn grid(&self, category: Category) -> &PointHash<u32> {
        &self.grids[category as usize]
    }

    pub fn neighbors(&self) -> &PointHash<u32> {
        &self.neighbors
    }

    /// Largest separation radius in the neighbor grid. A neighbor query
    /// must cover `(own + neighbor_radius) * gap_multiplier` to see every
    /// agent close enough to push.
    pub fn neighbor_radius(&self) -> f32 {
        self.neighbor_radius
    }

    pub fn max_radius(&self, category: Category) -> f32 {
        self.max_radius[category as usize]
    }

    /// Search distance that guarantees every collider of `category` able to
    /// overlap a probe of `probe_radius` has its centre inside it.
    pub fn query_padding(&self, category: Category, probe_radius: f32) -> f32 {
        probe_radius.max(0.0) + self.max_radius(category)
    }

    pub fn cell_radius_for(&self, category: Category, reach: f32) -> i32 {
        cell_radius(reach, self.grid(category).cell_size())
    }

    /// Candidates from `category` that may overlap a probe of `probe_radius`
    /// at `pos`. May contain duplicates for multi-collider bodies.
    pub fn query_candidates(
        &self,
        category: Category,
        pos: Vec2,
        probe_radius: f32,
        results: &mut Vec<u32>,
    ) {
        let reach = self.query_padding(category, probe_radius);
        let r = self.cell_radius_for(category, reach);
        self.grid(category).query_nearby(pos, results, r);
    }
}
