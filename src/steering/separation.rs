use glam::Vec2;

use crate::config::SeparationConfig;
use crate::geom::{separation_radius, Population};
use crate::spatial::{cell_radius, PointHash};

/// Below this distance two agents are treated as coincident.
const COINCIDENT_EPSILON: f32 = 1e-4;
/// Smoothing is specified per tick at this rate.
const REFERENCE_HZ: f32 = 60.0;
/// Golden angle, spreads fallback directions for coincident agents.
const GOLDEN_ANGLE: f32 = 2.399_963_1;

/// Amortized separation steering.
///
/// Each call refreshes `ceil(n / divisor)` agents starting at a rotating
/// cursor, so every agent is recomputed at least once every `divisor`
/// calls. The rest keep their previous force. Forces live with the caller
/// (one slot per agent) so they survive population reshuffles.
pub struct Separation {
    config: SeparationConfig,
    cursor: usize,
    /// Neighbor query scratch.
    nearby: Vec<u32>,
}

impl Separation {
    pub fn new(config: SeparationConfig) -> Self {
        Self {
            config,
            cursor: 0,
            nearby: Vec::with_capacity(64),
        }
    }

    pub fn config(&self) -> &SeparationConfig {
        &self.config
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn batch_size(&self, population: usize) -> usize {
        population.div_ceil(self.config.divisor.max(1))
    }

    /// Blend factor for this tick, stable across tick lengths.
    pub fn blend_factor(&self, dt: f32) -> f32 {
        let keep = 1.0 - self.config.smoothing;
        (1.0 - keep.powf(dt.max(0.0) * REFERENCE_HZ)).clamp(0.0, 1.0)
    }

    /// Refresh this tick's batch. `neighbors` holds one point per agent,
    /// keyed by agent index; `neighbor_radius` is the largest
    /// `separation_radius` among them. `forces[i]` is agent `i`'s persisted
    /// force.
    pub fn update<P: Population + ?Sized>(
        &mut self,
        agents: &P,
        neighbors: &PointHash<u32>,
        neighbor_radius: f32,
        forces: &mut [Vec2],
        dt: f32,
    ) {
        let n = agents.len();
        debug_assert_eq!(forces.len(), n, "one force slot per agent");
        if n == 0 {
            self.cursor = 0;
            return;
        }
        if self.cursor >= n {
            self.cursor = 0;
        }

        let t = self.blend_factor(dt);
        let batch = self.batch_size(n);
        for k in 0..batch {
            let i = (self.cursor + k) % n;
            let target = self.compute(agents, neighbors, neighbor_radius, i);
            forces[i] = forces[i].lerp(target, t);
        }
        self.cursor = (self.cursor + batch) % n;
    }

    /// Unsmoothed, clamped push for agent `i`.
    pub fn compute<P: Population + ?Sized>(
        &mut self,
        agents: &P,
        neighbors: &PointHash<u32>,
        neighbor_radius: f32,
        i: usize,
    ) -> Vec2 {
        let me = agents.position(i);
        let my_radius = separation_radius(agents.colliders(i));
        // widest gap any neighbor can ask for
        let reach = (my_radius + neighbor_radius) * self.config.gap_multiplier;
        neighbors.query_nearby(me, &mut self.nearby, cell_radius(reach, neighbors.cell_size()));

        let mut sum = Vec2::ZERO;
        let mut contributors = 0;
        for &j in &self.nearby {
            let j = j as usize;
            if j == i {
                continue;
            }
            if contributors >= self.config.max_neighbors {
                break;
            }
            let gap =
                (my_radius + separation_radius(agents.colliders(j))) * self.config.gap_multiplier;
            let delta = me - agents.position(j);
            let dist_sq = delta.length_squared();
            if dist_sq >= gap * gap {
                continue;
            }

            let dist = dist_sq.sqrt();
            let dir = if dist > COINCIDENT_EPSILON {
                delta / dist
            } else {
                let angle = i as f32 * GOLDEN_ANGLE;
                Vec2::new(angle.cos(), angle.sin())
            };
            sum += dir * ((gap - dist) / gap);
            contributors += 1;
        }

        sum.clamp_length_max(self.config.max_force)
    }
}
