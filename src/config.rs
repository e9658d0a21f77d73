use thiserror::Error;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Enemy point grid. ~2x a typical enemy radius.
const ENEMY_CELL_SIZE: f32 = 48.0;
/// Projectiles, auras and other things that hurt enemies.
const DAMAGER_CELL_SIZE: f32 = 64.0;
/// Pickups are small and dense; a tight grid keeps buckets short.
const PICKUP_CELL_SIZE: f32 = 32.0;
/// Flocking looks further than exact overlap does.
const NEIGHBOR_CELL_SIZE: f32 = 96.0;
/// Bounds-hash grids used for exact overlap resolution.
const OVERLAP_CELL_SIZE: f32 = 64.0;

const GAP_MULTIPLIER: f32 = 1.2;
const MAX_NEIGHBORS: usize = 8;
const MAX_FORCE: f32 = 1.0;
const SMOOTHING: f32 = 0.25;
const BATCH_DIVISOR: usize = 4;

/// Seconds per simulation tick.
const TICK_RATE: f32 = 1.0 / 60.0;
/// Max accumulated time before clamping (prevents spiral of death).
const MAX_ACCUMULATOR: f32 = 0.25;
/// Pixels/second² of pull on pickups inside the magnet radius.
const MAGNET_ACCEL: f32 = 900.0;
const MAGNET_RADIUS: f32 = 120.0;
/// Separation force (unit-bounded) is scaled to this speed.
const SEPARATION_SPEED: f32 = 60.0;
/// How often (simulated seconds) tick stats are logged.
const STATS_LOG_INTERVAL: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} cell size must be positive and finite, got {value}")]
    CellSize { name: &'static str, value: f32 },
    #[error("separation {name} must be in {range}, got {value}")]
    Separation {
        name: &'static str,
        range: &'static str,
        value: f32,
    },
    #[error("separation batch divisor must be at least 1")]
    ZeroDivisor,
    #[error("tick rate must be positive and finite, got {0}")]
    TickRate(f32),
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Cell sizes, tuned independently per index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub enemy_cell: f32,
    pub damager_cell: f32,
    pub pickup_cell: f32,
    pub neighbor_cell: f32,
    pub overlap_cell: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enemy_cell: ENEMY_CELL_SIZE,
            damager_cell: DAMAGER_CELL_SIZE,
            pickup_cell: PICKUP_CELL_SIZE,
            neighbor_cell: NEIGHBOR_CELL_SIZE,
            overlap_cell: OVERLAP_CELL_SIZE,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("enemy", self.enemy_cell),
            ("damager", self.damager_cell),
            ("pickup", self.pickup_cell),
            ("neighbor", self.neighbor_cell),
            ("overlap", self.overlap_cell),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::CellSize { name, value });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Separation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationConfig {
    /// Desired gap = (r_a + r_b) * gap_multiplier.
    pub gap_multiplier: f32,
    /// Stop accumulating after this many contributing neighbors.
    pub max_neighbors: usize,
    /// Magnitude cap on the summed push.
    pub max_force: f32,
    /// Per-tick (at 60 Hz) blend factor toward the new force, in (0, 1].
    pub smoothing: f32,
    /// Agents refreshed per tick = ceil(n / divisor).
    pub divisor: usize,
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            gap_multiplier: GAP_MULTIPLIER,
            max_neighbors: MAX_NEIGHBORS,
            max_force: MAX_FORCE,
            smoothing: SMOOTHING,
            divisor: BATCH_DIVISOR,
        }
    }
}

impl SeparationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.gap_multiplier.is_finite() && self.gap_multiplier > 0.0) {
            return Err(ConfigError::Separation {
                name: "gap_multiplier",
                range: "(0, inf)",
                value: self.gap_multiplier,
            });
        }
        if !(self.max_force.is_finite() && self.max_force >= 0.0) {
            return Err(ConfigError::Separation {
                name: "max_force",
                range: "[0, inf)",
                value: self.max_force,
            });
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::Separation {
                name: "smoothing",
                range: "(0, 1]",
                value: self.smoothing,
            });
        }
        if self.divisor == 0 {
            return Err(ConfigError::ZeroDivisor);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub separation: SeparationConfig,
    pub tick_rate: f32,
    pub max_accumulator: f32,
    pub magnet_radius: f32,
    pub magnet_accel: f32,
    pub separation_speed: f32,
    pub stats_log_interval: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            separation: SeparationConfig::default(),
            tick_rate: TICK_RATE,
            max_accumulator: MAX_ACCUMULATOR,
            magnet_radius: MAGNET_RADIUS,
            magnet_accel: MAGNET_ACCEL,
            separation_speed: SEPARATION_SPEED,
            stats_log_interval: STATS_LOG_INTERVAL,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.separation.validate()?;
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(ConfigError::TickRate(self.tick_rate));
        }
        if self.max_accumulator < self.tick_rate {
            log::warn!(
                "max accumulator {}s is shorter than one tick; sim will stall",
                self.max_accumulator
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let grid = GridConfig {
            pickup_cell: 0.0,
            ..GridConfig::default()
        };
        assert!(matches!(
            grid.validate(),
            Err(ConfigError::CellSize { name: "pickup", .. })
        ));

        let sep = SeparationConfig {
            divisor: 0,
            ..SeparationConfig::default()
        };
        assert_eq!(sep.validate(), Err(ConfigError::ZeroDivisor));

        let sep = SeparationConfig {
            smoothing: 1.5,
            ..SeparationConfig::default()
        };
        assert!(sep.validate().is_err());

        let sim = SimConfig {
            tick_rate: f32::NAN,
            ..SimConfig::default()
        };
        assert!(matches!(sim.validate(), Err(ConfigError::TickRate(_))));
    }

    #[test]
    fn errors_render_readably() {
        let err = ConfigError::CellSize {
            name: "enemy",
            value: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "enemy cell size must be positive and finite, got -1"
        );
    }
}
