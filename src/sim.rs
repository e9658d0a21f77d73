use instant::Instant;

use crate::config::{ConfigError, SimConfig};
use crate::debug::timer::{scope, PhaseTimers, Telemetry, TickPhase};
use crate::debug::TickStats;
use crate::ecs::systems::{
    damage, movement, pickups, separation, spatial, weapons, Bodies, Deferred, TickBuffers,
    TickReport,
};
use crate::spatial::{IndexSet, OverlapQuery};
use crate::steering::Separation;

/// Initial capacity for per-tick buffers.
const INITIAL_CAPACITY: usize = 1024;

/// Owns the world, every spatial index and the fixed-timestep clock.
///
/// Each tick runs in a fixed order:
/// 1. movement settles all positions,
/// 2. populations are snapshotted and every index is rebuilt,
/// 3. queries run (weapons, damage, pickups, separation),
/// 4. queued spawns and despawns are applied.
///
/// Queries never see a partially rebuilt index and entity removal never
/// happens while an index still refers to it.
pub struct Simulation<T: Telemetry = PhaseTimers> {
    world: hecs::World,
    config: SimConfig,

    indices: IndexSet,
    /// Enemies as overlap sources, damagers query it.
    enemy_overlap: OverlapQuery,
    /// Pickups as overlap sources, players query it.
    pickup_overlap: OverlapQuery,
    separation: Separation,

    bodies: Bodies,
    bufs: TickBuffers,
    deferred: Deferred,

    // Fixed timestep
    accumulator: f32,

    telemetry: T,
    stats: TickStats,
    last_report: TickReport,
    totals: TickReport,
}

impl Simulation<PhaseTimers> {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        Self::with_telemetry(config, PhaseTimers::new())
    }
}

impl<T: Telemetry> Simulation<T> {
    pub fn with_telemetry(config: SimConfig, telemetry: T) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            world: hecs::World::new(),
            indices: IndexSet::new(&config.grid),
            enemy_overlap: OverlapQuery::new(config.grid.overlap_cell),
            pickup_overlap: OverlapQuery::new(config.grid.overlap_cell),
            separation: Separation::new(config.separation),
            bodies: Bodies::with_capacity(INITIAL_CAPACITY),
            bufs: TickBuffers::new(INITIAL_CAPACITY),
            deferred: Deferred::new(),
            accumulator: 0.0,
            telemetry,
            stats: TickStats::new(config.stats_log_interval),
            last_report: TickReport::default(),
            totals: TickReport::default(),
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    /// Spawning and despawning between ticks is fine; every index is
    /// rebuilt from the world at the start of the next tick.
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn indices(&self) -> &IndexSet {
        &self.indices
    }

    pub fn bodies(&self) -> &Bodies {
        &self.bodies
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn tick_count(&self) -> u64 {
        self.stats.tick_count()
    }

    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    /// Summed over every tick so far.
    pub fn totals(&self) -> &TickReport {
        &self.totals
    }

    /// Feed wall-clock frame time; runs as many fixed ticks as fit.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        if self.accumulator > self.config.max_accumulator {
            self.accumulator = self.config.max_accumulator;
        }

        let mut ticks = 0;
        while self.accumulator >= self.config.tick_rate {
            self.tick(self.config.tick_rate);
            self.accumulator -= self.config.tick_rate;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a tick left in the accumulator, for render interpolation.
    pub fn interpolation_alpha(&self) -> f32 {
        self.accumulator / self.config.tick_rate
    }

    /// Run exactly one tick of `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let start = Instant::now();
        let mut report = TickReport::default();

        {
            let _t = scope(&mut self.telemetry, TickPhase::Movement);
            movement::integrate(
                &mut self.world,
                dt,
                self.config.separation_speed,
                &mut self.bufs.follows,
            );
        }
        {
            let _t = scope(&mut self.telemetry, TickPhase::Snapshot);
            spatial::snapshot(&self.world, &mut self.bodies);
        }
        {
            let mut t = scope(&mut self.telemetry, TickPhase::IndexRebuild);
            self.indices.update_with(
                &self.bodies.enemies,
                &self.bodies.damagers,
                &self.bodies.pickups,
                t.sink(),
            );
        }
        {
            let mut t = scope(&mut self.telemetry, TickPhase::OverlapBuild);
            self.enemy_overlap.build_with(&self.bodies.enemies, t.sink());
            self.pickup_overlap.build_with(&self.bodies.pickups, t.sink());
        }
        {
            let mut t = scope(&mut self.telemetry, TickPhase::Damage);
            report.fired = weapons::fire(
                &self.world,
                &self.bodies,
                &self.indices,
                &mut self.bufs.candidates,
                &mut self.deferred,
                dt,
            );
            let outcome = damage::resolve(
                &self.world,
                &self.bodies,
                &mut self.enemy_overlap,
                &mut self.bufs.pairs,
                &mut self.deferred,
                dt,
                t.sink(),
            );
            report.hits = outcome.hits;
            report.kills = outcome.kills;
        }
        {
            let mut t = scope(&mut self.telemetry, TickPhase::Pickups);
            pickups::attract(
                &self.world,
                &self.bodies,
                &self.indices,
                &mut self.bufs.candidates,
                self.config.magnet_accel,
                dt,
            );
            report.collected = pickups::collect(
                &self.world,
                &self.bodies,
                &mut self.pickup_overlap,
                &mut self.bufs.pairs,
                &mut self.deferred,
                t.sink(),
            );
        }
        {
            let _t = scope(&mut self.telemetry, TickPhase::Separation);
            separation::steer(
                &self.world,
                &self.bodies,
                &self.indices,
                &mut self.separation,
                &mut self.bufs.forces,
                dt,
            );
        }
        {
            let _t = scope(&mut self.telemetry, TickPhase::Cleanup);
            movement::expire(&mut self.world, dt, &mut self.deferred);
            let (despawned, spawned) = self.deferred.apply(&mut self.world);
            report.despawned = despawned;
            report.spawned = spawned;
        }

        let cost_us = start.elapsed().as_secs_f64() * 1_000_000.0;
        if self.stats.record_tick(cost_us, dt, self.world.len()) {
            self.telemetry.log_summary();
            log::debug!(
                "  totals: {} kills, {} collected, {} fired",
                self.totals.kills,
                self.totals.collected,
                self.totals.fired
            );
        }

        self.last_report = report;
        self.totals.accumulate(&report);
        report
    }
}
