pub mod damage;
pub mod movement;
pub mod pickups;
pub mod separation;
pub mod spatial;
pub mod weapons;

use glam::Vec2;
use rustc_hash::FxHashSet;

use crate::ecs::snapshot::BodySet;
use crate::spatial::OverlapPair;

/// Per-tick snapshots of every population the indices are built from.
pub struct Bodies {
    pub players: BodySet,
    pub enemies: BodySet,
    pub damagers: BodySet,
    pub pickups: BodySet,
}

impl Bodies {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            players: BodySet::with_capacity(1),
            enemies: BodySet::with_capacity(capacity),
            damagers: BodySet::with_capacity(capacity / 4),
            pickups: BodySet::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.players.clear();
        self.enemies.clear();
        self.damagers.clear();
        self.pickups.clear();
    }
}

/// Pre-allocated buffers reused each tick. Each has one consumer at a
/// time and is overwritten by the next call.
pub struct TickBuffers {
    pub pairs: Vec<OverlapPair>,
    pub candidates: Vec<u32>,
    pub forces: Vec<Vec2>,
    pub follows: Vec<(hecs::Entity, hecs::Entity)>,
}

impl TickBuffers {
    pub fn new(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(256),
            candidates: Vec::with_capacity(64),
            forces: Vec::with_capacity(capacity),
            follows: Vec::with_capacity(16),
        }
    }
}

/// Entity additions and removals queued during the tick and applied after
/// every query has run, so indices never point at half-updated state.
pub struct Deferred {
    commands: hecs::CommandBuffer,
    doomed: FxHashSet<hecs::Entity>,
    spawned: u32,
}

impl Deferred {
    pub fn new() -> Self {
        Self {
            commands: hecs::CommandBuffer::new(),
            doomed: FxHashSet::default(),
            spawned: 0,
        }
    }

    /// Queue a despawn. Returns false if the entity was already queued.
    pub fn despawn(&mut self, entity: hecs::Entity) -> bool {
        if !self.doomed.insert(entity) {
            return false;
        }
        self.commands.despawn(entity);
        true
    }

    pub fn is_doomed(&self, entity: hecs::Entity) -> bool {
        self.doomed.contains(&entity)
    }

    pub fn spawn(&mut self, bundle: impl hecs::DynamicBundle) {
        self.commands.spawn(bundle);
        self.spawned += 1;
    }

    /// Apply everything queued. Returns (despawned, spawned).
    pub fn apply(&mut self, world: &mut hecs::World) -> (u32, u32) {
        self.commands.run_on(world);
        let counts = (self.doomed.len() as u32, self.spawned);
        self.doomed.clear();
        self.spawned = 0;
        counts
    }
}

impl Default for Deferred {
    fn default() -> Self {
        Self::new()
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub hits: u32,
    pub kills: u32,
    pub fired: u32,
    pub collected: u32,
    pub despawned: u32,
    pub spawned: u32,
}

impl TickReport {
    pub fn accumulate(&mut self, other: &TickReport) {
        self.hits += other.hits;
        self.kills += other.kills;
        self.fired += other.fired;
        self.collected += other.collected;
        self.despawned += other.despawned;
        self.spawned += other.spawned;
    }
}
