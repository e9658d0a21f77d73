use glam::Vec2;

use crate::geom::{Collider, Population};

/// Flat per-tick copy of one population's positions and colliders.
/// Stored alongside the indices to avoid ECS lookups in the hot path.
/// Index `i` here is the item the spatial indices store.
pub struct BodySet {
    entities: Vec<hecs::Entity>,
    positions: Vec<Vec2>,
    /// (start, len) into `colliders`.
    spans: Vec<(u32, u32)>,
    colliders: Vec<Collider>,
}

impl BodySet {
    pub fn with_capacity(bodies: usize) -> Self {
        Self {
            entities: Vec::with_capacity(bodies),
            positions: Vec::with_capacity(bodies),
            spans: Vec::with_capacity(bodies),
            colliders: Vec::with_capacity(bodies),
        }
    }

    /// Keeps allocations.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.positions.clear();
        self.spans.clear();
        self.colliders.clear();
    }

    pub fn push(&mut self, entity: hecs::Entity, pos: Vec2, colliders: &[Collider]) {
        let start = self.colliders.len() as u32;
        self.colliders.extend_from_slice(colliders);
        self.entities.push(entity);
        self.positions.push(pos);
        self.spans.push((start, colliders.len() as u32));
    }

    pub fn entity(&self, index: usize) -> hecs::Entity {
        self.entities[index]
    }

    pub fn entities(&self) -> &[hecs::Entity] {
        &self.entities
    }
}

impl Population for BodySet {
    fn len(&self) -> usize {
        self.entities.len()
    }

    fn position(&self, index: usize) -> Vec2 {
        self.positions[index]
    }

    fn colliders(&self, index: usize) -> &[Collider] {
        let (start, len) = self.spans[index];
        &self.colliders[start as usize..(start + len) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_address_each_body() {
        let mut world = hecs::World::new();
        let a = world.spawn(());
        let b = world.spawn(());

        let mut set = BodySet::with_capacity(2);
        set.push(a, Vec2::ZERO, &[Collider::circle(1.0), Collider::circle(2.0)]);
        set.push(b, Vec2::ONE, &[Collider::rect(3.0, 4.0)]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.colliders(0).len(), 2);
        assert_eq!(set.colliders(1), &[Collider::rect(3.0, 4.0)]);
        assert_eq!(set.entity(1), b);
        assert_eq!(set.position(1), Vec2::ONE);

        set.clear();
        assert!(set.is_empty());
    }
}
