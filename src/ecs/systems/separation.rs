use glam::Vec2;

use crate::ecs::components::SeparationForce;
use crate::ecs::systems::Bodies;
use crate::spatial::IndexSet;
use crate::steering::Separation;

/// Refresh this tick's batch of enemy separation forces. Forces live on
/// the entities, so they survive despawns reshuffling snapshot indices.
pub fn steer(
    world: &hecs::World,
    bodies: &Bodies,
    indices: &IndexSet,
    separation: &mut Separation,
    forces: &mut Vec<Vec2>,
    dt: f32,
) {
    let entities = bodies.enemies.entities();
    forces.clear();
    forces.extend(entities.iter().map(|&e| {
        world
            .get::<&SeparationForce>(e)
            .map(|f| f.0)
            .unwrap_or(Vec2::ZERO)
    }));

    separation.update(
        &bodies.enemies,
        indices.neighbors(),
        indices.neighbor_radius(),
        forces,
        dt,
    );

    for (&entity, &force) in entities.iter().zip(forces.iter()) {
        if let Ok(mut slot) = world.get::<&mut SeparationForce>(entity) {
            slot.0 = force;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, SeparationConfig};
    use crate::ecs::components::{Body, Enemy, Position};
    use crate::ecs::systems::spatial::snapshot;
    use crate::geom::Collider;

    #[test]
    fn overlapping_pair_is_pushed_apart() {
        let mut world = hecs::World::new();
        let mut spawn_at = |x: f32| {
            world.spawn((
                Position(Vec2::new(x, 100.0)),
                Body::single(Collider::circle(10.0)),
                Enemy { speed: 0.0, drop_value: 0 },
                SeparationForce::default(),
            ))
        };
        let left = spawn_at(100.0);
        let right = spawn_at(110.0);

        let mut bodies = Bodies::with_capacity(2);
        snapshot(&world, &mut bodies);
        let mut indices = IndexSet::new(&GridConfig::default());
        indices.update(&bodies.enemies, &bodies.damagers, &bodies.pickups);

        let mut separation = Separation::new(SeparationConfig {
            smoothing: 1.0,
            divisor: 1,
            ..SeparationConfig::default()
        });
        let mut forces = Vec::new();
        steer(&world, &bodies, &indices, &mut separation, &mut forces, 1.0 / 60.0);

        let f_left = world.get::<&SeparationForce>(left).map(|f| f.0).unwrap();
        let f_right = world.get::<&SeparationForce>(right).map(|f| f.0).unwrap();
        assert!(f_left.x < 0.0);
        assert!(f_right.x > 0.0);
        assert!((f_left + f_right).length() < 1e-5);
    }
}
