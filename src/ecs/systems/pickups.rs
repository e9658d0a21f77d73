use crate::debug::timer::Telemetry;
use crate::ecs::components::{Pickup, Player, Velocity};
use crate::ecs::systems::{Bodies, Deferred};
use crate::geom::Population;
use crate::spatial::{Category, IndexSet, OverlapPair, OverlapQuery};

/// Pull loose pickups toward each player inside their magnet radius.
/// Only velocities change; positions settle in next tick's movement.
pub fn attract(
    world: &hecs::World,
    bodies: &Bodies,
    indices: &IndexSet,
    candidates: &mut Vec<u32>,
    accel: f32,
    dt: f32,
) {
    for p in 0..bodies.players.len() {
        let player_pos = bodies.players.position(p);
        let radius = match world.get::<&Player>(bodies.players.entity(p)) {
            Ok(player) => player.magnet_radius,
            Err(_) => continue,
        };
        if radius <= 0.0 {
            continue;
        }

        indices.query_candidates(Category::Pickup, player_pos, radius, candidates);
        // One grid point per collider; pull each pickup once.
        candidates.sort_unstable();
        candidates.dedup();

        let r2 = radius * radius;
        for &c in candidates.iter() {
            let pickup_pos = bodies.pickups.position(c as usize);
            let to_player = player_pos - pickup_pos;
            if to_player.length_squared() > r2 {
                continue;
            }
            if let Ok(mut vel) = world.get::<&mut Velocity>(bodies.pickups.entity(c as usize)) {
                vel.0 += to_player.normalize_or_zero() * accel * dt;
            }
        }
    }
}

/// Collect every pickup touching a player. `overlap` must already be built
/// from `bodies.pickups` this tick. Returns the number collected.
pub fn collect<S: Telemetry + ?Sized>(
    world: &hecs::World,
    bodies: &Bodies,
    overlap: &mut OverlapQuery,
    pairs: &mut Vec<OverlapPair>,
    deferred: &mut Deferred,
    sink: &mut S,
) -> u32 {
    overlap.find_overlaps_with(&bodies.players, &bodies.pickups, pairs, sink);

    let mut collected = 0;
    for pair in pairs.iter() {
        let pickup_entity = bodies.pickups.entity(pair.source as usize);
        let value = match world.get::<&Pickup>(pickup_entity) {
            Ok(p) => p.value,
            Err(_) => continue,
        };
        if !deferred.despawn(pickup_entity) {
            continue;
        }
        if let Ok(mut player) = world.get::<&mut Player>(bodies.players.entity(pair.target as usize)) {
            player.score += value;
        }
        collected += 1;
    }
    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use crate::debug::timer::NoTelemetry;
    use crate::ecs::components::{Body, Position};
    use crate::ecs::systems::spatial::snapshot;
    use crate::geom::Collider;
    use crate::spawn;
    use glam::Vec2;

    fn player(world: &mut hecs::World, pos: Vec2, magnet: f32) -> hecs::Entity {
        world.spawn((
            Position(pos),
            Velocity(Vec2::ZERO),
            Body::single(Collider::circle(12.0)),
            Player { score: 0, magnet_radius: magnet },
        ))
    }

    #[test]
    fn touching_pickups_are_collected_once() {
        let mut world = hecs::World::new();
        let hero = player(&mut world, Vec2::new(50.0, 50.0), 0.0);
        let near = world.spawn(spawn::pickup(Vec2::new(58.0, 50.0), 2));
        let far = world.spawn(spawn::pickup(Vec2::new(300.0, 50.0), 5));

        let mut bodies = Bodies::with_capacity(4);
        snapshot(&world, &mut bodies);
        let mut overlap = OverlapQuery::new(32.0);
        overlap.build(&bodies.pickups);
        let mut pairs = Vec::new();
        let mut deferred = Deferred::new();

        let collected = collect(
            &world,
            &bodies,
            &mut overlap,
            &mut pairs,
            &mut deferred,
            &mut NoTelemetry,
        );
        assert_eq!(collected, 1);
        deferred.apply(&mut world);

        assert!(!world.contains(near));
        assert!(world.contains(far));
        assert_eq!(world.get::<&Player>(hero).map(|p| p.score).unwrap(), 2);
    }

    #[test]
    fn magnet_pulls_only_pickups_in_radius() {
        let mut world = hecs::World::new();
        player(&mut world, Vec2::ZERO, 100.0);
        let inside = world.spawn(spawn::pickup(Vec2::new(80.0, 0.0), 1));
        let outside = world.spawn(spawn::pickup(Vec2::new(0.0, 140.0), 1));

        let mut bodies = Bodies::with_capacity(4);
        snapshot(&world, &mut bodies);
        let mut indices = IndexSet::new(&GridConfig::default());
        indices.update(&bodies.enemies, &bodies.damagers, &bodies.pickups);

        let mut candidates = Vec::new();
        attract(&world, &bodies, &indices, &mut candidates, 600.0, 0.5);

        let v_in = world.get::<&Velocity>(inside).map(|v| v.0).unwrap();
        let v_out = world.get::<&Velocity>(outside).map(|v| v.0).unwrap();
        assert!((v_in - Vec2::new(-300.0, 0.0)).length() < 1e-3);
        assert_eq!(v_out, Vec2::ZERO);
    }
}
