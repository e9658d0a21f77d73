use glam::Vec2;

use crate::ecs::components::{Enemy, Follow, Lifetime, Pickup, Player, Position, SeparationForce, Velocity};
use crate::ecs::systems::Deferred;

/// Friction on loose pickups, multiplied per tick.
const PICKUP_FRICTION: f32 = 0.90;
/// Minimum velocity magnitude before snapping to zero.
const MIN_VELOCITY: f32 = 0.5;

/// Integrate velocity into position. Enemies steer toward the player and
/// add last tick's separation force first.
pub fn integrate(
    world: &mut hecs::World,
    dt: f32,
    separation_speed: f32,
    follows: &mut Vec<(hecs::Entity, hecs::Entity)>,
) {
    let player_pos = world
        .query::<(&Position, &Player)>()
        .iter()
        .next()
        .map(|(_, (pos, _))| pos.0);

    for (_, (pos, vel, enemy, sep, pickup)) in world.query_mut::<(
        &mut Position,
        &mut Velocity,
        Option<&Enemy>,
        Option<&SeparationForce>,
        Option<&Pickup>,
    )>() {
        if let Some(enemy) = enemy {
            let chase = player_pos
                .map(|p| (p - pos.0).normalize_or_zero() * enemy.speed)
                .unwrap_or(Vec2::ZERO);
            let push = sep.map(|s| s.0).unwrap_or(Vec2::ZERO) * separation_speed;
            vel.0 = chase + push;
        }

        // Integrate velocity
        pos.0 += vel.0 * dt;

        if pickup.is_some() {
            vel.0 *= PICKUP_FRICTION;
            if vel.0.length_squared() < MIN_VELOCITY * MIN_VELOCITY {
                vel.0 = Vec2::ZERO;
            }
        }
    }

    // Snap followers (auras) onto their owners
    follows.clear();
    follows.extend(world.query::<&Follow>().iter().map(|(e, f)| (e, f.0)));
    for &(entity, owner) in follows.iter() {
        let owner_pos = match world.get::<&Position>(owner) {
            Ok(p) => p.0,
            Err(_) => continue,
        };
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            pos.0 = owner_pos;
        }
    }
}

/// Tick down lifetimes and queue expired entities for removal.
pub fn expire(world: &mut hecs::World, dt: f32, deferred: &mut Deferred) -> u32 {
    let mut expired = 0;
    for (entity, life) in world.query_mut::<&mut Lifetime>() {
        life.0 -= dt;
        if life.0 <= 0.0 && deferred.despawn(entity) {
            expired += 1;
        }
    }
    expired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemies_close_on_player() {
        let mut world = hecs::World::new();
        world.spawn((Position(Vec2::ZERO), Velocity(Vec2::ZERO), Player { score: 0, magnet_radius: 0.0 }));
        let enemy = world.spawn((
            Position(Vec2::new(100.0, 0.0)),
            Velocity(Vec2::ZERO),
            Enemy { speed: 60.0, drop_value: 1 },
            SeparationForce(Vec2::new(0.0, 1.0)),
        ));
        let mut follows = Vec::new();
        integrate(&mut world, 0.5, 10.0, &mut follows);

        let pos = world.get::<&Position>(enemy).map(|p| p.0).unwrap();
        assert!((pos.x - 70.0).abs() < 1e-4);
        assert!((pos.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn followers_track_owner() {
        let mut world = hecs::World::new();
        let owner = world.spawn((Position(Vec2::ZERO), Velocity(Vec2::new(10.0, 0.0))));
        let aura = world.spawn((Position(Vec2::ZERO), Follow(owner)));
        let mut follows = Vec::new();
        integrate(&mut world, 1.0, 0.0, &mut follows);
        assert_eq!(world.get::<&Position>(aura).map(|p| p.0).unwrap(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn expired_entities_are_deferred() {
        let mut world = hecs::World::new();
        let short = world.spawn((Lifetime(0.01),));
        let long = world.spawn((Lifetime(5.0),));
        let mut deferred = Deferred::new();
        assert_eq!(expire(&mut world, 0.1, &mut deferred), 1);
        assert!(world.contains(short));
        deferred.apply(&mut world);
        assert!(!world.contains(short));
        assert!(world.contains(long));
    }
}
