use glam::Vec2;

use crate::ecs::components::{
    Body, Damager, Enemy, Follow, Health, Lifetime, Pickup, Player, Position, SeparationForce,
    Velocity, Weapon,
};
use crate::geom::Collider;

const PLAYER_RADIUS: f32 = 14.0;
const PICKUP_RADIUS: f32 = 6.0;
const PROJECTILE_RADIUS: f32 = 4.0;

/// One in this many enemies is a segmented worm.
const WORM_ODDS: usize = 40;
const WORM_SEGMENTS: usize = 4;
const WORM_SEGMENT_SPACING: f32 = 22.0;

/// Pickup component bundle, also used for drops spawned mid-tick.
pub fn pickup(pos: Vec2, value: u32) -> (Position, Velocity, Body, Pickup) {
    (
        Position(pos),
        Velocity(Vec2::ZERO),
        Body::single(Collider::circle(PICKUP_RADIUS)),
        Pickup { value },
    )
}

pub fn projectile(
    pos: Vec2,
    vel: Vec2,
    damage: f32,
    pierce: u32,
    lifetime: f32,
) -> (Position, Velocity, Body, Damager, Lifetime) {
    (
        Position(pos),
        Velocity(vel),
        Body::single(Collider::circle(PROJECTILE_RADIUS)),
        Damager::projectile(damage, pierce),
        Lifetime(lifetime),
    )
}

pub fn spawn_player(world: &mut hecs::World, pos: Vec2, magnet_radius: f32) -> hecs::Entity {
    world.spawn((
        Position(pos),
        Velocity(Vec2::ZERO),
        Body::single(Collider::circle(PLAYER_RADIUS)),
        Player {
            score: 0,
            magnet_radius,
        },
        Weapon {
            cooldown: 0.4,
            timer: 0.0,
            range: 320.0,
            projectile_speed: 480.0,
            damage: 12.0,
            pierce: 2,
        },
    ))
}

/// Damage aura glued to `owner`.
pub fn spawn_aura(
    world: &mut hecs::World,
    owner: hecs::Entity,
    radius: f32,
    damage_per_second: f32,
) -> hecs::Entity {
    let pos = world
        .get::<&Position>(owner)
        .map(|p| p.0)
        .unwrap_or(Vec2::ZERO);
    world.spawn((
        Position(pos),
        Body::single(Collider::circle(radius)),
        Damager::aura(damage_per_second),
        Follow(owner),
    ))
}

/// Scatter `count` enemies over a `size` arena, keeping clear of `safe`
/// by `safe_radius`. Mostly round grunts, some boxy brutes and the
/// occasional multi-segment worm.
pub fn spawn_enemies(
    world: &mut hecs::World,
    rng: &mut fastrand::Rng,
    count: usize,
    size: Vec2,
    safe: Vec2,
    safe_radius: f32,
) {
    for _ in 0..count {
        let mut pos = Vec2::new(rng.f32() * size.x, rng.f32() * size.y);
        if pos.distance_squared(safe) < safe_radius * safe_radius {
            // Push out to the edge of the safe zone
            let dir = (pos - safe).normalize_or_zero();
            let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
            pos = safe + dir * safe_radius;
        }

        let roll = rng.usize(0..WORM_ODDS);
        let (body, health, speed, drop_value) = if roll == 0 {
            (worm(), 120.0, 40.0, 10)
        } else if roll < WORM_ODDS / 4 {
            let side = 18.0 + rng.f32() * 8.0;
            (Body::single(Collider::rect(side, side)), 40.0, 45.0, 3)
        } else {
            let radius = 8.0 + rng.f32() * 6.0;
            (Body::single(Collider::circle(radius)), 15.0, 60.0 + rng.f32() * 20.0, 1)
        };

        world.spawn((
            Position(pos),
            Velocity(Vec2::ZERO),
            body,
            Health(health),
            Enemy { speed, drop_value },
            SeparationForce::default(),
        ));
    }
}

/// Head at the owner's position, segments trailing along +y and shrinking.
fn worm() -> Body {
    let colliders = (0..WORM_SEGMENTS)
        .map(|i| {
            let radius = 16.0 - i as f32 * 2.5;
            Collider::circle(radius).with_offset(Vec2::new(0.0, i as f32 * WORM_SEGMENT_SPACING))
        })
        .collect();
    Body { colliders }
}

pub fn spawn_pickups(world: &mut hecs::World, rng: &mut fastrand::Rng, count: usize, size: Vec2) {
    for _ in 0..count {
        let pos = Vec2::new(rng.f32() * size.x, rng.f32() * size.y);
        world.spawn(pickup(pos, rng.u32(1..4)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemies_avoid_safe_zone() {
        let mut world = hecs::World::new();
        let mut rng = fastrand::Rng::with_seed(7);
        let safe = Vec2::new(200.0, 200.0);
        spawn_enemies(&mut world, &mut rng, 200, Vec2::splat(400.0), safe, 100.0);

        assert_eq!(world.query::<&Enemy>().iter().count(), 200);
        for (_, (pos, _)) in world.query::<(&Position, &Enemy)>().iter() {
            assert!(pos.0.distance(safe) >= 100.0 - 1e-3);
        }
    }

    #[test]
    fn worm_segments_trail_head() {
        let body = worm();
        assert_eq!(body.colliders.len(), WORM_SEGMENTS);
        assert_eq!(body.colliders[0].offset, Vec2::ZERO);
        assert!(body.colliders[3].offset.y > body.colliders[1].offset.y);
    }

    #[test]
    fn aura_starts_on_owner() {
        let mut world = hecs::World::new();
        let owner = spawn_player(&mut world, Vec2::new(5.0, 6.0), 100.0);
        let aura = spawn_aura(&mut world, owner, 40.0, 20.0);
        assert_eq!(world.get::<&Position>(aura).map(|p| p.0).unwrap(), Vec2::new(5.0, 6.0));
        assert_eq!(world.get::<&Follow>(aura).map(|f| f.0).unwrap(), owner);
    }
}
