use crate::debug::timer::Telemetry;
use crate::ecs::components::{Damager, Enemy, Health};
use crate::ecs::systems::{Bodies, Deferred};
use crate::geom::Population;
use crate::spatial::{OverlapPair, OverlapQuery};
use crate::spawn;

/// Hits and kills from one damage pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    pub hits: u32,
    pub kills: u32,
}

/// Apply damage for every damager/enemy overlap. `overlap` must already be
/// built from `bodies.enemies` this tick. Kills drop a pickup and are
/// removed through `deferred`.
pub fn resolve<S: Telemetry + ?Sized>(
    world: &hecs::World,
    bodies: &Bodies,
    overlap: &mut OverlapQuery,
    pairs: &mut Vec<OverlapPair>,
    deferred: &mut Deferred,
    dt: f32,
    sink: &mut S,
) -> DamageOutcome {
    let mut out = DamageOutcome::default();
    overlap.find_overlaps_with(&bodies.damagers, &bodies.enemies, pairs, sink);

    for pair in pairs.iter() {
        let damager_entity = bodies.damagers.entity(pair.target as usize);
        let enemy_entity = bodies.enemies.entity(pair.source as usize);
        if deferred.is_doomed(enemy_entity) || deferred.is_doomed(damager_entity) {
            continue;
        }

        let Ok(mut guard) = world.get::<&mut Damager>(damager_entity) else {
            continue;
        };
        let damager = &mut *guard;
        let amount = match damager.pierce.as_mut() {
            Some(left) => {
                if *left == 0 || damager.last_hit == Some(enemy_entity) {
                    continue;
                }
                *left -= 1;
                damager.last_hit = Some(enemy_entity);
                damager.amount
            }
            None => damager.amount * dt,
        };
        let spent = damager.is_spent();
        drop(guard);

        out.hits += 1;
        if spent {
            deferred.despawn(damager_entity);
        }

        let dead = match world.get::<&mut Health>(enemy_entity) {
            Ok(mut health) => {
                health.0 -= amount;
                health.0 <= 0.0
            }
            Err(_) => false,
        };
        if dead && deferred.despawn(enemy_entity) {
            out.kills += 1;
            let value = world
                .get::<&Enemy>(enemy_entity)
                .map(|e| e.drop_value)
                .unwrap_or(0);
            if value > 0 {
                let pos = bodies.enemies.position(pair.source as usize);
                deferred.spawn(spawn::pickup(pos, value));
            }
        }
    }

    if out.kills > 0 {
        log::trace!("damage: {} hits, {} kills", out.hits, out.kills);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debug::timer::NoTelemetry;
    use crate::ecs::components::{Body, Pickup, Position};
    use crate::ecs::systems::spatial::snapshot;
    use crate::geom::Collider;
    use glam::Vec2;

    fn enemy(world: &mut hecs::World, pos: Vec2, hp: f32) -> hecs::Entity {
        world.spawn((
            Position(pos),
            Body::single(Collider::circle(10.0)),
            Health(hp),
            Enemy { speed: 0.0, drop_value: 3 },
        ))
    }

    fn run(world: &mut hecs::World, dt: f32) -> DamageOutcome {
        let mut bodies = Bodies::with_capacity(8);
        snapshot(world, &mut bodies);
        let mut overlap = OverlapQuery::new(64.0);
        overlap.build(&bodies.enemies);
        let mut pairs = Vec::new();
        let mut deferred = Deferred::new();
        let out = resolve(
            world,
            &bodies,
            &mut overlap,
            &mut pairs,
            &mut deferred,
            dt,
            &mut NoTelemetry,
        );
        deferred.apply(world);
        out
    }

    #[test]
    fn projectile_pierces_then_is_spent() {
        let mut world = hecs::World::new();
        let a = enemy(&mut world, Vec2::new(0.0, 0.0), 5.0);
        let b = enemy(&mut world, Vec2::new(12.0, 0.0), 50.0);
        let shot = world.spawn((
            Position(Vec2::new(6.0, 0.0)),
            Body::single(Collider::circle(2.0)),
            Damager::projectile(10.0, 1),
        ));

        let out = run(&mut world, 1.0 / 60.0);
        assert_eq!(out.hits, 1);
        assert!(!world.contains(shot));
        // Exactly one of the two took the hit
        let a_alive = world.contains(a);
        let b_hp = world.get::<&Health>(b).map(|h| h.0).unwrap();
        assert!(!a_alive || b_hp < 50.0);
        assert!(a_alive || b_hp == 50.0);
    }

    #[test]
    fn kill_drops_pickup_at_enemy() {
        let mut world = hecs::World::new();
        let target = enemy(&mut world, Vec2::new(100.0, 100.0), 5.0);
        world.spawn((
            Position(Vec2::new(105.0, 100.0)),
            Body::single(Collider::circle(2.0)),
            Damager::projectile(10.0, 3),
        ));

        let out = run(&mut world, 1.0 / 60.0);
        assert_eq!(out, DamageOutcome { hits: 1, kills: 1 });
        assert!(!world.contains(target));

        let drops: Vec<(Vec2, u32)> = world
            .query::<(&Position, &Pickup)>()
            .iter()
            .map(|(_, (p, k))| (p.0, k.value))
            .collect();
        assert_eq!(drops, vec![(Vec2::new(100.0, 100.0), 3)]);
    }

    #[test]
    fn aura_deals_damage_per_second() {
        let mut world = hecs::World::new();
        let target = enemy(&mut world, Vec2::ZERO, 100.0);
        world.spawn((
            Position(Vec2::new(20.0, 0.0)),
            Body::single(Collider::circle(15.0)),
            Damager::aura(30.0),
        ));

        let out = run(&mut world, 0.5);
        assert_eq!(out.hits, 1);
        let hp = world.get::<&Health>(target).map(|h| h.0).unwrap();
        assert!((hp - 85.0).abs() < 1e-4);
    }

    #[test]
    fn projectile_does_not_rehit_same_enemy() {
        let mut world = hecs::World::new();
        let target = enemy(&mut world, Vec2::ZERO, 100.0);
        world.spawn((
            Position(Vec2::ZERO),
            Body::single(Collider::circle(2.0)),
            Damager::projectile(10.0, 5),
        ));

        run(&mut world, 1.0 / 60.0);
        run(&mut world, 1.0 / 60.0);
        let hp = world.get::<&Health>(target).map(|h| h.0).unwrap();
        assert_eq!(hp, 90.0);
    }
}
