use crate::ecs::components::{Position, Weapon};
use crate::ecs::systems::{Bodies, Deferred};
use crate::geom::Population;
use crate::spatial::{Category, IndexSet};
use crate::spawn;

/// Seconds a projectile lives if it hits nothing.
const PROJECTILE_LIFETIME: f32 = 1.5;

/// Tick weapon cooldowns and fire at the nearest enemy in range.
/// Projectiles are spawned through `deferred` and join the indices next tick.
pub fn fire(
    world: &hecs::World,
    bodies: &Bodies,
    indices: &IndexSet,
    candidates: &mut Vec<u32>,
    deferred: &mut Deferred,
    dt: f32,
) -> u32 {
    let mut fired = 0;
    for (_, (pos, weapon)) in world.query::<(&Position, &mut Weapon)>().iter() {
        weapon.timer -= dt;
        if weapon.timer > 0.0 {
            continue;
        }

        indices.query_candidates(Category::Enemy, pos.0, weapon.range, candidates);
        let range_sq = weapon.range * weapon.range;
        let nearest = candidates
            .iter()
            .map(|&c| bodies.enemies.position(c as usize))
            .map(|p| (p, p.distance_squared(pos.0)))
            .filter(|&(_, d)| d <= range_sq)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((target, _)) = nearest else {
            // Stay armed; fire as soon as something walks into range.
            weapon.timer = 0.0;
            continue;
        };

        let dir = (target - pos.0).normalize_or_zero();
        deferred.spawn(spawn::projectile(
            pos.0,
            dir * weapon.projectile_speed,
            weapon.damage,
            weapon.pierce,
            PROJECTILE_LIFETIME,
        ));
        weapon.timer = weapon.cooldown;
        fired += 1;
    }
    fired
}
