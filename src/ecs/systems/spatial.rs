use crate::ecs::components::{Body, Damager, Enemy, Pickup, Player, Position};
use crate::ecs::systems::Bodies;

/// Copy every collidable population out of the world. Runs after movement
/// so every index built from these sets sees settled positions.
pub fn snapshot(world: &hecs::World, bodies: &mut Bodies) {
    bodies.clear();
    for (entity, (pos, body, _)) in world.query::<(&Position, &Body, &Player)>().iter() {
        bodies.players.push(entity, pos.0, &body.colliders);
    }
    for (entity, (pos, body, _)) in world.query::<(&Position, &Body, &Enemy)>().iter() {
        bodies.enemies.push(entity, pos.0, &body.colliders);
    }
    for (entity, (pos, body, damager)) in world.query::<(&Position, &Body, &Damager)>().iter() {
        // Spent projectiles are already queued for removal
        if damager.is_spent() {
            continue;
        }
        bodies.damagers.push(entity, pos.0, &body.colliders);
    }
    for (entity, (pos, body, _)) in world.query::<(&Position, &Body, &Pickup)>().iter() {
        bodies.pickups.push(entity, pos.0, &body.colliders);
    }
}
