use glam::Vec2;

use crate::geom::Collider;

/// Current world position in pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Velocity in pixels/second.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Colliders owned by an entity for its whole lifetime. Offsets are
/// relative to `Position`, so moving the entity moves every collider.
#[derive(Debug, Clone)]
pub struct Body {
    pub colliders: Vec<Collider>,
}

impl Body {
    pub fn single(collider: Collider) -> Self {
        Self {
            colliders: vec![collider],
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Health(pub f32);

/// Chases the player.
#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    /// Pixels/second.
    pub speed: f32,
    /// Pickup value dropped on death.
    pub drop_value: u32,
}

/// Something that hurts enemies on overlap.
#[derive(Debug, Clone, Copy)]
pub struct Damager {
    pub amount: f32,
    /// Hits left before the damager is consumed. `None` never runs out
    /// and deals `amount` per second instead of per hit (auras).
    pub pierce: Option<u32>,
    /// Last enemy hit, so a projectile sitting inside an enemy for several
    /// ticks only hits it once.
    pub last_hit: Option<hecs::Entity>,
}

impl Damager {
    pub fn projectile(amount: f32, pierce: u32) -> Self {
        Self {
            amount,
            pierce: Some(pierce),
            last_hit: None,
        }
    }

    pub fn aura(damage_per_second: f32) -> Self {
        Self {
            amount: damage_per_second,
            pierce: None,
            last_hit: None,
        }
    }

    pub fn is_spent(&self) -> bool {
        self.pierce == Some(0)
    }
}

/// Keeps an aura glued to its owner.
#[derive(Debug, Clone, Copy)]
pub struct Follow(pub hecs::Entity);

#[derive(Debug, Clone, Copy)]
pub struct Pickup {
    pub value: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub score: u32,
    pub magnet_radius: f32,
}

/// Auto-fires projectiles at the nearest enemy in range.
#[derive(Debug, Clone, Copy)]
pub struct Weapon {
    pub cooldown: f32,
    pub timer: f32,
    pub range: f32,
    pub projectile_speed: f32,
    pub damage: f32,
    pub pierce: u32,
}

/// Seconds until despawn.
#[derive(Debug, Clone, Copy)]
pub struct Lifetime(pub f32);

/// Smoothed separation steering, persisted across ticks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparationForce(pub Vec2);
