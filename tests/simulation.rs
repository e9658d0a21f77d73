use glam::Vec2;

use hordegrid::debug::timer::NoTelemetry;
use hordegrid::ecs::components::{Enemy, Pickup, Player, Position};
use hordegrid::geom::overlap::overlaps;
use hordegrid::sim::Simulation;
use hordegrid::{spawn, Population, SimConfig};

fn horde(seed: u64, enemies: usize) -> (Simulation<NoTelemetry>, hecs::Entity) {
    let mut sim = Simulation::with_telemetry(SimConfig::default(), NoTelemetry).unwrap();
    let mut rng = fastrand::Rng::with_seed(seed);
    let arena = Vec2::new(800.0, 600.0);
    let center = arena * 0.5;
    let world = sim.world_mut();
    let player = spawn::spawn_player(world, center, 120.0);
    spawn::spawn_aura(world, player, 80.0, 60.0);
    spawn::spawn_enemies(world, &mut rng, enemies, arena, center, 150.0);
    spawn::spawn_pickups(world, &mut rng, 40, arena);
    (sim, player)
}

#[test]
fn horde_is_worn_down() {
    let (mut sim, player) = horde(42, 150);
    for _ in 0..1200 {
        sim.tick(1.0 / 60.0);
    }

    let totals = *sim.totals();
    assert!(totals.kills > 0);
    assert!(totals.fired > 0);
    let remaining = sim.world().query::<&Enemy>().iter().count();
    assert_eq!(remaining as u32 + totals.kills, 150);

    let score = sim.world().get::<&Player>(player).map(|p| p.score).unwrap();
    assert_eq!(totals.collected > 0, score > 0);
}

#[test]
fn same_seed_same_outcome() {
    let run = |seed| {
        let (mut sim, _) = horde(seed, 80);
        for _ in 0..300 {
            sim.tick(1.0 / 60.0);
        }
        *sim.totals()
    };
    assert_eq!(run(9), run(9));
}

#[test]
fn every_touching_pickup_is_collected() {
    let (mut sim, player) = horde(3, 0);
    let ppos = sim.world().get::<&Position>(player).map(|p| p.0).unwrap();
    // Ring of pickups just touching the player body (14 + 6 = 20)
    for k in 0..12 {
        let angle = k as f32 * std::f32::consts::TAU / 12.0;
        let pos = ppos + Vec2::new(angle.cos(), angle.sin()) * 19.5;
        sim.world_mut().spawn(spawn::pickup(pos, 1));
    }

    sim.tick(1.0 / 60.0);
    let bodies = sim.bodies();
    for i in 0..bodies.pickups.len() {
        let pickup = bodies.pickups.position(i);
        let touching = bodies.pickups.colliders(i).iter().any(|c| {
            overlaps(&c.shape_at(pickup), &bodies.players.colliders(0)[0].shape_at(ppos))
        });
        if touching {
            assert!(!sim.world().contains(bodies.pickups.entity(i)));
        }
    }
    assert!(sim.last_report().collected >= 12);
    let left = sim.world().query::<&Pickup>().iter().count();
    assert_eq!(left as u32 + sim.totals().collected, 52);
}
