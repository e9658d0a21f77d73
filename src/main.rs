use glam::Vec2;

use hordegrid::sim::Simulation;
use hordegrid::{spawn, SimConfig};

const DEFAULT_ENEMIES: usize = 2000;
const DEFAULT_TICKS: u64 = 600;
const ARENA: Vec2 = Vec2::new(1920.0, 1080.0);
const SAFE_RADIUS: f32 = 200.0;
const PICKUP_COUNT: usize = 200;
const AURA_RADIUS: f32 = 90.0;
const AURA_DPS: f32 = 40.0;

fn main() {
    env_logger::init();
    log::info!("hordegrid starting up");

    if let Err(e) = run() {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

/// Read an optional numeric override from the environment.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T::Err: std::error::Error + 'static,
{
    match std::env::var(name) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e.into()),
    }
}

/// Headless run: spawn a horde around the player and tick it.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let enemies = env_or("HORDEGRID_ENEMIES", DEFAULT_ENEMIES)?;
    let ticks = env_or("HORDEGRID_TICKS", DEFAULT_TICKS)?;
    let mut rng = match std::env::var("HORDEGRID_SEED") {
        Ok(raw) => fastrand::Rng::with_seed(raw.trim().parse()?),
        Err(_) => fastrand::Rng::new(),
    };

    let config = SimConfig::default();
    let mut sim = Simulation::new(config)?;

    let center = ARENA * 0.5;
    let world = sim.world_mut();
    let player = spawn::spawn_player(world, center, config.magnet_radius);
    spawn::spawn_aura(world, player, AURA_RADIUS, AURA_DPS);
    spawn::spawn_enemies(world, &mut rng, enemies, ARENA, center, SAFE_RADIUS);
    spawn::spawn_pickups(world, &mut rng, PICKUP_COUNT, ARENA);
    log::info!("spawned {enemies} enemies, running {ticks} ticks");

    let dt = config.tick_rate;
    for _ in 0..ticks {
        sim.advance(dt);
    }

    let totals = sim.totals();
    let score = sim
        .world()
        .get::<&hordegrid::ecs::components::Player>(player)
        .map(|p| p.score)
        .unwrap_or(0);
    log::info!(
        "done: {} ticks | {} kills | {} collected | score {} | avg tick {:.0}us",
        sim.tick_count(),
        totals.kills,
        totals.collected,
        score,
        sim.stats().avg_us,
    );
    Ok(())
}
