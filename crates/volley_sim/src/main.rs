//! # volley_sim: headless frame driver
//!
//! Sets up a small battlefield, fires one volley of every projectile kind
//! and runs the fixed-timestep loop until `max_ticks` is reached.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`RUST_LOG`, default `volley_sim=info`).
//! 2. Load [`SimConfig`] from the JSON file named by `VOLLEY_CONFIG`, if set.
//! 3. Bind the player and resources singletons, spawn enemies.
//! 4. Fire, run the loop, and log a summary of the service calls.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use volley_ecs::{Entity, Registry};
use volley_game::components::{
    Color, Dead, Health, Position, Resources, Role, Shape, ShapeRenderer, Size, SoundHandle,
    SpeedNerf, Target, TargetMask,
};
use volley_game::shooting::{self, ProjectileKind};
use volley_game::{Journal, SimConfig, Simulation};

/// Ticks to run when the config leaves `max_ticks` unlimited.
const DEFAULT_TICKS: u64 = 180;

fn load_config() -> Result<SimConfig> {
    let config = match std::env::var_os("VOLLEY_CONFIG") {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.to_string_lossy()))?;
            SimConfig::from_json(&json)?
        }
        None => SimConfig::default(),
    };
    if config.max_ticks == 0 {
        return Ok(config.with_max_ticks(DEFAULT_TICKS));
    }
    Ok(config)
}

fn spawn_enemy(registry: &mut Registry, at: Position) -> Result<Entity> {
    let enemy = registry.create();
    registry.assign(enemy, at)?;
    registry.assign(enemy, Health { amount: 8.0 })?;
    registry.assign(
        enemy,
        Target {
            mask: TargetMask::GROUND,
        },
    )?;
    registry.assign(
        enemy,
        ShapeRenderer {
            shape: Shape::Circle,
        },
    )?;
    registry.assign(enemy, Size::square(0.4))?;
    registry.assign(enemy, Color::new(0.9, 0.2, 0.2, 1.0))?;
    Ok(enemy)
}

fn setup(registry: &mut Registry) -> Result<Vec<Entity>> {
    let player = registry.create();
    registry.attach(Role::Player, player)?;

    let resources = registry.create();
    registry.assign(
        resources,
        Resources {
            explosion_sound: SoundHandle(1),
            pop_sound: SoundHandle(2),
        },
    )?;
    registry.attach(Role::Resources, resources)?;

    [(6.0, 0.0), (6.3, 0.2), (12.0, 3.0)]
        .into_iter()
        .map(|(x, y)| spawn_enemy(registry, Position::new(x, y)))
        .collect()
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("volley_sim=info".parse()?))
        .init();

    info!("volley simulation starting");

    let config = load_config()?;
    let mut sim = Simulation::new(config);
    let enemies = setup(sim.registry_mut())?;

    let tower = Position::new(0.0, 0.0);
    let volley = [
        (ProjectileKind::CannonBall { damage: 10.0 }, Position::new(6.0, 0.0)),
        (ProjectileKind::SlowBolt, Position::new(12.0, 3.0)),
        (ProjectileKind::Bullet, Position::new(12.0, 3.0)),
    ];
    for (kind, aim) in volley {
        let spawned =
            shooting::create_projectile(sim.registry_mut(), kind, tower, aim, Color::CYAN)?;
        info!(?kind, entities = spawned.len(), "fired");
    }

    let mut journal = Journal::new();
    sim.run(&mut journal)?;

    let registry = sim.registry();
    let dead = enemies.iter().filter(|&&e| registry.has::<Dead>(e)).count();
    let slowed = enemies
        .iter()
        .filter(|&&e| registry.has::<SpeedNerf>(e))
        .count();
    info!(
        ticks = sim.tick_id(),
        alive = registry.alive(),
        dead,
        slowed,
        service_calls = journal.calls.len(),
        particle_bursts = journal.particle_bursts(),
        "volley simulation finished"
    );
    Ok(())
}
