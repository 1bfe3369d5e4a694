//! Projectile creation and combat resolution.
//!
//! Projectiles are ordinary entities: a [`PositionAnim`] carries them to
//! their destination and an [`OnArrival`] effect resolves the hit once the
//! animation completes (see [`crate::systems::position_anim`]). Area effects
//! walk a [`View`](volley_ecs::View) snapshot, so kills, particle spawns, and
//! destruction inside the pass are safe.

use tracing::debug;
use volley_ecs::{EcsError, Entity, Registry};

use crate::components::{
    Color, ColorAnim, Damage, Dead, DeathTimer, Effect, Health, LineAnim, LineRenderer,
    OnArrival, Position, PositionAnim, Resources, Role, Shape, ShapeRenderer, Size,
    SizePulseAnim, SpeedNerf, Target, TargetMask,
};
use crate::services::Services;

/// Travel speed of slow bolts, in units per second.
pub const SLOW_BOLT_SPEED: f32 = 10.0;
/// Travel speed of cannon balls, in units per second.
pub const CANNON_BALL_SPEED: f32 = 10.0;
/// Travel speed of the bullet head, in units per second.
pub const BULLET_SPEED: f32 = 30.0;

/// Radius around a slow-bolt impact in which ground targets are slowed.
pub const SLOW_RADIUS: f32 = 0.5;
/// Movement-speed multiplier applied by a slow bolt.
pub const SLOW_MULTIPLIER: f32 = 0.5;
/// Seconds a [`SpeedNerf`] lasts after the latest hit.
pub const SLOW_DURATION: f32 = 2.333;
/// Blast radius of a cannon ball.
pub const CANNON_BALL_RADIUS: f32 = 0.7;

/// Travel shorter than this has no usable direction.
pub const MIN_TRAVEL: f32 = 1e-4;

const PROJECTILE_SIZE: f32 = 0.15;
const BULLET_LENGTH: f32 = 0.5;
const TRAIL_OFFSET: f32 = 0.25;
const TRAIL_LIFETIME: f32 = 0.5;
const TRAIL_COLOR: Color = Color::new(0.0, 0.8, 1.0, 0.5);
const MUZZLE_FLASH_LIFETIME: f32 = 0.25;
const PULSE_FROM: f32 = 0.15;
const PULSE_TO: f32 = 0.5;

/// What a tower fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    SlowBolt,
    CannonBall { damage: f32 },
    Bullet,
}

/// Spawn the entities for one shot of `kind` travelling `from → to`.
pub fn create_projectile(
    registry: &mut Registry,
    kind: ProjectileKind,
    from: Position,
    to: Position,
    color: Color,
) -> Result<Vec<Entity>, EcsError> {
    match kind {
        ProjectileKind::SlowBolt => Ok(vec![create_slow_bolt(registry, from, to, color)?]),
        ProjectileKind::CannonBall { damage } => Ok(vec![create_cannon_ball(
            registry, from, to, color, damage,
        )?]),
        ProjectileKind::Bullet => create_bullet(registry, from, to, color),
    }
}

fn spawn_bolt(
    registry: &mut Registry,
    from: Position,
    to: Position,
    color: Color,
    speed: f32,
    effect: Effect,
) -> Result<Entity, EcsError> {
    let distance = from.0.distance(to.0);
    let entity = registry.create();
    registry.assign(entity, from)?;
    registry.assign(
        entity,
        PositionAnim {
            elapsed: 0.0,
            duration: distance / speed,
            from,
            to,
        },
    )?;
    registry.assign(entity, ShapeRenderer { shape: Shape::Box })?;
    registry.assign(entity, Size::square(PROJECTILE_SIZE))?;
    registry.assign(entity, color)?;
    registry.assign(entity, OnArrival(effect))?;
    Ok(entity)
}

/// A bolt that slows ground targets around its impact point.
pub fn create_slow_bolt(
    registry: &mut Registry,
    from: Position,
    to: Position,
    color: Color,
) -> Result<Entity, EcsError> {
    let entity = spawn_bolt(
        registry,
        from,
        to,
        color,
        SLOW_BOLT_SPEED,
        Effect::SlowBoltImpact,
    )?;
    debug!(%entity, ?from, ?to, "slow bolt fired");
    Ok(entity)
}

/// A ball that explodes on arrival, dealing `damage` with falloff.
pub fn create_cannon_ball(
    registry: &mut Registry,
    from: Position,
    to: Position,
    color: Color,
    damage: f32,
) -> Result<Entity, EcsError> {
    let entity = spawn_bolt(
        registry,
        from,
        to,
        color,
        CANNON_BALL_SPEED,
        Effect::CannonBallImpact,
    )?;
    registry.assign(entity, Damage { amount: damage })?;
    debug!(%entity, ?from, ?to, damage, "cannon ball fired");
    Ok(entity)
}

fn spawn_line(
    registry: &mut Registry,
    from: Position,
    to: Position,
    color: Color,
    lifetime: f32,
) -> Result<Entity, EcsError> {
    let entity = registry.create();
    registry.assign(entity, from)?;
    registry.assign(entity, LineRenderer { end: to })?;
    registry.assign(entity, color)?;
    registry.assign(
        entity,
        DeathTimer {
            remaining: lifetime,
        },
    )?;
    Ok(entity)
}

/// A purely visual hitscan shot: two drifting side trails, a muzzle flash
/// line, and a short bullet head racing to the target.
///
/// Trails and head need a direction; when `from` and `to` are closer than
/// [`MIN_TRAVEL`] only the muzzle flash is spawned.
pub fn create_bullet(
    registry: &mut Registry,
    from: Position,
    to: Position,
    color: Color,
) -> Result<Vec<Entity>, EcsError> {
    let delta = to.0 - from.0;
    let distance = delta.length();
    let direction = (distance >= MIN_TRAVEL).then(|| delta / distance);
    let mut spawned = Vec::with_capacity(4);

    if let Some(direction) = direction {
        let left = direction.perp() * TRAIL_OFFSET;
        for offset in [-left, left] {
            let trail = spawn_line(registry, from, to, Color::WHITE, TRAIL_LIFETIME)?;
            registry.assign(
                trail,
                ColorAnim {
                    elapsed: 0.0,
                    duration: TRAIL_LIFETIME,
                    from: TRAIL_COLOR,
                    to: Color::TRANSPARENT,
                },
            )?;
            registry.assign(
                trail,
                LineAnim {
                    elapsed: 0.0,
                    duration: TRAIL_LIFETIME,
                    start_from: from,
                    end_from: to,
                    start_to: Position(from.0 + offset),
                    end_to: Position(to.0 + offset),
                },
            )?;
            spawned.push(trail);
        }
    }

    let flash = spawn_line(registry, from, to, Color::WHITE, MUZZLE_FLASH_LIFETIME)?;
    registry.assign(
        flash,
        ColorAnim {
            elapsed: 0.0,
            duration: MUZZLE_FLASH_LIFETIME,
            from: color.fade(0.75),
            to: Color::TRANSPARENT,
        },
    )?;
    spawned.push(flash);

    if let Some(direction) = direction {
        let travel = distance / BULLET_SPEED;
        let head = direction * BULLET_LENGTH;
        let bullet = spawn_line(registry, from, to, color, travel)?;
        registry.assign(
            bullet,
            LineAnim {
                elapsed: 0.0,
                duration: travel,
                start_from: from,
                end_from: Position(from.0 + head),
                start_to: Position(to.0 - head),
                end_to: to,
            },
        )?;
        spawned.push(bullet);
    }

    debug!(?from, ?to, entities = spawned.len(), "bullet fired");
    Ok(spawned)
}

fn resources(registry: &Registry) -> Result<Resources, EcsError> {
    let holder = registry.attachee(Role::Resources)?;
    registry.get::<Resources>(holder).copied()
}

/// Mark `target` dead, paying its reward to the player.
///
/// Killing an already dead entity does nothing. Renderable targets burst
/// into particles and play the pop sound. The entity itself is left for a
/// later cleanup pass.
pub fn kill(
    registry: &mut Registry,
    services: &mut dyn Services,
    target: Entity,
) -> Result<(), EcsError> {
    registry.check(target)?;
    if registry.has::<Dead>(target) {
        return Ok(());
    }

    // Resolve every lookup before the first side effect.
    let player = registry.attachee(Role::Player)?;
    let burst = if registry.has_all::<(Position, ShapeRenderer, Size, Color)>(target) {
        Some((
            *registry.get::<Position>(target)?,
            *registry.get::<ShapeRenderer>(target)?,
            *registry.get::<Size>(target)?,
            *registry.get::<Color>(target)?,
            resources(registry)?.pop_sound,
        ))
    } else {
        None
    };

    services.transfer(registry, target, player);
    if let Some((position, shape, size, color, pop)) = burst {
        services.spawn_particles_from_shape(registry, position, shape, size, color);
        services.play_sound(registry, pop);
    }
    registry.accommodate(target, Dead)?;
    debug!(%target, "killed");
    Ok(())
}

/// Subtract `amount` from the health of `target`, killing it at or below
/// zero. Targets without [`Health`] are ignored; stale handles are rejected
/// with [`EcsError::StaleEntity`].
///
/// Health is not clamped: overkill leaves it negative.
pub fn damage(
    registry: &mut Registry,
    services: &mut dyn Services,
    target: Entity,
    amount: f32,
) -> Result<(), EcsError> {
    registry.check(target)?;
    if !registry.has::<Health>(target) {
        return Ok(());
    }
    let health = registry.get_mut::<Health>(target)?;
    health.amount -= amount;
    if health.amount <= 0.0 {
        kill(registry, services, target)?;
    }
    Ok(())
}

/// Damage every entity with [`Health`] strictly inside `radius` of
/// `impact`, scaled by `1 − dist²/radius²`.
pub fn radius_damage(
    registry: &mut Registry,
    services: &mut dyn Services,
    impact: Position,
    radius: f32,
    amount: f32,
) -> Result<(), EcsError> {
    let radius_sqr = radius * radius;
    registry
        .view::<(Health, Position)>()
        .each(registry, |registry, entity| {
            let dist_sqr = registry.get::<Position>(entity)?.distance_squared(impact);
            if dist_sqr < radius_sqr {
                let falloff = 1.0 - dist_sqr / radius_sqr;
                damage(registry, services, entity, amount * falloff)?;
            }
            Ok(())
        })
}

/// Apply or refresh a [`SpeedNerf`] on every ground [`Target`] within
/// `radius` of `hit` (boundary included).
pub fn slow(
    registry: &mut Registry,
    hit: Position,
    radius: f32,
    multiplier: f32,
) -> Result<(), EcsError> {
    let radius_sqr = radius * radius;
    registry
        .view::<(Target, Position)>()
        .each(registry, |registry, entity| {
            if !registry.get::<Target>(entity)?.mask.contains(TargetMask::GROUND) {
                return Ok(());
            }
            if registry.get::<Position>(entity)?.distance_squared(hit) <= radius_sqr {
                registry.accommodate(
                    entity,
                    SpeedNerf {
                        remaining: SLOW_DURATION,
                        multiplier,
                    },
                )?;
                debug!(%entity, multiplier, "slowed");
            }
            Ok(())
        })
}

struct Flash {
    lifetime: f32,
    size: f32,
    pulse_speed: f32,
    color: Color,
}

fn spawn_impact_flash(
    registry: &mut Registry,
    at: Position,
    flash: Flash,
) -> Result<Entity, EcsError> {
    let entity = registry.create();
    registry.assign(entity, at)?;
    registry.assign(
        entity,
        DeathTimer {
            remaining: flash.lifetime,
        },
    )?;
    registry.assign(entity, Size::square(flash.size))?;
    registry.assign(
        entity,
        ShapeRenderer {
            shape: Shape::Circle,
        },
    )?;
    registry.assign(
        entity,
        SizePulseAnim {
            phase: 0.0,
            speed: flash.pulse_speed,
            from: PULSE_FROM,
            to: PULSE_TO,
        },
    )?;
    registry.assign(entity, flash.color)?;
    Ok(entity)
}

fn on_slow_bolt_impact(registry: &mut Registry, bolt: Entity) -> Result<(), EcsError> {
    let impact = *registry.get::<Position>(bolt)?;
    let color = *registry.get::<Color>(bolt)?;
    registry.destroy(bolt)?;

    slow(registry, impact, SLOW_RADIUS, SLOW_MULTIPLIER)?;
    spawn_impact_flash(
        registry,
        impact,
        Flash {
            lifetime: 0.4,
            size: 0.5,
            pulse_speed: 25.0,
            color,
        },
    )?;
    Ok(())
}

fn on_cannon_ball_impact(
    registry: &mut Registry,
    services: &mut dyn Services,
    ball: Entity,
) -> Result<(), EcsError> {
    let explosion = resources(registry)?.explosion_sound;
    services.play_sound(registry, explosion);

    let impact = *registry.get::<Position>(ball)?;
    let damage = registry.get::<Damage>(ball)?.amount;
    registry.destroy(ball)?;

    radius_damage(registry, services, impact, CANNON_BALL_RADIUS, damage)?;
    spawn_impact_flash(
        registry,
        impact,
        Flash {
            lifetime: 0.1,
            size: 0.7,
            pulse_speed: 10.0,
            color: Color::YELLOW,
        },
    )?;
    Ok(())
}

impl Effect {
    /// Resolve this effect for the projectile `entity`.
    pub fn resolve(
        self,
        registry: &mut Registry,
        services: &mut dyn Services,
        entity: Entity,
    ) -> Result<(), EcsError> {
        debug!(%entity, effect = ?self, "resolving arrival effect");
        match self {
            Effect::SlowBoltImpact => on_slow_bolt_impact(registry, entity),
            Effect::CannonBallImpact => on_cannon_ball_impact(registry, services, entity),
            Effect::NoOp => Ok(()),
        }
    }
}
