//! Countdown systems: entity lifetimes and speed debuffs.

use tracing::debug;
use volley_ecs::{EcsError, Registry};

use crate::components::{DeathTimer, SpeedNerf};

/// Count down every [`DeathTimer`] and destroy the entities that expire.
pub fn death_timers(registry: &mut Registry, dt: f32) -> Result<(), EcsError> {
    let mut expired = Vec::new();
    registry.each::<(DeathTimer,)>(|entity, (timer,)| {
        timer.remaining -= dt;
        if timer.remaining <= 0.0 {
            expired.push(entity);
        }
    });

    if !expired.is_empty() {
        debug!(count = expired.len(), "death timers expired");
    }
    for entity in expired {
        registry.destroy(entity)?;
    }
    Ok(())
}

/// Count down every [`SpeedNerf`] and lift the ones that run out.
pub fn speed_nerfs(registry: &mut Registry, dt: f32) -> Result<(), EcsError> {
    let mut lifted = Vec::new();
    registry.each::<(SpeedNerf,)>(|entity, (nerf,)| {
        nerf.remaining -= dt;
        if nerf.remaining <= 0.0 {
            lifted.push(entity);
        }
    });

    for entity in lifted {
        registry.remove::<SpeedNerf>(entity)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_death_timer_destroys_on_expiry() {
        let mut registry = Registry::new();
        let short = registry.create();
        let long = registry.create();
        registry.assign(short, DeathTimer { remaining: 0.25 }).unwrap();
        registry.assign(long, DeathTimer { remaining: 1.0 }).unwrap();

        death_timers(&mut registry, 0.125).unwrap();
        assert!(registry.valid(short));

        death_timers(&mut registry, 0.125).unwrap();
        assert!(!registry.valid(short));
        assert!(registry.valid(long));
        assert_eq!(registry.get::<DeathTimer>(long).unwrap().remaining, 0.75);
    }

    #[test]
    fn test_speed_nerf_lifted_but_entity_kept() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry
            .assign(
                e,
                SpeedNerf {
                    remaining: 0.5,
                    multiplier: 0.5,
                },
            )
            .unwrap();

        speed_nerfs(&mut registry, 0.25).unwrap();
        assert!(registry.has::<SpeedNerf>(e));
        speed_nerfs(&mut registry, 0.25).unwrap();
        assert!(!registry.has::<SpeedNerf>(e));
        assert!(registry.valid(e));
    }
}
