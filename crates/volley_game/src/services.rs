//! Collaborators the combat core calls into.
//!
//! Economy, audio, and particle spawning live outside this crate. They are
//! fire-and-forget from the caller's side: none of them returns an error.

use tracing::debug;
use volley_ecs::{Entity, Registry};

use crate::components::{Color, Position, ShapeRenderer, Size, SoundHandle};

/// External services invoked by combat resolution.
pub trait Services {
    /// Move the reward for killing `from` to `to`.
    fn transfer(&mut self, registry: &mut Registry, from: Entity, to: Entity);

    /// Play a one-shot sound.
    fn play_sound(&mut self, registry: &mut Registry, sound: SoundHandle);

    /// Burst of particles matching a destroyed shape.
    fn spawn_particles_from_shape(
        &mut self,
        registry: &mut Registry,
        position: Position,
        shape: ShapeRenderer,
        size: Size,
        color: Color,
    );
}

/// One recorded collaborator call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServiceCall {
    Transfer {
        from: Entity,
        to: Entity,
    },
    PlaySound(SoundHandle),
    SpawnParticles {
        position: Position,
        shape: ShapeRenderer,
        size: Size,
        color: Color,
    },
}

/// [`Services`] implementation that records every call.
#[derive(Debug, Default)]
pub struct Journal {
    pub calls: Vec<ServiceCall>,
}

impl Journal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reward transfers received by `to`.
    #[must_use]
    pub fn transfers_to(&self, to: Entity) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ServiceCall::Transfer { to: t, .. } if *t == to))
            .count()
    }

    /// Sounds played, in call order.
    #[must_use]
    pub fn sounds(&self) -> Vec<SoundHandle> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ServiceCall::PlaySound(sound) => Some(*sound),
                _ => None,
            })
            .collect()
    }

    /// Number of particle bursts spawned.
    #[must_use]
    pub fn particle_bursts(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, ServiceCall::SpawnParticles { .. }))
            .count()
    }
}

impl Services for Journal {
    fn transfer(&mut self, _registry: &mut Registry, from: Entity, to: Entity) {
        debug!(%from, %to, "reward transfer");
        self.calls.push(ServiceCall::Transfer { from, to });
    }

    fn play_sound(&mut self, _registry: &mut Registry, sound: SoundHandle) {
        debug!(sound = sound.0, "play sound");
        self.calls.push(ServiceCall::PlaySound(sound));
    }

    fn spawn_particles_from_shape(
        &mut self,
        _registry: &mut Registry,
        position: Position,
        shape: ShapeRenderer,
        size: Size,
        color: Color,
    ) {
        debug!(x = position.0.x, y = position.0.y, ?shape, "particle burst");
        self.calls.push(ServiceCall::SpawnParticles {
            position,
            shape,
            size,
            color,
        });
    }
}
