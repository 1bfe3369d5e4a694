//! # volley_game
//!
//! Combat gameplay on top of [`volley_ecs`]:
//!
//! - [`components`]: plain-data components and the [`components::Role`] tags.
//! - [`shooting`]: projectile spawning and combat resolution (damage, kill,
//!   area damage, slow).
//! - [`systems`]: per-frame animation and countdown systems.
//! - [`schedule`]: the fixed frame order and the [`schedule::Simulation`] loop.
//! - [`services`]: the economy/audio/particle collaborators.
//! - [`config`]: [`config::SimConfig`], loaded from JSON.

pub mod components;
pub mod config;
pub mod schedule;
pub mod services;
pub mod shooting;
pub mod systems;

pub use config::{ConfigError, SimConfig};
pub use schedule::{Schedule, Simulation};
pub use services::{Journal, ServiceCall, Services};
