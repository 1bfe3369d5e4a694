//! Frame schedule and the fixed-timestep simulation loop.
//!
//! A frame runs every system once, in registration order:
//!
//! 1. Move projectiles and resolve arrival effects.
//! 2. Animate lines, colours and size pulses.
//! 3. Count down debuffs.
//! 4. Destroy entities whose lifetime ran out.
//! 5. Advance the tick counter.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use volley_ecs::{EcsError, Registry};

use crate::config::SimConfig;
use crate::services::Services;
use crate::systems::{color_anim, line_anim, position_anim, size_pulse, timers};

/// Signature shared by every scheduled system.
pub type SystemFn = fn(&mut Registry, f32, &mut dyn Services) -> Result<(), EcsError>;

/// A named system in the schedule.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledSystem {
    pub name: &'static str,
    pub run: SystemFn,
}

/// Ordered list of systems run once per frame.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    systems: Vec<ScheduledSystem>,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in frame: movement and arrivals first, cleanup last.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_system("position_anim", position_anim::update)
            .with_system("line_anim", |registry, dt, _| {
                line_anim::update(registry, dt);
                Ok(())
            })
            .with_system("color_anim", |registry, dt, _| {
                color_anim::update(registry, dt);
                Ok(())
            })
            .with_system("size_pulse", |registry, dt, _| {
                size_pulse::update(registry, dt);
                Ok(())
            })
            .with_system("speed_nerfs", |registry, dt, _| {
                timers::speed_nerfs(registry, dt)
            })
            .with_system("death_timers", |registry, dt, _| {
                timers::death_timers(registry, dt)
            })
    }

    /// Append a system to the end of the frame.
    #[must_use]
    pub fn with_system(mut self, name: &'static str, run: SystemFn) -> Self {
        self.systems.push(ScheduledSystem { name, run });
        self
    }

    /// System names in run order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|system| system.name).collect()
    }

    /// Number of systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Returns `true` if no system is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Run every system once. The first failing system aborts the frame.
    pub fn run(
        &self,
        registry: &mut Registry,
        dt: f32,
        services: &mut dyn Services,
    ) -> Result<(), EcsError> {
        for system in &self.systems {
            (system.run)(registry, dt, services).inspect_err(|err| {
                warn!(system = system.name, error = %err, "system failed");
            })?;
        }
        Ok(())
    }
}

/// Owns the registry and drives it frame by frame.
#[derive(Debug)]
pub struct Simulation {
    /// Current tick counter.
    tick_id: u64,
    config: SimConfig,
    registry: Registry,
    schedule: Schedule,
}

impl Simulation {
    /// Create a simulation running [`Schedule::standard`].
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self::with_schedule(config, Schedule::standard())
    }

    /// Create a simulation running a custom schedule.
    #[must_use]
    pub fn with_schedule(config: SimConfig, schedule: Schedule) -> Self {
        Self {
            tick_id: 0,
            config,
            registry: Registry::new(),
            schedule,
        }
    }

    /// Returns the current tick counter.
    #[must_use]
    pub fn tick_id(&self) -> u64 {
        self.tick_id
    }

    /// Returns the loop configuration.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Returns a reference to the registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns a mutable reference to the registry.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Returns the frame schedule.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Run one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32, services: &mut dyn Services) -> Result<(), EcsError> {
        self.tick_id += 1;
        debug!(
            tick_id = self.tick_id,
            dt,
            entities = self.registry.alive(),
            "tick start"
        );
        self.schedule.run(&mut self.registry, dt, services)
    }

    /// Run the loop for the configured number of ticks, or indefinitely.
    ///
    /// Blocking; each tick is paced to `1 / tick_rate` seconds of wall time.
    pub fn run(&mut self, services: &mut dyn Services) -> Result<(), EcsError> {
        let tick_duration = Duration::from_secs_f64(1.0 / self.config.tick_rate);
        let dt = self.config.frame_dt();
        let mut tick_count = 0u64;

        info!(
            tick_rate = self.config.tick_rate,
            max_ticks = self.config.max_ticks,
            "starting simulation loop"
        );

        loop {
            let start = Instant::now();

            self.tick(dt, services)?;

            tick_count += 1;
            if self.config.max_ticks > 0 && tick_count >= self.config.max_ticks {
                info!(ticks = tick_count, "simulation loop complete");
                break;
            }

            let elapsed = start.elapsed();
            if elapsed < tick_duration {
                std::thread::sleep(tick_duration - elapsed);
            } else {
                warn!(
                    tick_id = self.tick_id,
                    elapsed_ms = elapsed.as_millis() as u64,
                    budget_ms = tick_duration.as_millis() as u64,
                    "tick exceeded time budget"
                );
            }
        }
        Ok(())
    }
}
