//! # volley_ecs
//!
//! The entity-component core of the volley combat simulation.
//!
//! This crate provides:
//!
//! - [`Entity`]: generational handles that detect stale references.
//! - [`Component`]: the marker trait for plain data attached to entities.
//! - [`Storage`]: per-type sparse-set storage behind [`ErasedStorage`].
//! - [`Registry`]: entity lifecycle, component access, and [`Tag`] bindings.
//! - [`View`]: snapshot iteration over a [`ComponentSet`] conjunction.
//!
//! Everything is single-threaded: one frame driver owns the registry and
//! runs systems against it in a fixed order.

pub mod component;
pub mod entity;
pub mod error;
pub mod registry;
pub mod storage;
pub mod view;

pub use component::{Component, ComponentSet, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::EcsError;
pub use registry::{Registry, Tag};
pub use storage::{ErasedStorage, Storage};
pub use view::View;
