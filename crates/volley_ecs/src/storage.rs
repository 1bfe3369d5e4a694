//! Per-type component storage.
//!
//! Each component type lives in its own [`Storage`], a sparse set:
//!
//! ```text
//! sparse: [None, Some(1), None, Some(0)]   entity slot -> dense index
//! dense:  [3v0, 1v2]                       packed entities
//! values: [c3,  c1 ]                       packed components, parallel to dense
//! ```
//!
//! Attach, detach, and lookup are O(1); iteration walks the packed arrays.
//! Detaching swap-removes, so the last element moves into the freed slot and
//! packed order is not insertion order.

use std::any::Any;
use std::collections::HashMap;

use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;

/// The registry's type → storage map.
pub type StorageMap = HashMap<ComponentTypeId, Box<dyn ErasedStorage>>;

/// Object-safe view of a [`Storage`] whose component type is not known
/// statically.
pub trait ErasedStorage: Any {
    /// Name of the stored component type.
    fn component_name(&self) -> &'static str;

    /// Number of entities holding the component.
    fn len(&self) -> usize;

    /// Returns `true` if no entity holds the component.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `entity` holds the component.
    fn contains(&self, entity: Entity) -> bool;

    /// Drops the component of `entity`. Returns `false` if it had none.
    fn detach(&mut self, entity: Entity) -> bool;

    /// Packed entities, in storage order.
    fn entities(&self) -> &[Entity];

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Packed storage for one component type.
#[derive(Debug)]
pub struct Storage<C> {
    sparse: Vec<Option<usize>>,
    dense: Vec<Entity>,
    values: Vec<C>,
}

impl<C> Default for Storage<C> {
    fn default() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<C: Component> Storage<C> {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, entity: Entity) -> Option<usize> {
        let slot = (*self.sparse.get(entity.index() as usize)?)?;
        (self.dense[slot] == entity).then_some(slot)
    }

    /// Inserts or overwrites the component of `entity`.
    ///
    /// Returns the previous value when one was overwritten in place.
    pub fn insert(&mut self, entity: Entity, value: C) -> Option<C> {
        if let Some(slot) = self.slot(entity) {
            return Some(std::mem::replace(&mut self.values[slot], value));
        }
        let index = entity.index() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, None);
        }
        self.sparse[index] = Some(self.dense.len());
        self.dense.push(entity);
        self.values.push(value);
        None
    }

    /// Removes and returns the component of `entity`.
    pub fn remove(&mut self, entity: Entity) -> Option<C> {
        let slot = self.slot(entity)?;
        self.sparse[entity.index() as usize] = None;
        self.dense.swap_remove(slot);
        let value = self.values.swap_remove(slot);
        // Patch the element that was moved into the hole.
        if let Some(&moved) = self.dense.get(slot) {
            self.sparse[moved.index() as usize] = Some(slot);
        }
        Some(value)
    }

    /// Borrows the component of `entity`, if it holds one.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.slot(entity).map(|slot| &self.values[slot])
    }

    /// Mutably borrows the component of `entity`, if it holds one.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.slot(entity).map(|slot| &mut self.values[slot])
    }
}

impl<C: Component> ErasedStorage for Storage<C> {
    fn component_name(&self) -> &'static str {
        C::type_name()
    }

    fn len(&self) -> usize {
        self.dense.len()
    }

    fn contains(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    fn detach(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn entities(&self) -> &[Entity] {
        &self.dense
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
