//! Snapshot views over component conjunctions.
//!
//! A [`View`] is computed when it is requested: the smallest storage of the
//! conjunction drives the walk and the other storages are probed for
//! membership. The resulting entity list is a snapshot, so the registry can
//! be mutated freely while the view is consumed:
//!
//! - entities destroyed (or stripped of a viewed component) before their
//!   turn are skipped,
//! - entities created during the pass are never visited,
//! - swap-removal compaction cannot shift an unvisited entity past the
//!   cursor, because the cursor walks the snapshot rather than the storage.

use std::marker::PhantomData;

use crate::component::ComponentSet;
use crate::entity::Entity;
use crate::error::EcsError;
use crate::registry::Registry;
use crate::storage::StorageMap;

/// Entities that held every component of `S` when the view was taken.
#[derive(Debug)]
pub struct View<S> {
    entities: Vec<Entity>,
    _set: PhantomData<fn() -> S>,
}

impl<S: ComponentSet> View<S> {
    pub(crate) fn snapshot(storages: &StorageMap) -> Self {
        let mut members = Vec::new();
        for id in S::type_ids() {
            match storages.get(&id) {
                Some(storage) => members.push(storage.as_ref()),
                // A type nobody holds yet matches nothing.
                None => return Self::from_entities(Vec::new()),
            }
        }

        let Some(driver) = members.iter().min_by_key(|storage| storage.len()) else {
            return Self::from_entities(Vec::new());
        };
        let entities = driver
            .entities()
            .iter()
            .copied()
            .filter(|&entity| members.iter().all(|storage| storage.contains(entity)))
            .collect();
        Self::from_entities(entities)
    }

    fn from_entities(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            _set: PhantomData,
        }
    }

    /// Matched entities in snapshot order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of entities in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing matched when the view was taken.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Visits every snapshot entity that still matches, with full access to
    /// the registry.
    ///
    /// The visitor may mutate components, destroy the visited entity or any
    /// other, and create new entities. The first error aborts the pass.
    pub fn each<F>(self, registry: &mut Registry, mut visit: F) -> Result<(), EcsError>
    where
        F: FnMut(&mut Registry, Entity) -> Result<(), EcsError>,
    {
        for entity in self.entities {
            if registry.has_all::<S>(entity) {
                visit(registry, entity)?;
            }
        }
        Ok(())
    }
}

impl<S> IntoIterator for View<S> {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}
