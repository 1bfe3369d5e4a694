//! The [`Registry`]: entity lifecycle, component storage, and tag bindings.
//!
//! The registry is the single mutation gateway for game state. Component
//! references it hands out borrow the registry, so they cannot be held
//! across a `create` or `destroy`.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::component::{Component, ComponentSet};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::storage::{Storage, StorageMap};
use crate::view::View;

/// A well-known role bound to at most one entity, such as "the player".
///
/// Implement it for a small fieldless enum:
///
/// ```rust
/// use volley_ecs::Tag;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Role {
///     Player,
/// }
///
/// impl Tag for Role {
///     fn name(self) -> &'static str {
///         match self {
///             Role::Player => "player",
///         }
///     }
/// }
/// ```
pub trait Tag: Copy + Eq + Hash + fmt::Debug + 'static {
    fn name(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct TagKey {
    ty: TypeId,
    name: &'static str,
}

impl TagKey {
    fn of<T: Tag>(tag: T) -> Self {
        Self {
            ty: TypeId::of::<T>(),
            name: tag.name(),
        }
    }
}

/// Owner of all entities, component storages, and tag bindings.
#[derive(Default)]
pub struct Registry {
    allocator: EntityAllocator,
    storages: StorageMap,
    attachees: HashMap<TagKey, Entity>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("alive", &self.alive())
            .field("storages", &self.storages.len())
            .field("attachees", &self.attachees)
            .finish()
    }
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Allocate a new entity with no components.
    pub fn create(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        trace!(%entity, "created entity");
        entity
    }

    /// Destroy `entity`: detach every component, unbind any tag pointing at
    /// it, and recycle its slot.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        self.check(entity)?;
        for storage in self.storages.values_mut() {
            storage.detach(entity);
        }
        self.attachees.retain(|key, bound| {
            let keep = *bound != entity;
            if !keep {
                debug!(%entity, tag = key.name, "tag unbound by destroy");
            }
            keep
        });
        self.allocator.deallocate(entity);
        trace!(%entity, "destroyed entity");
        Ok(())
    }

    /// Returns `true` if `entity` has not been destroyed.
    #[must_use]
    pub fn valid(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    /// Fails with [`EcsError::StaleEntity`] if `entity` has been destroyed.
    pub fn check(&self, entity: Entity) -> Result<(), EcsError> {
        if self.valid(entity) {
            Ok(())
        } else {
            Err(EcsError::StaleEntity(entity))
        }
    }

    /// Number of live entities.
    #[must_use]
    pub fn alive(&self) -> usize {
        self.allocator.alive_count()
    }

    // -- Storage access --

    fn storage<C: Component>(&self) -> Option<&Storage<C>> {
        self.storages
            .get(&C::component_type_id())
            .and_then(|storage| storage.as_any().downcast_ref())
    }

    fn storage_mut<C: Component>(&mut self) -> Option<&mut Storage<C>> {
        self.storages
            .get_mut(&C::component_type_id())
            .and_then(|storage| storage.as_any_mut().downcast_mut())
    }

    fn storage_or_insert<C: Component>(&mut self) -> &mut Storage<C> {
        self.storages
            .entry(C::component_type_id())
            .or_insert_with(|| Box::new(Storage::<C>::new()))
            .as_any_mut()
            .downcast_mut()
            .unwrap_or_else(|| {
                panic!(
                    "storage for `{}` holds another type",
                    std::any::type_name::<C>()
                )
            })
    }

    /// Number of entities holding `C`.
    #[must_use]
    pub fn size<C: Component>(&self) -> usize {
        self.storages
            .get(&C::component_type_id())
            .map_or(0, |storage| storage.len())
    }

    // -- Component operations --

    /// Attach `value` to `entity`.
    ///
    /// Fails with [`EcsError::DuplicateComponent`] if `entity` already holds
    /// a `C`; see [`Registry::accommodate`] for the overwriting variant.
    pub fn assign<C: Component>(&mut self, entity: Entity, value: C) -> Result<&mut C, EcsError> {
        self.check(entity)?;
        if self.has::<C>(entity) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: C::type_name(),
            });
        }
        self.accommodate(entity, value)
    }

    /// Attach `value` to `entity`, overwriting any existing `C` in place.
    pub fn accommodate<C: Component>(
        &mut self,
        entity: Entity,
        value: C,
    ) -> Result<&mut C, EcsError> {
        self.check(entity)?;
        let storage = self.storage_or_insert::<C>();
        storage.insert(entity, value);
        storage.get_mut(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: C::type_name(),
        })
    }

    /// Detach and return the `C` of `entity`.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Result<C, EcsError> {
        self.check(entity)?;
        self.storage_mut::<C>()
            .and_then(|storage| storage.remove(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: C::type_name(),
            })
    }

    /// Borrow the `C` of `entity`.
    pub fn get<C: Component>(&self, entity: Entity) -> Result<&C, EcsError> {
        self.check(entity)?;
        self.try_get(entity).ok_or(EcsError::MissingComponent {
            entity,
            component: C::type_name(),
        })
    }

    /// Mutably borrow the `C` of `entity`.
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Result<&mut C, EcsError> {
        self.check(entity)?;
        self.storage_mut::<C>()
            .and_then(|storage| storage.get_mut(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: C::type_name(),
            })
    }

    /// Borrow the `C` of `entity` if it is alive and holds one.
    #[must_use]
    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.storage::<C>()?.get(entity)
    }

    /// Returns `true` if `entity` is alive and holds a `C`.
    #[must_use]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.try_get::<C>(entity).is_some()
    }

    /// Returns `true` if `entity` is alive and holds every component of `S`.
    #[must_use]
    pub fn has_all<S: ComponentSet>(&self, entity: Entity) -> bool {
        self.valid(entity)
            && S::type_ids().iter().all(|id| {
                self.storages
                    .get(id)
                    .is_some_and(|storage| storage.contains(entity))
            })
    }

    // -- Views --

    /// Snapshot the entities holding every component of `S`.
    #[must_use]
    pub fn view<S: ComponentSet>(&self) -> View<S> {
        View::snapshot(&self.storages)
    }

    /// Mutate the components of every entity holding all of `S`, in place.
    ///
    /// The visitor receives `&mut` references to each requested component
    /// but not the registry, so it cannot create or destroy entities.
    ///
    /// # Panics
    ///
    /// Panics if `S` names the same component type twice.
    pub fn each<S: ComponentSet>(&mut self, mut visit: impl FnMut(Entity, S::Item<'_>)) {
        let mut ids = S::type_ids();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(
            ids.len(),
            S::type_ids().len(),
            "component set {:?} repeats a type",
            S::type_names()
        );

        let view = self.view::<S>();
        if view.is_empty() {
            return;
        }
        let Some(mut taken) = S::extract(&mut self.storages) else {
            return;
        };
        for entity in view {
            if let Some(item) = S::fetch(&mut taken, entity) {
                visit(entity, item);
            }
        }
        S::restore(taken, &mut self.storages);
    }

    // -- Tags --

    /// Bind `tag` to `entity`, returning the entity previously bound.
    pub fn attach<T: Tag>(&mut self, tag: T, entity: Entity) -> Result<Option<Entity>, EcsError> {
        self.check(entity)?;
        let previous = self.attachees.insert(TagKey::of(tag), entity);
        debug!(tag = tag.name(), %entity, ?previous, "tag attached");
        Ok(previous)
    }

    /// The entity bound to `tag`.
    pub fn attachee<T: Tag>(&self, tag: T) -> Result<Entity, EcsError> {
        self.attachees
            .get(&TagKey::of(tag))
            .copied()
            .ok_or(EcsError::UnboundTag(tag.name()))
    }

    /// Unbind `tag`, returning the entity it was bound to.
    pub fn detach_tag<T: Tag>(&mut self, tag: T) -> Option<Entity> {
        self.attachees.remove(&TagKey::of(tag))
    }
}
