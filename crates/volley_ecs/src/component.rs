//! Core [`Component`] trait, type identity, and component conjunctions.
//!
//! Storages are keyed by [`ComponentTypeId`], a wrapper over the compiler's
//! `TypeId`. Two distinct Rust types never share a storage, even when they
//! report the same [`Component::type_name`].

use std::any::TypeId;

use crate::entity::Entity;
use crate::storage::{ErasedStorage, Storage, StorageMap};

/// Identifier of a component type; the key of the registry's storage map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(TypeId);

impl ComponentTypeId {
    /// The identifier of component type `C`.
    #[must_use]
    pub fn of<C: Component>() -> Self {
        Self(TypeId::of::<C>())
    }
}

/// Plain data that can be attached to an entity.
///
/// Any `'static` type qualifies; an empty impl is enough:
///
/// ```rust
/// use volley_ecs::Component;
///
/// struct Health {
///     amount: f32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: 'static {
    /// Human-readable name, used in logs and error messages.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The [`ComponentTypeId`] keying this type's storage.
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId(TypeId::of::<Self>())
    }
}

/// A conjunction of distinct component types, e.g. `(Health, Position)`.
///
/// Used by [`Registry::has_all`](crate::Registry::has_all),
/// [`Registry::view`](crate::Registry::view) and
/// [`Registry::each`](crate::Registry::each). Implemented for tuples of one
/// to six components.
///
/// The storage methods move the needed storages out of the registry's map
/// for the duration of an iteration, so independent `&mut` borrows of
/// different component types do not alias.
pub trait ComponentSet: 'static {
    /// Mutable references yielded per entity.
    type Item<'a>;

    /// Storages moved out of the registry while iterating.
    #[doc(hidden)]
    type Storages;

    /// Type ids in declaration order.
    fn type_ids() -> Vec<ComponentTypeId>;

    /// Type names in declaration order.
    fn type_names() -> Vec<&'static str>;

    #[doc(hidden)]
    fn extract(storages: &mut StorageMap) -> Option<Self::Storages>;

    #[doc(hidden)]
    fn restore(taken: Self::Storages, storages: &mut StorageMap);

    #[doc(hidden)]
    fn fetch(taken: &mut Self::Storages, entity: Entity) -> Option<Self::Item<'_>>;
}

fn downcast_mut<C: Component>(storage: &mut dyn ErasedStorage) -> Option<&mut Storage<C>> {
    storage.as_any_mut().downcast_mut::<Storage<C>>()
}

/// Expands to the erased storage type, once per tuple element.
macro_rules! erased {
    ($_c:ident) => {
        Box<dyn ErasedStorage>
    };
}

macro_rules! impl_component_set_tuple {
    ($($C:ident),+) => {
        impl<$($C: Component),+> ComponentSet for ($($C,)+) {
            type Item<'a> = ($(&'a mut $C,)+);
            type Storages = ($(erased!($C),)+);

            fn type_ids() -> Vec<ComponentTypeId> {
                vec![$($C::component_type_id()),+]
            }

            fn type_names() -> Vec<&'static str> {
                vec![$($C::type_name()),+]
            }

            fn extract(storages: &mut StorageMap) -> Option<Self::Storages> {
                if !Self::type_ids().iter().all(|id| storages.contains_key(id)) {
                    return None;
                }
                Some(($(storages.remove(&$C::component_type_id())?,)+))
            }

            #[allow(non_snake_case)]
            fn restore(taken: Self::Storages, storages: &mut StorageMap) {
                let ($($C,)+) = taken;
                $(storages.insert($C::component_type_id(), $C);)+
            }

            #[allow(non_snake_case)]
            fn fetch(taken: &mut Self::Storages, entity: Entity) -> Option<Self::Item<'_>> {
                let ($($C,)+) = taken;
                Some(($(downcast_mut::<$C>(&mut **$C)?.get_mut(entity)?,)+))
            }
        }
    };
}

impl_component_set_tuple!(A);
impl_component_set_tuple!(A, B);
impl_component_set_tuple!(A, B, C);
impl_component_set_tuple!(A, B, C, D);
impl_component_set_tuple!(A, B, C, D, E);
impl_component_set_tuple!(A, B, C, D, E, F);
