//! Registry error types.
//!
//! Every variant is a precondition violation: correct gameplay code checks
//! with [`Registry::has`](crate::Registry::has) before reading optional data,
//! so none of these are retried.

use crate::entity::Entity;

/// Errors returned by [`Registry`](crate::Registry) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// `get`/`remove` on a component the entity does not hold.
    #[error("entity {entity} has no `{component}` component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// `assign` on a component the entity already holds.
    #[error("entity {entity} already has a `{component}` component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    /// `attachee` on a tag with no bound entity.
    #[error("no entity is bound to tag `{0}`")]
    UnboundTag(&'static str),

    /// The handle refers to a destroyed (possibly recycled) slot.
    #[error("entity {0} is stale")]
    StaleEntity(Entity),
}
