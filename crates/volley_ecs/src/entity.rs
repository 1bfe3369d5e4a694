//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight handle with no inherent data. It pairs a
//! slot index with a generation counter: when a slot is recycled its
//! generation is bumped, so a handle kept past [`destroy`] is detected as
//! stale instead of silently aliasing the entity that reused the slot.
//!
//! [`destroy`]: crate::Registry::destroy

use std::fmt;

/// A versioned entity identifier.
///
/// Entities are pure identifiers; components attached through the
/// [`Registry`](crate::Registry) give them meaning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Build a handle from its raw parts.
    #[must_use]
    pub const fn from_raw_parts(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index. Reused after the entity is destroyed.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot at the time this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Allocates entity handles and recycles destroyed slots.
///
/// ```text
/// generations: [0, 1, 0, 2]   one entry per slot ever handed out
/// free_list:   [1, 3]         slots waiting for reuse
/// ```
#[derive(Debug, Default)]
pub struct EntityAllocator {
    generations: Vec<u32>,
    free_list: Vec<u32>,
}

impl EntityAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a handle, reusing a freed slot when one is available.
    pub fn allocate(&mut self) -> Entity {
        if let Some(index) = self.free_list.pop() {
            // Generation was already bumped on deallocation.
            Entity::from_raw_parts(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            Entity::from_raw_parts(index, 0)
        }
    }

    /// Releases the slot of `entity`.
    ///
    /// Returns `false` if the handle was already stale.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = &mut self.generations[entity.index as usize];
        *slot = slot.wrapping_add(1);
        self.free_list.push(entity.index);
        true
    }

    /// Returns `true` while `entity` has not been deallocated.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index as usize)
            .is_some_and(|&generation| generation == entity.generation)
    }

    /// Number of live entities.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.generations.len() - self.free_list.len()
    }

    /// Number of slots ever allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }
}
