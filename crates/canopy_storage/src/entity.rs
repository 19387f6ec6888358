//! Entity allocation with free-list recycling.
//!
//! The `EntityStore` hands out entity indices, reusing the most recently
//! freed index before issuing a new sequential one.

use canopy_foundation::Entity;
use tracing::trace;

/// Manages entity allocation and liveness.
///
/// Freed indices go on a stack and are reused last-in first-out. Freeing is
/// idempotent: an index that is not live is never pushed twice, so two
/// spawns can never return the same live entity.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    /// Liveness flag for each index ever issued.
    live: Vec<bool>,
    /// Free list of indices available for reuse.
    free_list: Vec<u32>,
    /// Count of live entities.
    live_count: usize,
}

impl EntityStore {
    /// Creates a new empty entity store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with room for `capacity` entities before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            live: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            live_count: 0,
        }
    }

    /// Allocates an entity.
    ///
    /// Reuses the most recently freed index when available.
    #[allow(clippy::cast_possible_truncation)]
    pub fn spawn(&mut self) -> Entity {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            self.live[index as usize] = true;
            trace!(entity = index, "recycled entity");
            Entity::from_raw(index)
        } else {
            let index = self.live.len() as u32;
            self.live.push(true);
            trace!(entity = index, "allocated entity");
            Entity::from_raw(index)
        }
    }

    /// Returns an entity's index to the free list.
    ///
    /// Returns `false` without doing anything if the entity is not live.
    pub fn free(&mut self, entity: Entity) -> bool {
        match self.live.get_mut(entity.slot()) {
            Some(live) if *live => {
                *live = false;
                self.free_list.push(entity.index());
                self.live_count -= 1;
                trace!(entity = entity.index(), "freed entity");
                true
            }
            _ => false,
        }
    }

    /// Checks if an entity is currently allocated.
    #[must_use]
    pub fn exists(&self, entity: Entity) -> bool {
        self.live.get(entity.slot()).copied().unwrap_or(false)
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates over all live entities in index order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(index, _)| Entity::from_raw(index as u32))
    }
}
