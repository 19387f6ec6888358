//! Sparse-set component storage.
//!
//! Each component type lives in its own [`SparseSet`]:
//!
//! ```text
//! sparse:   [ 1, -, 0, -, 2 ]      entity index -> dense slot
//! entities: [ #2, #0, #4 ]         dense slot   -> entity
//! values:   [ c2, c0, c4 ]         dense slot   -> component
//! ```
//!
//! Membership, lookup and insertion are O(1) (insertion amortized).
//! Removal swaps the last dense element into the vacated slot, so dense
//! order changes across removals and is the only iteration order offered.

use canopy_foundation::Entity;

/// Sentinel marking an unset sparse slot.
const EMPTY: u32 = u32::MAX;

/// Storage for one component type.
#[derive(Clone, Debug)]
pub struct SparseSet<T> {
    /// Entity index -> position in the dense arrays, or `EMPTY`.
    sparse: Vec<u32>,
    /// Dense entity array, parallel to `values`.
    entities: Vec<Entity>,
    /// Dense component array, parallel to `entities`.
    values: Vec<T>,
}

impl<T> Default for SparseSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SparseSet<T> {
    /// Creates an empty sparse set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an empty sparse set with room for `capacity` components.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let slot = *self.sparse.get(entity.slot())?;
        if slot == EMPTY {
            return None;
        }
        let index = slot as usize;
        (self.entities.get(index) == Some(&entity)).then_some(index)
    }

    /// Returns true if the entity has a component in this set.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Gets the component for an entity.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.dense_index(entity).map(|index| &self.values[index])
    }

    /// Gets a mutable reference to the component for an entity.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.dense_index(entity).map(|index| &mut self.values[index])
    }

    /// Inserts or overwrites the component for an entity.
    ///
    /// Returns the previous value if the entity was already present.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(index) = self.dense_index(entity) {
            return Some(std::mem::replace(&mut self.values[index], value));
        }

        let slot = entity.slot();
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, EMPTY);
        }
        self.sparse[slot] = self.entities.len() as u32;
        self.entities.push(entity);
        self.values.push(value);
        None
    }

    /// Removes the component for an entity, returning it.
    ///
    /// The last dense element is moved into the vacated slot. Removing an
    /// absent entity is a no-op.
    #[allow(clippy::cast_possible_truncation)]
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.dense_index(entity)?;

        self.entities.swap_remove(index);
        let value = self.values.swap_remove(index);

        // Something moved into `index` unless we removed the last element.
        if let Some(moved) = self.entities.get(index) {
            self.sparse[moved.slot()] = index as u32;
        }
        self.sparse[entity.slot()] = EMPTY;

        Some(value)
    }

    /// Returns the number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the set holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the dense entity array in its current order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Returns the dense component array, parallel to [`Self::entities`].
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterates over `(entity, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entities.iter().copied().zip(self.values.iter())
    }

    /// Removes every component, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.entities.clear();
        self.values.clear();
    }
}
