//! Per-frame resolution state.

use canopy_foundation::Entity;
use canopy_storage::SparseSet;

/// Tracks which entities a resolver has finished, and which are on the
/// current resolution path.
///
/// Both sets are sparse sets, so membership checks and inserts are O(1) and
/// `reset` keeps the allocated capacity for the next frame.
#[derive(Debug, Clone, Default)]
pub struct TransformCache {
    computed: SparseSet<()>,
    visiting: SparseSet<()>,
}

impl TransformCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything from the previous frame.
    pub fn reset(&mut self) {
        self.computed.clear();
        self.visiting.clear();
    }

    /// Checks whether an entity's world value is final for this frame.
    #[must_use]
    pub fn is_computed(&self, entity: Entity) -> bool {
        self.computed.contains(entity)
    }

    /// Checks whether an entity is on the current resolution path.
    #[must_use]
    pub fn is_visiting(&self, entity: Entity) -> bool {
        self.visiting.contains(entity)
    }

    /// Marks an entity as final for this frame.
    pub fn mark_computed(&mut self, entity: Entity) {
        self.computed.insert(entity, ());
    }

    /// Pushes an entity onto the resolution path.
    pub fn begin_visit(&mut self, entity: Entity) {
        self.visiting.insert(entity, ());
    }

    /// Pops an entity off the resolution path.
    pub fn end_visit(&mut self, entity: Entity) {
        self.visiting.remove(entity);
    }

    /// Returns how many entities are final this frame.
    #[must_use]
    pub fn computed_count(&self) -> usize {
        self.computed.len()
    }
}
