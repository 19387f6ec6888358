//! Configuration for a [`World`](crate::World).

/// Configuration for a world.
///
/// Controls up-front allocation and per-system tracing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Number of entities to reserve room for in the allocator.
    pub entity_capacity: usize,

    /// Initial dense capacity of each lazily created component set.
    pub component_capacity: usize,

    /// Enter a `trace`-level span around each system during `update`.
    pub trace_systems: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            entity_capacity: 0,
            component_capacity: 0,
            trace_systems: false,
        }
    }
}

impl WorldConfig {
    /// Creates a configuration sized for `entities` entities, reserving the
    /// same capacity in every component set.
    #[must_use]
    pub fn sized_for(entities: usize) -> Self {
        Self {
            entity_capacity: entities,
            component_capacity: entities,
            ..Self::default()
        }
    }

    /// Creates a configuration for debugging with per-system tracing.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            trace_systems: true,
            ..Self::default()
        }
    }

    /// Builder method to set the entity capacity.
    #[must_use]
    pub fn with_entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Builder method to set the component set capacity.
    #[must_use]
    pub fn with_component_capacity(mut self, capacity: usize) -> Self {
        self.component_capacity = capacity;
        self
    }

    /// Builder method to enable/disable per-system tracing.
    #[must_use]
    pub fn with_trace_systems(mut self, enabled: bool) -> Self {
        self.trace_systems = enabled;
        self
    }
}
