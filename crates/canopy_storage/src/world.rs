//! The world: component storage, entity allocation, and the system schedule.
//!
//! ```text
//! World
//!   entities:   EntityStore              live flags + LIFO free list
//!   components: ComponentStore           ComponentId -> SparseSet<T>
//!   systems:    [SystemId, Box<system>]  run in registration order
//! ```
//!
//! The `World` is the only way to mutate component storage. Systems receive
//! it mutably while they run, so they can read other entities, write
//! components, and spawn or remove entities.

use std::fmt;

use canopy_foundation::{Entity, Error, ErrorContext, Result};
use tracing::{debug, trace, trace_span};

use crate::component::{ComponentKey, ComponentStore};
use crate::config::WorldConfig;
use crate::entity::EntityStore;
use crate::query::{QueryPlan, QuerySet};
use crate::sparse_set::SparseSet;
use crate::system::{ErasedSystem, System, SystemId};

struct RegisteredSystem {
    id: SystemId,
    system: Box<dyn ErasedSystem>,
}

/// Owns all component storage, the entity allocator, and the systems.
pub struct World {
    config: WorldConfig,
    entities: EntityStore,
    components: ComponentStore,
    /// Systems in registration order. Empty while `update` is running.
    systems: Vec<RegisteredSystem>,
    /// Ids of the systems taken out for the running `update`.
    running: Vec<SystemId>,
    /// Systems removed while `update` was running.
    pending_removals: Vec<SystemId>,
    next_system_id: u64,
    /// Number of completed `update` calls.
    frame: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates an empty world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates an empty world with the given configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            entities: EntityStore::with_capacity(config.entity_capacity),
            components: ComponentStore::with_set_capacity(config.component_capacity),
            config,
            systems: Vec::new(),
            running: Vec::new(),
            pending_removals: Vec::new(),
            next_system_id: 0,
            frame: 0,
        }
    }

    /// Returns the configuration this world was created with.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the number of completed updates.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates an entity, reusing the most recently freed id if any.
    pub fn create_entity(&mut self) -> Entity {
        self.entities.spawn()
    }

    /// Removes an entity from every component set and frees its id.
    ///
    /// Removing an entity that does not exist is a no-op.
    pub fn remove_entity(&mut self, entity: Entity) {
        let removed = self.components.remove_entity(entity);
        let freed = self.entities.free(entity);
        trace!(entity = entity.index(), components = removed, freed, "removed entity");
    }

    /// Checks whether an entity id is currently allocated.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.exists(entity)
    }

    /// Returns the number of allocated entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterates over allocated entities in index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Adds or overwrites a component, returning the previous value.
    ///
    /// The key's set is created on first use.
    pub fn add_component<T: 'static>(&mut self, entity: Entity, key: ComponentKey<T>, value: T) -> Option<T> {
        self.components.insert(entity, key, value)
    }

    /// Creates the key's set, empty, if it does not exist yet.
    ///
    /// Queries over a registered key match nothing instead of failing.
    pub fn register_component<T: 'static>(&mut self, key: ComponentKey<T>) {
        self.components.register(key);
    }

    /// Gets a component.
    #[must_use]
    pub fn get_component<T: 'static>(&self, entity: Entity, key: ComponentKey<T>) -> Option<&T> {
        self.components.set(key)?.get(entity)
    }

    /// Gets a component mutably.
    pub fn get_component_mut<T: 'static>(&mut self, entity: Entity, key: ComponentKey<T>) -> Option<&mut T> {
        self.components.set_mut(key)?.get_mut(entity)
    }

    /// Checks whether an entity has a component.
    #[must_use]
    pub fn has_component<T: 'static>(&self, entity: Entity, key: ComponentKey<T>) -> bool {
        self.components
            .set(key)
            .is_some_and(|set| set.contains(entity))
    }

    /// Removes a component, returning it.
    ///
    /// When this removes the entity's last component, the entity's id is
    /// freed as well. Removing an absent component is a no-op.
    pub fn remove_component<T: 'static>(&mut self, entity: Entity, key: ComponentKey<T>) -> Option<T> {
        let removed = self.components.remove(entity, key)?;
        if !self.components.has_any(entity) && self.entities.free(entity) {
            trace!(entity = entity.index(), "freed entity after removing its last component");
        }
        Some(removed)
    }

    /// Returns how many entities hold a component, or `None` if the key has
    /// never had a component added.
    #[must_use]
    pub fn component_count<T: 'static>(&self, key: ComponentKey<T>) -> Option<usize> {
        self.components.set(key).map(SparseSet::len)
    }

    /// Returns the sparse set behind a key, for raw dense iteration.
    #[must_use]
    pub fn sparse_set<T: 'static>(&self, key: ComponentKey<T>) -> Option<&SparseSet<T>> {
        self.components.set(key)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Resolves a query's keys and selects its driver set.
    ///
    /// # Errors
    ///
    /// Fails if any key has never had a component added.
    pub fn plan<Q: QuerySet>(&self, query: &Q) -> Result<QueryPlan> {
        QueryPlan::new(&self.components, query.keys())
    }

    /// Collects every entity that has all of the query's components.
    ///
    /// `out` is cleared first. Entities appear in the driver set's dense
    /// order.
    ///
    /// # Errors
    ///
    /// Fails if any key has never had a component added.
    pub fn query_entities<Q: QuerySet>(&self, query: &Q, out: &mut Vec<Entity>) -> Result<()> {
        let plan = self.plan(query)?;
        out.clear();
        if let Some(driver) = self.components.untyped(plan.driver_id()) {
            out.extend(
                driver
                    .entities()
                    .iter()
                    .copied()
                    .filter(|entity| plan.matches(&self.components, *entity)),
            );
        }
        Ok(())
    }

    /// Calls `f` with clones of the components of every matching entity.
    ///
    /// The driver set is chosen once, then walked by position. `f` receives
    /// the world mutably; see the hazard on [`System`] about structurally
    /// changing the driver's key from inside `f`.
    ///
    /// # Errors
    ///
    /// Fails if any key has never had a component added, or with the first
    /// error `f` returns.
    pub fn run_query<Q, F>(&mut self, query: &Q, mut f: F) -> Result<()>
    where
        Q: QuerySet,
        F: FnMut(Entity, Q::Item, &mut World) -> Result<()>,
    {
        let plan = self.plan(query)?;
        let driver = plan.driver_id();

        let mut position = 0;
        while let Some(entity) = self
            .components
            .untyped(driver)
            .and_then(|set| set.entities().get(position).copied())
        {
            position += 1;
            if !plan.matches(&self.components, entity) {
                continue;
            }
            if let Some(components) = query.fetch(&self.components, entity) {
                f(entity, components, self)?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers a system. Systems run in registration order.
    ///
    /// A system added during `update` first runs in the next frame.
    pub fn add_system<S: System>(&mut self, system: S) -> SystemId {
        let id = SystemId(self.next_system_id);
        self.next_system_id += 1;
        debug!(system = System::name(&system), id = id.0, "registered system");
        self.systems.push(RegisteredSystem {
            id,
            system: Box::new(system),
        });
        id
    }

    /// Deregisters a system, returning whether it was registered.
    ///
    /// A system removed during `update` does not run for the rest of that
    /// frame and is dropped when the frame ends.
    pub fn remove_system(&mut self, id: SystemId) -> bool {
        if let Some(index) = self.systems.iter().position(|entry| entry.id == id) {
            let entry = self.systems.remove(index);
            debug!(system = entry.system.name(), id = id.0, "removed system");
            return true;
        }
        if self.running.contains(&id) && !self.pending_removals.contains(&id) {
            debug!(id = id.0, "removing system after the current frame");
            self.pending_removals.push(id);
            return true;
        }
        false
    }

    /// Returns the number of registered systems.
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len() + self.running.len() - self.pending_removals.len()
    }

    /// Advances one frame.
    ///
    /// Each system, in registration order, has its `before_query` hook run
    /// once and is then run for every entity matching its query.
    ///
    /// # Errors
    ///
    /// Stops at the first failing system and returns its error, including
    /// an unregistered key in its query. Registered systems are kept either
    /// way.
    ///
    /// Calling `update` from inside a running system fails without touching
    /// the outer frame.
    pub fn update(&mut self) -> Result<()> {
        if !self.running.is_empty() {
            return Err(Error::custom("update called from inside a running system"));
        }

        let mut systems = std::mem::take(&mut self.systems);
        self.running = systems.iter().map(|entry| entry.id).collect();

        let mut result = Ok(());
        for entry in &mut systems {
            if self.pending_removals.contains(&entry.id) {
                continue;
            }
            let _span = self
                .config
                .trace_systems
                .then(|| trace_span!("system", name = entry.system.name(), frame = self.frame).entered());

            if let Err(mut err) = entry.system.execute(self) {
                let context = err.context.take().unwrap_or_default();
                result = Err(err.with_context(context.with_frame(self.frame).with_entry("update")));
                break;
            }
        }

        // Systems added while running landed in `self.systems`.
        systems.append(&mut self.systems);
        let removals = std::mem::take(&mut self.pending_removals);
        systems.retain(|entry| !removals.contains(&entry.id));
        self.systems = systems;
        self.running.clear();

        self.frame += 1;
        result
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("config", &self.config)
            .field("entities", &self.entities.len())
            .field("components", &self.components)
            .field("systems", &self.system_count())
            .field("frame", &self.frame)
            .finish()
    }
}
