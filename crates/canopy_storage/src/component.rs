//! Component keys and type-erased component storage.
//!
//! A [`ComponentKey<T>`] is minted once per component type and identifies
//! the sparse set holding that type. The [`ComponentStore`] maps keys to
//! their sets, creating a set lazily on the first insert under a key.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

use canopy_foundation::Entity;
use tracing::debug;

use crate::sparse_set::SparseSet;

static NEXT_COMPONENT_ID: AtomicU32 = AtomicU32::new(0);

/// Untyped identifier of a component key.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// Returns the raw index of this id.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

/// Typed handle identifying one component sparse set.
///
/// Every call to [`ComponentKey::new`] mints a fresh id, so two keys never
/// alias the same set even when they carry the same `T`. Mint one key per
/// component type and share it by copy.
pub struct ComponentKey<T> {
    id: ComponentId,
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> ComponentKey<T> {
    /// Mints a new key named after `T`.
    #[must_use]
    pub fn new() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    /// Mints a new key with an explicit display name.
    #[must_use]
    pub fn named(name: &'static str) -> Self {
        let id = NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: ComponentId(id),
            name,
            _marker: PhantomData,
        }
    }
}

impl<T> ComponentKey<T> {
    /// Returns the untyped id of this key.
    #[must_use]
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Returns the display name of this key.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Erases the component type.
    #[must_use]
    pub const fn untyped(&self) -> UntypedKey {
        UntypedKey {
            id: self.id,
            name: self.name,
        }
    }
}

impl<T: 'static> Default for ComponentKey<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ComponentKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentKey<T> {}

impl<T> PartialEq for ComponentKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ComponentKey<T> {}

impl<T> Hash for ComponentKey<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for ComponentKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentKey({}, {})", self.id.0, self.name)
    }
}

/// A component key with its type erased.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UntypedKey {
    /// The key's id.
    pub id: ComponentId,
    /// The key's display name.
    pub name: &'static str,
}

/// Object-safe view of a [`SparseSet`] for untyped storage.
pub trait ComponentSet: Any {
    /// Returns true if the entity has a component in this set.
    fn contains(&self, entity: Entity) -> bool;

    /// Returns the number of stored components.
    fn len(&self) -> usize;

    /// Returns true if the set holds no components.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the dense entity array.
    fn entities(&self) -> &[Entity];

    /// Removes the entity's component, returning whether one was present.
    fn remove_entity(&mut self, entity: Entity) -> bool;

    /// Upcasts for downcasting to the concrete set.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts for downcasting to the concrete set.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: 'static> ComponentSet for SparseSet<T> {
    fn contains(&self, entity: Entity) -> bool {
        SparseSet::contains(self, entity)
    }

    fn len(&self) -> usize {
        SparseSet::len(self)
    }

    fn entities(&self) -> &[Entity] {
        SparseSet::entities(self)
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owns one sparse set per component key.
///
/// A key that never had a component inserted has no set at all, which is
/// different from a set that exists but is empty.
pub struct ComponentStore {
    sets: HashMap<ComponentId, Box<dyn ComponentSet>>,
    /// Initial dense capacity for lazily created sets.
    capacity: usize,
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentStore {
    /// Creates a new empty component store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_set_capacity(0)
    }

    /// Creates a store whose sets start with room for `capacity` components.
    #[must_use]
    pub fn with_set_capacity(capacity: usize) -> Self {
        Self {
            sets: HashMap::new(),
            capacity,
        }
    }

    /// Returns the typed set for a key, if one exists.
    #[must_use]
    pub fn set<T: 'static>(&self, key: ComponentKey<T>) -> Option<&SparseSet<T>> {
        self.sets
            .get(&key.id())?
            .as_any()
            .downcast_ref::<SparseSet<T>>()
    }

    /// Returns the typed set for a key mutably, if one exists.
    pub fn set_mut<T: 'static>(&mut self, key: ComponentKey<T>) -> Option<&mut SparseSet<T>> {
        self.sets
            .get_mut(&key.id())?
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
    }

    /// Returns the untyped set for an id, if one exists.
    #[must_use]
    pub fn untyped(&self, id: ComponentId) -> Option<&dyn ComponentSet> {
        let set = self.sets.get(&id)?;
        Some(&**set)
    }

    /// Returns the key's set, creating it empty if the key has none yet.
    pub fn register<T: 'static>(&mut self, key: ComponentKey<T>) -> &mut SparseSet<T> {
        let capacity = self.capacity;
        let set = self.sets.entry(key.id()).or_insert_with(|| {
            debug!(component = key.name(), id = key.id().index(), "creating component set");
            let set: Box<dyn ComponentSet> = Box::new(SparseSet::<T>::with_capacity(capacity));
            set
        });
        // Ids are unique per minted key and a key fixes `T`.
        set.as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .unwrap_or_else(|| unreachable!("component set type does not match its key"))
    }

    /// Inserts or overwrites a component, creating the key's set on first use.
    ///
    /// Returns the previous value, if any.
    pub fn insert<T: 'static>(&mut self, entity: Entity, key: ComponentKey<T>, value: T) -> Option<T> {
        self.register(key).insert(entity, value)
    }

    /// Removes a component from an entity.
    pub fn remove<T: 'static>(&mut self, entity: Entity, key: ComponentKey<T>) -> Option<T> {
        self.set_mut(key)?.remove(entity)
    }

    /// Removes the entity from every set, returning how many held it.
    pub fn remove_entity(&mut self, entity: Entity) -> usize {
        self.sets
            .values_mut()
            .filter_map(|set| set.remove_entity(entity).then_some(()))
            .count()
    }

    /// Returns true if any set holds a component for the entity.
    #[must_use]
    pub fn has_any(&self, entity: Entity) -> bool {
        self.sets.values().any(|set| set.contains(entity))
    }

    /// Returns the number of keys with a backing set.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.sets.len()
    }
}

impl fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sizes: Vec<_> = self
            .sets
            .iter()
            .map(|(id, set)| (id.index(), set.len()))
            .collect();
        sizes.sort_unstable();
        f.debug_struct("ComponentStore")
            .field("sets", &sizes)
            .field("capacity", &self.capacity)
            .finish()
    }
}
