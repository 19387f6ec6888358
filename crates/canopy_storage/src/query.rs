//! Multi-component queries with driver selection.
//!
//! A query is an ordered list of component keys. Execution picks the
//! smallest of the implicated sets as the *driver*, walks the driver's dense
//! entity array, and keeps only the candidates present in every other set:
//!
//! ```text
//! query (Position, Parent)
//!   Position: 10_000 entities
//!   Parent:   12 entities      <- driver
//! cost: 12 candidates, each checked against Position
//! ```
//!
//! Iteration cost is bounded by the rarest component rather than by the
//! whole population.

use canopy_foundation::{Entity, Error, Result};

use crate::component::{ComponentId, ComponentKey, ComponentStore, UntypedKey};

/// Something that names an ordered list of component keys and can fetch
/// the matching components for one entity.
///
/// Implemented for a single [`ComponentKey<T>`] (item `T`) and for tuples of
/// query sets, so `(position_key, parent_key)` fetches `(Position, Parent)`.
/// Fetched components are clones, leaving the world free to be mutated
/// while they are held.
pub trait QuerySet {
    /// The components fetched per matching entity, in key order.
    type Item;

    /// The keys of this query, in listed order.
    fn keys(&self) -> Vec<UntypedKey>;

    /// Fetches the components of one entity, or `None` if any is missing.
    fn fetch(&self, store: &ComponentStore, entity: Entity) -> Option<Self::Item>;
}

impl<T: Clone + 'static> QuerySet for ComponentKey<T> {
    type Item = T;

    fn keys(&self) -> Vec<UntypedKey> {
        vec![self.untyped()]
    }

    fn fetch(&self, store: &ComponentStore, entity: Entity) -> Option<T> {
        store.set(*self)?.get(entity).cloned()
    }
}

macro_rules! impl_query_set_tuple {
    ($($Q:ident),+) => {
        impl<$($Q: QuerySet),+> QuerySet for ($($Q,)+) {
            type Item = ($($Q::Item,)+);

            fn keys(&self) -> Vec<UntypedKey> {
                #[allow(non_snake_case)]
                let ($($Q,)+) = self;
                let mut keys = Vec::new();
                $(keys.extend($Q.keys());)+
                keys
            }

            fn fetch(&self, store: &ComponentStore, entity: Entity) -> Option<Self::Item> {
                #[allow(non_snake_case)]
                let ($($Q,)+) = self;
                Some(($($Q.fetch(store, entity)?,)+))
            }
        }
    };
}

impl_query_set_tuple!(A);
impl_query_set_tuple!(A, B);
impl_query_set_tuple!(A, B, C);
impl_query_set_tuple!(A, B, C, D);
impl_query_set_tuple!(A, B, C, D, E);
impl_query_set_tuple!(A, B, C, D, E, F);
impl_query_set_tuple!(A, B, C, D, E, F, G);
impl_query_set_tuple!(A, B, C, D, E, F, G, H);

/// A query resolved against the current storage: its keys and chosen driver.
#[derive(Clone, Debug)]
pub struct QueryPlan {
    keys: Vec<UntypedKey>,
    driver: usize,
}

impl QueryPlan {
    /// Resolves the keys against storage and selects the driver set.
    ///
    /// The driver is the set with the fewest entities; the first such key
    /// in listed order wins ties.
    ///
    /// # Errors
    ///
    /// Returns [`canopy_foundation::ErrorKind::UnregisteredComponent`] for
    /// the first key that has no backing set. An existing but empty set is
    /// not an error. An empty key list fails with
    /// [`canopy_foundation::ErrorKind::Custom`].
    pub fn new(store: &ComponentStore, keys: Vec<UntypedKey>) -> Result<Self> {
        let mut driver = None;
        for (position, key) in keys.iter().enumerate() {
            let set = store
                .untyped(key.id)
                .ok_or_else(|| Error::unregistered_component(key.name))?;
            match driver {
                Some((_, smallest)) if set.len() >= smallest => {}
                _ => driver = Some((position, set.len())),
            }
        }

        let (driver, _) = driver.ok_or_else(|| Error::custom("query names no component keys"))?;
        Ok(Self { keys, driver })
    }

    /// Returns the driver key.
    #[must_use]
    pub fn driver(&self) -> UntypedKey {
        self.keys[self.driver]
    }

    /// Returns the driver's id.
    #[must_use]
    pub fn driver_id(&self) -> ComponentId {
        self.keys[self.driver].id
    }

    /// Returns the keys in listed order.
    #[must_use]
    pub fn keys(&self) -> &[UntypedKey] {
        &self.keys
    }

    /// Checks a driver candidate against every other set, in listed order.
    #[must_use]
    pub fn matches(&self, store: &ComponentStore, entity: Entity) -> bool {
        self.keys
            .iter()
            .enumerate()
            .filter(|(position, _)| *position != self.driver)
            .all(|(_, key)| store.untyped(key.id).is_some_and(|set| set.contains(entity)))
    }
}
