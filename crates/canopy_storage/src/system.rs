//! Systems: per-frame logic driven by a query.
//!
//! A system names a query, optionally prepares a per-frame value in
//! [`System::before_query`], and is then run once per matching entity. The
//! world runs systems in registration order during
//! [`World::update`](crate::World::update).

use std::fmt;

use canopy_foundation::{Entity, Error, ErrorContext, ErrorKind, Result};

use crate::query::QuerySet;
use crate::world::World;

/// A unit of per-frame logic.
///
/// # Hazard
///
/// `run` receives the world mutably. Adding or removing components under
/// the key that is currently driving the query (see
/// [`QueryPlan`](crate::QueryPlan)) shifts the driver's dense array while it
/// is being walked by position, so which of the remaining entities are
/// visited this frame is unspecified. Structural changes to other keys are
/// fine.
pub trait System: 'static {
    /// The keys this system iterates.
    type Query: QuerySet;

    /// Value prepared once per frame by [`System::before_query`] and handed
    /// to every `run` call in that frame.
    type Frame: Default;

    /// Returns the query, in the order components are passed to `run`.
    fn query(&self) -> Self::Query;

    /// Runs once per frame before any `run` call.
    ///
    /// The default does nothing and produces `Frame::default()`.
    fn before_query(&mut self, _world: &mut World) -> Self::Frame {
        Self::Frame::default()
    }

    /// Runs once per matching entity with clones of its queried components.
    ///
    /// # Errors
    ///
    /// An error aborts the current `update`.
    fn run(
        &mut self,
        entity: Entity,
        components: <Self::Query as QuerySet>::Item,
        world: &mut World,
        frame: &Self::Frame,
    ) -> Result<()>;

    /// Name used in logs and errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Handle returned by [`World::add_system`](crate::World::add_system).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub(crate) u64);

/// Type-erased system, as stored by the world.
pub(crate) trait ErasedSystem {
    fn name(&self) -> &'static str;
    fn execute(&mut self, world: &mut World) -> Result<()>;
}

impl<S: System> ErasedSystem for S {
    fn name(&self) -> &'static str {
        System::name(self)
    }

    fn execute(&mut self, world: &mut World) -> Result<()> {
        let name = System::name(self);
        let frame = self.before_query(world);
        let query = self.query();
        world
            .run_query(&query, |entity, components, world| {
                self.run(entity, components, world, &frame).map_err(|err| {
                    Error::system_failed(name, err)
                        .with_context(ErrorContext::new().with_entity(entity))
                })
            })
            .map_err(|err| {
                if matches!(err.kind, ErrorKind::System { .. }) {
                    err
                } else {
                    Error::system_failed(name, err)
                }
            })
    }
}

/// A system built from a query and a closure, with no `before_query` hook.
pub struct FnSystem<Q, F> {
    name: &'static str,
    query: Q,
    run: F,
}

impl<Q, F> FnSystem<Q, F>
where
    Q: QuerySet + Clone + 'static,
    F: FnMut(Entity, Q::Item, &mut World) -> Result<()> + 'static,
{
    /// Creates a system running `run` for every entity matching `query`.
    pub fn new(name: &'static str, query: Q, run: F) -> Self {
        Self { name, query, run }
    }
}

impl<Q, F> System for FnSystem<Q, F>
where
    Q: QuerySet + Clone + 'static,
    F: FnMut(Entity, Q::Item, &mut World) -> Result<()> + 'static,
{
    type Query = Q;
    type Frame = ();

    fn query(&self) -> Q {
        self.query.clone()
    }

    fn run(&mut self, entity: Entity, components: Q::Item, world: &mut World, _frame: &()) -> Result<()> {
        (self.run)(entity, components, world)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

impl<Q, F> fmt::Debug for FnSystem<Q, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSystem").field("name", &self.name).finish_non_exhaustive()
    }
}
