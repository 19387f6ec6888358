//! Hierarchy resolution.
//!
//! A [`HierarchyResolver`] recomputes one channel's world values each
//! update. Every entity with the channel is visited; resolving an entity
//! first resolves its parent, so each entity is computed once per frame no
//! matter which order the query yields them in.
//!
//! ```text
//! A (local 10)          A.world = 10
//! └── B (local 5)       B.world = A.world + 5 = 15
//!     └── C (local 2)   C.world = B.world + 2 = 17
//! ```
//!
//! Parent cycles are cut where they are detected: the entity reached a
//! second time on the current path is given `world = local` and marked
//! computed, so the recursion unwinds. The outer call for that entity then
//! still composes it with its parent, like any other entity.
//!
//! ```text
//! a (local 1) -> parent b, b (local 10) -> parent a; resolve(a)
//!   a re-entered:  a.world = 1
//!   b:             b.world = a.world + 10 = 11
//!   a:             a.world = b.world + 1  = 12
//! ```

use std::fmt;

use canopy_foundation::{Entity, Result};
use canopy_storage::{ComponentKey, System, World};
use tracing::warn;

use crate::cache::TransformCache;
use crate::components::{Hierarchical, Parent, Position, Rotation, Scale};

/// Resolves world positions.
pub type PositionResolver = HierarchyResolver<Position>;

/// Resolves world rotations.
pub type RotationResolver = HierarchyResolver<Rotation>;

/// Resolves world scales.
pub type ScaleResolver = HierarchyResolver<Scale>;

/// System that resolves world values for one hierarchical channel.
pub struct HierarchyResolver<C> {
    component: ComponentKey<C>,
    parent: ComponentKey<Parent>,
    cache: TransformCache,
}

impl<C: Hierarchical> HierarchyResolver<C> {
    /// Creates a resolver for the channel stored under `component`, with
    /// parent links stored under `parent`.
    #[must_use]
    pub fn new(component: ComponentKey<C>, parent: ComponentKey<Parent>) -> Self {
        Self {
            component,
            parent,
            cache: TransformCache::new(),
        }
    }

    /// Returns the resolution state left by the last frame.
    #[must_use]
    pub fn cache(&self) -> &TransformCache {
        &self.cache
    }

    /// Resolves `entity`'s world value, resolving its ancestors first.
    ///
    /// Entities without the channel are left untouched. An entity whose
    /// parent is not live, or lacks the channel, resolves as a root. An
    /// entity reached again through its own parent chain is cut there with
    /// `world = local`.
    pub fn resolve(&mut self, entity: Entity, world: &mut World) {
        if self.cache.is_computed(entity) {
            return;
        }

        if self.cache.is_visiting(entity) {
            if let Some(component) = world.get_component_mut(entity, self.component) {
                let local = component.local();
                component.set_world(local);
            }
            warn!(entity = entity.index(), channel = C::NAME, "parent cycle, resolving as root");
            self.cache.mark_computed(entity);
            return;
        }

        let Some(local) = world.get_component(entity, self.component).map(C::local) else {
            return;
        };

        self.cache.begin_visit(entity);
        let parent = world.get_component(entity, self.parent).map(|parent| parent.0);
        let resolved = match parent {
            Some(parent) if world.is_alive(parent) => {
                self.resolve(parent, world);
                match world.get_component(parent, self.component) {
                    Some(parent) => C::compose(parent.world(), local),
                    None => local,
                }
            }
            _ => local,
        };

        if let Some(component) = world.get_component_mut(entity, self.component) {
            component.set_world(resolved);
        }
        self.cache.mark_computed(entity);
        self.cache.end_visit(entity);
    }
}

impl<C: Hierarchical> System for HierarchyResolver<C> {
    type Query = ComponentKey<C>;
    type Frame = ();

    fn query(&self) -> ComponentKey<C> {
        self.component
    }

    fn before_query(&mut self, _world: &mut World) {
        self.cache.reset();
    }

    fn run(&mut self, entity: Entity, _component: C, world: &mut World, _frame: &()) -> Result<()> {
        self.resolve(entity, world);
        Ok(())
    }

    fn name(&self) -> &'static str {
        C::NAME
    }
}

impl<C> fmt::Debug for HierarchyResolver<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchyResolver")
            .field("component", &self.component)
            .field("parent", &self.parent)
            .field("cache", &self.cache)
            .finish()
    }
}
