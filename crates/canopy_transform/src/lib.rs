//! Canopy Transform - Parent/child transform hierarchies
//!
//! This crate provides:
//! - [`Parent`] links and the [`Position`], [`Rotation`] and [`Scale`] channels
//! - [`HierarchyResolver`], a system that recomputes a channel's world values
//! - [`TransformCache`], the per-frame computed/visiting state of a resolver
//!
//! Channels are independent: position and rotation accumulate by addition
//! down the parent chain, scale by per-axis multiplication. A parent's
//! rotation or scale does not affect its child's world position.
//!
//! ```text
//! let keys = TransformKeys::new();
//! register_transform_systems(&mut world, &keys);
//! world.update()?;   // every world value is now current
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cache;
mod components;
mod resolver;

pub use cache::TransformCache;
pub use components::{Hierarchical, Parent, Position, Rotation, Scale};
pub use resolver::{HierarchyResolver, PositionResolver, RotationResolver, ScaleResolver};

use canopy_storage::{ComponentKey, SystemId, World};
use tracing::debug;

/// The keys a world stores its hierarchy under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransformKeys {
    /// Parent links.
    pub parent: ComponentKey<Parent>,
    /// Positions.
    pub position: ComponentKey<Position>,
    /// Rotations.
    pub rotation: ComponentKey<Rotation>,
    /// Scales.
    pub scale: ComponentKey<Scale>,
}

impl TransformKeys {
    /// Mints a fresh set of keys.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: ComponentKey::named("Parent"),
            position: ComponentKey::named("Position"),
            rotation: ComponentKey::named("Rotation"),
            scale: ComponentKey::named("Scale"),
        }
    }
}

impl Default for TransformKeys {
    fn default() -> Self {
        Self::new()
    }
}

/// Registers the hierarchy keys and adds the position, rotation and scale
/// resolvers, in that order.
///
/// The keys' sets are created up front, so a world with no entities on some
/// channel still updates cleanly.
pub fn register_transform_systems(world: &mut World, keys: &TransformKeys) -> [SystemId; 3] {
    world.register_component(keys.parent);
    world.register_component(keys.position);
    world.register_component(keys.rotation);
    world.register_component(keys.scale);

    let ids = [
        world.add_system(PositionResolver::new(keys.position, keys.parent)),
        world.add_system(RotationResolver::new(keys.rotation, keys.parent)),
        world.add_system(ScaleResolver::new(keys.scale, keys.parent)),
    ];
    debug!(systems = ids.len(), "registered transform resolvers");
    ids
}
