//! Hierarchy components.
//!
//! Each transform channel stores a `local` value, authored relative to the
//! parent, and a `world` value, recomputed by its resolver every update.

use canopy_foundation::Entity;
use glam::Vec2;

/// Points at an entity's parent in the transform hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Parent(pub Entity);

/// A transform channel that composes down the parent chain.
pub trait Hierarchical: Clone + 'static {
    /// The channel's value type.
    type Value: Copy;

    /// Channel name used in logs.
    const NAME: &'static str;

    /// Returns the value relative to the parent.
    fn local(&self) -> Self::Value;

    /// Returns the last resolved world value.
    fn world(&self) -> Self::Value;

    /// Stores a resolved world value.
    fn set_world(&mut self, value: Self::Value);

    /// Combines a parent's world value with a child's local value.
    fn compose(parent_world: Self::Value, local: Self::Value) -> Self::Value;
}

/// Translation, accumulated additively.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Position {
    /// Offset from the parent's world position.
    pub local: Vec2,
    /// Resolved position.
    pub world: Vec2,
}

impl Position {
    /// Creates a position whose world value starts equal to `local`.
    #[must_use]
    pub fn new(local: Vec2) -> Self {
        Self { local, world: local }
    }

    /// Creates a position from coordinates.
    #[must_use]
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y))
    }
}

impl Hierarchical for Position {
    type Value = Vec2;
    const NAME: &'static str = "position";

    fn local(&self) -> Vec2 {
        self.local
    }

    fn world(&self) -> Vec2 {
        self.world
    }

    fn set_world(&mut self, value: Vec2) {
        self.world = value;
    }

    fn compose(parent_world: Vec2, local: Vec2) -> Vec2 {
        parent_world + local
    }
}

/// Rotation angle, accumulated additively.
///
/// Units are up to the caller; the resolver only sums.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rotation {
    /// Angle relative to the parent.
    pub local: f32,
    /// Resolved angle.
    pub world: f32,
}

impl Rotation {
    /// Creates a rotation whose world value starts equal to `local`.
    #[must_use]
    pub fn new(local: f32) -> Self {
        Self { local, world: local }
    }
}

impl Hierarchical for Rotation {
    type Value = f32;
    const NAME: &'static str = "rotation";

    fn local(&self) -> f32 {
        self.local
    }

    fn world(&self) -> f32 {
        self.world
    }

    fn set_world(&mut self, value: f32) {
        self.world = value;
    }

    fn compose(parent_world: f32, local: f32) -> f32 {
        parent_world + local
    }
}

/// Per-axis scale, accumulated multiplicatively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    /// Factor relative to the parent.
    pub local: Vec2,
    /// Resolved factor.
    pub world: Vec2,
}

impl Scale {
    /// Creates a scale whose world value starts equal to `local`.
    #[must_use]
    pub fn new(local: Vec2) -> Self {
        Self { local, world: local }
    }

    /// Creates a scale from per-axis factors.
    #[must_use]
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::new(Vec2::new(x, y))
    }

    /// Scale of one on both axes.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Vec2::ONE)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::identity()
    }
}

impl Hierarchical for Scale {
    type Value = Vec2;
    const NAME: &'static str = "scale";

    fn local(&self) -> Vec2 {
        self.local
    }

    fn world(&self) -> Vec2 {
        self.world
    }

    fn set_world(&mut self, value: Vec2) {
        self.world = value;
    }

    fn compose(parent_world: Vec2, local: Vec2) -> Vec2 {
        parent_world * local
    }
}
