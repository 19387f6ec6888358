//! Entity handles.

use std::fmt;

/// Entity handle.
///
/// An entity carries no data of its own. It is a key into the per-component
/// sparse sets owned by the world. Freed indices are recycled, so a handle
/// kept after its entity was removed may later refer to a different entity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Entity(u32);

impl Entity {
    /// Creates an entity handle from a raw index.
    #[must_use]
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this entity.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the index as a `usize`, for addressing sparse arrays.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for Entity {
    fn from(index: u32) -> Self {
        Self(index)
    }
}
