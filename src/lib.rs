//! Canopy - Sparse-set ECS with hierarchical transforms
//!
//! This crate re-exports all layers of the Canopy system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: canopy_transform  - Parent links, position/rotation/scale resolvers
//! Layer 1: canopy_storage    - Sparse sets, queries, systems, the World
//! Layer 0: canopy_foundation - Core types (Entity, Error)
//! ```

pub use canopy_foundation as foundation;
pub use canopy_storage as storage;
pub use canopy_transform as transform;
