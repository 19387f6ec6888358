//! Sparse-set component storage, queries, and system scheduling for Canopy.
//!
//! This crate provides:
//! - [`SparseSet`] - Per-component storage with O(1) insert, lookup, and swap-remove
//! - [`ComponentKey`] - Typed keys identifying component sets
//! - [`EntityStore`] - Entity allocation with free-list recycling
//! - [`QuerySet`] / [`QueryPlan`] - Multi-component queries with driver selection
//! - [`System`] - Per-frame logic with an optional `before_query` hook
//! - [`World`] - Storage, allocator, and system schedule in one place

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod component;
mod config;
mod entity;
mod query;
mod sparse_set;
mod system;
mod world;

pub use component::{ComponentId, ComponentKey, ComponentSet, ComponentStore, UntypedKey};
pub use config::WorldConfig;
pub use entity::EntityStore;
pub use query::{QueryPlan, QuerySet};
pub use sparse_set::SparseSet;
pub use system::{FnSystem, System, SystemId};
pub use world::World;
