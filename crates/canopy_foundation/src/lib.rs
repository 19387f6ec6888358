//! Core types and errors for Canopy.
//!
//! This crate provides:
//! - [`Entity`] - Recyclable entity handles
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod entity;
mod error;

pub use entity::Entity;
pub use error::{Error, ErrorContext, ErrorKind};

/// Result type used throughout Canopy.
pub type Result<T> = std::result::Result<T, Error>;
