//! Error types for the Canopy system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::entity::Entity;

/// The main error type for Canopy operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an unregistered component error.
    #[must_use]
    pub fn unregistered_component(component: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnregisteredComponent {
            component: component.into(),
        })
    }

    /// Creates an error raised by user code, typically a system's `run`.
    #[must_use]
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Custom(message.into()))
    }

    /// Wraps an error returned by a system.
    #[must_use]
    pub fn system_failed(system: &'static str, source: Error) -> Self {
        Self::new(ErrorKind::System {
            system,
            source: Box::new(source),
        })
    }

    /// Returns true if this error, or the error a failing system returned,
    /// is an unregistered component error.
    #[must_use]
    pub fn is_unregistered_component(&self) -> bool {
        match &self.kind {
            ErrorKind::UnregisteredComponent { .. } => true,
            ErrorKind::System { source, .. } => source.is_unregistered_component(),
            ErrorKind::Custom(_) => false,
        }
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A query named a component key that never had a component added.
    ///
    /// Distinct from a key whose set exists but is empty, which matches
    /// nothing without failing.
    #[error("unregistered component in query: {component}")]
    UnregisteredComponent {
        /// Name of the missing component key.
        component: String,
    },

    /// A system's `run` returned an error.
    #[error("system {system} failed: {source}")]
    System {
        /// Name of the failing system.
        system: &'static str,
        /// The error the system returned.
        #[source]
        source: Box<Error>,
    },

    /// Failure reported by user code.
    #[error("{0}")]
    Custom(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Frame number the error occurred in, if known.
    pub frame: Option<u64>,
    /// Entity being processed, if any.
    pub entity: Option<Entity>,
    /// Stack of system or operation names.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frame number.
    #[must_use]
    pub fn with_frame(mut self, frame: u64) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Sets the entity being processed.
    #[must_use]
    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Adds a stack entry.
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.stack.push(entry.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(frame) = self.frame {
            write!(f, "in frame {frame}")?;
        }
        if let Some(entity) = self.entity {
            write!(f, " at entity {entity}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for entry in &self.stack {
                writeln!(f, "  in {entry}")?;
            }
        }
        Ok(())
    }
}
