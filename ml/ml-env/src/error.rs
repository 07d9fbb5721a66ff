//! Error types for ml-env crate.

use sim_articulation::ArticulationError;
use thiserror::Error;

/// Errors that can occur while composing or binding an environment.
#[derive(Debug, Error)]
pub enum EnvError {
    /// An override names a field that cannot be reached.
    #[error("invalid field path '{path}': {reason}")]
    InvalidPath {
        /// The dotted path.
        path: String,
        /// Why it could not be followed.
        reason: String,
    },

    /// A leaf update would change the kind of a field.
    #[error("cannot set '{path}': field holds {expected}, got {found}")]
    KindMismatch {
        /// The dotted path.
        path: String,
        /// Kind of the existing value.
        expected: &'static str,
        /// Kind of the new value.
        found: &'static str,
    },

    /// The tree does not fit the environment schema.
    #[error("schema error in {context}: {source}")]
    Schema {
        /// What was being converted.
        context: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// A composed configuration breaks a value constraint.
    #[error("invalid environment configuration: {0}")]
    InvalidConfig(String),

    /// No variant is registered under this id.
    #[error("unknown environment variant '{id}' (registered: {available})")]
    UnknownVariant {
        /// The requested id.
        id: String,
        /// Comma-separated registered ids.
        available: String,
    },

    /// A reference in a term could not be bound to the robot.
    #[error("binding '{term}' failed: {reason}")]
    Binding {
        /// Path of the term or field holding the reference.
        term: String,
        /// What went wrong.
        reason: String,
    },

    /// The robot description failed to bind.
    #[error("robot binding failed: {0}")]
    Articulation(#[from] ArticulationError),
}

impl EnvError {
    /// Create an invalid path error.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema error.
    #[must_use]
    pub fn schema(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Schema {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    /// Create a binding error.
    #[must_use]
    pub fn binding(term: impl Into<String>, reason: impl ToString) -> Self {
        Self::Binding {
            term: term.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error comes from a bad override.
    #[must_use]
    pub fn is_override_error(&self) -> bool {
        matches!(self, Self::InvalidPath { .. } | Self::KindMismatch { .. })
    }

    /// Check if this error comes from the build step.
    #[must_use]
    pub fn is_binding_error(&self) -> bool {
        matches!(self, Self::Binding { .. } | Self::Articulation(_))
    }
}

/// Result type for ml-env operations.
pub type Result<T> = std::result::Result<T, EnvError>;
