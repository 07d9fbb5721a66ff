//! Error types for entity-reference resolution.

use thiserror::Error;

use crate::EntityKind;

/// Errors that can occur while compiling or resolving entity patterns.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// The pattern is not a valid expression.
    #[error("invalid entity pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// Why the pattern was rejected.
        message: String,
    },

    /// A pattern matched no entity of the target robot.
    #[error("{kind} pattern '{pattern}' matched no {kind} (available: {available})")]
    Unresolved {
        /// The pattern that matched nothing.
        pattern: String,
        /// Which entity list was searched.
        kind: EntityKind,
        /// Comma-separated entity names that were available.
        available: String,
    },

    /// An entity is matched by two patterns of the same table.
    #[error("{kind} '{name}' is matched by both '{first}' and '{second}'")]
    Ambiguous {
        /// The entity matched twice.
        name: String,
        /// Which entity list was searched.
        kind: EntityKind,
        /// The first pattern that matched.
        first: String,
        /// The second pattern that matched.
        second: String,
    },
}

impl EntityError {
    /// Create an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create an unresolved pattern error.
    #[must_use]
    pub fn unresolved<S: AsRef<str>>(
        pattern: impl Into<String>,
        kind: EntityKind,
        entities: &[S],
    ) -> Self {
        let available = entities
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(", ");
        Self::Unresolved {
            pattern: pattern.into(),
            kind,
            available,
        }
    }

    /// Create an ambiguous match error.
    #[must_use]
    pub fn ambiguous(
        name: impl Into<String>,
        kind: EntityKind,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::Ambiguous {
            name: name.into(),
            kind,
            first: first.into(),
            second: second.into(),
        }
    }

    /// Check if this error reports a pattern with zero matches.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved { .. })
    }
}

/// Result type for entity operations.
pub type Result<T> = std::result::Result<T, EntityError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_lists_available_entities() {
        let err = EntityError::unresolved("link[1-8]", EntityKind::Body, &["base", "link1"]);
        let msg = err.to_string();
        assert!(msg.contains("link[1-8]"));
        assert!(msg.contains("base, link1"));
        assert!(msg.starts_with("body pattern"));
        assert!(err.is_unresolved());
    }

    #[test]
    fn test_ambiguous_display() {
        let err =
            EntityError::ambiguous("FL_hip_joint", EntityKind::Joint, ".*_hip_joint", "FL_.*");
        let msg = err.to_string();
        assert!(msg.contains("FL_hip_joint"));
        assert!(msg.contains(".*_hip_joint"));
        assert!(msg.contains("FL_.*"));
        assert!(!err.is_unresolved());
    }
}
