//! Error types for articulation descriptions.

use sim_entity::EntityError;
use sim_urdf::UrdfError;
use thiserror::Error;

/// Errors that can occur while validating or binding an articulation.
#[derive(Debug, Error)]
pub enum ArticulationError {
    /// Invalid description value.
    #[error("invalid articulation configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// A pattern failed to compile or resolve against the skeleton.
    #[error("entity resolution failed in {context}: {source}")]
    Entity {
        /// Which table the pattern came from.
        context: String,
        /// The underlying resolution error.
        #[source]
        source: EntityError,
    },

    /// A joint is claimed by two actuator groups.
    #[error("joint '{joint}' is claimed by actuator groups '{first}' and '{second}'")]
    OverlappingActuators {
        /// The joint matched twice.
        joint: String,
        /// The first group that claimed it.
        first: String,
        /// The second group that claimed it.
        second: String,
    },

    /// A joint belongs to no actuator group.
    #[error("joint '{0}' is not driven by any actuator group")]
    UnactuatedJoint(String),

    /// The skeleton lists the same name twice.
    #[error("skeleton '{skeleton}' lists {kind} '{name}' more than once")]
    DuplicateEntity {
        /// Skeleton name.
        skeleton: String,
        /// `joint` or `body`.
        kind: &'static str,
        /// The duplicated name.
        name: String,
    },

    /// Reading a URDF asset failed.
    #[error("URDF error: {0}")]
    Urdf(#[from] UrdfError),
}

impl ArticulationError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Wrap an entity error with the table it came from.
    #[must_use]
    pub fn entity(context: impl Into<String>, source: EntityError) -> Self {
        Self::Entity {
            context: context.into(),
            source,
        }
    }

    /// Check if this is a configuration error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig { .. })
    }

    /// Check if a pattern matched nothing.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Entity { source, .. } if source.is_unresolved())
    }
}

/// Result type for articulation operations.
pub type Result<T> = std::result::Result<T, ArticulationError>;
