//! Dotted field paths.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, Result};

/// A dotted path into a configuration tree, e.g.
/// `rewards.arm_self_collision.weight`.
///
/// Construction never fails; empty segments are reported when the path is
/// followed. Numeric segments index into lists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    /// Create a path from its dotted form.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The dotted form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the path is well formed and split it into segments.
    pub fn segments(&self) -> Result<Vec<&str>> {
        if self.0.is_empty() {
            return Err(EnvError::invalid_path("", "empty path"));
        }
        let segments: Vec<&str> = self.0.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(EnvError::invalid_path(&self.0, "empty segment"));
        }
        Ok(segments)
    }

    /// Append a segment.
    #[must_use]
    pub fn child(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}.{segment}", self.0))
        }
    }

    /// Check if `self` equals `prefix` or lies below it.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0 == prefix
            || (self.0.starts_with(prefix) && self.0.as_bytes().get(prefix.len()) == Some(&b'.'))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for FieldPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}
