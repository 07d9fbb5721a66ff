//! Compiled entity-reference patterns.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{EntityError, Result};

/// Kind of entity a pattern is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Articulation joint (`FL_hip_joint`, `joint3`).
    Joint,
    /// Rigid body / link (`base`, `link6`).
    Body,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Joint => f.write_str("joint"),
            Self::Body => f.write_str("body"),
        }
    }
}

/// A pattern naming one or more joints or bodies.
///
/// Patterns use regular-expression syntax and must match the *whole* entity
/// name. This covers the three forms used in robot configuration:
///
/// - exact names: `arm_joint1`
/// - bracket classes: `F[L,R]_thigh_joint`, `link[1-8]`
/// - wildcards: `.*_calf_joint`
///
/// Equality and hashing use the source text.
///
/// # Example
///
/// ```
/// use sim_entity::EntityPattern;
///
/// let pattern = EntityPattern::new("F[L,R]_thigh_joint").unwrap();
/// assert!(pattern.matches("FL_thigh_joint"));
/// assert!(pattern.matches("FR_thigh_joint"));
/// assert!(!pattern.matches("RL_thigh_joint"));
/// assert!(!pattern.matches("FL_thigh_joint_extra"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityPattern {
    source: String,
    regex: Regex,
}

impl EntityPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::InvalidPattern`] if the pattern is empty or is
    /// not a valid expression.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let source = pattern.into();
        if source.trim().is_empty() {
            return Err(EntityError::invalid_pattern(source, "pattern is empty"));
        }
        let regex = Regex::new(&format!("^(?:{source})$"))
            .map_err(|e| EntityError::invalid_pattern(source.clone(), e.to_string()))?;
        Ok(Self { source, regex })
    }

    /// Compile every pattern of a list.
    ///
    /// # Errors
    ///
    /// Returns the first compilation error.
    pub fn compile_all<P: AsRef<str>>(patterns: &[P]) -> Result<Vec<Self>> {
        patterns.iter().map(|p| Self::new(p.as_ref())).collect()
    }

    /// The pattern source text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check whether `name` is fully matched by this pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl PartialEq for EntityPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for EntityPattern {}

impl Hash for EntityPattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
    }
}

impl fmt::Display for EntityPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl FromStr for EntityPattern {
    type Err = EntityError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for EntityPattern {
    type Error = EntityError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EntityPattern> for String {
    fn from(pattern: EntityPattern) -> Self {
        pattern.source
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_name() {
        let p = EntityPattern::new("arm_joint1").unwrap();
        assert!(p.matches("arm_joint1"));
        assert!(!p.matches("arm_joint10"));
        assert!(!p.matches("xarm_joint1"));
    }

    #[test]
    fn test_wildcard_is_anchored() {
        let p = EntityPattern::new(".*L_hip_joint").unwrap();
        assert!(p.matches("FL_hip_joint"));
        assert!(p.matches("RL_hip_joint"));
        assert!(!p.matches("FR_hip_joint"));
        assert!(!p.matches("FL_hip_joint_2"));
    }

    #[test]
    fn test_bracket_range() {
        let p = EntityPattern::new("link[1-6]").unwrap();
        assert!(p.matches("link1"));
        assert!(p.matches("link6"));
        assert!(!p.matches("link7"));
        assert!(!p.matches("link"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        // Without the group, `^a|b$` would match "ab_suffix".
        let p = EntityPattern::new("joint7|joint8").unwrap();
        assert!(p.matches("joint7"));
        assert!(p.matches("joint8"));
        assert!(!p.matches("joint78"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = EntityPattern::new("link[1-").unwrap_err();
        assert!(matches!(err, EntityError::InvalidPattern { .. }));

        let err = EntityPattern::new("   ").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_serde_as_string() {
        let p = EntityPattern::new("R[L,R]_thigh_joint").unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "\"R[L,R]_thigh_joint\"");

        let back: EntityPattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);

        let bad: std::result::Result<EntityPattern, _> = serde_json::from_str("\"(\"");
        assert!(bad.is_err());
    }
}
