//! Overrides and override steps.
//!
//! A step never adds fields: every path must already exist in the tree it
//! is applied to. Applying a step returns a new tree; the input is left
//! untouched, so a failing step leaves nothing half applied.

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{EnvError, Result};
use crate::node::ConfigNode;
use crate::path::FieldPath;

/// One edit of a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    /// Swap a whole subtree. Earlier edits below `path` are discarded.
    Replace {
        /// Subtree root.
        path: FieldPath,
        /// New subtree.
        node: ConfigNode,
    },
    /// Change one value. The kind must match the existing value, except that
    /// integers widen to floats and a null value accepts any leaf or list of
    /// leaves. Subtrees only arrive through [`Override::Replace`].
    Set {
        /// Field to change.
        path: FieldPath,
        /// New value.
        value: ConfigNode,
    },
    /// Null out a subtree (disables a term).
    Disable {
        /// Subtree root.
        path: FieldPath,
    },
}

impl Override {
    /// The targeted path.
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        match self {
            Self::Replace { path, .. } | Self::Set { path, .. } | Self::Disable { path } => path,
        }
    }

    fn is_structural(&self) -> bool {
        matches!(self, Self::Replace { .. } | Self::Disable { .. })
    }

    /// Apply in place. `tree` may be partially edited on error; callers work
    /// on a copy.
    fn apply_to(&self, tree: &mut ConfigNode) -> Result<()> {
        let path = self.path();
        let segments = path.segments()?;
        let target = tree.get_mut_cow(path, &segments)?;
        match self {
            Self::Replace { node, .. } => *target = node.clone(),
            Self::Disable { .. } => *target = ConfigNode::Null,
            Self::Set { value, .. } => *target = coerce(path, target, value)?,
        }
        trace!("applied {} to '{path}'", self.verb());
        Ok(())
    }

    fn verb(&self) -> &'static str {
        match self {
            Self::Replace { .. } => "replace",
            Self::Set { .. } => "set",
            Self::Disable { .. } => "disable",
        }
    }
}

/// `value` converted to the kind of `existing`, or a kind mismatch.
fn coerce(path: &FieldPath, existing: &ConfigNode, value: &ConfigNode) -> Result<ConfigNode> {
    let mismatch = || EnvError::KindMismatch {
        path: path.to_string(),
        expected: existing.kind(),
        found: value.kind(),
    };
    match (existing, value) {
        (ConfigNode::Null, v) if !holds_map(v) => Ok(v.clone()),
        (_, ConfigNode::Null) => Err(mismatch()),
        (ConfigNode::Float(_), ConfigNode::Int(i)) => {
            #[allow(clippy::cast_precision_loss)]
            let f = *i as f64;
            Ok(ConfigNode::Float(f))
        }
        (ConfigNode::List(old), ConfigNode::List(new)) => {
            // Ranges keep their element kind; `[0, 1]` into `[0.0, 0.0]` widens.
            let items = new
                .iter()
                .enumerate()
                .map(|(i, item)| match old.get(i).or_else(|| old.first()) {
                    Some(template) => coerce(&path.child(&i.to_string()), template, item),
                    None => Ok(item.clone()),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(ConfigNode::from(items))
        }
        (ConfigNode::Map(_), _) | (_, ConfigNode::Map(_)) => Err(mismatch()),
        (a, b) if a.kind() == b.kind() => Ok(b.clone()),
        _ => Err(mismatch()),
    }
}

fn holds_map(node: &ConfigNode) -> bool {
    match node {
        ConfigNode::Map(_) => true,
        ConfigNode::List(items) => items.iter().any(holds_map),
        _ => false,
    }
}

/// A named group of overrides: one link of a composition chain.
///
/// Within a step, replacements and disables run first and leaf sets run
/// after them, each group in declaration order. A set therefore survives a
/// replacement of its enclosing subtree declared in the same step.
///
/// # Example
///
/// ```
/// use ml_env::{ConfigNode, VariantStep};
///
/// let base = ConfigNode::map([
///     ("num_envs", ConfigNode::Int(4096)),
///     ("push_robot", ConfigNode::map([("interval", ConfigNode::from([10.0, 15.0]))])),
/// ]);
///
/// let play = VariantStep::new("play")
///     .set("num_envs", 50_i64)
///     .disable("push_robot");
///
/// let tree = play.apply(&base).unwrap();
/// assert_eq!(tree.get(&"num_envs".into()), Some(&ConfigNode::Int(50)));
/// assert!(tree.get(&"push_robot".into()).unwrap().is_null());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VariantStep {
    name: String,
    ops: Vec<Override>,
}

impl VariantStep {
    /// Create an empty step.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: Vec::new(),
        }
    }

    /// Step name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overrides in declaration order.
    #[must_use]
    pub fn ops(&self) -> &[Override] {
        &self.ops
    }

    /// Add an override.
    #[must_use]
    pub fn with(mut self, op: Override) -> Self {
        self.ops.push(op);
        self
    }

    /// Swap the subtree at `path`.
    #[must_use]
    pub fn replace(self, path: impl Into<FieldPath>, node: ConfigNode) -> Self {
        self.with(Override::Replace {
            path: path.into(),
            node,
        })
    }

    /// Swap the subtree at `path` with a typed value.
    pub fn replace_typed<T: Serialize>(
        self,
        path: impl Into<FieldPath>,
        value: &T,
    ) -> Result<Self> {
        Ok(self.replace(path, ConfigNode::from_typed(value)?))
    }

    /// Change the value at `path`.
    #[must_use]
    pub fn set(self, path: impl Into<FieldPath>, value: impl Into<ConfigNode>) -> Self {
        self.with(Override::Set {
            path: path.into(),
            value: value.into(),
        })
    }

    /// Null out the subtree at `path`.
    #[must_use]
    pub fn disable(self, path: impl Into<FieldPath>) -> Self {
        self.with(Override::Disable { path: path.into() })
    }

    /// Append the overrides of `other` to this step.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.ops.extend(other.ops);
        self
    }

    /// Apply the step, returning a new tree.
    ///
    /// # Errors
    ///
    /// Fails on the first override whose path cannot be followed or whose
    /// value has the wrong kind. `tree` is never modified.
    pub fn apply(&self, tree: &ConfigNode) -> Result<ConfigNode> {
        let mut out = tree.clone();
        let structural = self.ops.iter().filter(|op| op.is_structural());
        let leaves = self.ops.iter().filter(|op| !op.is_structural());
        for op in structural.chain(leaves) {
            op.apply_to(&mut out).map_err(|e| match e {
                EnvError::InvalidPath { path, reason } => EnvError::InvalidPath {
                    path,
                    reason: format!("{reason} (in step '{}')", self.name),
                },
                other => other,
            })?;
        }
        debug!("applied step '{}' ({} overrides)", self.name, self.ops.len());
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base() -> ConfigNode {
        ConfigNode::map([
            (
                "scene",
                ConfigNode::map([
                    ("num_envs", ConfigNode::Int(4096)),
                    ("generator", ConfigNode::Str("rough".into())),
                    ("robot", ConfigNode::map([("prim_path", ConfigNode::Str("/World".into()))])),
                ]),
            ),
            (
                "commands",
                ConfigNode::map([("lin_vel_x", ConfigNode::from([0.0, 1.0]))]),
            ),
            ("curriculum", ConfigNode::Null),
            ("weight", ConfigNode::Float(1.0)),
        ])
    }

    #[test]
    fn test_set_coerces_int_to_float() {
        let tree = VariantStep::new("s").set("weight", 3_i64).apply(&base()).unwrap();
        assert_eq!(tree.get(&"weight".into()), Some(&ConfigNode::Float(3.0)));
    }

    #[test]
    fn test_set_range_widens_elements() {
        let range = ConfigNode::from(vec![ConfigNode::Int(0), ConfigNode::Int(0)]);
        let tree = VariantStep::new("s")
            .set("commands.lin_vel_x", range)
            .apply(&base())
            .unwrap();
        assert_eq!(tree.get(&"commands.lin_vel_x".into()), Some(&ConfigNode::from([0.0, 0.0])));
    }

    #[test]
    fn test_kind_mismatch() {
        let err = VariantStep::new("s")
            .set("scene.num_envs", "many")
            .apply(&base())
            .unwrap_err();
        assert!(matches!(err, EnvError::KindMismatch { expected: "int", found: "string", .. }));

        let err = VariantStep::new("s").set("weight", true).apply(&base()).unwrap_err();
        assert!(matches!(err, EnvError::KindMismatch { .. }));
    }

    #[test]
    fn test_null_accepts_any_kind() {
        let tree = VariantStep::new("s")
            .set("curriculum", "terrain_levels")
            .apply(&base())
            .unwrap();
        assert_eq!(tree.get(&"curriculum".into()).unwrap().kind(), "string");
    }

    #[test]
    fn test_set_cannot_revive_a_disabled_subtree() {
        let revived = ConfigNode::map([(
            "brand_new_term",
            ConfigNode::map([("func", ConfigNode::Str("terrain_levels_vel".into()))]),
        )]);
        let err = VariantStep::new("late")
            .set("curriculum", revived.clone())
            .apply(&base())
            .unwrap_err();
        assert!(matches!(err, EnvError::KindMismatch { expected: "null", found: "map", .. }));

        let nested = ConfigNode::from(vec![revived.clone()]);
        let err = VariantStep::new("late")
            .set("curriculum", nested)
            .apply(&base())
            .unwrap_err();
        assert!(matches!(err, EnvError::KindMismatch { .. }));

        let tree = VariantStep::new("late")
            .replace("curriculum", revived)
            .apply(&base())
            .unwrap();
        assert_eq!(tree.get(&"curriculum".into()).unwrap().kind(), "map");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = VariantStep::new("flat")
            .set("scene.num_env", 1_i64)
            .apply(&base())
            .unwrap_err();
        assert!(err.is_override_error());
        assert!(err.to_string().contains("step 'flat'"));
    }

    #[test]
    fn test_replace_runs_before_set() {
        let robot = ConfigNode::map([("prim_path", ConfigNode::Str("/Other".into()))]);
        let tree = VariantStep::new("s")
            .set("scene.robot.prim_path", "{ENV_REGEX_NS}/Robot")
            .replace("scene.robot", robot)
            .apply(&base())
            .unwrap();
        assert_eq!(
            tree.get(&"scene.robot.prim_path".into()),
            Some(&ConfigNode::Str("{ENV_REGEX_NS}/Robot".into()))
        );
    }

    #[test]
    fn test_disable_then_set_below_fails() {
        let err = VariantStep::new("s")
            .set("scene.num_envs", 1_i64)
            .disable("scene")
            .apply(&base())
            .unwrap_err();
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_failure_leaves_input_untouched() {
        let base = base();
        let before = base.to_canonical_json().unwrap();
        let result = VariantStep::new("s")
            .set("scene.num_envs", 1_i64)
            .set("scene.missing", 1_i64)
            .apply(&base);
        assert!(result.is_err());
        assert_eq!(base.to_canonical_json().unwrap(), before);
    }

    #[test]
    fn test_untouched_subtrees_are_shared() {
        let base = base();
        let tree = VariantStep::new("s").set("scene.num_envs", 1_i64).apply(&base).unwrap();
        assert!(tree.shares_subtree(&base, &"commands".into()));
        assert!(tree.shares_subtree(&base, &"scene.robot".into()));
        assert!(!tree.shares_subtree(&base, &"scene".into()));
    }
}
