//! Action space.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, Result};

/// Joint position targets, one action per matched joint.
///
/// The target for joint `j` is `offset_j + scale_j * action_j`, where the
/// offset is the joint's default position when `use_default_offset` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JointPositionAction {
    /// Actuated asset.
    pub asset_name: String,
    /// Joint patterns. Action order follows pattern order.
    pub joint_names: Vec<String>,
    /// Scale by joint pattern; unmatched joints use 1.0.
    pub scale: BTreeMap<String, f64>,
    /// Offset targets by the default joint positions.
    pub use_default_offset: bool,
}

impl JointPositionAction {
    /// Actions on the robot's `joint_names`, unscaled.
    #[must_use]
    pub fn new<I, S>(joint_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            asset_name: "robot".to_string(),
            joint_names: joint_names.into_iter().map(Into::into).collect(),
            scale: BTreeMap::new(),
            use_default_offset: true,
        }
    }

    /// Scale joints matching `pattern`.
    #[must_use]
    pub fn with_scale(mut self, pattern: &str, scale: f64) -> Self {
        self.scale.insert(pattern.to_string(), scale);
        self
    }
}

/// All action terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionsConfig {
    /// Joint position targets for legs and arm.
    pub joint_pos: JointPositionAction,
}

impl ActionsConfig {
    /// Validate action values.
    pub fn validate(&self) -> Result<()> {
        let action = &self.joint_pos;
        if action.joint_names.is_empty() {
            return Err(EnvError::invalid_config(
                "actions.joint_pos.joint_names must not be empty",
            ));
        }
        if let Some((pattern, scale)) = action
            .scale
            .iter()
            .find(|(_, s)| !s.is_finite() || **s <= 0.0)
        {
            return Err(EnvError::invalid_config(format!(
                "actions.joint_pos.scale['{pattern}'] must be positive, got {scale}"
            )));
        }
        Ok(())
    }
}
