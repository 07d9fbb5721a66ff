//! Articulation descriptions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::actuator::ActuatorConfig;
use crate::bind::{BoundArticulation, bind};
use crate::error::{ArticulationError, Result};
use crate::skeleton::Skeleton;
use crate::spawn::SpawnConfig;
use crate::state::InitialState;

/// Default prim path before a scene places the robot.
pub const DEFAULT_PRIM_PATH: &str = "/World/Robot";

/// Complete description of one robot.
///
/// Building a description never touches the asset: joint and actuator
/// patterns are checked against a [`Skeleton`] only when [`bind`](Self::bind)
/// is called, at environment build time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticulationConfig {
    /// Scene prim path (may contain `{ENV_REGEX_NS}`).
    pub prim_path: String,
    /// Asset and physical properties.
    pub spawn: SpawnConfig,
    /// State applied on reset.
    pub init_state: InitialState,
    /// Fraction of the hard joint range usable by soft limits, in (0, 1].
    pub soft_joint_pos_limit_factor: f64,
    /// Actuator groups by name.
    pub actuators: BTreeMap<String, ActuatorConfig>,
}

impl ArticulationConfig {
    /// Create a description with no actuator groups.
    #[must_use]
    pub fn new(spawn: SpawnConfig, init_state: InitialState) -> Self {
        Self {
            prim_path: DEFAULT_PRIM_PATH.to_string(),
            spawn,
            init_state,
            soft_joint_pos_limit_factor: 1.0,
            actuators: BTreeMap::new(),
        }
    }

    /// Set the soft joint limit factor.
    #[must_use]
    pub fn with_soft_limit_factor(mut self, factor: f64) -> Self {
        self.soft_joint_pos_limit_factor = factor;
        self
    }

    /// Add a named actuator group.
    #[must_use]
    pub fn with_actuator(mut self, name: impl Into<String>, actuator: ActuatorConfig) -> Self {
        self.actuators.insert(name.into(), actuator);
        self
    }

    /// Copy of this description placed at another prim path.
    #[must_use]
    pub fn replace_prim_path(&self, prim_path: impl Into<String>) -> Self {
        Self {
            prim_path: prim_path.into(),
            ..self.clone()
        }
    }

    /// Structural checks that need no skeleton.
    pub fn validate(&self) -> Result<()> {
        if self.prim_path.trim().is_empty() {
            return Err(ArticulationError::invalid_config("prim_path is empty"));
        }
        let factor = self.soft_joint_pos_limit_factor;
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(ArticulationError::invalid_config(format!(
                "soft_joint_pos_limit_factor must be in (0, 1], got {factor}"
            )));
        }
        if self.actuators.is_empty() {
            return Err(ArticulationError::invalid_config(
                "articulation has no actuator groups",
            ));
        }
        self.spawn.validate()?;
        self.init_state.validate()?;
        for (name, actuator) in &self.actuators {
            actuator.validate().map_err(|e| {
                ArticulationError::invalid_config(format!("actuators.{name}: {e}"))
            })?;
        }
        Ok(())
    }

    /// Resolve every pattern against `skeleton`.
    ///
    /// # Errors
    ///
    /// Fails if a pattern matches no joint, if two default-position patterns
    /// or two actuator groups claim the same joint, or if a joint has no
    /// actuator group.
    pub fn bind(&self, skeleton: &Skeleton) -> Result<BoundArticulation> {
        debug!("binding '{}' against '{}'", self.prim_path, skeleton.name);
        bind(self, skeleton)
    }
}
