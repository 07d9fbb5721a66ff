//! Actuator groups.
//!
//! An actuator group drives a set of joints (named by patterns) with one
//! control model and one set of gains.

use serde::{Deserialize, Serialize};

use crate::error::{ArticulationError, Result};

/// Control model of an actuator group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActuatorModel {
    /// Explicit DC motor: PD torque clipped by a speed-dependent
    /// torque-speed curve between `saturation_effort` and `effort_limit`.
    DcMotor,
    /// Implicit PD drive evaluated by the physics solver.
    Implicit,
}

/// Gains and limits of one actuated joint, fully specified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorGains {
    /// Continuous torque limit (N·m or N).
    pub effort_limit: f64,
    /// Peak (stall) torque (N·m or N).
    pub saturation_effort: f64,
    /// Joint velocity limit (rad/s or m/s).
    pub velocity_limit: f64,
    /// Position gain (N·m/rad).
    pub stiffness: f64,
    /// Velocity gain (N·m·s/rad).
    pub damping: f64,
    /// Joint friction coefficient.
    pub friction: f64,
}

/// Configuration of one actuator group.
///
/// # Example
///
/// ```
/// use sim_articulation::{ActuatorConfig, ActuatorModel};
///
/// let legs = ActuatorConfig::dc_motor([".*_hip_joint", ".*_thigh_joint", ".*_calf_joint"])
///     .with_effort_limit(40.5)
///     .with_saturation_effort(23.5)
///     .with_velocity_limit(30.0)
///     .with_stiffness(40.0)
///     .with_damping(1.0);
///
/// assert_eq!(legs.model, ActuatorModel::DcMotor);
/// assert!(legs.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Control model.
    pub model: ActuatorModel,
    /// Patterns naming the driven joints.
    pub joint_names_expr: Vec<String>,
    /// Continuous torque limit.
    pub effort_limit: f64,
    /// Peak torque of the DC motor model. Unused by implicit drives.
    pub saturation_effort: Option<f64>,
    /// Velocity limit.
    pub velocity_limit: f64,
    /// Position gain.
    pub stiffness: f64,
    /// Velocity gain.
    pub damping: f64,
    /// Friction coefficient.
    pub friction: f64,
}

impl ActuatorConfig {
    fn new<I, S>(model: ActuatorModel, joint_names_expr: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            model,
            joint_names_expr: joint_names_expr.into_iter().map(Into::into).collect(),
            effort_limit: 0.0,
            saturation_effort: None,
            velocity_limit: 0.0,
            stiffness: 0.0,
            damping: 0.0,
            friction: 0.0,
        }
    }

    /// Create a DC motor group over the given joint patterns.
    #[must_use]
    pub fn dc_motor<I, S>(joint_names_expr: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ActuatorModel::DcMotor, joint_names_expr)
    }

    /// Create an implicit drive group over the given joint patterns.
    #[must_use]
    pub fn implicit<I, S>(joint_names_expr: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ActuatorModel::Implicit, joint_names_expr)
    }

    /// Set the effort limit.
    #[must_use]
    pub fn with_effort_limit(mut self, effort_limit: f64) -> Self {
        self.effort_limit = effort_limit;
        self
    }

    /// Set the saturation effort (DC motor only).
    #[must_use]
    pub fn with_saturation_effort(mut self, saturation_effort: f64) -> Self {
        self.saturation_effort = Some(saturation_effort);
        self
    }

    /// Set the velocity limit.
    #[must_use]
    pub fn with_velocity_limit(mut self, velocity_limit: f64) -> Self {
        self.velocity_limit = velocity_limit;
        self
    }

    /// Set the stiffness.
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    /// Set the damping.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the friction.
    #[must_use]
    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    /// The gains applied to every joint of this group.
    ///
    /// Implicit drives have no separate stall torque, so their saturation
    /// effort equals the effort limit.
    #[must_use]
    pub fn gains(&self) -> ActuatorGains {
        let saturation_effort = match self.model {
            ActuatorModel::DcMotor => self.saturation_effort.unwrap_or(self.effort_limit),
            ActuatorModel::Implicit => self.effort_limit,
        };
        ActuatorGains {
            effort_limit: self.effort_limit,
            saturation_effort,
            velocity_limit: self.velocity_limit,
            stiffness: self.stiffness,
            damping: self.damping,
            friction: self.friction,
        }
    }

    /// Validate the group.
    pub fn validate(&self) -> Result<()> {
        if self.joint_names_expr.is_empty() {
            return Err(ArticulationError::invalid_config(
                "actuator group has no joint patterns",
            ));
        }
        if !self.effort_limit.is_finite() || self.effort_limit <= 0.0 {
            return Err(ArticulationError::invalid_config(format!(
                "effort_limit must be positive and finite, got {}",
                self.effort_limit
            )));
        }
        if !self.velocity_limit.is_finite() || self.velocity_limit <= 0.0 {
            return Err(ArticulationError::invalid_config(format!(
                "velocity_limit must be positive and finite, got {}",
                self.velocity_limit
            )));
        }
        if self.stiffness < 0.0 || self.damping < 0.0 || self.friction < 0.0 {
            return Err(ArticulationError::invalid_config(
                "stiffness, damping and friction must be non-negative",
            ));
        }
        match (self.model, self.saturation_effort) {
            (ActuatorModel::DcMotor, None) => Err(ArticulationError::invalid_config(
                "DC motor group requires saturation_effort",
            )),
            (ActuatorModel::DcMotor, Some(sat)) if !sat.is_finite() || sat <= 0.0 => {
                Err(ArticulationError::invalid_config(format!(
                    "saturation_effort must be positive and finite, got {sat}"
                )))
            }
            (ActuatorModel::Implicit, Some(_)) => Err(ArticulationError::invalid_config(
                "implicit drives do not take saturation_effort",
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn gripper() -> ActuatorConfig {
        ActuatorConfig::implicit(["joint[7-8]"])
            .with_effort_limit(100.0)
            .with_velocity_limit(1.0)
            .with_stiffness(1000.0)
            .with_damping(100.0)
    }

    #[test]
    fn test_implicit_gains_fill_saturation_and_friction() {
        let gains = gripper().gains();
        assert_eq!(gains.saturation_effort, 100.0);
        assert_eq!(gains.friction, 0.0);
        assert_eq!(gains.stiffness, 1000.0);
    }

    #[test]
    fn test_dc_motor_requires_saturation() {
        let arm = ActuatorConfig::dc_motor(["joint[1-6]"])
            .with_effort_limit(100.0)
            .with_velocity_limit(10.0);
        assert!(arm.validate().is_err());
        assert!(arm.with_saturation_effort(80.0).validate().is_ok());
    }

    #[test]
    fn test_implicit_rejects_saturation() {
        let err = gripper().with_saturation_effort(5.0).validate().unwrap_err();
        assert!(err.to_string().contains("implicit"));
    }

    #[test]
    fn test_rejects_bad_limits() {
        assert!(gripper().with_effort_limit(0.0).validate().is_err());
        assert!(gripper().with_velocity_limit(f64::NAN).validate().is_err());
        assert!(gripper().with_damping(-1.0).validate().is_err());

        let empty = ActuatorConfig::implicit(Vec::<String>::new())
            .with_effort_limit(1.0)
            .with_velocity_limit(1.0);
        assert!(empty.validate().is_err());
    }
}
