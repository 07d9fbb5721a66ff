//! Initial state of an articulation.

use std::collections::BTreeMap;

use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{ArticulationError, Result};

/// Root pose, root velocity and default joint state applied on reset.
///
/// Joint tables are keyed by pattern. Keys are kept sorted so the table
/// serializes the same way every time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    /// Root position in the environment frame (m).
    pub pos: Point3<f64>,
    /// Root orientation.
    pub rot: UnitQuaternion<f64>,
    /// Root linear velocity (m/s).
    pub lin_vel: Vector3<f64>,
    /// Root angular velocity (rad/s).
    pub ang_vel: Vector3<f64>,
    /// Default joint positions, pattern -> rad (or m for prismatic joints).
    pub joint_pos: BTreeMap<String, f64>,
    /// Default joint velocities, pattern -> rad/s.
    pub joint_vel: BTreeMap<String, f64>,
}

impl Default for InitialState {
    fn default() -> Self {
        Self {
            pos: Point3::origin(),
            rot: UnitQuaternion::identity(),
            lin_vel: Vector3::zeros(),
            ang_vel: Vector3::zeros(),
            joint_pos: BTreeMap::from([(".*".to_string(), 0.0)]),
            joint_vel: BTreeMap::from([(".*".to_string(), 0.0)]),
        }
    }
}

impl InitialState {
    /// A resting state at height `z` with no joint table yet.
    #[must_use]
    pub fn at_height(z: f64) -> Self {
        Self {
            pos: Point3::new(0.0, 0.0, z),
            joint_pos: BTreeMap::new(),
            ..Self::default()
        }
    }

    /// Add default positions for joints matching `pattern`.
    #[must_use]
    pub fn with_joint_pos(mut self, pattern: impl Into<String>, pos: f64) -> Self {
        self.joint_pos.insert(pattern.into(), pos);
        self
    }

    /// Add several default positions at once.
    #[must_use]
    pub fn with_joint_table<I, S>(mut self, table: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.joint_pos
            .extend(table.into_iter().map(|(k, v)| (k.into(), v)));
        self
    }

    /// Validate the state.
    pub fn validate(&self) -> Result<()> {
        let finite = self.pos.iter().all(|v| v.is_finite())
            && self.lin_vel.iter().all(|v| v.is_finite())
            && self.ang_vel.iter().all(|v| v.is_finite())
            && self.rot.coords.iter().all(|v| v.is_finite());
        if !finite {
            return Err(ArticulationError::invalid_config(
                "initial root state must be finite",
            ));
        }
        for (table, name) in [(&self.joint_pos, "joint_pos"), (&self.joint_vel, "joint_vel")] {
            if let Some((pattern, value)) = table.iter().find(|(_, v)| !v.is_finite()) {
                return Err(ArticulationError::invalid_config(format!(
                    "init_state.{name}['{pattern}'] is not finite: {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_at_height() {
        let state = InitialState::at_height(0.35)
            .with_joint_pos(".*_calf_joint", -1.5)
            .with_joint_table([("F[L,R]_thigh_joint", 0.8), ("R[L,R]_thigh_joint", 1.0)]);

        assert_relative_eq!(state.pos.z, 0.35);
        assert_eq!(state.joint_pos.len(), 3);
        assert_relative_eq!(state.joint_vel[".*"], 0.0);
        assert_relative_eq!(state.rot.angle(), 0.0);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_non_finite_joint_value() {
        let state = InitialState::at_height(0.35).with_joint_pos("joint7", f64::INFINITY);
        let err = state.validate().unwrap_err();
        assert!(err.to_string().contains("joint7"));
    }

    #[test]
    fn test_serializes_sorted() {
        let state = InitialState::at_height(0.3)
            .with_joint_pos("b", 1.0)
            .with_joint_pos("a", 2.0);
        let json = serde_json::to_string(&state.joint_pos).unwrap();
        assert_eq!(json, r#"{"a":2.0,"b":1.0}"#);
    }
}
