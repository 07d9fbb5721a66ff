//! Shipped robot descriptions.
//!
//! | Robot | Arm | Asset |
//! |-------|-----|-------|
//! | [`RobotKind::Go2`] | none | `go2/go2.usd` |
//! | [`RobotKind::Go2Arm`] | D1, 6 DOF + gripper | `go2_d1.usd` |
//! | [`RobotKind::Go2D1`] | D1, 6 DOF + gripper | `go2_d1_description/urdf/go2_d1/go2_d1_v1.usd` |
//! | [`RobotKind::Go2Arx5`] | ARX5, 6 DOF + fin-ray gripper | `go2_arx5/go2_arx5_finray_x85_z94.urdf` |
//! | [`RobotKind::Go2X5a`] | X5A, 6 DOF + gripper | `go2_x5a/go2_x5a.urdf` |
//!
//! Asset paths are relative to an [`AssetRoot`].

mod arx5;
mod d1;
mod go2;
mod x5a;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::articulation::ArticulationConfig;
use crate::asset::AssetRoot;
use crate::error::ArticulationError;
use crate::skeleton::Skeleton;

pub use go2::{LEG_GROUP, LEGS, leg_actuator, leg_bodies, leg_joints};

/// One of the shipped robots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotKind {
    /// Go2 quadruped alone.
    Go2,
    /// Go2 + D1 arm, bundled stage.
    Go2Arm,
    /// Go2 + D1 arm, description package stage.
    Go2D1,
    /// Go2 + ARX5 arm.
    Go2Arx5,
    /// Go2 + X5A arm.
    Go2X5a,
}

impl RobotKind {
    /// Every shipped robot.
    pub const ALL: [Self; 5] = [
        Self::Go2,
        Self::Go2Arm,
        Self::Go2D1,
        Self::Go2Arx5,
        Self::Go2X5a,
    ];

    /// Stable identifier.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Go2 => "go2",
            Self::Go2Arm => "go2_arm",
            Self::Go2D1 => "go2_d1",
            Self::Go2Arx5 => "go2_arx5",
            Self::Go2X5a => "go2_x5a",
        }
    }

    /// The description, with asset paths under `root`.
    #[must_use]
    pub fn articulation(self, root: &AssetRoot) -> ArticulationConfig {
        match self {
            Self::Go2 => go2::articulation(root),
            Self::Go2Arm => d1::go2_arm(root),
            Self::Go2D1 => d1::go2_d1(root),
            Self::Go2Arx5 => arx5::articulation(root),
            Self::Go2X5a => x5a::articulation(root),
        }
    }

    /// Joint and body inventory of the robot's asset.
    #[must_use]
    pub fn skeleton(self) -> Skeleton {
        match self {
            Self::Go2 => go2::skeleton(),
            Self::Go2Arm | Self::Go2D1 => d1::skeleton(),
            Self::Go2Arx5 => arx5::skeleton(),
            Self::Go2X5a => x5a::skeleton(),
        }
    }

    /// Trunk body name.
    #[must_use]
    pub fn trunk_body(self) -> &'static str {
        match self {
            Self::Go2 | Self::Go2Arx5 | Self::Go2X5a => x5a::TRUNK,
            Self::Go2Arm | Self::Go2D1 => d1::TRUNK,
        }
    }

    /// End-effector body, if the robot has an arm.
    #[must_use]
    pub fn ee_body(self) -> Option<&'static str> {
        match self {
            Self::Go2 => None,
            Self::Go2Arm | Self::Go2D1 => Some(d1::EE_BODY),
            Self::Go2Arx5 | Self::Go2X5a => Some(x5a::EE_BODY),
        }
    }
}

impl fmt::Display for RobotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RobotKind {
    type Err = ArticulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ArticulationError::invalid_config(format!("unknown robot '{s}'")))
    }
}
