//! What a URDF document contributes to robot configuration.
//!
//! Link names become bodies; movable joints become the articulation's
//! joint list, each with its `<limit>` if one was given.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UrdfError;

/// The `type` attribute of a `<joint>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrdfJointType {
    /// Bounded rotation.
    Revolute,
    /// Unbounded rotation.
    Continuous,
    /// Bounded translation.
    Prismatic,
    /// Welded; merged into the parent body on import.
    Fixed,
    /// Six free degrees of freedom.
    Floating,
    /// Translation in a plane plus rotation about its normal.
    Planar,
}

impl UrdfJointType {
    const ALL: [Self; 6] = [
        Self::Revolute,
        Self::Continuous,
        Self::Prismatic,
        Self::Fixed,
        Self::Floating,
        Self::Planar,
    ];

    /// Name as written in URDF.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revolute => "revolute",
            Self::Continuous => "continuous",
            Self::Prismatic => "prismatic",
            Self::Fixed => "fixed",
            Self::Floating => "floating",
            Self::Planar => "planar",
        }
    }

    /// Check if the joint shows up in an articulation's joint list.
    ///
    /// Fixed joints are merged away on import and a floating joint is the
    /// articulation root, so neither is driven.
    #[must_use]
    pub const fn is_movable(self) -> bool {
        matches!(self, Self::Revolute | Self::Continuous | Self::Prismatic)
    }
}

impl FromStr for UrdfJointType {
    type Err = UrdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UrdfError::UnknownJointType(s.to_string()))
    }
}

impl fmt::Display for UrdfJointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<limit>` element. Missing attributes read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UrdfJointLimit {
    /// Lower position bound (rad or m).
    pub lower: f64,
    /// Upper position bound (rad or m).
    pub upper: f64,
    /// Effort bound (N·m or N).
    pub effort: f64,
    /// Velocity bound (rad/s or m/s).
    pub velocity: f64,
}

impl UrdfJointLimit {
    /// Position range `[-range, range]`.
    #[must_use]
    pub fn symmetric(range: f64, effort: f64, velocity: f64) -> Self {
        Self {
            lower: -range,
            upper: range,
            effort,
            velocity,
        }
    }

    /// Check if `position` lies in `[lower, upper]`.
    #[must_use]
    pub fn contains(&self, position: f64) -> bool {
        (self.lower..=self.upper).contains(&position)
    }
}

/// One `<joint>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrdfJoint {
    /// Joint name.
    pub name: String,
    /// Joint type.
    pub kind: UrdfJointType,
    /// Parent link.
    pub parent: String,
    /// Child link.
    pub child: String,
    /// Position, effort and velocity bounds.
    pub limit: Option<UrdfJointLimit>,
}

/// Links and joints of one `<robot>`, in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UrdfRobot {
    /// Robot name.
    pub name: String,
    /// Link names.
    pub links: Vec<String>,
    /// Joints, fixed ones included.
    pub joints: Vec<UrdfJoint>,
}

impl UrdfRobot {
    /// Look up a joint.
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&UrdfJoint> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Check if a link is declared.
    #[must_use]
    pub fn has_link(&self, name: &str) -> bool {
        self.links.iter().any(|l| l == name)
    }

    /// Link names in document order.
    pub fn link_names(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    /// Joints that appear in the articulation's joint list.
    pub fn movable_joints(&self) -> impl Iterator<Item = &UrdfJoint> {
        self.joints.iter().filter(|j| j.kind.is_movable())
    }
}
