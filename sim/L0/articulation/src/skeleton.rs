//! Joint and body inventories.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sim_urdf::{LoadedRobot, UrdfJointLimit, load_urdf_file};
use tracing::debug;

use crate::error::{ArticulationError, Result};

/// The joints and bodies a robot asset declares, in declaration order.
///
/// Patterns of a description bind against this inventory. Joint order is the
/// order of the articulation's joint arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    /// Asset name.
    pub name: String,
    /// Movable joints.
    pub joints: Vec<String>,
    /// Bodies (links).
    pub bodies: Vec<String>,
    /// Position limits, where the asset declares them.
    pub limits: BTreeMap<String, UrdfJointLimit>,
}

impl Skeleton {
    /// Build an inventory from name lists.
    #[must_use]
    pub fn new<J, B, S, T>(name: impl Into<String>, joints: J, bodies: B) -> Self
    where
        J: IntoIterator<Item = S>,
        B: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            name: name.into(),
            joints: joints.into_iter().map(Into::into).collect(),
            bodies: bodies.into_iter().map(Into::into).collect(),
            limits: BTreeMap::new(),
        }
    }

    /// Attach a position limit to a joint.
    #[must_use]
    pub fn with_limit(mut self, joint: impl Into<String>, limit: UrdfJointLimit) -> Self {
        self.limits.insert(joint.into(), limit);
        self
    }

    /// Build an inventory from a loaded URDF.
    #[must_use]
    pub fn from_urdf(robot: &LoadedRobot) -> Self {
        let limits = robot
            .limits()
            .map(|(joint, limit)| (joint.to_string(), limit))
            .collect();
        Self {
            name: robot.name.clone(),
            joints: robot.joint_names(),
            bodies: robot.body_names(),
            limits,
        }
    }

    /// Read a URDF file and build its inventory.
    pub fn load_urdf(path: impl AsRef<Path>) -> Result<Self> {
        let robot = load_urdf_file(path)?;
        let skeleton = Self::from_urdf(&robot);
        skeleton.validate()?;
        debug!(
            "skeleton '{}' from URDF: {} joints, {} bodies",
            skeleton.name,
            skeleton.joints.len(),
            skeleton.bodies.len()
        );
        Ok(skeleton)
    }

    /// Index of a joint by exact name.
    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j == name)
    }

    /// Index of a body by exact name.
    #[must_use]
    pub fn body_index(&self, name: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b == name)
    }

    /// Reject repeated joint or body names.
    pub fn validate(&self) -> Result<()> {
        for (kind, names) in [("joint", &self.joints), ("body", &self.bodies)] {
            let mut seen = HashSet::new();
            if let Some(dup) = names.iter().find(|n| !seen.insert(n.as_str())) {
                return Err(ArticulationError::DuplicateEntity {
                    skeleton: self.name.clone(),
                    kind,
                    name: dup.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const TWO_LINK: &str = r#"
        <robot name="pendulum">
            <link name="base"/>
            <link name="arm"/>
            <joint name="mount" type="fixed">
                <parent link="base"/><child link="arm"/>
            </joint>
            <link name="tip"/>
            <joint name="swing" type="revolute">
                <parent link="arm"/><child link="tip"/>
                <limit lower="-1.0" upper="1.0" effort="5" velocity="2"/>
            </joint>
        </robot>
    "#;

    #[test]
    fn test_from_urdf_skips_fixed_joints() {
        let robot = sim_urdf::load_urdf_str(TWO_LINK).unwrap();
        let skeleton = Skeleton::from_urdf(&robot);
        assert_eq!(skeleton.joints, vec!["swing"]);
        assert_eq!(skeleton.bodies, vec!["base", "arm", "tip"]);
        assert!(skeleton.limits["swing"].contains(0.5));
    }

    #[test]
    fn test_load_urdf_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_LINK.as_bytes()).unwrap();
        let skeleton = Skeleton::load_urdf(file.path()).unwrap();
        assert_eq!(skeleton.name, "pendulum");
        assert_eq!(skeleton.joint_index("swing"), Some(0));
        assert_eq!(skeleton.body_index("tip"), Some(2));
    }

    #[test]
    fn test_duplicate_body() {
        let skeleton = Skeleton::new("bad", ["j1"], ["base", "link1", "base"]);
        let err = skeleton.validate().unwrap_err();
        assert!(matches!(
            err,
            ArticulationError::DuplicateEntity { kind: "body", .. }
        ));
    }
}
