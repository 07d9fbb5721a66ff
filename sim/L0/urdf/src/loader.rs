//! Loading a validated inventory from a string or file.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, UrdfError};
use crate::parser::parse_urdf_str;
use crate::types::{UrdfJointLimit, UrdfJointType, UrdfRobot};
use crate::validation::{KinematicTree, validate};

/// A parsed URDF whose links form a single tree.
#[derive(Debug, Clone)]
pub struct LoadedRobot {
    /// Robot name.
    pub name: String,
    /// Root link; the articulation root body.
    pub root_link: String,
    /// Links and joints as declared.
    pub robot: UrdfRobot,
    /// Parent joint of every non-root link.
    pub tree: KinematicTree,
}

impl LoadedRobot {
    /// Movable joint names in document order. Fixed joints are left out.
    #[must_use]
    pub fn joint_names(&self) -> Vec<String> {
        self.robot
            .movable_joints()
            .map(|j| j.name.clone())
            .collect()
    }

    /// Link names in document order.
    #[must_use]
    pub fn body_names(&self) -> Vec<String> {
        self.robot.links.clone()
    }

    /// Limits of the movable joints that declare one.
    pub fn limits(&self) -> impl Iterator<Item = (&str, UrdfJointLimit)> {
        self.robot
            .movable_joints()
            .filter_map(|j| j.limit.map(|l| (j.name.as_str(), l)))
    }
}

/// Parse and validate a URDF document.
///
/// # Errors
///
/// Returns an error if parsing or validation fails.
pub fn load_urdf_str(xml: &str) -> Result<LoadedRobot> {
    let robot = parse_urdf_str(xml)?;
    let tree = validate(&robot)?;

    // Continuous joints legitimately have no position bounds.
    let unbounded: Vec<&str> = robot
        .movable_joints()
        .filter(|j| j.limit.is_none() && j.kind != UrdfJointType::Continuous)
        .map(|j| j.name.as_str())
        .collect();
    if !unbounded.is_empty() {
        warn!(
            "URDF '{}': no <limit> on {}",
            robot.name,
            unbounded.join(", ")
        );
    }

    debug!(
        "loaded URDF '{}': {} links, {} movable of {} joints, root '{}'",
        robot.name,
        robot.links.len(),
        robot.movable_joints().count(),
        robot.joints.len(),
        tree.root
    );

    Ok(LoadedRobot {
        name: robot.name.clone(),
        root_link: tree.root.clone(),
        robot,
        tree,
    })
}

/// Read, parse and validate a URDF file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_urdf_file(path: impl AsRef<Path>) -> Result<LoadedRobot> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|source| UrdfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_urdf_str(&xml)
}
