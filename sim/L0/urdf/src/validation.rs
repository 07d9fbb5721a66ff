//! Kinematic tree checks.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, UrdfError};
use crate::types::UrdfRobot;

/// The tree a valid robot's joints form over its links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KinematicTree {
    /// The one link no joint points at.
    pub root: String,
    /// Child link to the joint that attaches it.
    pub parent_joint: BTreeMap<String, String>,
}

impl KinematicTree {
    /// Joints from the root down to `link`, outermost first.
    #[must_use]
    pub fn chain(&self, robot: &UrdfRobot, link: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = link;
        while let Some(joint) = self.parent_joint.get(current) {
            if chain.len() == self.parent_joint.len() {
                break;
            }
            chain.push(joint.clone());
            match robot.joint(joint) {
                Some(j) => current = j.parent.as_str(),
                None => break,
            }
        }
        chain.reverse();
        chain
    }
}

/// Check that names are unique and the joints form a single tree.
///
/// # Errors
///
/// Fails on a duplicate name, a joint naming an undeclared link, a link with
/// two parent joints, a loop, or anything other than exactly one root.
pub fn validate(robot: &UrdfRobot) -> Result<KinematicTree> {
    let mut links = BTreeSet::new();
    for link in &robot.links {
        if !links.insert(link.as_str()) {
            return Err(UrdfError::Duplicate {
                kind: "link",
                name: link.clone(),
            });
        }
    }

    let mut joints = BTreeSet::new();
    let mut parent_joint = BTreeMap::new();
    for joint in &robot.joints {
        if !joints.insert(joint.name.as_str()) {
            return Err(UrdfError::Duplicate {
                kind: "joint",
                name: joint.name.clone(),
            });
        }
        for link in [&joint.parent, &joint.child] {
            if !links.contains(link.as_str()) {
                return Err(UrdfError::UndefinedLink {
                    link: link.clone(),
                    joint: joint.name.clone(),
                });
            }
        }
        if let Some(first) = parent_joint.insert(joint.child.clone(), joint.name.clone()) {
            return Err(UrdfError::MultipleParents {
                link: joint.child.clone(),
                first,
                second: joint.name.clone(),
            });
        }
    }

    let mut roots: Vec<String> = robot
        .links
        .iter()
        .filter(|l| !parent_joint.contains_key(*l))
        .cloned()
        .collect();
    let root = match roots.len() {
        0 => return Err(UrdfError::NoRootLink),
        1 => roots.remove(0),
        _ => return Err(UrdfError::MultipleRootLinks(roots)),
    };

    // With one root and one parent per link, a link that cannot reach the
    // root within `links.len()` steps sits on a loop.
    let parent_link: BTreeMap<&str, &str> = robot
        .joints
        .iter()
        .map(|j| (j.child.as_str(), j.parent.as_str()))
        .collect();
    for link in &robot.links {
        let mut current = link.as_str();
        let mut steps = 0;
        while let Some(parent) = parent_link.get(current) {
            steps += 1;
            if steps > robot.links.len() {
                return Err(UrdfError::Loop(link.clone()));
            }
            current = *parent;
        }
    }

    Ok(KinematicTree { root, parent_joint })
}
