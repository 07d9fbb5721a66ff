//! Binding a description to a concrete skeleton.
//!
//! Patterns stay unresolved in [`ArticulationConfig`] until an environment is
//! built. Binding resolves them against the skeleton's joint list and checks
//! that every joint ends up with one default state and one actuator group.

use serde::{Deserialize, Serialize};
use sim_entity::{EntityKind, resolve_patterns, resolve_values};
use tracing::{debug, warn};

use crate::actuator::{ActuatorGains, ActuatorModel};
use crate::articulation::ArticulationConfig;
use crate::error::{ArticulationError, Result};
use crate::skeleton::Skeleton;

/// One joint with everything the engine needs to drive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundJoint {
    /// Index in the skeleton's joint list.
    pub index: usize,
    /// Joint name.
    pub name: String,
    /// Default position (rad or m).
    pub default_pos: f64,
    /// Default velocity.
    pub default_vel: f64,
    /// Name of the owning actuator group.
    pub actuator: String,
    /// Control model of the owning group.
    pub model: ActuatorModel,
    /// Gains of the owning group.
    pub gains: ActuatorGains,
    /// Soft position limits, where the asset declares hard ones.
    pub soft_limits: Option<(f64, f64)>,
}

/// A fully resolved articulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundArticulation {
    /// Skeleton name.
    pub skeleton: String,
    /// Prim path of the robot.
    pub prim_path: String,
    /// Joints in skeleton order.
    pub joints: Vec<BoundJoint>,
    /// Bodies in skeleton order.
    pub bodies: Vec<String>,
}

impl BoundArticulation {
    /// Look up a bound joint by name.
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&BoundJoint> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Joint names in skeleton order.
    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.iter().map(|j| j.name.as_str())
    }

    /// Joints driven by one actuator group.
    pub fn group<'a>(&'a self, actuator: &'a str) -> impl Iterator<Item = &'a BoundJoint> {
        self.joints.iter().filter(move |j| j.actuator == actuator)
    }

    /// Default joint positions in skeleton order.
    #[must_use]
    pub fn default_joint_pos(&self) -> Vec<f64> {
        self.joints.iter().map(|j| j.default_pos).collect()
    }
}

/// Soft limits: the hard range shrunk about its midpoint by `factor`.
fn soft_range(lower: f64, upper: f64, factor: f64) -> (f64, f64) {
    let mid = 0.5 * (lower + upper);
    let half = 0.5 * (upper - lower) * factor;
    (mid - half, mid + half)
}

pub(crate) fn bind(config: &ArticulationConfig, skeleton: &Skeleton) -> Result<BoundArticulation> {
    config.validate()?;
    skeleton.validate()?;

    let joints = &skeleton.joints;

    let positions = resolve_values(&config.init_state.joint_pos, joints, EntityKind::Joint)
        .map_err(|e| ArticulationError::entity("init_state.joint_pos", e))?;
    let velocities = resolve_values(&config.init_state.joint_vel, joints, EntityKind::Joint)
        .map_err(|e| ArticulationError::entity("init_state.joint_vel", e))?;

    let mut default_pos: Vec<Option<f64>> = vec![None; joints.len()];
    for bound in positions {
        default_pos[bound.index] = Some(*bound.value);
    }
    let mut default_vel = vec![0.0; joints.len()];
    for bound in velocities {
        default_vel[bound.index] = *bound.value;
    }

    let mut owner: Vec<Option<&str>> = vec![None; joints.len()];
    for (group, actuator) in &config.actuators {
        let resolution = resolve_patterns(&actuator.joint_names_expr, joints, EntityKind::Joint)
            .map_err(|e| ArticulationError::entity(format!("actuators.{group}"), e))?;
        for (index, name) in resolution.iter() {
            if let Some(first) = owner[index] {
                return Err(ArticulationError::OverlappingActuators {
                    joint: name.to_string(),
                    first: first.to_string(),
                    second: group.clone(),
                });
            }
            owner[index] = Some(group.as_str());
        }
        debug!("actuator group '{group}' drives {} joints", resolution.len());
    }

    let mut bound_joints = Vec::with_capacity(joints.len());
    for (index, name) in joints.iter().enumerate() {
        let group = owner[index].ok_or_else(|| ArticulationError::UnactuatedJoint(name.clone()))?;
        let actuator = &config.actuators[group];

        let pos = default_pos[index].unwrap_or_else(|| {
            warn!("joint '{name}' has no default position, using 0.0");
            0.0
        });

        let soft_limits = skeleton.limits.get(name).map(|limit| {
            if !limit.contains(pos) {
                warn!(
                    "default position {pos} of joint '{name}' lies outside [{}, {}]",
                    limit.lower, limit.upper
                );
            }
            soft_range(limit.lower, limit.upper, config.soft_joint_pos_limit_factor)
        });

        bound_joints.push(BoundJoint {
            index,
            name: name.clone(),
            default_pos: pos,
            default_vel: default_vel[index],
            actuator: group.to_string(),
            model: actuator.model,
            gains: actuator.gains(),
            soft_limits,
        });
    }

    debug!(
        "bound articulation '{}' to skeleton '{}': {} joints in {} groups",
        config.prim_path,
        skeleton.name,
        bound_joints.len(),
        config.actuators.len()
    );

    Ok(BoundArticulation {
        skeleton: skeleton.name.clone(),
        prim_path: config.prim_path.clone(),
        joints: bound_joints,
        bodies: skeleton.bodies.clone(),
    })
}
