//! Unitree Go2 legs, shared by every shipped robot.

use sim_urdf::UrdfJointLimit;

use crate::actuator::ActuatorConfig;
use crate::articulation::ArticulationConfig;
use crate::asset::AssetRoot;
use crate::skeleton::Skeleton;
use crate::spawn::SpawnConfig;
use crate::state::InitialState;

/// Leg prefixes in declaration order.
pub const LEGS: [&str; 4] = ["FL", "FR", "RL", "RR"];

/// Name of the leg actuator group.
pub const LEG_GROUP: &str = "base_legs";

/// Leg joint names, leg by leg (hip, thigh, calf).
#[must_use]
pub fn leg_joints() -> Vec<String> {
    LEGS.iter()
        .flat_map(|leg| {
            ["hip", "thigh", "calf"]
                .into_iter()
                .map(move |part| format!("{leg}_{part}_joint"))
        })
        .collect()
}

/// Trunk body followed by the leg bodies.
#[must_use]
pub fn leg_bodies(trunk: &str) -> Vec<String> {
    std::iter::once(trunk.to_string())
        .chain(LEGS.iter().flat_map(|leg| {
            ["hip", "thigh", "calf", "foot"]
                .into_iter()
                .map(move |part| format!("{leg}_{part}"))
        }))
        .collect()
}

/// Hard limits of the Go2 leg joints.
pub(crate) fn leg_limit(joint: &str) -> UrdfJointLimit {
    let (lower, upper, effort, velocity) = if joint.ends_with("_hip_joint") {
        (-1.0472, 1.0472, 23.7, 30.1)
    } else if joint.ends_with("_calf_joint") {
        (-2.7227, -0.83776, 45.43, 15.7)
    } else if joint.starts_with('F') {
        (-1.5708, 3.4907, 23.7, 30.1)
    } else {
        (-0.5236, 4.5379, 23.7, 30.1)
    };
    UrdfJointLimit {
        lower,
        upper,
        effort,
        velocity,
    }
}

/// Leg skeleton with limits, plus any arm joints and bodies.
pub(crate) fn skeleton_with(
    name: &str,
    trunk: &str,
    arm_joints: &[String],
    arm_bodies: &[String],
) -> Skeleton {
    let legs = leg_joints();
    let mut skeleton = Skeleton::new(
        name,
        legs.iter().chain(arm_joints).cloned(),
        leg_bodies(trunk).into_iter().chain(arm_bodies.iter().cloned()),
    );
    for joint in &legs {
        skeleton = skeleton.with_limit(joint.clone(), leg_limit(joint));
    }
    skeleton
}

/// The standing pose of the legs.
pub(crate) fn standing_legs(height: f64) -> InitialState {
    InitialState::at_height(height).with_joint_table([
        (".*L_hip_joint", 0.1),
        (".*R_hip_joint", -0.1),
        ("F[L,R]_thigh_joint", 0.8),
        ("R[L,R]_thigh_joint", 1.0),
        (".*_calf_joint", -1.5),
    ])
}

/// The DC motor group driving all twelve leg joints.
#[must_use]
pub fn leg_actuator() -> ActuatorConfig {
    ActuatorConfig::dc_motor([".*_hip_joint", ".*_thigh_joint", ".*_calf_joint"])
        .with_effort_limit(40.5)
        .with_saturation_effort(23.5)
        .with_velocity_limit(30.0)
        .with_stiffness(40.0)
        .with_damping(1.0)
        .with_friction(0.0)
}

/// Go2 without an arm.
pub(crate) fn articulation(root: &AssetRoot) -> ArticulationConfig {
    ArticulationConfig::new(SpawnConfig::usd(root.join("go2/go2.usd")), standing_legs(0.4))
        .with_soft_limit_factor(0.9)
        .with_actuator(LEG_GROUP, leg_actuator())
}

pub(crate) fn skeleton() -> Skeleton {
    skeleton_with("go2", "base", &[], &[])
}
