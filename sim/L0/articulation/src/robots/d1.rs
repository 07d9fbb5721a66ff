//! Go2 carrying the Unitree D1 arm.
//!
//! Two descriptions share the D1 skeleton: [`go2_arm`] (tuned gains, bundled
//! `go2_d1.usd`) and [`go2_d1`] (the description package's stage, softer arm
//! gains).

use sim_urdf::UrdfJointLimit;

use super::go2;
use crate::actuator::ActuatorConfig;
use crate::articulation::ArticulationConfig;
use crate::asset::AssetRoot;
use crate::skeleton::Skeleton;
use crate::spawn::SpawnConfig;
use crate::state::InitialState;

/// Trunk body of the D1 assets.
pub const TRUNK: &str = "base_link";

/// End-effector body.
pub const EE_BODY: &str = "arm_link6";

fn arm_joints() -> Vec<String> {
    (1..=6)
        .map(|i| format!("arm_joint{i}"))
        .chain(["arm_gripper_left_joint".into(), "arm_gripper_right_joint".into()])
        .collect()
}

fn arm_bodies() -> Vec<String> {
    std::iter::once("arm_base_link".to_string())
        .chain((1..=6).map(|i| format!("arm_link{i}")))
        .chain(["arm_gripper_left".into(), "arm_gripper_right".into()])
        .collect()
}

/// D1-550 joint limits: joints 1, 4, 6 span ±135°, joints 2, 3, 5 span ±90°.
fn arm_limit(index: usize) -> UrdfJointLimit {
    let range = if matches!(index, 1 | 4 | 6) { 2.36 } else { 1.57 };
    let (effort, velocity) = if index <= 3 { (3.33, 1.05) } else { (1.67, 1.73) };
    UrdfJointLimit::symmetric(range, effort, velocity)
}

fn initial_state() -> InitialState {
    go2::standing_legs(0.35).with_joint_table([
        ("arm_joint1", 0.0),
        ("arm_joint2", 0.0),
        ("arm_joint3", 0.1),
        ("arm_joint4", 0.0),
        ("arm_joint5", -0.54),
        ("arm_joint6", 0.0),
        ("arm_gripper_left_joint", 0.0),
        ("arm_gripper_right_joint", 0.0),
    ])
}

fn with_arm(
    spawn: SpawnConfig,
    arm: ActuatorConfig,
    gripper: ActuatorConfig,
) -> ArticulationConfig {
    ArticulationConfig::new(spawn, initial_state())
        .with_soft_limit_factor(0.9)
        .with_actuator(go2::LEG_GROUP, go2::leg_actuator())
        .with_actuator("d1_arm", arm)
        .with_actuator("d1_gripper", gripper)
}

/// Go2 + D1 with the bundled stage and training-tuned gains.
pub(crate) fn go2_arm(root: &AssetRoot) -> ArticulationConfig {
    let arm = ActuatorConfig::dc_motor(["arm_joint[1-6]"])
        .with_effort_limit(3.33)
        .with_saturation_effort(3.0)
        .with_velocity_limit(1.73)
        .with_stiffness(20.0)
        .with_damping(1.0)
        .with_friction(0.1);
    let gripper = ActuatorConfig::dc_motor(["arm_gripper.*_joint"])
        .with_effort_limit(10.0)
        .with_saturation_effort(8.0)
        .with_velocity_limit(0.1)
        .with_stiffness(50.0)
        .with_damping(2.0)
        .with_friction(0.2);
    with_arm(SpawnConfig::usd(root.join("go2_d1.usd")), arm, gripper)
}

/// Go2 + D1 from the description package stage.
pub(crate) fn go2_d1(root: &AssetRoot) -> ArticulationConfig {
    let arm = ActuatorConfig::dc_motor(["arm_joint[1-6]"])
        .with_effort_limit(10.0)
        .with_saturation_effort(10.0)
        .with_velocity_limit(2.0)
        .with_stiffness(10.0)
        .with_damping(0.5)
        .with_friction(0.0);
    let gripper = ActuatorConfig::dc_motor(["arm_gripper.*_joint"])
        .with_effort_limit(15.0)
        .with_saturation_effort(15.0)
        .with_velocity_limit(0.02)
        .with_stiffness(5.0)
        .with_damping(0.5)
        .with_friction(0.0);
    let usd = root.join("go2_d1_description/urdf/go2_d1/go2_d1_v1.usd");
    with_arm(SpawnConfig::usd(usd), arm, gripper)
}

pub(crate) fn skeleton() -> Skeleton {
    let mut skeleton = go2::skeleton_with("go2_d1", TRUNK, &arm_joints(), &arm_bodies());
    for i in 1..=6 {
        skeleton = skeleton.with_limit(format!("arm_joint{i}"), arm_limit(i));
    }
    skeleton
}
