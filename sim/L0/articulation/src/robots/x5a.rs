//! Go2 carrying the ARX X5A arm.

use super::go2;
use crate::actuator::ActuatorConfig;
use crate::articulation::ArticulationConfig;
use crate::asset::AssetRoot;
use crate::skeleton::Skeleton;
use crate::spawn::SpawnConfig;
use crate::state::InitialState;

/// Trunk body of the ARX-family assets.
pub const TRUNK: &str = "base";

/// End-effector body.
pub const EE_BODY: &str = "link6";

/// Arm joints: six revolute joints then the two prismatic fingers.
pub(crate) fn arm_joints() -> Vec<String> {
    (1..=8).map(|i| format!("joint{i}")).collect()
}

pub(crate) fn arm_bodies() -> Vec<String> {
    std::iter::once("x5a_base_link".to_string())
        .chain((1..=8).map(|i| format!("link{i}")))
        .collect()
}

/// Skeleton shared by the ARX5 and X5A assets.
pub(crate) fn arx_skeleton(name: &str) -> Skeleton {
    go2::skeleton_with(name, TRUNK, &arm_joints(), &arm_bodies())
}

/// Arm pose table for joints 1 to 8.
pub(crate) fn arm_pose(state: InitialState, pose: [f64; 8]) -> InitialState {
    state.with_joint_table(
        pose.iter()
            .enumerate()
            .map(|(i, &v)| (format!("joint{}", i + 1), v)),
    )
}

/// Arm and gripper groups on top of the legs.
pub(crate) fn arx_articulation(
    spawn: SpawnConfig,
    pose: [f64; 8],
    arm: ActuatorConfig,
    gripper: ActuatorConfig,
) -> ArticulationConfig {
    ArticulationConfig::new(spawn, arm_pose(go2::standing_legs(0.35), pose))
        .with_soft_limit_factor(0.9)
        .with_actuator(go2::LEG_GROUP, go2::leg_actuator())
        .with_actuator("x5a_arm", arm)
        .with_actuator("x5a_gripper", gripper)
}

pub(crate) fn articulation(root: &AssetRoot) -> ArticulationConfig {
    let arm = ActuatorConfig::dc_motor(["joint[1-6]"])
        .with_effort_limit(100.0)
        .with_saturation_effort(80.0)
        .with_velocity_limit(10.0)
        .with_stiffness(100.0)
        .with_damping(3.0)
        .with_friction(0.1);
    let gripper = ActuatorConfig::implicit(["joint[7-8]"])
        .with_effort_limit(100.0)
        .with_velocity_limit(1.0)
        .with_stiffness(1000.0)
        .with_damping(100.0);
    arx_articulation(
        SpawnConfig::urdf(root.join("go2_x5a/go2_x5a.urdf")),
        [0.0, 0.5, 1.0, 0.0, 0.0, 0.0, 0.02, 0.02],
        arm,
        gripper,
    )
}

pub(crate) fn skeleton() -> Skeleton {
    arx_skeleton("go2_x5a")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gripper_opened() {
        let config = articulation(&AssetRoot::default());
        assert_relative_eq!(config.init_state.joint_pos["joint7"], 0.02);
        assert_relative_eq!(config.init_state.joint_pos["joint3"], 1.0);
        assert_eq!(config.init_state.joint_pos.len(), 13);
    }

    #[test]
    fn test_arm_groups_are_disjoint() {
        let bound = articulation(&AssetRoot::default())
            .bind(&skeleton())
            .unwrap();
        assert_eq!(bound.group("x5a_arm").count(), 6);
        assert_eq!(bound.group("x5a_gripper").count(), 2);
        assert_eq!(bound.group(go2::LEG_GROUP).count(), 12);
    }
}
