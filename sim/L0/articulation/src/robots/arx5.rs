//! Go2 carrying the ARX5 arm with the fin-ray gripper.
//!
//! Same link and joint layout as the X5A asset; the arm is tuned down for
//! training stability and the gripper is stiffer.

use super::x5a;
use crate::actuator::ActuatorConfig;
use crate::articulation::ArticulationConfig;
use crate::asset::AssetRoot;
use crate::skeleton::Skeleton;
use crate::spawn::SpawnConfig;

pub(crate) fn articulation(root: &AssetRoot) -> ArticulationConfig {
    // The asset declares 100 N·m and 1000 rad/s; these are the training limits.
    let arm = ActuatorConfig::dc_motor(["joint[1-6]"])
        .with_effort_limit(30.0)
        .with_saturation_effort(25.0)
        .with_velocity_limit(10.0)
        .with_stiffness(100.0)
        .with_damping(3.0)
        .with_friction(0.1);
    let gripper = ActuatorConfig::implicit(["joint[7-8]"])
        .with_effort_limit(100.0)
        .with_velocity_limit(100.0)
        .with_stiffness(1000.0)
        .with_damping(50.0);
    x5a::arx_articulation(
        SpawnConfig::urdf(root.join("go2_arx5/go2_arx5_finray_x85_z94.urdf")),
        [0.0, 0.3, 0.5, 0.0, 0.0, 0.0, 0.0, 0.0],
        arm,
        gripper,
    )
}

pub(crate) fn skeleton() -> Skeleton {
    x5a::arx_skeleton("go2_arx5")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::spawn::{AssetSource, DriveTarget};
    use approx::assert_relative_eq;

    #[test]
    fn test_urdf_import_settings() {
        let config = articulation(&AssetRoot::new("/assets"));
        match &config.spawn.asset {
            AssetSource::Urdf {
                asset_path,
                fix_base,
                joint_drive,
            } => {
                assert_eq!(asset_path, "/assets/go2_arx5/go2_arx5_finray_x85_z94.urdf");
                assert!(!fix_base);
                assert_eq!(joint_drive.target_type, DriveTarget::Position);
                assert_relative_eq!(joint_drive.gains.stiffness, 0.0);
            }
            AssetSource::Usd { .. } => panic!("ARX5 is imported from URDF"),
        }
    }

    #[test]
    fn test_training_limits() {
        let config = articulation(&AssetRoot::default());
        let arm = config.actuators["x5a_arm"].gains();
        assert_relative_eq!(arm.effort_limit, 30.0);
        assert_relative_eq!(arm.velocity_limit, 10.0);
    }
}
