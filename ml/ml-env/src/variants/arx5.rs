//! Go2 with the ARX5 arm and fin-ray gripper.

use sim_articulation::{AssetRoot, RobotKind};

use crate::error::Result;
use crate::overrides::VariantStep;

use super::{arx_base, fixed_commands, flat_ground, play_mode};

/// Swap in the ARX5 robot. All eight arm links are watched for
/// self-collision.
pub fn go2_arx5_base(root: &AssetRoot) -> Result<VariantStep> {
    arx_base(
        "go2_arx5_base",
        RobotKind::Go2Arx5,
        root,
        &["link[1-8]", "x5a_base_link"],
    )
}

/// Flat ground.
#[must_use]
pub fn go2_arx5_flat() -> VariantStep {
    flat_ground("go2_arx5_flat")
}

/// Evaluation on flat ground: robots start at the origin with their default
/// joint positions and keep their nominal mass.
#[must_use]
pub fn go2_arx5_flat_play() -> VariantStep {
    play_mode("go2_arx5_flat_play", 50)
        .merge(fixed_commands("go2_arx5_flat_play"))
        .disable("events.add_base_mass")
        .set("events.reset_robot_joints.params.position_range", [1.0, 1.0])
        .set("events.reset_base.params.pose_range.x", [0.0, 0.0])
        .set("events.reset_base.params.pose_range.y", [0.0, 0.0])
}
