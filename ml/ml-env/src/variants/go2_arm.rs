//! Go2 with the D1 arm, as written in the base environment.

use crate::overrides::VariantStep;

use super::{fixed_commands, flat_ground, play_mode};

/// Flat ground for the base robot.
#[must_use]
pub fn go2_arm_flat() -> VariantStep {
    flat_ground("go2_arm_flat")
}

/// Single-robot evaluation on flat ground, cycling through fixed
/// end-effector targets.
#[must_use]
pub fn go2_arm_flat_play() -> VariantStep {
    play_mode("go2_arm_flat_play", 1)
        .merge(fixed_commands("go2_arm_flat_play"))
        .set("commands.base_velocity.resampling_time_range", [5.0, 5.0])
        .set("commands.base_velocity.rel_standing_envs", 0.1)
        .set("commands.ee_pose.play_sampling", true)
}
