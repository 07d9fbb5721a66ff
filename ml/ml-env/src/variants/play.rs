//! Evaluation settings.

use crate::overrides::VariantStep;

/// Disturbance events that never run during evaluation.
pub const DISTURBANCE_EVENTS: [&str; 2] = ["base_external_force_torque", "push_robot"];

/// A small, clean scene for watching a trained policy.
///
/// Shrinks the scene to `num_envs`, turns observation noise off, nulls the
/// disturbance events and the curriculum, and samples commands from their
/// fixed `ranges` instead of the curriculum.
#[must_use]
pub fn play_mode(name: &str, num_envs: u32) -> VariantStep {
    DISTURBANCE_EVENTS
        .iter()
        .fold(VariantStep::new(name), |step, event| {
            step.disable(format!("events.{event}"))
        })
        .set("scene.num_envs", num_envs)
        .set("scene.env_spacing", 2.5)
        .set("observations.policy.enable_corruption", false)
        .disable("curriculum")
        .set("commands.base_velocity.curriculum_sampling", false)
        .set("commands.ee_pose.curriculum_sampling", false)
}

/// Fixed evaluation command ranges: walk forward and turn while reaching in
/// front of the trunk.
#[must_use]
pub fn fixed_commands(name: &str) -> VariantStep {
    VariantStep::new(name)
        .set("commands.base_velocity.ranges.lin_vel_x", [0.0, 1.0])
        .set("commands.base_velocity.ranges.lin_vel_y", [0.0, 0.0])
        .set("commands.base_velocity.ranges.ang_vel_z", [-0.5, 0.5])
        .set("commands.ee_pose.resampling_time_range", [4.0, 4.0])
        .set("commands.ee_pose.ranges.pos_x", [0.45, 0.6])
        .set("commands.ee_pose.ranges.pos_y", [-0.25, 0.25])
        .set("commands.ee_pose.ranges.pos_z", [0.2, 0.5])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::base::locomotion_base;
    use crate::node::ConfigNode;
    use crate::schema::EnvConfig;
    use sim_articulation::AssetRoot;

    #[test]
    fn test_play_mode() {
        let base = ConfigNode::from_typed(&locomotion_base(&AssetRoot::default())).unwrap();
        let config: EnvConfig = play_mode("play", 50)
            .apply(&base)
            .unwrap()
            .into_typed()
            .unwrap();
        assert_eq!(config.scene.num_envs, 50);
        assert!(!config.observations.policy.enable_corruption);
        assert!(config.curriculum.is_none());
        for event in DISTURBANCE_EVENTS {
            assert!(config.events[event].is_none());
        }
        assert!(config.events["reset_base"].is_some());
        assert!(!config.commands.ee_pose.curriculum_sampling);
    }

    #[test]
    fn test_play_mode_twice_is_idempotent() {
        let base = ConfigNode::from_typed(&locomotion_base(&AssetRoot::default())).unwrap();
        let once = play_mode("play", 1).apply(&base).unwrap();
        let twice = play_mode("play", 1).apply(&once).unwrap();
        assert_eq!(once, twice);
    }
}
