//! Robot, terrain and play steps applied on top of the base environment.
//!
//! Chains are always `base -> robot -> terrain -> play`: play steps come
//! last so that their nulls are never undone by a later step.

mod arx5;
mod go2_arm;
mod play;
mod x5a;

use sim_articulation::{AssetRoot, RobotKind};

use crate::base::{ROBOT_PRIM, arm_actions, robot_body_prim};
use crate::error::Result;
use crate::overrides::VariantStep;
use crate::schema::SceneEntityRef;

pub use arx5::{go2_arx5_base, go2_arx5_flat, go2_arx5_flat_play};
pub use go2_arm::{go2_arm_flat, go2_arm_flat_play};
pub use play::{DISTURBANCE_EVENTS, fixed_commands, play_mode};
pub use x5a::{go2_x5a_base, go2_x5a_flat, go2_x5a_rough};

/// Flat ground with a faster command curriculum and the mobile-manipulation
/// reward weights.
pub(crate) fn flat_ground(name: &str) -> VariantStep {
    let step = VariantStep::new(name)
        .disable("events.push_robot")
        .set("scene.terrain.terrain_type", "plane")
        .disable("scene.terrain.terrain_generator")
        .set("commands.base_velocity.curriculum_coeff", 1000_u32)
        .set("commands.base_velocity.ranges_init.lin_vel_x", [0.0, 0.0])
        .set("commands.base_velocity.ranges_init.lin_vel_y", [0.0, 0.0])
        .set("commands.base_velocity.ranges_init.ang_vel_z", [0.0, 0.0])
        .set("commands.base_velocity.ranges_final.lin_vel_x", [0.0, 1.0])
        .set("commands.base_velocity.ranges_final.lin_vel_y", [-0.5, 0.5])
        .set("commands.base_velocity.ranges_final.ang_vel_z", [-0.5, 0.5])
        .set("commands.ee_pose.curriculum_coeff", 1500_u32)
        .set("commands.ee_pose.ranges_init.pos_x", [0.45, 0.5])
        .set("commands.ee_pose.ranges_init.pos_y", [-0.05, 0.05])
        .set("commands.ee_pose.ranges_init.pos_z", [0.45, 0.5])
        .set("commands.ee_pose.ranges_final.pos_x", [0.4, 0.65])
        .set("commands.ee_pose.ranges_final.pos_y", [-0.35, 0.35])
        .set("commands.ee_pose.ranges_final.pos_z", [0.15, 0.6]);

    FLAT_REWARD_WEIGHTS
        .iter()
        .fold(step, |step, (term, weight)| {
            step.set(format!("rewards.{term}.weight"), *weight)
        })
}

const FLAT_REWARD_WEIGHTS: [(&str, f64); 25] = [
    ("end_effector_position_tracking", 3.0),
    ("end_effector_orientation_tracking", -2.0),
    ("end_effector_action_rate", -0.01),
    ("end_effector_action_smoothness", -0.04),
    ("tracking_lin_vel_x_l1", 3.5),
    ("track_ang_vel_z_exp", 2.0),
    ("lin_vel_z_l2", -2.5),
    ("ang_vel_xy_l2", -0.05),
    ("dof_torques_l2", -2.0e-5),
    ("dof_acc_l2", -2.5e-7),
    ("action_rate_l2", -0.01),
    ("feet_air_time", 0.0),
    ("F_feet_air_time", 1.0),
    ("R_feet_air_time", 1.0),
    ("feet_height", 0.0),
    ("feet_height_body", -3.0),
    ("foot_contact", 0.003),
    ("hip_deviation", -0.2),
    ("joint_deviation", -0.01),
    ("action_smoothness", -0.02),
    ("height_reward", -2.0),
    ("flat_orientation_l2", -1.0),
    ("arm_self_collision", -1.0),
    ("base_motion_diversity", 0.5),
    ("stationary_base_penalty", -0.3),
];

/// Swap the base robot for one of the ARX-arm robots.
///
/// The trunk of these assets is `base` and the arm links are `link1..`,
/// so every body reference of the base tree is rewritten. `collision_links`
/// are the arm bodies watched for self-collision.
pub(crate) fn arx_base(
    name: &str,
    robot: RobotKind,
    root: &AssetRoot,
    collision_links: &[&str],
) -> Result<VariantStep> {
    let trunk = robot.trunk_body();
    let ee = robot.ee_body().unwrap_or(trunk);
    let arm: Vec<String> = (1..=6).map(|i| format!("joint{i}")).collect();

    let step = VariantStep::new(name)
        .replace_typed(
            "scene.robot",
            &robot.articulation(root).replace_prim_path(ROBOT_PRIM),
        )?
        .replace_typed("actions", &arm_actions(&arm, "joint[1-6]"))?
        .set("scene.height_scanner.prim_path", robot_body_prim(trunk))
        .set("scene.contact_forces.prim_path", robot_body_prim(".*"))
        .replace_typed("events.add_base_mass.params.asset_cfg", &on_robot(trunk))?
        .replace_typed("events.add_ee_mass.params.asset_cfg", &on_robot(ee))?
        .replace_typed(
            "events.base_external_force_torque.params.asset_cfg",
            &on_robot(trunk),
        )?
        .replace_typed(
            "terminations.base_contact.params.sensor_cfg",
            &on_contacts(&[trunk]),
        )?
        .replace_typed(
            "rewards.arm_self_collision.params.sensor_cfg",
            &on_contacts(collision_links),
        )?
        .replace_typed(
            "rewards.end_effector_position_tracking.params.asset_cfg",
            &on_robot(ee),
        )?
        .replace_typed(
            "rewards.end_effector_orientation_tracking.params.asset_cfg",
            &on_robot(ee),
        )?
        .set("commands.ee_pose.body_name", ee);
    Ok(step)
}

fn on_robot(body: &str) -> SceneEntityRef {
    SceneEntityRef::robot().bodies([body])
}

fn on_contacts(bodies: &[&str]) -> SceneEntityRef {
    SceneEntityRef::contact_forces().bodies(bodies.iter().copied())
}
