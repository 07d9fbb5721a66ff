//! The locomotion-plus-reaching base environment.
//!
//! Every registered variant starts from this tree: the D1-arm robot on rough
//! generated terrain, 4096 environments, training settings throughout.
//! Robot and terrain variants then edit it.

use std::f64::consts::PI;

use sim_articulation::{AssetRoot, RobotKind, robots};

use crate::schema::{
    ActionsConfig, CommandsConfig, ContactSensorConfig, CurriculumTerm, ENV_NS, EnvConfig,
    EventTerm, HeightScannerConfig, JointPositionAction, ObservationTerm, ObservationsConfig,
    PolicyGroup, PoseCommand, PoseRanges, RewardTerm, SceneConfig, SceneEntityRef, SimConfig,
    TermParam, TermTable, TerminationTerm, TerrainConfig, TerrainPreset, TerrainType,
    VelocityCommand, VelocityRanges,
};

/// Prim path of the robot in every environment.
pub const ROBOT_PRIM: &str = "{ENV_REGEX_NS}/Robot";

/// Prim path of the ground.
pub const GROUND_PRIM: &str = "/World/ground";

/// Robot the base tree is written for.
pub const BASE_ROBOT: RobotKind = RobotKind::Go2Arm;

const BASE_TRUNK: &str = "base_link";
const BASE_EE: &str = "arm_link6";

const LEG_SCALE: f64 = 0.5;
const ARM_SCALE: f64 = 0.25;

/// The base environment, with robot assets under `root`.
#[must_use]
pub fn locomotion_base(root: &AssetRoot) -> EnvConfig {
    EnvConfig {
        scene: scene(root),
        actions: actions(),
        observations: observations(),
        events: events(),
        rewards: rewards(),
        terminations: terminations(),
        commands: commands(),
        curriculum: Some(table([(
            "terrain_levels",
            CurriculumTerm::new("terrain_levels_vel"),
        )])),
        sim: SimConfig {
            dt: 0.005,
            decimation: 4,
            episode_length_s: 20.0,
        },
    }
}

/// Prim path of a robot body.
#[must_use]
pub fn robot_body_prim(body: &str) -> String {
    format!("{ROBOT_PRIM}/{body}")
}

/// Leg action scales: the same for every quadruped.
pub fn leg_scales() -> impl Iterator<Item = (&'static str, f64)> {
    [".*_hip_joint", ".*_thigh_joint", ".*_calf_joint"]
        .into_iter()
        .map(|p| (p, LEG_SCALE))
}

/// Actions on the legs and the first six arm joints named `arm_joints`.
#[must_use]
pub fn arm_actions(arm_joints: &[String], arm_scale_pattern: &str) -> ActionsConfig {
    let joints = robots::leg_joints().into_iter().chain(arm_joints.iter().cloned());
    let mut action = JointPositionAction::new(joints);
    for (pattern, scale) in leg_scales() {
        action = action.with_scale(pattern, scale);
    }
    ActionsConfig {
        joint_pos: action.with_scale(arm_scale_pattern, ARM_SCALE),
    }
}

pub(crate) fn table<T, const N: usize>(entries: [(&str, T); N]) -> TermTable<T> {
    entries
        .into_iter()
        .map(|(name, term)| (name.to_string(), Some(term)))
        .collect()
}

fn scene(root: &AssetRoot) -> SceneConfig {
    SceneConfig {
        num_envs: 4096,
        env_spacing: 2.5,
        robot: BASE_ROBOT.articulation(root).replace_prim_path(ROBOT_PRIM),
        terrain: TerrainConfig {
            prim_path: GROUND_PRIM.to_string(),
            terrain_type: TerrainType::Generator,
            terrain_generator: Some(TerrainPreset::Rough),
            max_init_terrain_level: Some(5),
            static_friction: 1.0,
            dynamic_friction: 1.0,
        },
        height_scanner: Some(HeightScannerConfig {
            prim_path: robot_body_prim(BASE_TRUNK),
            offset: [0.0, 0.0, 20.0],
            attach_yaw_only: true,
            resolution: 0.1,
            size: [1.6, 1.0],
            mesh_prim_paths: vec![GROUND_PRIM.to_string()],
        }),
        contact_forces: ContactSensorConfig {
            prim_path: format!("{ENV_NS}/Robot/.*"),
            history_length: 3,
            track_air_time: true,
        },
    }
}

fn actions() -> ActionsConfig {
    let arm: Vec<String> = (1..=6).map(|i| format!("arm_joint{i}")).collect();
    arm_actions(&arm, "arm_joint[1-6]")
}

fn observations() -> ObservationsConfig {
    let command =
        |name: &str| ObservationTerm::new("generated_commands").param("command_name", name);
    ObservationsConfig {
        policy: PolicyGroup {
            enable_corruption: true,
            concatenate_terms: true,
            terms: table([
                ("base_lin_vel", ObservationTerm::new("base_lin_vel").noisy(0.1)),
                ("base_ang_vel", ObservationTerm::new("base_ang_vel").noisy(0.2)),
                ("projected_gravity", ObservationTerm::new("projected_gravity").noisy(0.05)),
                ("velocity_commands", command("base_velocity")),
                ("pose_command", command("ee_pose")),
                ("joint_pos", ObservationTerm::new("joint_pos_rel").noisy(0.01)),
                ("joint_vel", ObservationTerm::new("joint_vel_rel").noisy(1.5)),
                ("actions", ObservationTerm::new("last_action")),
                (
                    "height_scan",
                    ObservationTerm::new("height_scan")
                        .param("sensor_cfg", SceneEntityRef::new("height_scanner"))
                        .noisy(0.1)
                        .clipped(-1.0, 1.0),
                ),
            ]),
        },
    }
}

fn events() -> TermTable<EventTerm> {
    let robot = SceneEntityRef::robot;
    table([
        (
            "physics_material",
            EventTerm::startup("randomize_rigid_body_material")
                .param("asset_cfg", robot().bodies([".*"]))
                .param("static_friction_range", [0.8, 0.8])
                .param("dynamic_friction_range", [0.6, 0.6])
                .param("restitution_range", [0.0, 0.0])
                .param("num_buckets", 64.0),
        ),
        (
            "add_base_mass",
            EventTerm::startup("randomize_rigid_body_mass")
                .param("asset_cfg", robot().bodies([BASE_TRUNK]))
                .param("mass_distribution_params", [-1.0, 3.0])
                .param("operation", "add"),
        ),
        (
            "add_ee_mass",
            EventTerm::startup("randomize_rigid_body_mass")
                .param("asset_cfg", robot().bodies([BASE_EE]))
                .param("mass_distribution_params", [0.0, 0.2])
                .param("operation", "add"),
        ),
        (
            "base_external_force_torque",
            EventTerm::reset("apply_external_force_torque")
                .param("asset_cfg", robot().bodies([BASE_TRUNK]))
                .param("force_range", [0.0, 0.0])
                .param("torque_range", [0.0, 0.0]),
        ),
        (
            "reset_base",
            EventTerm::reset("reset_root_state_uniform")
                .param(
                    "pose_range",
                    TermParam::ranges([("x", [-0.5, 0.5]), ("y", [-0.5, 0.5]), ("yaw", [-PI, PI])]),
                )
                .param(
                    "velocity_range",
                    TermParam::ranges([
                        ("x", [0.0, 0.0]),
                        ("y", [0.0, 0.0]),
                        ("z", [0.0, 0.0]),
                        ("roll", [0.0, 0.0]),
                        ("pitch", [0.0, 0.0]),
                        ("yaw", [0.0, 0.0]),
                    ]),
                ),
        ),
        (
            "reset_robot_joints",
            EventTerm::reset("reset_joints_by_scale")
                .param("position_range", [0.5, 1.5])
                .param("velocity_range", [0.0, 0.0]),
        ),
        (
            "push_robot",
            EventTerm::interval("push_by_setting_velocity", [10.0, 15.0]).param(
                "velocity_range",
                TermParam::ranges([("x", [-0.5, 0.5]), ("y", [-0.5, 0.5])]),
            ),
        ),
    ])
}

fn rewards() -> TermTable<RewardTerm> {
    let robot = SceneEntityRef::robot;
    let contacts = SceneEntityRef::contact_forces;
    let legs = || robot().joints([".*_hip_joint", ".*_thigh_joint", ".*_calf_joint"]);
    let air_time = |feet: &str| {
        RewardTerm::new("feet_air_time", 0.0)
            .param("sensor_cfg", contacts().bodies([feet]))
            .param("command_name", "base_velocity")
            .param("threshold", 0.5)
    };

    table([
        (
            "end_effector_position_tracking",
            RewardTerm::new("position_command_error_exp", 2.0)
                .param("asset_cfg", robot().bodies([BASE_EE]))
                .param("command_name", "ee_pose")
                .param("std", 0.1),
        ),
        (
            "end_effector_orientation_tracking",
            RewardTerm::new("orientation_command_error", -1.0)
                .param("asset_cfg", robot().bodies([BASE_EE]))
                .param("command_name", "ee_pose"),
        ),
        (
            "end_effector_action_rate",
            RewardTerm::new("arm_action_rate_l2", -0.005).param("command_name", "ee_pose"),
        ),
        (
            "end_effector_action_smoothness",
            RewardTerm::new("arm_action_smoothness", -0.02).param("command_name", "ee_pose"),
        ),
        (
            "tracking_lin_vel_x_l1",
            RewardTerm::new("track_lin_vel_x_l1", 2.5).param("command_name", "base_velocity"),
        ),
        (
            "track_ang_vel_z_exp",
            RewardTerm::new("track_ang_vel_z_exp", 1.5)
                .param("command_name", "base_velocity")
                .param("std", 0.5),
        ),
        ("lin_vel_z_l2", RewardTerm::new("lin_vel_z_l2", -2.0)),
        ("ang_vel_xy_l2", RewardTerm::new("ang_vel_xy_l2", -0.05)),
        (
            "dof_torques_l2",
            RewardTerm::new("joint_torques_l2", -1.0e-5).param("asset_cfg", legs()),
        ),
        (
            "dof_acc_l2",
            RewardTerm::new("joint_acc_l2", -2.5e-7).param("asset_cfg", legs()),
        ),
        ("action_rate_l2", RewardTerm::new("action_rate_l2", -0.01)),
        ("feet_air_time", air_time(".*_foot")),
        ("F_feet_air_time", air_time("F.*_foot")),
        ("R_feet_air_time", air_time("R.*_foot")),
        (
            "feet_height",
            RewardTerm::new("feet_height", 0.0)
                .param("asset_cfg", robot().bodies([".*_foot"]))
                .param("target_height", 0.08),
        ),
        (
            "feet_height_body",
            RewardTerm::new("feet_height_body", -2.0)
                .param("asset_cfg", robot().bodies([".*_foot"]))
                .param("target_height", -0.3),
        ),
        (
            "foot_contact",
            RewardTerm::new("foot_contact", 0.002)
                .param("sensor_cfg", contacts().bodies([".*_foot"]))
                .param("command_name", "base_velocity"),
        ),
        (
            "hip_deviation",
            RewardTerm::new("joint_deviation_l1", -0.1)
                .param("asset_cfg", robot().joints([".*_hip_joint"])),
        ),
        (
            "joint_deviation",
            RewardTerm::new("joint_deviation_l1", -0.01).param("asset_cfg", legs()),
        ),
        ("action_smoothness", RewardTerm::new("action_smoothness", -0.01)),
        (
            "height_reward",
            RewardTerm::new("base_height_l2", -1.0).param("target_height", 0.32),
        ),
        ("flat_orientation_l2", RewardTerm::new("flat_orientation_l2", -0.5)),
        (
            "arm_self_collision",
            RewardTerm::new("undesired_contacts", -0.5)
                .param(
                    "sensor_cfg",
                    contacts().bodies(["arm_link[1-6]", "arm_base_link"]),
                )
                .param("threshold", 1.0),
        ),
        (
            "base_motion_diversity",
            RewardTerm::new("base_motion_diversity", 0.2).param("command_name", "base_velocity"),
        ),
        (
            "stationary_base_penalty",
            RewardTerm::new("stationary_base_penalty", -0.1)
                .param("command_name", "base_velocity")
                .param("threshold", 0.1),
        ),
    ])
}

fn terminations() -> TermTable<TerminationTerm> {
    table([
        ("time_out", TerminationTerm::new("time_out", true)),
        (
            "base_contact",
            TerminationTerm::new("illegal_contact", false)
                .param(
                    "sensor_cfg",
                    SceneEntityRef::contact_forces().bodies([BASE_TRUNK]),
                )
                .param("threshold", 1.0),
        ),
    ])
}

fn commands() -> CommandsConfig {
    let still = VelocityRanges {
        lin_vel_x: [0.0, 0.0],
        lin_vel_y: [0.0, 0.0],
        ang_vel_z: [0.0, 0.0],
    };
    let walk = VelocityRanges {
        lin_vel_x: [0.0, 1.0],
        lin_vel_y: [-0.5, 0.5],
        ang_vel_z: [-1.0, 1.0],
    };
    let upright = |x: [f64; 2], y: [f64; 2], z: [f64; 2]| PoseRanges {
        pos_x: x,
        pos_y: y,
        pos_z: z,
        roll: [0.0, 0.0],
        pitch: [0.0, 0.0],
        yaw: [0.0, 0.0],
    };
    CommandsConfig {
        base_velocity: VelocityCommand {
            asset_name: "robot".to_string(),
            resampling_time_range: [10.0, 10.0],
            rel_standing_envs: 0.02,
            curriculum_coeff: 4000,
            ranges: walk,
            ranges_init: still,
            ranges_final: walk,
            curriculum_sampling: true,
        },
        ee_pose: PoseCommand {
            asset_name: "robot".to_string(),
            body_name: BASE_EE.to_string(),
            resampling_time_range: [4.0, 4.0],
            curriculum_coeff: 5000,
            ranges: upright([0.45, 0.6], [-0.25, 0.25], [0.2, 0.5]),
            ranges_init: upright([0.45, 0.5], [-0.05, 0.05], [0.45, 0.5]),
            ranges_final: upright([0.35, 0.65], [-0.35, 0.35], [0.15, 0.6]),
            curriculum_sampling: true,
            play_sampling: false,
        },
    }
}
