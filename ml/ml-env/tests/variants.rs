//! Properties of every registered variant.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ml_env::{
    Composition, ConfigNode, EnvError, FieldPath, Registry, VariantStep, schema::active,
    variants,
};
use proptest::prelude::*;
use sim_articulation::{AssetRoot, RobotKind};

/// Fields every play step may change.
const PLAY_FIELDS: [&str; 6] = [
    "scene.num_envs",
    "scene.env_spacing",
    "observations.policy.enable_corruption",
    "commands.base_velocity.curriculum_sampling",
    "commands.ee_pose.curriculum_sampling",
    "curriculum",
];

/// Command ranges a play step may pin for evaluation.
const COMMAND_RANGE_FIELDS: [&str; 4] = [
    "commands.base_velocity.ranges",
    "commands.base_velocity.resampling_time_range",
    "commands.ee_pose.ranges",
    "commands.ee_pose.resampling_time_range",
];

/// Evaluation settings particular to one play variant.
fn play_extras(play_id: &str) -> &'static [&'static str] {
    match play_id {
        "Go2Arm-Flat-Play-v0" => &[
            "commands.base_velocity.rel_standing_envs",
            "commands.ee_pose.play_sampling",
        ],
        "Go2ARX5-Flat-Play-v0" => &[
            "events.reset_robot_joints.params.position_range",
            "events.reset_base.params.pose_range.x",
            "events.reset_base.params.pose_range.y",
        ],
        _ => &[],
    }
}

fn registry() -> Registry {
    Registry::standard(AssetRoot::new("/opt/assets")).unwrap()
}

fn play_pairs(registry: &Registry) -> Vec<(String, String)> {
    registry
        .entries()
        .filter(|e| e.is_play())
        .map(|e| (e.id.replace("-Play", ""), e.id.clone()))
        .collect()
}

#[test]
fn every_variant_builds_against_its_robot() {
    let registry = registry();
    assert_eq!(registry.ids().count(), 10);
    for entry in registry.entries() {
        let env = registry
            .build(&entry.id)
            .unwrap_or_else(|e| panic!("{}: {e}", entry.id));

        let skeleton = entry.robot.skeleton();
        assert_eq!(env.articulation.joints.len(), skeleton.joints.len(), "{}", entry.id);
        assert!(env.articulation.joints.iter().all(|j| !j.actuator.is_empty()));
        assert_eq!(env.action_dim(), 18, "{}", entry.id);
        assert_eq!(Some(env.ee_body.name.as_str()), entry.robot.ee_body(), "{}", entry.id);
        assert!(env.config.scene.robot.spawn.asset.path().starts_with("/opt/assets/"));
    }
}

#[test]
fn every_play_variant_has_a_training_twin() {
    let registry = registry();
    let pairs = play_pairs(&registry);
    assert_eq!(pairs.len(), 5);
    for (train, _) in &pairs {
        assert!(registry.get(train).is_ok(), "no training variant '{train}'");
    }
}

#[test]
fn play_is_smaller_and_undisturbed() {
    let registry = registry();
    for (train_id, play_id) in play_pairs(&registry) {
        let train = registry.compose_config(&train_id).unwrap();
        let play = registry.compose_config(&play_id).unwrap();

        assert!(play.scene.num_envs <= train.scene.num_envs, "{play_id}");
        assert!(play.curriculum.is_none(), "{play_id}");
        for event in variants::DISTURBANCE_EVENTS {
            assert!(play.events[event].is_none(), "{play_id}: {event}");
        }
        assert!(!play.observations.policy.enable_corruption);
        assert!(!play.commands.base_velocity.curriculum_sampling);
        assert!(!play.commands.ee_pose.curriculum_sampling);
    }
}

#[test]
fn play_differs_from_training_only_in_play_fields() {
    let registry = registry();
    for (train_id, play_id) in play_pairs(&registry) {
        let train = registry.compose(&train_id).unwrap();
        let play = registry.compose(&play_id).unwrap();

        let changed = train.diff(&play);
        assert!(!changed.is_empty());
        let allowed = PLAY_FIELDS
            .iter()
            .chain(&COMMAND_RANGE_FIELDS)
            .chain(play_extras(&play_id));
        for path in &changed {
            if allowed.clone().any(|field| path.starts_with(field)) {
                continue;
            }
            // Any other event change must switch a whole term off.
            let disabled_term = path.starts_with("events")
                && path.as_str().split('.').count() == 2
                && play.get(path).is_some_and(ConfigNode::is_null)
                && train.get(path).is_some_and(|n| !n.is_null());
            assert!(disabled_term, "{play_id} changes '{path}'");
        }

        let train = registry.compose_config(&train_id).unwrap();
        let play = registry.compose_config(&play_id).unwrap();
        assert_eq!(play.rewards, train.rewards, "{play_id}");
        assert_eq!(play.scene.robot.actuators, train.scene.robot.actuators, "{play_id}");
    }
}

#[test]
fn play_keeps_event_parameters_unless_listed() {
    let registry = registry();
    let train = registry.compose("Go2X5A-Rough-v0").unwrap();
    let play = registry.compose("Go2X5A-Rough-Play-v0").unwrap();
    assert!(
        train
            .diff(&play)
            .iter()
            .all(|p| !p.starts_with("events") || p.as_str().split('.').count() == 2)
    );
}

#[test]
fn robot_steps_keep_mobile_manipulation_weights() {
    let registry = registry();
    for id in ["Go2Arm-Flat-v0", "Go2ARX5-Flat-v0"] {
        let config = registry.compose_config(id).unwrap();
        let weight = |name: &str| config.rewards[name].as_ref().unwrap().weight;
        assert!((weight("end_effector_position_tracking") - 3.0).abs() < 1e-12);
        assert!((weight("arm_self_collision") + 1.0).abs() < 1e-12);
        assert_eq!(active(&config.rewards).count(), 25);
    }
}

#[test]
fn x5a_terrains() {
    let registry = registry();
    let flat = registry.compose_config("Go2X5A-Flat-v0").unwrap();
    let rough = registry.compose_config("Go2X5A-Rough-v0").unwrap();
    let flat_curriculum = flat.curriculum.unwrap();
    assert!(flat_curriculum["terrain_levels"].is_none());
    assert!(rough.curriculum.unwrap()["terrain_levels"].is_some());
    assert_ne!(flat.scene.terrain.terrain_generator, rough.scene.terrain.terrain_generator);
}

#[test]
fn arx_self_collision_links() {
    let registry = registry();
    let arx5 = registry.build("Go2ARX5-Base-v0").unwrap();
    let x5a = registry.build("Go2X5A-Rough-v0").unwrap();
    let path = "rewards.arm_self_collision.params.sensor_cfg";
    let count = |env: &ml_env::BoundEnv| env.term(path).unwrap().bodies.as_ref().unwrap().len();
    assert_eq!(count(&arx5), 9);
    assert_eq!(count(&x5a), 7);
}

#[test]
fn stale_reward_pattern_fails_the_build() {
    let mut registry = registry();
    let stale = registry.get("Go2X5A-Flat-v0").unwrap().composition.clone();
    let mut chain = Composition::new("Go2X5A-Stale-v0");
    for step in stale.steps() {
        chain = chain.then(step.clone());
    }
    let chain = chain.then(
        VariantStep::new("stale")
            .replace_typed(
                "rewards.arm_self_collision.params.sensor_cfg",
                &ml_env::schema::SceneEntityRef::contact_forces().bodies(["arm_link[1-6]"]),
            )
            .unwrap(),
    );
    registry.register(RobotKind::Go2X5a, chain).unwrap();

    assert!(registry.compose_config("Go2X5A-Stale-v0").is_ok());
    let err = registry.build("Go2X5A-Stale-v0").unwrap_err();
    assert!(matches!(err, EnvError::Binding { .. }));
    assert!(err.to_string().contains("rewards.arm_self_collision.params.sensor_cfg"));
}

#[test]
fn wrong_skeleton_fails_the_build() {
    let registry = registry();
    let err = registry
        .build_with("Go2X5A-Flat-v0", &RobotKind::Go2Arm.skeleton())
        .unwrap_err();
    assert!(err.is_binding_error());
}

#[test]
fn misspelled_path_is_rejected() {
    let registry = registry();
    let step = VariantStep::new("typo").set("rewards.arm_self_colision.weight", -1.0);
    let err = step.apply(registry.base()).unwrap_err();
    assert!(matches!(err, EnvError::InvalidPath { .. }));
    assert!(err.to_string().contains("arm_self_colision"));
}

#[test]
fn setting_through_a_disabled_term_is_rejected() {
    let registry = registry();
    let tree = registry.compose("Go2ARX5-Base-Play-v0").unwrap();
    let step = VariantStep::new("late")
        .set("events.push_robot.params.velocity_range.x", [0.0, 0.0]);
    assert!(step.apply(&tree).unwrap_err().is_override_error());
}

#[test]
fn play_curriculum_cannot_be_revived_by_a_set() {
    let registry = registry();
    let tree = registry.compose("Go2X5A-Rough-Play-v0").unwrap();
    let revived = ConfigNode::map([(
        "brand_new_term",
        ConfigNode::map([("func", ConfigNode::from("terrain_levels_vel"))]),
    )]);
    let err = VariantStep::new("late")
        .set("curriculum", revived)
        .apply(&tree)
        .unwrap_err();
    assert!(matches!(err, EnvError::KindMismatch { .. }));
}

#[test]
fn wrong_kind_is_rejected() {
    let registry = registry();
    let step = VariantStep::new("kind").set("scene.num_envs", "many");
    let err = step.apply(registry.base()).unwrap_err();
    assert!(matches!(err, EnvError::KindMismatch { .. }));
}

#[test]
fn composition_shares_untouched_subtrees() {
    let registry = registry();
    let composed = registry.compose("Go2X5A-Flat-v0").unwrap();
    assert!(registry.base().shares_subtree(&composed, &FieldPath::from("observations")));
    assert!(registry.base().shares_subtree(&composed, &FieldPath::from("sim")));
    assert!(!registry.base().shares_subtree(&composed, &FieldPath::from("scene")));
}

#[test]
fn base_tree_is_never_modified() {
    let registry = registry();
    let before = registry.base().to_canonical_json().unwrap();
    for id in registry.ids() {
        registry.compose(id).unwrap();
    }
    assert_eq!(registry.base().to_canonical_json().unwrap(), before);
}

#[test]
fn export_round_trips_through_the_schema() {
    let registry = registry();
    for id in registry.ids() {
        let json = registry.export_json(id).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let tree = ConfigNode::from(value);
        let config: ml_env::EnvConfig = tree.into_typed().unwrap();
        assert_eq!(config, registry.compose_config(id).unwrap(), "{id}");
    }
}

proptest! {
    #[test]
    fn compose_is_deterministic(index in 0usize..10) {
        let registry = registry();
        let id = registry.ids().nth(index).unwrap().to_string();
        let a = registry.export_json(&id).unwrap();
        let b = registry.export_json(&id).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn play_env_count_is_applied(num_envs in 1u32..4096) {
        let registry = registry();
        let tree = registry.compose("Go2X5A-Rough-v0").unwrap();
        let play = variants::play_mode("play", num_envs).apply(&tree).unwrap();
        let config: ml_env::EnvConfig = play.into_typed().unwrap();
        prop_assert_eq!(config.scene.num_envs, num_envs);
        config.validate().unwrap();
    }
}
