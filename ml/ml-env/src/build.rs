//! Binding a composed environment to a robot.
//!
//! Composition only checks that a tree has the right shape. Whether its
//! joint and body patterns make sense is only known against a concrete
//! skeleton: a variant that forgot to rewrite a body reference for its
//! robot fails here, naming the term that holds the stale pattern.

use serde::{Deserialize, Serialize};
use sim_articulation::{BoundArticulation, Skeleton};
use sim_entity::{EntityKind, Resolution, resolve_ordered, resolve_patterns, resolve_values};
use tracing::debug;

use crate::error::{EnvError, Result};
use crate::schema::{EnvConfig, Params, SceneEntityRef, active, body_pattern, entity_refs};

/// Scene entity name of the robot.
pub const ROBOT: &str = "robot";
/// Scene entity name of the contact sensor.
pub const CONTACT_FORCES: &str = "contact_forces";
/// Scene entity name of the height scanner.
pub const HEIGHT_SCANNER: &str = "height_scanner";

/// One body of the robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundBody {
    /// Index in the skeleton's body list.
    pub index: usize,
    /// Body name.
    pub name: String,
}

/// One entry of the action vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundAction {
    /// Index in the skeleton's joint list.
    pub joint_index: usize,
    /// Joint name.
    pub joint: String,
    /// Action scale.
    pub scale: f64,
    /// Target offset: the default position, or 0.
    pub offset: f64,
}

/// An entity reference of a term, resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundTerm {
    /// Dotted path of the reference, e.g.
    /// `rewards.arm_self_collision.params.sensor_cfg`.
    pub path: String,
    /// Scene entity referred to.
    pub entity: String,
    /// Matched joints, if the reference names any.
    pub joints: Option<Resolution>,
    /// Matched bodies, if the reference names any. For the contact sensor,
    /// indices point into [`BoundEnv::contact_bodies`].
    pub bodies: Option<Resolution>,
}

/// An environment ready to hand to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundEnv {
    /// The composed configuration.
    pub config: EnvConfig,
    /// The robot.
    pub articulation: BoundArticulation,
    /// Action layout.
    pub actions: Vec<BoundAction>,
    /// Bodies carrying contact reporters.
    pub contact_bodies: Resolution,
    /// Body the height scanner hangs from.
    pub height_scanner_body: Option<BoundBody>,
    /// End-effector of the pose command.
    pub ee_body: BoundBody,
    /// Resolved entity references of every active term.
    pub terms: Vec<BoundTerm>,
}

impl BoundEnv {
    /// Look up a bound reference by path.
    #[must_use]
    pub fn term(&self, path: &str) -> Option<&BoundTerm> {
        self.terms.iter().find(|t| t.path == path)
    }

    /// Action dimension.
    #[must_use]
    pub fn action_dim(&self) -> usize {
        self.actions.len()
    }
}

/// Bind `config` to `skeleton`.
///
/// # Errors
///
/// Returns [`EnvError::Articulation`] if the robot description does not fit
/// the skeleton, and [`EnvError::Binding`] naming the offending field for
/// any other pattern that cannot be resolved.
pub fn bind_env(config: &EnvConfig, skeleton: &Skeleton) -> Result<BoundEnv> {
    let articulation = config.scene.robot.bind(skeleton)?;
    let actions = bind_actions(config, &articulation)?;

    let robot_prim = config.scene.robot.prim_path.as_str();
    let contact_prim = config.scene.contact_forces.prim_path.as_str();
    let contact_bodies = resolve_sensor(
        "scene.contact_forces.prim_path",
        contact_prim,
        robot_prim,
        skeleton,
    )?;

    let height_scanner_body = config
        .scene
        .height_scanner
        .as_ref()
        .map(|scanner| {
            let path = "scene.height_scanner.prim_path";
            let bodies = resolve_sensor(path, &scanner.prim_path, robot_prim, skeleton)?;
            single_body(path, &bodies)
        })
        .transpose()?;

    let ee_path = "commands.ee_pose.body_name";
    let ee = resolve_patterns(
        &[config.commands.ee_pose.body_name.as_str()],
        &skeleton.bodies,
        EntityKind::Body,
    )
    .map_err(|e| EnvError::binding(ee_path, e))?;
    let ee_body = single_body(ee_path, &ee)?;

    let scene = Scene {
        skeleton,
        contact_bodies: &contact_bodies,
        has_height_scanner: height_scanner_body.is_some(),
    };
    let mut terms = Vec::new();
    let tables = [
        ("events", collect(active(&config.events).map(|(n, t)| (n, &t.params)))),
        ("rewards", collect(active(&config.rewards).map(|(n, t)| (n, &t.params)))),
        ("terminations", collect(active(&config.terminations).map(|(n, t)| (n, &t.params)))),
        (
            "observations.policy.terms",
            collect(active(&config.observations.policy.terms).map(|(n, t)| (n, &t.params))),
        ),
        (
            "curriculum",
            config
                .curriculum
                .as_ref()
                .map(|table| collect(active(table).map(|(n, t)| (n, &t.params))))
                .unwrap_or_default(),
        ),
    ];
    for (section, entries) in tables {
        for (name, params) in entries {
            for (param, entity) in entity_refs(params) {
                let path = format!("{section}.{name}.params.{param}");
                let term = scene.bind(path, entity)?;
                debug!(
                    "bound '{}' -> {} joint(s), {} body(ies)",
                    term.path,
                    term.joints.as_ref().map_or(0, Resolution::len),
                    term.bodies.as_ref().map_or(0, Resolution::len)
                );
                terms.push(term);
            }
        }
    }

    Ok(BoundEnv {
        config: config.clone(),
        articulation,
        actions,
        contact_bodies,
        height_scanner_body,
        ee_body,
        terms,
    })
}

fn collect<'a>(
    entries: impl Iterator<Item = (&'a str, &'a Params)>,
) -> Vec<(&'a str, &'a Params)> {
    entries.collect()
}

fn bind_actions(
    config: &EnvConfig,
    articulation: &BoundArticulation,
) -> Result<Vec<BoundAction>> {
    let action = &config.actions.joint_pos;
    let joint_names: Vec<&str> = articulation.joint_names().collect();
    let joints = resolve_ordered(&action.joint_names, &joint_names, EntityKind::Joint)
        .map_err(|e| EnvError::binding("actions.joint_pos.joint_names", e))?;

    let scales = resolve_values(
        action.scale.iter().map(|(pattern, scale)| (pattern, *scale)),
        &joints.names,
        EntityKind::Joint,
    )
    .map_err(|e| EnvError::binding("actions.joint_pos.scale", e))?;
    let mut scale = vec![1.0; joints.len()];
    for bound in scales {
        scale[bound.index] = bound.value;
    }

    Ok(joints
        .iter()
        .zip(scale)
        .map(|((joint_index, name), scale)| {
            let offset = if action.use_default_offset {
                articulation.joints[joint_index].default_pos
            } else {
                0.0
            };
            BoundAction {
                joint_index,
                joint: name.to_string(),
                scale,
                offset,
            }
        })
        .collect())
}

fn resolve_sensor(
    path: &str,
    sensor_prim: &str,
    robot_prim: &str,
    skeleton: &Skeleton,
) -> Result<Resolution> {
    let pattern = body_pattern(sensor_prim, robot_prim).ok_or_else(|| {
        EnvError::binding(path, format!("'{sensor_prim}' is not a body under '{robot_prim}'"))
    })?;
    resolve_patterns(&[pattern], &skeleton.bodies, EntityKind::Body)
        .map_err(|e| EnvError::binding(path, e))
}

fn single_body(path: &str, bodies: &Resolution) -> Result<BoundBody> {
    match bodies.iter().collect::<Vec<_>>().as_slice() {
        [(index, name)] => Ok(BoundBody {
            index: *index,
            name: (*name).to_string(),
        }),
        matched => Err(EnvError::binding(
            path,
            format!("expected exactly one body, matched {}", matched.len()),
        )),
    }
}

struct Scene<'a> {
    skeleton: &'a Skeleton,
    contact_bodies: &'a Resolution,
    has_height_scanner: bool,
}

impl Scene<'_> {
    fn bind(&self, path: String, entity: &SceneEntityRef) -> Result<BoundTerm> {
        let resolved = match entity.name.as_str() {
            ROBOT => {
                let Skeleton { joints, bodies, .. } = self.skeleton;
                resolve_optional(&entity.joint_names, joints, EntityKind::Joint).and_then(|j| {
                    let b = resolve_optional(&entity.body_names, bodies, EntityKind::Body)?;
                    Ok((j, b))
                })
            }
            CONTACT_FORCES => {
                if entity.joint_names.is_some() {
                    return Err(EnvError::binding(path, "the contact sensor has no joints"));
                }
                resolve_optional(&entity.body_names, &self.contact_bodies.names, EntityKind::Body)
                    .map(|bodies| (None, bodies))
            }
            HEIGHT_SCANNER if self.has_height_scanner => {
                if entity.joint_names.is_some() || entity.body_names.is_some() {
                    return Err(EnvError::binding(
                        path,
                        "the height scanner takes no joint or body names",
                    ));
                }
                Ok((None, None))
            }
            other => {
                return Err(EnvError::binding(path, format!("no scene entity named '{other}'")));
            }
        };

        match resolved {
            Ok((joints, bodies)) => Ok(BoundTerm {
                path,
                entity: entity.name.clone(),
                joints,
                bodies,
            }),
            Err(e) => Err(EnvError::binding(path, e)),
        }
    }
}

fn resolve_optional(
    patterns: &Option<Vec<String>>,
    names: &[String],
    kind: EntityKind,
) -> sim_entity::Result<Option<Resolution>> {
    patterns
        .as_ref()
        .map(|p| resolve_patterns(p, names, kind))
        .transpose()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::base::locomotion_base;
    use crate::schema::RewardTerm;
    use approx::assert_relative_eq;
    use sim_articulation::{AssetRoot, RobotKind};

    fn base() -> EnvConfig {
        locomotion_base(&AssetRoot::default())
    }

    #[test]
    fn test_bind_base() {
        let env = bind_env(&base(), &RobotKind::Go2Arm.skeleton()).unwrap();
        assert_eq!(env.action_dim(), 18);
        assert_eq!(env.ee_body.name, "arm_link6");
        assert_eq!(env.height_scanner_body.as_ref().unwrap().name, "base_link");
        assert_eq!(env.contact_bodies.len(), RobotKind::Go2Arm.skeleton().bodies.len());

        let collision = env.term("rewards.arm_self_collision.params.sensor_cfg").unwrap();
        let bodies = collision.bodies.as_ref().unwrap();
        assert_eq!(bodies.len(), 7);
        assert!(bodies.contains("arm_base_link"));
    }

    #[test]
    fn test_action_scales_and_offsets() {
        let env = bind_env(&base(), &RobotKind::Go2Arm.skeleton()).unwrap();
        let hip = &env.actions[0];
        assert_eq!(hip.joint, "FL_hip_joint");
        assert_relative_eq!(hip.scale, 0.5);
        assert_relative_eq!(hip.offset, 0.1);
        let arm = env.actions.iter().find(|a| a.joint == "arm_joint3").unwrap();
        assert_relative_eq!(arm.scale, 0.25);
        assert_relative_eq!(arm.offset, 0.1);
    }

    #[test]
    fn test_action_without_offset() {
        let mut config = base();
        config.actions.joint_pos.use_default_offset = false;
        let env = bind_env(&config, &RobotKind::Go2Arm.skeleton()).unwrap();
        assert!(env.actions.iter().all(|a| a.offset == 0.0));
    }

    #[test]
    fn test_unscaled_joint_defaults_to_one() {
        let mut config = base();
        config.actions.joint_pos.scale.remove("arm_joint[1-6]");
        let env = bind_env(&config, &RobotKind::Go2Arm.skeleton()).unwrap();
        assert_relative_eq!(env.actions[12].scale, 1.0);
    }

    #[test]
    fn test_stale_body_pattern_names_term() {
        let err = bind_env(&base(), &RobotKind::Go2X5a.skeleton()).unwrap_err();
        assert!(err.is_binding_error());
    }

    #[test]
    fn test_unmatched_reward_pattern() {
        let mut config = base();
        config.rewards.insert(
            "wheel_slip".to_string(),
            Some(RewardTerm::new("slip", -1.0).param(
                "sensor_cfg",
                SceneEntityRef::contact_forces().bodies([".*_wheel"]),
            )),
        );
        let err = bind_env(&config, &RobotKind::Go2Arm.skeleton()).unwrap_err();
        assert!(matches!(err, EnvError::Binding { .. }));
        assert!(err.to_string().contains("rewards.wheel_slip.params.sensor_cfg"));
    }

    #[test]
    fn test_disabled_terms_are_not_bound() {
        let mut config = base();
        config.rewards.insert("wheel_slip".to_string(), None);
        assert!(bind_env(&config, &RobotKind::Go2Arm.skeleton()).is_ok());
    }

    #[test]
    fn test_unknown_scene_entity() {
        let mut config = base();
        config.rewards.insert(
            "camera".to_string(),
            Some(RewardTerm::new("f", 1.0).param("sensor_cfg", SceneEntityRef::new("camera"))),
        );
        let err = bind_env(&config, &RobotKind::Go2Arm.skeleton()).unwrap_err();
        assert!(err.to_string().contains("no scene entity named 'camera'"));
    }

    #[test]
    fn test_scanner_outside_robot() {
        let mut config = base();
        if let Some(scanner) = config.scene.height_scanner.as_mut() {
            scanner.prim_path = "/World/ground".to_string();
        }
        let err = bind_env(&config, &RobotKind::Go2Arm.skeleton()).unwrap_err();
        assert!(err.to_string().contains("scene.height_scanner.prim_path"));
    }
}
