//! Scene: robot, terrain and sensors.

use serde::{Deserialize, Serialize};
use sim_articulation::ArticulationConfig;

use crate::error::{EnvError, Result};

/// Placeholder expanded by the engine into each environment's namespace.
pub const ENV_NS: &str = "{ENV_REGEX_NS}";

/// How the ground is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    /// Infinite flat plane.
    Plane,
    /// Tiles produced by a terrain generator.
    Generator,
}

/// Terrain generator presets understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainPreset {
    /// Flat tiles (keeps terrain levels without obstacles).
    Flat,
    /// Mixed rough tiles: slopes, stairs, random boxes and noise.
    Rough,
}

/// Ground settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerrainConfig {
    /// Prim path of the ground.
    pub prim_path: String,
    /// Plane or generated.
    pub terrain_type: TerrainType,
    /// Generator preset (generator terrain only).
    pub terrain_generator: Option<TerrainPreset>,
    /// Highest difficulty level a robot may start on.
    pub max_init_terrain_level: Option<u32>,
    /// Static friction of the ground material.
    pub static_friction: f64,
    /// Dynamic friction of the ground material.
    pub dynamic_friction: f64,
}

/// Rays cast down from above the trunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeightScannerConfig {
    /// Body the scanner is attached to.
    pub prim_path: String,
    /// Ray origin offset from the body (m).
    pub offset: [f64; 3],
    /// Follow only the body's yaw.
    pub attach_yaw_only: bool,
    /// Grid spacing (m).
    pub resolution: f64,
    /// Grid extent, length by width (m).
    pub size: [f64; 2],
    /// Meshes the rays hit.
    pub mesh_prim_paths: Vec<String>,
}

/// Contact reporters on robot bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactSensorConfig {
    /// Bodies with reporters.
    pub prim_path: String,
    /// Number of past contact readings kept.
    pub history_length: u32,
    /// Track air and contact time per body.
    pub track_air_time: bool,
}

/// The simulated scene, replicated `num_envs` times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    /// Number of parallel environments.
    pub num_envs: u32,
    /// Distance between environment origins (m).
    pub env_spacing: f64,
    /// The robot.
    pub robot: ArticulationConfig,
    /// The ground.
    pub terrain: TerrainConfig,
    /// Height scanner, if the policy observes terrain height.
    pub height_scanner: Option<HeightScannerConfig>,
    /// Contact sensor.
    pub contact_forces: ContactSensorConfig,
}

impl SceneConfig {
    /// Validate scene values.
    pub fn validate(&self) -> Result<()> {
        if self.num_envs == 0 {
            return Err(EnvError::invalid_config("scene.num_envs must be at least 1"));
        }
        if !self.env_spacing.is_finite() || self.env_spacing <= 0.0 {
            return Err(EnvError::invalid_config(format!(
                "scene.env_spacing must be positive, got {}",
                self.env_spacing
            )));
        }
        match (self.terrain.terrain_type, self.terrain.terrain_generator) {
            (TerrainType::Generator, None) => {
                return Err(EnvError::invalid_config(
                    "scene.terrain: generator terrain needs a terrain_generator",
                ));
            }
            (TerrainType::Plane, Some(preset)) => {
                return Err(EnvError::invalid_config(format!(
                    "scene.terrain: plane terrain takes no generator, got {preset:?}"
                )));
            }
            _ => {}
        }
        self.robot
            .validate()
            .map_err(|e| EnvError::invalid_config(format!("scene.robot: {e}")))
    }
}

/// The body pattern of a sensor prim path under `robot_prim`.
///
/// `{ENV_REGEX_NS}/Robot/base` under `{ENV_REGEX_NS}/Robot` is `base`.
#[must_use]
pub fn body_pattern<'a>(sensor_prim: &'a str, robot_prim: &str) -> Option<&'a str> {
    sensor_prim
        .strip_prefix(robot_prim)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}
