//! Asset spawning and physical property settings.

use serde::{Deserialize, Serialize};

use crate::error::{ArticulationError, Result};

/// Rigid-body properties applied to every body of the articulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyProperties {
    /// Disable gravity for all bodies.
    pub disable_gravity: bool,
    /// Keep accelerations from the previous step.
    pub retain_accelerations: bool,
    /// Linear damping (1/s).
    pub linear_damping: f64,
    /// Angular damping (1/s).
    pub angular_damping: f64,
    /// Linear velocity cap (m/s).
    pub max_linear_velocity: f64,
    /// Angular velocity cap (rad/s).
    pub max_angular_velocity: f64,
    /// Velocity cap used to resolve penetrations (m/s).
    pub max_depenetration_velocity: f64,
}

impl Default for RigidBodyProperties {
    fn default() -> Self {
        Self {
            disable_gravity: false,
            retain_accelerations: false,
            linear_damping: 0.0,
            angular_damping: 0.0,
            max_linear_velocity: 1000.0,
            max_angular_velocity: 1000.0,
            max_depenetration_velocity: 1.0,
        }
    }
}

impl RigidBodyProperties {
    /// Validate the properties.
    pub fn validate(&self) -> Result<()> {
        if self.linear_damping < 0.0 || self.angular_damping < 0.0 {
            return Err(ArticulationError::invalid_config(
                "rigid body damping must be non-negative",
            ));
        }
        for (name, cap) in [
            ("max_linear_velocity", self.max_linear_velocity),
            ("max_angular_velocity", self.max_angular_velocity),
            ("max_depenetration_velocity", self.max_depenetration_velocity),
        ] {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(ArticulationError::invalid_config(format!(
                    "{name} must be positive and finite, got {cap}"
                )));
            }
        }
        Ok(())
    }
}

/// Solver settings of the articulation root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticulationRootProperties {
    /// Let bodies of the same articulation collide with each other.
    pub enabled_self_collisions: bool,
    /// Position iterations of the articulation solver.
    pub solver_position_iteration_count: u32,
    /// Velocity iterations of the articulation solver.
    pub solver_velocity_iteration_count: u32,
}

impl Default for ArticulationRootProperties {
    fn default() -> Self {
        Self {
            enabled_self_collisions: true,
            solver_position_iteration_count: 4,
            solver_velocity_iteration_count: 0,
        }
    }
}

impl ArticulationRootProperties {
    /// Validate the properties.
    pub fn validate(&self) -> Result<()> {
        if self.solver_position_iteration_count == 0 {
            return Err(ArticulationError::invalid_config(
                "solver_position_iteration_count must be at least 1",
            ));
        }
        Ok(())
    }
}

/// How imported URDF joints are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveType {
    /// Drive outputs a force/torque.
    Force,
    /// Drive outputs an acceleration.
    Acceleration,
}

/// What imported URDF joint drives track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriveTarget {
    /// Track a position target.
    Position,
    /// Track a velocity target.
    Velocity,
    /// No target (passive joint).
    #[serde(rename = "none")]
    Passive,
}

/// PD gains written into the imported asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdGains {
    /// Position gain. Actuator groups override it at bind time.
    pub stiffness: f64,
    /// Velocity gain; `None` keeps the importer's value.
    pub damping: Option<f64>,
}

/// Joint drive settings applied when importing a URDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointDriveConfig {
    /// Drive output.
    pub drive_type: DriveType,
    /// Drive target.
    pub target_type: DriveTarget,
    /// Drive gains.
    pub gains: PdGains,
}

impl Default for JointDriveConfig {
    fn default() -> Self {
        Self {
            drive_type: DriveType::Force,
            target_type: DriveTarget::Position,
            gains: PdGains {
                stiffness: 0.0,
                damping: None,
            },
        }
    }
}

/// The geometry/physics asset the articulation is spawned from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum AssetSource {
    /// A USD stage.
    Usd {
        /// Path to the USD file.
        usd_path: String,
    },
    /// A URDF document converted on import.
    Urdf {
        /// Path to the URDF file.
        asset_path: String,
        /// Weld the root link to the world.
        fix_base: bool,
        /// Joint drive settings for the import.
        joint_drive: JointDriveConfig,
    },
}

impl AssetSource {
    /// The asset file path.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Usd { usd_path } => usd_path,
            Self::Urdf { asset_path, .. } => asset_path,
        }
    }
}

/// Spawn settings: asset plus physical properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Asset to spawn.
    pub asset: AssetSource,
    /// Create contact reporters on every body.
    pub activate_contact_sensors: bool,
    /// Rigid-body properties.
    pub rigid_props: RigidBodyProperties,
    /// Articulation-root properties.
    pub articulation_props: ArticulationRootProperties,
}

impl SpawnConfig {
    /// Spawn from a USD file with default properties.
    #[must_use]
    pub fn usd(usd_path: impl Into<String>) -> Self {
        Self {
            asset: AssetSource::Usd {
                usd_path: usd_path.into(),
            },
            activate_contact_sensors: true,
            rigid_props: RigidBodyProperties::default(),
            articulation_props: ArticulationRootProperties::default(),
        }
    }

    /// Spawn from a URDF file with a floating base and default properties.
    #[must_use]
    pub fn urdf(asset_path: impl Into<String>) -> Self {
        Self {
            asset: AssetSource::Urdf {
                asset_path: asset_path.into(),
                fix_base: false,
                joint_drive: JointDriveConfig::default(),
            },
            activate_contact_sensors: true,
            rigid_props: RigidBodyProperties::default(),
            articulation_props: ArticulationRootProperties::default(),
        }
    }

    /// Set the rigid-body properties.
    #[must_use]
    pub fn with_rigid_props(mut self, rigid_props: RigidBodyProperties) -> Self {
        self.rigid_props = rigid_props;
        self
    }

    /// Set the articulation-root properties.
    #[must_use]
    pub fn with_articulation_props(mut self, props: ArticulationRootProperties) -> Self {
        self.articulation_props = props;
        self
    }

    /// Validate the spawn settings.
    pub fn validate(&self) -> Result<()> {
        if self.asset.path().trim().is_empty() {
            return Err(ArticulationError::invalid_config("asset path is empty"));
        }
        self.rigid_props.validate()?;
        self.articulation_props.validate()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_robots() {
        let rigid = RigidBodyProperties::default();
        assert_eq!(rigid.max_linear_velocity, 1000.0);
        assert_eq!(rigid.max_depenetration_velocity, 1.0);

        let root = ArticulationRootProperties::default();
        assert!(root.enabled_self_collisions);
        assert_eq!(root.solver_position_iteration_count, 4);
        assert_eq!(root.solver_velocity_iteration_count, 0);
    }

    #[test]
    fn test_invalid_velocity_cap() {
        let rigid = RigidBodyProperties {
            max_angular_velocity: 0.0,
            ..Default::default()
        };
        let err = rigid.validate().unwrap_err();
        assert!(err.to_string().contains("max_angular_velocity"));
    }

    #[test]
    fn test_empty_asset_path() {
        let spawn = SpawnConfig::usd("  ");
        assert!(spawn.validate().is_err());
    }

    #[test]
    fn test_urdf_source_serializes_with_format_tag() {
        let spawn = SpawnConfig::urdf("assets/go2_x5a/go2_x5a.urdf");
        let json = serde_json::to_value(&spawn).unwrap();
        assert_eq!(json["asset"]["format"], "urdf");
        assert_eq!(json["asset"]["fix_base"], false);
        assert_eq!(json["asset"]["joint_drive"]["target_type"], "position");
        assert!(json["asset"]["joint_drive"]["gains"]["damping"].is_null());

        let back: SpawnConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, spawn);
    }
}
