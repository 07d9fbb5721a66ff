//! Articulation descriptions for quadruped-plus-arm robots.
//!
//! A description says how to spawn a robot and how to drive it: the asset,
//! rigid-body and solver properties, the reset pose, and named actuator
//! groups. Joint tables are keyed by name patterns and stay unresolved until
//! the description is bound to a [`Skeleton`]. Binding checks that:
//!
//! - every pattern matches at least one joint,
//! - no joint is claimed by two default-position patterns,
//! - actuator groups are disjoint and cover every joint.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Nothing here
//! opens an asset except [`Skeleton::load_urdf`], which only reads names and
//! limits.
//!
//! # Example
//!
//! ```
//! use sim_articulation::{AssetRoot, RobotKind};
//!
//! let root = AssetRoot::new("/opt/assets");
//! let robot = RobotKind::Go2X5a.articulation(&root);
//! let bound = robot.bind(&RobotKind::Go2X5a.skeleton()).unwrap();
//!
//! let gripper = bound.joint("joint7").unwrap();
//! assert_eq!(gripper.actuator, "x5a_gripper");
//! ```

#![doc(html_root_url = "https://docs.rs/sim-articulation/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

mod actuator;
mod articulation;
mod asset;
mod bind;
mod error;
pub mod robots;
mod skeleton;
mod spawn;
mod state;

pub use actuator::{ActuatorConfig, ActuatorGains, ActuatorModel};
pub use articulation::{ArticulationConfig, DEFAULT_PRIM_PATH};
pub use asset::AssetRoot;
pub use bind::{BoundArticulation, BoundJoint};
pub use error::{ArticulationError, Result};
pub use robots::RobotKind;
pub use skeleton::Skeleton;
pub use spawn::{
    ArticulationRootProperties, AssetSource, DriveTarget, DriveType, JointDriveConfig, PdGains,
    RigidBodyProperties, SpawnConfig,
};
pub use state::InitialState;
