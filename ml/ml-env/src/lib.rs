//! Environment configuration for quadruped-plus-arm reinforcement learning.
//!
//! An environment is a tree of settings: scene, actions, observations,
//! randomization events, rewards, terminations, commands and curriculum.
//! Variants are not written out in full. Each is a chain of
//! [`VariantStep`]s applied to one shared base tree:
//!
//! ```text
//! locomotion base -> robot step -> terrain step -> play step
//! ```
//!
//! - [`ConfigNode`] - Persistent tree; clones share untouched subtrees
//! - [`Override`] / [`VariantStep`] - Replace, set or disable a field
//! - [`Composition`] - An ordered chain of steps
//! - [`EnvConfig`] - Typed schema a composed tree must fit
//! - [`bind_env`] - Resolve every joint and body pattern against a robot
//! - [`Registry`] - The shipped variants by id
//!
//! Overrides never add fields. A misspelled path, a step that reaches
//! through a disabled term, or a value of the wrong kind fails the whole
//! chain; the base tree is never modified.
//!
//! # Example
//!
//! ```
//! use ml_env::Registry;
//! use sim_articulation::AssetRoot;
//!
//! let registry = Registry::standard(AssetRoot::new("/opt/assets")).unwrap();
//!
//! let train = registry.compose_config("Go2X5A-Flat-v0").unwrap();
//! let play = registry.compose_config("Go2X5A-Flat-Play-v0").unwrap();
//! assert!(play.scene.num_envs < train.scene.num_envs);
//! assert!(play.curriculum.is_none());
//! assert_eq!(play.rewards, train.rewards);
//! ```

#![doc(html_root_url = "https://docs.rs/ml-env/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

pub mod base;
mod build;
mod compose;
mod error;
mod node;
mod overrides;
mod path;
mod registry;
pub mod schema;
pub mod variants;

pub use base::locomotion_base;
pub use build::{
    BoundAction, BoundBody, BoundEnv, BoundTerm, CONTACT_FORCES, HEIGHT_SCANNER, ROBOT, bind_env,
};
pub use compose::Composition;
pub use error::{EnvError, Result};
pub use node::ConfigNode;
pub use overrides::{Override, VariantStep};
pub use path::FieldPath;
pub use registry::{Registry, VariantEntry};
pub use schema::EnvConfig;
