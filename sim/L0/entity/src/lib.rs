//! Entity-reference patterns for articulated robots.
//!
//! Robot and environment configuration refers to joints and bodies by name
//! pattern rather than by index: `".*_hip_joint"`, `"F[L,R]_thigh_joint"`,
//! `"link[1-8]"`. This crate compiles those patterns and resolves them
//! against the concrete name list of a robot asset.
//!
//! - [`EntityPattern`] - A compiled, fully anchored pattern
//! - [`resolve`] / [`resolve_patterns`] - Union of matches, order-insensitive
//! - [`resolve_ordered`] - Matches in listing order (action joint layouts)
//! - [`resolve_values`] - Bind a `pattern -> value` table to entities
//!
//! Every pattern must match at least one entity. A pattern that resolves to
//! nothing is an error: the configuration referring to it cannot be built.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Resolution is a
//! pure function of the patterns and the entity names.
//!
//! # Example
//!
//! ```
//! use sim_entity::{EntityKind, resolve_patterns};
//!
//! let joints = ["FL_hip_joint", "FR_hip_joint", "RL_hip_joint", "RR_hip_joint"];
//! let left = resolve_patterns(&[".*L_hip_joint"], &joints, EntityKind::Joint).unwrap();
//! assert_eq!(left.names, vec!["FL_hip_joint", "RL_hip_joint"]);
//!
//! let err = resolve_patterns(&["wheel_.*"], &joints, EntityKind::Joint);
//! assert!(err.is_err());
//! ```

#![doc(html_root_url = "https://docs.rs/sim-entity/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod error;
mod pattern;
mod resolve;

pub use error::{EntityError, Result};
pub use pattern::{EntityKind, EntityPattern};
pub use resolve::{
    BoundValue, Resolution, resolve, resolve_ordered, resolve_patterns, resolve_values,
};
