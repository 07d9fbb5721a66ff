//! URDF joint and link inventory reader.
//!
//! This crate parses [URDF](http://wiki.ros.org/urdf) (Unified Robot Description Format)
//! documents and extracts what robot configuration binds against: the names
//! of links (bodies) and movable joints, the kinematic tree, and joint
//! limits.
//!
//! # Features
//!
//! - Parse URDF XML from files or strings
//! - Validate the kinematic tree (unique names, defined links, single root)
//! - List movable joints in document order (fixed joints are merged away by
//!   the importer, so they never appear in an articulation's joint list)
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with **zero engine dependencies**. Geometry,
//! inertia, dynamics, materials and transmissions are skipped; no meshes
//! are loaded.
//!
//! # Example
//!
//! ```
//! use sim_urdf::load_urdf_str;
//!
//! let urdf = r#"
//!     <robot name="leg">
//!         <link name="base"/>
//!         <link name="FL_hip"/>
//!         <joint name="FL_hip_joint" type="revolute">
//!             <parent link="base"/>
//!             <child link="FL_hip"/>
//!             <limit lower="-1.05" upper="1.05" effort="23.7" velocity="30.1"/>
//!         </joint>
//!     </robot>
//! "#;
//!
//! let robot = load_urdf_str(urdf).expect("should parse");
//! assert_eq!(robot.root_link, "base");
//! assert_eq!(robot.joint_names(), vec!["FL_hip_joint"]);
//! ```

#![doc(html_root_url = "https://docs.rs/sim-urdf/0.7.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

mod error;
mod loader;
mod parser;
mod types;
mod validation;

pub use error::{Result, UrdfError};
pub use loader::{LoadedRobot, load_urdf_file, load_urdf_str};
pub use parser::parse_urdf_str;
pub use types::{UrdfJoint, UrdfJointLimit, UrdfJointType, UrdfRobot};
pub use validation::{KinematicTree, validate};
