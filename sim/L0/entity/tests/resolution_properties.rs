//! Property-based tests for entity resolution.
//!
//! Run with: cargo test -p sim-entity -- proptest

use proptest::prelude::*;
use sim_entity::{EntityKind, resolve_patterns, resolve_values};

fn go2_joints() -> Vec<String> {
    let mut joints = Vec::new();
    for leg in ["FL", "FR", "RL", "RR"] {
        for part in ["hip", "thigh", "calf"] {
            joints.push(format!("{leg}_{part}_joint"));
        }
    }
    for i in 1..=6 {
        joints.push(format!("joint{i}"));
    }
    joints
}

const PATTERNS: [&str; 8] = [
    ".*L_hip_joint",
    ".*R_hip_joint",
    "F[L,R]_thigh_joint",
    "R[L,R]_thigh_joint",
    ".*_calf_joint",
    "joint[1-3]",
    "joint[4-6]",
    "FL_.*",
];

/// Pick a non-empty subset of the known-good patterns in random order.
fn arb_pattern_subset() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(PATTERNS.to_vec(), 1..=PATTERNS.len()).prop_shuffle()
}

proptest! {
    #[test]
    fn proptest_resolution_is_order_insensitive(patterns in arb_pattern_subset()) {
        let joints = go2_joints();
        let forward = resolve_patterns(&patterns, &joints, EntityKind::Joint).unwrap();

        let mut reversed = patterns.clone();
        reversed.reverse();
        let backward = resolve_patterns(&reversed, &joints, EntityKind::Joint).unwrap();

        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn proptest_resolution_is_sorted_by_declaration(patterns in arb_pattern_subset()) {
        let joints = go2_joints();
        let r = resolve_patterns(&patterns, &joints, EntityKind::Joint).unwrap();
        prop_assert!(r.indices.windows(2).all(|w| w[0] < w[1]));
        for (i, name) in r.iter() {
            prop_assert_eq!(joints[i].as_str(), name);
        }
    }

    #[test]
    fn proptest_entity_order_does_not_change_membership(seed in any::<u64>()) {
        let joints = go2_joints();
        let mut shuffled = joints.clone();
        // Deterministic rotation from the seed keeps the test reproducible.
        let len = shuffled.len();
        shuffled.rotate_left((seed % len as u64) as usize);

        let a = resolve_patterns(&[".*_thigh_joint", "joint[2-4]"], &joints, EntityKind::Joint)
            .unwrap();
        let b = resolve_patterns(&[".*_thigh_joint", "joint[2-4]"], &shuffled, EntityKind::Joint)
            .unwrap();

        let mut a_names = a.names.clone();
        let mut b_names = b.names.clone();
        a_names.sort();
        b_names.sort();
        prop_assert_eq!(a_names, b_names);
    }
}

#[test]
fn disjoint_table_binds_every_leg_joint_once() {
    let joints = go2_joints();
    let table = [
        (".*L_hip_joint", 0.1),
        (".*R_hip_joint", -0.1),
        ("F[L,R]_thigh_joint", 0.8),
        ("R[L,R]_thigh_joint", 1.0),
        (".*_calf_joint", -1.5),
    ];
    let bound = resolve_values(table, &joints, EntityKind::Joint).unwrap();
    assert_eq!(bound.len(), 12);
    let mut names: Vec<_> = bound.iter().map(|b| b.name.as_str()).collect();
    names.dedup();
    assert_eq!(names.len(), 12);
}
