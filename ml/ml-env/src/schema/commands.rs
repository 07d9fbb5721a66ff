//! Command generators.
//!
//! Both commands widen their sampling ranges over training: at curriculum
//! progress `p` in `[0, 1]` a range is `init + p * (final - init)`, where
//! progress grows with `curriculum_coeff`. With `curriculum_sampling` off,
//! commands are drawn from `ranges` directly.

use serde::{Deserialize, Serialize};

use super::terms::Range;

/// Planar velocity ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VelocityRanges {
    /// Forward velocity (m/s).
    pub lin_vel_x: Range,
    /// Lateral velocity (m/s).
    pub lin_vel_y: Range,
    /// Yaw rate (rad/s).
    pub ang_vel_z: Range,
}

impl VelocityRanges {
    /// All ranges.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Range)> {
        [
            ("lin_vel_x", self.lin_vel_x),
            ("lin_vel_y", self.lin_vel_y),
            ("ang_vel_z", self.ang_vel_z),
        ]
        .into_iter()
    }

    /// Interpolate between two range sets.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            lin_vel_x: lerp_range(self.lin_vel_x, other.lin_vel_x, t),
            lin_vel_y: lerp_range(self.lin_vel_y, other.lin_vel_y, t),
            ang_vel_z: lerp_range(self.ang_vel_z, other.ang_vel_z, t),
        }
    }
}

/// End-effector pose ranges in the trunk frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoseRanges {
    /// Forward offset (m).
    pub pos_x: Range,
    /// Lateral offset (m).
    pub pos_y: Range,
    /// Height (m).
    pub pos_z: Range,
    /// Roll (rad).
    pub roll: Range,
    /// Pitch (rad).
    pub pitch: Range,
    /// Yaw (rad).
    pub yaw: Range,
}

impl PoseRanges {
    /// All ranges.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Range)> {
        [
            ("pos_x", self.pos_x),
            ("pos_y", self.pos_y),
            ("pos_z", self.pos_z),
            ("roll", self.roll),
            ("pitch", self.pitch),
            ("yaw", self.yaw),
        ]
        .into_iter()
    }

    /// Interpolate between two range sets.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            pos_x: lerp_range(self.pos_x, other.pos_x, t),
            pos_y: lerp_range(self.pos_y, other.pos_y, t),
            pos_z: lerp_range(self.pos_z, other.pos_z, t),
            roll: lerp_range(self.roll, other.roll, t),
            pitch: lerp_range(self.pitch, other.pitch, t),
            yaw: lerp_range(self.yaw, other.yaw, t),
        }
    }
}

fn lerp_range(a: Range, b: Range, t: f64) -> Range {
    let t = t.clamp(0.0, 1.0);
    [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])]
}

/// Base velocity command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VelocityCommand {
    /// Commanded asset.
    pub asset_name: String,
    /// Seconds between resamples.
    pub resampling_time_range: Range,
    /// Fraction of environments commanded to stand still.
    pub rel_standing_envs: f64,
    /// Steps over which the ranges widen from init to final.
    pub curriculum_coeff: u32,
    /// Ranges used without curriculum.
    pub ranges: VelocityRanges,
    /// Ranges at the start of training.
    pub ranges_init: VelocityRanges,
    /// Ranges at the end of the curriculum.
    pub ranges_final: VelocityRanges,
    /// Sample along the curriculum instead of from `ranges`.
    pub curriculum_sampling: bool,
}

/// End-effector pose command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoseCommand {
    /// Commanded asset.
    pub asset_name: String,
    /// End-effector body.
    pub body_name: String,
    /// Seconds between resamples.
    pub resampling_time_range: Range,
    /// Steps over which the ranges widen from init to final.
    pub curriculum_coeff: u32,
    /// Ranges used without curriculum.
    pub ranges: PoseRanges,
    /// Ranges at the start of training.
    pub ranges_init: PoseRanges,
    /// Ranges at the end of the curriculum.
    pub ranges_final: PoseRanges,
    /// Sample along the curriculum instead of from `ranges`.
    pub curriculum_sampling: bool,
    /// Evaluation sampling: fixed targets cycled in order.
    pub play_sampling: bool,
}

/// All commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandsConfig {
    /// Trunk velocity.
    pub base_velocity: VelocityCommand,
    /// End-effector pose.
    pub ee_pose: PoseCommand,
}

impl CommandsConfig {
    /// Every named range, for validation.
    pub fn ranges(&self) -> impl Iterator<Item = (String, Range)> + '_ {
        let velocity = [
            ("ranges", &self.base_velocity.ranges),
            ("ranges_init", &self.base_velocity.ranges_init),
            ("ranges_final", &self.base_velocity.ranges_final),
        ]
        .into_iter()
        .flat_map(|(set, ranges)| {
            ranges
                .iter()
                .map(move |(name, r)| (format!("commands.base_velocity.{set}.{name}"), r))
        });
        let pose = [
            ("ranges", &self.ee_pose.ranges),
            ("ranges_init", &self.ee_pose.ranges_init),
            ("ranges_final", &self.ee_pose.ranges_final),
        ]
        .into_iter()
        .flat_map(|(set, ranges)| {
            ranges
                .iter()
                .map(move |(name, r)| (format!("commands.ee_pose.{set}.{name}"), r))
        });
        let resampling = [
            (
                "commands.base_velocity.resampling_time_range".to_string(),
                self.base_velocity.resampling_time_range,
            ),
            (
                "commands.ee_pose.resampling_time_range".to_string(),
                self.ee_pose.resampling_time_range,
            ),
        ];
        velocity.chain(pose).chain(resampling)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp() {
        let init = VelocityRanges {
            lin_vel_x: [0.0, 0.0],
            lin_vel_y: [0.0, 0.0],
            ang_vel_z: [0.0, 0.0],
        };
        let last = VelocityRanges {
            lin_vel_x: [0.0, 1.0],
            lin_vel_y: [-0.5, 0.5],
            ang_vel_z: [-0.5, 0.5],
        };
        let mid = init.lerp(&last, 0.5);
        assert_relative_eq!(mid.lin_vel_x[1], 0.5);
        assert_relative_eq!(mid.lin_vel_y[0], -0.25);
        assert_eq!(init.lerp(&last, 2.0), last);
    }
}
