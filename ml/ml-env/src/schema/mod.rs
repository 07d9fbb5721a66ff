//! Typed environment schema.
//!
//! [`EnvConfig`] is what a composed tree must deserialize into. Manager
//! tables map term names to `Option<Term>`; a `None` entry is a term that a
//! variant disabled and that the engine skips.

mod actions;
mod commands;
mod observations;
mod scene;
mod terms;

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, Result};

pub use actions::{ActionsConfig, JointPositionAction};
pub use commands::{
    CommandsConfig, PoseCommand, PoseRanges, VelocityCommand, VelocityRanges,
};
pub use observations::{Noise, ObservationTerm, ObservationsConfig, PolicyGroup};
pub use scene::{
    ContactSensorConfig, ENV_NS, HeightScannerConfig, SceneConfig, TerrainConfig, TerrainPreset,
    TerrainType, body_pattern,
};
pub use terms::{
    CurriculumTerm, EventMode, EventTerm, Params, Range, RewardTerm, SceneEntityRef, TermParam,
    TermTable, TerminationTerm, entity_refs,
};

/// Simulation timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Physics step (s).
    pub dt: f64,
    /// Physics steps per policy step.
    pub decimation: u32,
    /// Episode length (s).
    pub episode_length_s: f64,
}

impl SimConfig {
    /// Policy step (s).
    #[must_use]
    pub fn step_dt(&self) -> f64 {
        self.dt * f64::from(self.decimation)
    }

    /// Policy steps per episode, rounded up.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_episode_length(&self) -> u64 {
        (self.episode_length_s / self.step_dt()).ceil() as u64
    }
}

/// A complete manager-based environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvConfig {
    /// Robot, terrain and sensors.
    pub scene: SceneConfig,
    /// Action terms.
    pub actions: ActionsConfig,
    /// Observation groups.
    pub observations: ObservationsConfig,
    /// Randomization events.
    pub events: TermTable<EventTerm>,
    /// Reward terms.
    pub rewards: TermTable<RewardTerm>,
    /// Termination terms.
    pub terminations: TermTable<TerminationTerm>,
    /// Command generators.
    pub commands: CommandsConfig,
    /// Curriculum terms; `None` turns the curriculum off.
    pub curriculum: Option<TermTable<CurriculumTerm>>,
    /// Timing.
    pub sim: SimConfig,
}

impl EnvConfig {
    /// Check value constraints that the schema alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.scene.validate()?;
        self.actions.validate()?;

        for (path, [lo, hi]) in self.commands.ranges() {
            check_range(&path, lo, hi)?;
        }
        let rel = self.commands.base_velocity.rel_standing_envs;
        if !(0.0..=1.0).contains(&rel) {
            return Err(EnvError::invalid_config(format!(
                "commands.base_velocity.rel_standing_envs must be in [0, 1], got {rel}"
            )));
        }

        for (name, event) in active(&self.events) {
            match (event.mode, event.interval_range_s) {
                (EventMode::Interval, None) => {
                    return Err(EnvError::invalid_config(format!(
                        "events.{name}: interval event needs interval_range_s"
                    )));
                }
                (EventMode::Interval, Some([lo, hi])) => {
                    check_range(&format!("events.{name}.interval_range_s"), lo, hi)?;
                }
                (_, Some(_)) => {
                    return Err(EnvError::invalid_config(format!(
                        "events.{name}: only interval events take interval_range_s"
                    )));
                }
                _ => {}
            }
        }

        if let Some((name, term)) = active(&self.rewards).find(|(_, t)| !t.weight.is_finite()) {
            return Err(EnvError::invalid_config(format!(
                "rewards.{name}.weight must be finite, got {}",
                term.weight
            )));
        }

        if !(self.sim.dt.is_finite() && self.sim.dt > 0.0) {
            return Err(EnvError::invalid_config(format!(
                "sim.dt must be positive, got {}",
                self.sim.dt
            )));
        }
        if self.sim.decimation == 0 {
            return Err(EnvError::invalid_config("sim.decimation must be at least 1"));
        }
        if !(self.sim.episode_length_s.is_finite() && self.sim.episode_length_s > 0.0) {
            return Err(EnvError::invalid_config(format!(
                "sim.episode_length_s must be positive, got {}",
                self.sim.episode_length_s
            )));
        }
        Ok(())
    }

    /// Names of the reward terms that are switched on.
    pub fn active_rewards(&self) -> impl Iterator<Item = &str> {
        active(&self.rewards).map(|(name, _)| name)
    }
}

/// Enabled entries of a term table.
pub fn active<T>(table: &TermTable<T>) -> impl Iterator<Item = (&str, &T)> {
    table
        .iter()
        .filter_map(|(name, term)| term.as_ref().map(|t| (name.as_str(), t)))
}

fn check_range(path: &str, lo: f64, hi: f64) -> Result<()> {
    if !(lo.is_finite() && hi.is_finite()) || lo > hi {
        return Err(EnvError::invalid_config(format!(
            "{path} must be an ordered [min, max] range, got [{lo}, {hi}]"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sim_timing() {
        let sim = SimConfig {
            dt: 0.25,
            decimation: 2,
            episode_length_s: 10.2,
        };
        assert_relative_eq!(sim.step_dt(), 0.5);
        assert_eq!(sim.max_episode_length(), 21);
    }

    #[test]
    fn test_active_skips_disabled() {
        let table: TermTable<RewardTerm> = [
            ("a".to_string(), Some(RewardTerm::new("f", 1.0))),
            ("b".to_string(), None),
        ]
        .into_iter()
        .collect();
        let names: Vec<_> = active(&table).map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a"]);
    }

    #[test]
    fn test_check_range() {
        assert!(check_range("x", 0.0, 1.0).is_ok());
        assert!(check_range("x", 0.0, 0.0).is_ok());
        assert!(check_range("x", 1.0, 0.0).is_err());
        assert!(check_range("x", f64::NAN, 0.0).is_err());
    }
}
