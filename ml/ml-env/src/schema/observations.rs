//! Observation space.

use serde::{Deserialize, Serialize};

use super::terms::{Params, TermParam, TermTable};

/// Uniform additive noise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Noise {
    /// Lower bound.
    pub n_min: f64,
    /// Upper bound.
    pub n_max: f64,
}

impl Noise {
    /// Noise in `[-amplitude, amplitude]`.
    #[must_use]
    pub fn symmetric(amplitude: f64) -> Self {
        Self {
            n_min: -amplitude,
            n_max: amplitude,
        }
    }
}

/// One observation term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservationTerm {
    /// Observation function.
    pub func: String,
    /// Corruption noise, applied when the group enables it.
    pub noise: Option<Noise>,
    /// Multiplier applied after noise.
    pub scale: Option<f64>,
    /// Clip bounds applied last.
    pub clip: Option<[f64; 2]>,
    /// Function parameters.
    pub params: Params,
}

impl ObservationTerm {
    /// A clean, unscaled term.
    #[must_use]
    pub fn new(func: &str) -> Self {
        Self {
            func: func.to_string(),
            noise: None,
            scale: None,
            clip: None,
            params: Params::new(),
        }
    }

    /// Add symmetric noise.
    #[must_use]
    pub fn noisy(mut self, amplitude: f64) -> Self {
        self.noise = Some(Noise::symmetric(amplitude));
        self
    }

    /// Clip to `[lo, hi]`.
    #[must_use]
    pub fn clipped(mut self, lo: f64, hi: f64) -> Self {
        self.clip = Some([lo, hi]);
        self
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<TermParam>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// Terms concatenated into the policy input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyGroup {
    /// Apply term noise.
    pub enable_corruption: bool,
    /// Concatenate terms into one vector.
    pub concatenate_terms: bool,
    /// Terms by name; `None` drops a term.
    pub terms: TermTable<ObservationTerm>,
}

/// All observation groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservationsConfig {
    /// Policy observations.
    pub policy: PolicyGroup,
}
