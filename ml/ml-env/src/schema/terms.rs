//! Manager terms: events, rewards, terminations, curriculum.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A `[min, max]` sampling range.
pub type Range = [f64; 2];

/// Named term parameters.
pub type Params = BTreeMap<String, TermParam>;

/// Terms by name. `None` marks a disabled term.
pub type TermTable<T> = BTreeMap<String, Option<T>>;

/// Reference to a scene entity and, optionally, some of its joints or
/// bodies.
///
/// Patterns are resolved when the environment is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneEntityRef {
    /// Scene entity: `robot`, `contact_forces` or `height_scanner`.
    pub name: String,
    /// Joint patterns.
    pub joint_names: Option<Vec<String>>,
    /// Body patterns.
    pub body_names: Option<Vec<String>>,
}

impl SceneEntityRef {
    /// Reference a scene entity as a whole.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joint_names: None,
            body_names: None,
        }
    }

    /// Reference the robot.
    #[must_use]
    pub fn robot() -> Self {
        Self::new("robot")
    }

    /// Reference the contact sensor.
    #[must_use]
    pub fn contact_forces() -> Self {
        Self::new("contact_forces")
    }

    /// Restrict to joints matching `patterns`.
    #[must_use]
    pub fn joints<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.joint_names = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict to bodies matching `patterns`.
    #[must_use]
    pub fn bodies<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.body_names = Some(patterns.into_iter().map(Into::into).collect());
        self
    }
}

/// A term parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermParam {
    /// Boolean switch.
    Flag(bool),
    /// Number.
    Scalar(f64),
    /// Name or mode string.
    Text(String),
    /// `[min, max]` range.
    Range(Range),
    /// Scene entity reference.
    Entity(SceneEntityRef),
    /// Ranges by axis, e.g. `{"x": [-0.5, 0.5], "yaw": [-3.14, 3.14]}`.
    Ranges(BTreeMap<String, Range>),
}

impl TermParam {
    /// Ranges by axis.
    #[must_use]
    pub fn ranges<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Range)>,
        K: Into<String>,
    {
        Self::Ranges(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<bool> for TermParam {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<f64> for TermParam {
    fn from(f: f64) -> Self {
        Self::Scalar(f)
    }
}

impl From<&str> for TermParam {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Range> for TermParam {
    fn from(r: Range) -> Self {
        Self::Range(r)
    }
}

impl From<SceneEntityRef> for TermParam {
    fn from(e: SceneEntityRef) -> Self {
        Self::Entity(e)
    }
}

/// When an event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventMode {
    /// Once, when the scene is created.
    Startup,
    /// On every episode reset.
    Reset,
    /// Periodically, every `interval_range_s` seconds.
    Interval,
}

/// Domain-randomization event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventTerm {
    /// Event function.
    pub func: String,
    /// Trigger.
    pub mode: EventMode,
    /// Interval between firings (interval mode only).
    pub interval_range_s: Option<Range>,
    /// Function parameters.
    pub params: Params,
}

impl EventTerm {
    fn new(func: &str, mode: EventMode, interval_range_s: Option<Range>) -> Self {
        Self {
            func: func.to_string(),
            mode,
            interval_range_s,
            params: Params::new(),
        }
    }

    /// Fire once at startup.
    #[must_use]
    pub fn startup(func: &str) -> Self {
        Self::new(func, EventMode::Startup, None)
    }

    /// Fire on reset.
    #[must_use]
    pub fn reset(func: &str) -> Self {
        Self::new(func, EventMode::Reset, None)
    }

    /// Fire periodically.
    #[must_use]
    pub fn interval(func: &str, interval_range_s: Range) -> Self {
        Self::new(func, EventMode::Interval, Some(interval_range_s))
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<TermParam>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// Weighted reward term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewardTerm {
    /// Reward function.
    pub func: String,
    /// Weight applied to the function's output.
    pub weight: f64,
    /// Function parameters.
    pub params: Params,
}

impl RewardTerm {
    /// Create a reward term.
    #[must_use]
    pub fn new(func: &str, weight: f64) -> Self {
        Self {
            func: func.to_string(),
            weight,
            params: Params::new(),
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<TermParam>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// Episode termination condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TerminationTerm {
    /// Condition function.
    pub func: String,
    /// A time-out rather than a failure.
    pub time_out: bool,
    /// Function parameters.
    pub params: Params,
}

impl TerminationTerm {
    /// Create a termination term.
    #[must_use]
    pub fn new(func: &str, time_out: bool) -> Self {
        Self {
            func: func.to_string(),
            time_out,
            params: Params::new(),
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<TermParam>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// Curriculum term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CurriculumTerm {
    /// Curriculum function.
    pub func: String,
    /// Function parameters.
    pub params: Params,
}

impl CurriculumTerm {
    /// Create a curriculum term.
    #[must_use]
    pub fn new(func: &str) -> Self {
        Self {
            func: func.to_string(),
            params: Params::new(),
        }
    }
}

/// Entity references held by `params`, with their parameter names.
pub fn entity_refs(params: &Params) -> impl Iterator<Item = (&str, &SceneEntityRef)> {
    params.iter().filter_map(|(name, param)| match param {
        TermParam::Entity(entity) => Some((name.as_str(), entity)),
        _ => None,
    })
}
