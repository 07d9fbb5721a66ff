//! Composition chains.

use tracing::{debug, info};

use crate::error::Result;
use crate::node::ConfigNode;
use crate::overrides::VariantStep;
use crate::schema::EnvConfig;

/// An ordered chain of steps applied to a base tree.
///
/// Steps run left to right; a later step's value for a field wins over an
/// earlier one.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    id: String,
    steps: Vec<VariantStep>,
}

impl Composition {
    /// Create an empty chain.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn then(mut self, step: VariantStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Chain id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[VariantStep] {
        &self.steps
    }

    /// Step names in application order.
    pub fn step_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(VariantStep::name)
    }

    /// Apply every step to `base`.
    ///
    /// # Errors
    ///
    /// Fails on the first bad override; no partially composed tree is
    /// returned and `base` is never modified.
    pub fn compose(&self, base: &ConfigNode) -> Result<ConfigNode> {
        let mut tree = base.clone();
        for step in &self.steps {
            tree = step.apply(&tree)?;
        }
        debug!(
            "composed '{}' from {} step(s): {}",
            self.id,
            self.steps.len(),
            self.step_names().collect::<Vec<_>>().join(" -> ")
        );
        Ok(tree)
    }

    /// Compose, convert to the typed schema and validate.
    pub fn compose_config(&self, base: &ConfigNode) -> Result<EnvConfig> {
        let config: EnvConfig = self.compose(base)?.into_typed()?;
        config.validate()?;
        info!("composed environment '{}'", self.id);
        Ok(config)
    }
}
