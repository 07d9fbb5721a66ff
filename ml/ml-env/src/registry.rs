//! Registered environment variants.

use std::collections::BTreeMap;

use sim_articulation::{AssetRoot, RobotKind, Skeleton};
use tracing::info;

use crate::base::locomotion_base;
use crate::build::{BoundEnv, bind_env};
use crate::compose::Composition;
use crate::error::{EnvError, Result};
use crate::node::ConfigNode;
use crate::schema::EnvConfig;
use crate::variants;

/// One registered variant.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantEntry {
    /// Registry id, e.g. `Go2X5A-Rough-Play-v0`.
    pub id: String,
    /// Robot the variant drives.
    pub robot: RobotKind,
    /// Steps applied to the base tree.
    pub composition: Composition,
}

impl VariantEntry {
    /// Check if this is an evaluation variant.
    #[must_use]
    pub fn is_play(&self) -> bool {
        self.id.contains("-Play-")
    }
}

/// The base tree and every variant built on it.
///
/// # Example
///
/// ```
/// use ml_env::Registry;
/// use sim_articulation::AssetRoot;
///
/// let registry = Registry::standard(AssetRoot::new("/opt/assets")).unwrap();
/// let env = registry.build("Go2X5A-Rough-Play-v0").unwrap();
/// assert_eq!(env.config.scene.num_envs, 50);
/// assert_eq!(env.ee_body.name, "link6");
/// ```
#[derive(Debug, Clone)]
pub struct Registry {
    root: AssetRoot,
    base: ConfigNode,
    entries: BTreeMap<String, VariantEntry>,
}

impl Registry {
    /// An empty registry over `base`.
    #[must_use]
    pub fn new(root: AssetRoot, base: ConfigNode) -> Self {
        Self {
            root,
            base,
            entries: BTreeMap::new(),
        }
    }

    /// The shipped variants, with robot assets under `root`.
    ///
    /// # Errors
    ///
    /// Fails if any shipped chain does not compose into a valid
    /// configuration.
    pub fn standard(root: AssetRoot) -> Result<Self> {
        let base = ConfigNode::from_typed(&locomotion_base(&root))?;
        let arx5 = variants::go2_arx5_base(&root)?;
        let x5a = variants::go2_x5a_base(&root)?;
        let play = |id: &str| variants::play_mode(&format!("{id}_play"), 50);

        let mut registry = Self::new(root, base);

        registry.register(
            RobotKind::Go2Arm,
            Composition::new("Go2Arm-Flat-v0").then(variants::go2_arm_flat()),
        )?;
        registry.register(
            RobotKind::Go2Arm,
            Composition::new("Go2Arm-Flat-Play-v0")
                .then(variants::go2_arm_flat())
                .then(variants::go2_arm_flat_play()),
        )?;

        registry.register(
            RobotKind::Go2Arx5,
            Composition::new("Go2ARX5-Base-v0").then(arx5.clone()),
        )?;
        registry.register(
            RobotKind::Go2Arx5,
            Composition::new("Go2ARX5-Base-Play-v0")
                .then(arx5.clone())
                .then(play("go2_arx5_base")),
        )?;
        registry.register(
            RobotKind::Go2Arx5,
            Composition::new("Go2ARX5-Flat-v0")
                .then(arx5.clone())
                .then(variants::go2_arx5_flat()),
        )?;
        registry.register(
            RobotKind::Go2Arx5,
            Composition::new("Go2ARX5-Flat-Play-v0")
                .then(arx5)
                .then(variants::go2_arx5_flat())
                .then(variants::go2_arx5_flat_play()),
        )?;

        for (terrain, step) in [
            ("Flat", variants::go2_x5a_flat()),
            ("Rough", variants::go2_x5a_rough()),
        ] {
            registry.register(
                RobotKind::Go2X5a,
                Composition::new(format!("Go2X5A-{terrain}-v0"))
                    .then(x5a.clone())
                    .then(step.clone()),
            )?;
            registry.register(
                RobotKind::Go2X5a,
                Composition::new(format!("Go2X5A-{terrain}-Play-v0"))
                    .then(x5a.clone())
                    .then(step.clone())
                    .then(play(step.name())),
            )?;
        }

        Ok(registry)
    }

    /// Add or replace a variant.
    ///
    /// The chain is composed and validated right away, so a misspelled
    /// path or an invalid value is reported here rather than on first use.
    /// A rejected chain is not registered.
    pub fn register(&mut self, robot: RobotKind, composition: Composition) -> Result<()> {
        composition.compose_config(&self.base)?;
        let id = composition.id().to_string();
        self.entries.insert(
            id.clone(),
            VariantEntry {
                id,
                robot,
                composition,
            },
        );
        Ok(())
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All entries, sorted by id.
    pub fn entries(&self) -> impl Iterator<Item = &VariantEntry> {
        self.entries.values()
    }

    /// The base tree.
    #[must_use]
    pub fn base(&self) -> &ConfigNode {
        &self.base
    }

    /// Asset root the robots are loaded from.
    #[must_use]
    pub fn asset_root(&self) -> &AssetRoot {
        &self.root
    }

    /// Look up a variant.
    pub fn get(&self, id: &str) -> Result<&VariantEntry> {
        self.entries.get(id).ok_or_else(|| EnvError::UnknownVariant {
            id: id.to_string(),
            available: self.ids().collect::<Vec<_>>().join(", "),
        })
    }

    /// The composed tree of a variant.
    pub fn compose(&self, id: &str) -> Result<ConfigNode> {
        self.get(id)?.composition.compose(&self.base)
    }

    /// The composed, validated configuration of a variant.
    pub fn compose_config(&self, id: &str) -> Result<EnvConfig> {
        self.get(id)?.composition.compose_config(&self.base)
    }

    /// Compose a variant and bind it to its robot's skeleton.
    pub fn build(&self, id: &str) -> Result<BoundEnv> {
        let skeleton = self.get(id)?.robot.skeleton();
        self.build_with(id, &skeleton)
    }

    /// Compose a variant and bind it to `skeleton`, e.g. one read from the
    /// robot's URDF.
    pub fn build_with(&self, id: &str, skeleton: &Skeleton) -> Result<BoundEnv> {
        let config = self.compose_config(id)?;
        let env = bind_env(&config, skeleton)?;
        info!(
            "built '{id}' on '{}': {} actions, {} bound term(s)",
            skeleton.name,
            env.actions.len(),
            env.terms.len()
        );
        Ok(env)
    }

    /// The composed tree of a variant as canonical JSON.
    pub fn export_json(&self, id: &str) -> Result<String> {
        self.compose(id)?.to_canonical_json()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::overrides::VariantStep;

    fn registry() -> Registry {
        Registry::standard(AssetRoot::default()).unwrap()
    }

    #[test]
    fn test_standard_ids() {
        let ids: Vec<_> = registry().ids().map(str::to_string).collect();
        assert_eq!(
            ids,
            vec![
                "Go2ARX5-Base-Play-v0",
                "Go2ARX5-Base-v0",
                "Go2ARX5-Flat-Play-v0",
                "Go2ARX5-Flat-v0",
                "Go2Arm-Flat-Play-v0",
                "Go2Arm-Flat-v0",
                "Go2X5A-Flat-Play-v0",
                "Go2X5A-Flat-v0",
                "Go2X5A-Rough-Play-v0",
                "Go2X5A-Rough-v0",
            ]
        );
    }

    #[test]
    fn test_unknown_variant() {
        let err = registry().compose("Go2X5A-Stairs-v0").unwrap_err();
        assert!(matches!(err, EnvError::UnknownVariant { .. }));
        assert!(err.to_string().contains("Go2X5A-Rough-v0"));
    }

    #[test]
    fn test_register_rejects_a_broken_chain() {
        let mut registry = registry();
        let typo = Composition::new("Go2X5A-Typo-v0")
            .then(VariantStep::new("typo").set("rewards.arm_self_colision.weight", -1.0));
        let err = registry.register(RobotKind::Go2X5a, typo).unwrap_err();
        assert!(matches!(err, EnvError::InvalidPath { .. }));
        assert!(err.to_string().contains("arm_self_colision"));
        assert!(registry.get("Go2X5A-Typo-v0").is_err());
        assert_eq!(registry.ids().count(), 10);
    }

    #[test]
    fn test_register_rejects_an_invalid_value() {
        let mut registry = registry();
        let empty = Composition::new("Go2X5A-Empty-v0")
            .then(VariantStep::new("empty").set("scene.num_envs", 0_i64));
        let err = registry.register(RobotKind::Go2X5a, empty).unwrap_err();
        assert!(!err.is_override_error());
        assert!(registry.get("Go2X5A-Empty-v0").is_err());
    }

    #[test]
    fn test_play_chains_end_with_play_step() {
        let registry = registry();
        for entry in registry.entries().filter(|e| e.is_play()) {
            let last = entry.composition.step_names().last().unwrap();
            assert!(last.ends_with("_play"), "{}: last step '{last}'", entry.id);
        }
    }

    #[test]
    fn test_export_is_json() {
        let json = registry().export_json("Go2Arm-Flat-v0").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scene"]["terrain"]["terrain_type"], "plane");
    }
}
