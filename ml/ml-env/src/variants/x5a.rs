//! Go2 with the X5A arm.

use sim_articulation::{AssetRoot, RobotKind};

use crate::error::Result;
use crate::overrides::VariantStep;

/// Swap in the X5A robot. The gripper links are left out of
/// self-collision.
pub fn go2_x5a_base(root: &AssetRoot) -> Result<VariantStep> {
    super::arx_base(
        "go2_x5a_base",
        RobotKind::Go2X5a,
        root,
        &["link[1-6]", "x5a_base_link"],
    )
}

/// Generated flat tiles. Terrain levels are meaningless without obstacles,
/// so their curriculum is dropped.
#[must_use]
pub fn go2_x5a_flat() -> VariantStep {
    VariantStep::new("go2_x5a_flat")
        .set("scene.terrain.terrain_type", "generator")
        .set("scene.terrain.terrain_generator", "flat")
        .disable("curriculum.terrain_levels")
}

/// Generated rough tiles.
#[must_use]
pub fn go2_x5a_rough() -> VariantStep {
    VariantStep::new("go2_x5a_rough")
        .set("scene.terrain.terrain_type", "generator")
        .set("scene.terrain.terrain_generator", "rough")
}
