//! Config Scene - a scene paired with the sample counts to run it at

use super::Scene;
use crate::identity::SceneId;
use crate::technique::TechniqueVersion;

/// Describes an intended benchmark run over one scene.
///
/// Borrows the scene; results are never owned here, they live on the
/// [`TechniqueVersion`] and are looked up by scene handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigScene<'a> {
    scene: &'a Scene,
    /// Requested samples-per-pixel values, in run order.
    pub spps: Vec<u32>,
}

impl<'a> ConfigScene<'a> {
    /// Pair `scene` with the sample counts to evaluate.
    #[must_use]
    pub const fn new(scene: &'a Scene, spps: Vec<u32>) -> Self {
        Self { scene, spps }
    }

    /// Referenced scene.
    #[must_use]
    pub const fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Handle of the referenced scene.
    #[must_use]
    pub const fn scene_id(&self) -> SceneId {
        self.scene.id()
    }

    /// Name of the referenced scene.
    #[must_use]
    pub fn get_name(&self) -> &'a str {
        self.scene.get_name()
    }

    /// Requested sample counts `version` has no result for yet.
    #[must_use]
    pub fn pending_spps(&self, version: &TechniqueVersion) -> Vec<u32> {
        self.spps
            .iter()
            .copied()
            .filter(|&spp| !version.has_result(self.scene_id(), spp))
            .collect()
    }
}
