//! Scene - one test image of the benchmark corpus

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::{ImageRegion, NoiseWeights, RegionBounds, Renderer};
use crate::identity::{EntityKind, IdAllocator, Identity, RegionId, RendererId, SceneId};
use crate::{Error, Result};

/// Scene rendered by a [`Renderer`] and evaluated by every technique.
///
/// The scene is owned by its renderer's scene list and keeps a non-owning
/// [`RendererId`] back to it. Regions are owned by the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    identity: Identity,
    renderer: Option<RendererId>,
    regions: Vec<ImageRegion>,
    /// Scene name, unique within its renderer.
    pub name: String,
    /// Scene description file, as understood by the renderer.
    pub path: PathBuf,
    /// Reference (ground-truth) image, relative to the renderer's scene folder.
    pub ground_truth: PathBuf,
    /// Noise-source weights of the whole image.
    pub weights: NoiseWeights,
}

impl Scene {
    /// Create an unlinked scene.
    pub fn new(ids: &IdAllocator, name: impl Into<String>) -> Self {
        Self {
            identity: ids.identity(EntityKind::Scene),
            renderer: None,
            regions: Vec::new(),
            name: name.into(),
            path: PathBuf::new(),
            ground_truth: PathBuf::new(),
            weights: NoiseWeights::default(),
        }
    }

    /// Scene handle.
    #[must_use]
    pub const fn id(&self) -> SceneId {
        SceneId::new(self.identity)
    }

    /// Session identifier.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.identity.uuid()
    }

    /// Scene name.
    #[must_use]
    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Owning renderer, if linked.
    #[must_use]
    pub const fn renderer(&self) -> Option<RendererId> {
        self.renderer
    }

    pub(super) fn link_renderer(&mut self, renderer: RendererId) {
        self.renderer = Some(renderer);
    }

    /// Reference image path relative to the scenes folder:
    /// `<renderer name>/<ground truth>`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingRenderer`] if the scene was never added to a renderer
    /// - [`Error::RendererMismatch`] if `renderer` is not the owning renderer
    pub fn get_reference(&self, renderer: &Renderer) -> Result<PathBuf> {
        let owner = self.renderer.ok_or_else(|| Error::MissingRenderer {
            scene: self.name.clone(),
        })?;
        if owner != renderer.id() {
            return Err(Error::RendererMismatch {
                scene: self.name.clone(),
                expected: owner,
                actual: renderer.id(),
            });
        }
        Ok(Path::new(&renderer.name).join(&self.ground_truth))
    }

    /// Regions in insertion order.
    #[must_use]
    pub fn regions(&self) -> &[ImageRegion] {
        &self.regions
    }

    /// Mutable access to the regions; the list itself cannot be resized.
    pub fn regions_mut(&mut self) -> &mut [ImageRegion] {
        &mut self.regions
    }

    /// Look up a region by handle.
    #[must_use]
    pub fn get_region(&self, id: RegionId) -> Option<&ImageRegion> {
        self.regions.iter().find(|r| r.id() == id)
    }

    /// Append a region.
    pub fn add_region(&mut self, region: ImageRegion) -> &mut ImageRegion {
        debug!(scene = %self.name, region = %region.id(), "region added");
        let idx = self.regions.len();
        self.regions.push(region);
        &mut self.regions[idx]
    }

    /// Allocate and append a region covering `bounds`.
    pub fn new_region(&mut self, ids: &IdAllocator, bounds: RegionBounds) -> &mut ImageRegion {
        self.add_region(ImageRegion::new(ids, bounds))
    }
}
