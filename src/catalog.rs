//! Catalog - root owner of the benchmark model
//!
//! The catalog owns the top-level collections (filters, samplers, renderers
//! and the metric registry) and resolves the non-owning handles that link
//! them: scene handles on results, technique handles on versions.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::identity::{IdAllocator, SceneId, TechniqueId, TechniqueKind};
use crate::metric::{IqaMetric, MetricRegistry};
use crate::scene::{Renderer, Scene};
use crate::technique::{Technique, TechniqueVersion};
use crate::{Error, Result};

/// In-memory benchmark catalog.
///
/// ## Design
///
/// Ownership is a tree rooted here. Entities are built with the catalog's
/// [`IdAllocator`] and then handed over with `add_*`, which rejects duplicate
/// names within a kind. Lookups are linear scans over small lists.
///
/// ## Example
///
/// ```rust
/// use std::sync::Arc;
/// use renderbench_model::catalog::Catalog;
/// use renderbench_model::scene::Renderer;
/// use renderbench_model::technique::Technique;
///
/// let mut catalog = Catalog::builder().builtin_metrics().build()?;
/// let ids = Arc::clone(catalog.allocator());
///
/// let mut pbrt = Renderer::new(&ids, "pbrt");
/// let scene = pbrt.new_scene(&ids, "bathroom")?.id();
/// catalog.add_renderer(pbrt)?;
///
/// let mut nlm = Technique::filter(&ids, "NLM");
/// nlm.new_version(&ids, "v1")?.new_result(&ids, scene, 4)?;
/// catalog.add_technique(nlm)?;
///
/// let nlm = catalog.get_filter("NLM").expect("just added");
/// assert!(nlm.get_version("v1").is_some_and(|v| v.has_result(scene, 4)));
/// # Ok::<(), renderbench_model::Error>(())
/// ```
#[derive(Debug)]
pub struct Catalog {
    allocator: Arc<IdAllocator>,
    filters: Vec<Technique>,
    samplers: Vec<Technique>,
    renderers: Vec<Renderer>,
    metrics: MetricRegistry,
}

impl Catalog {
    /// Create an empty catalog with its own allocator and no metrics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            allocator: Arc::new(IdAllocator::new()),
            filters: Vec::new(),
            samplers: Vec::new(),
            renderers: Vec::new(),
            metrics: MetricRegistry::new(),
        }
    }

    /// Create a builder for a configured catalog.
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Allocator entities of this catalog should be built with.
    #[must_use]
    pub const fn allocator(&self) -> &Arc<IdAllocator> {
        &self.allocator
    }

    /// Metric registry.
    #[must_use]
    pub const fn metrics(&self) -> &MetricRegistry {
        &self.metrics
    }

    /// Metric registry, for registration.
    pub fn metrics_mut(&mut self) -> &mut MetricRegistry {
        &mut self.metrics
    }

    fn techniques_of(&self, kind: TechniqueKind) -> &Vec<Technique> {
        match kind {
            TechniqueKind::Filter => &self.filters,
            TechniqueKind::Sampler => &self.samplers,
        }
    }

    fn techniques_of_mut(&mut self, kind: TechniqueKind) -> &mut Vec<Technique> {
        match kind {
            TechniqueKind::Filter => &mut self.filters,
            TechniqueKind::Sampler => &mut self.samplers,
        }
    }

    /// Add a filter or sampler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTechnique`] if the name is taken within its kind.
    pub fn add_technique(&mut self, technique: Technique) -> Result<&mut Technique> {
        let kind = technique.kind();
        if self
            .techniques_of(kind)
            .iter()
            .any(|t| t.name == technique.name)
        {
            return Err(Error::DuplicateTechnique {
                kind,
                name: technique.name,
            });
        }
        debug!(%kind, name = %technique.name, id = %technique.id(), "technique added");
        let list = self.techniques_of_mut(kind);
        let idx = list.len();
        list.push(technique);
        Ok(&mut list[idx])
    }

    /// Filters in insertion order.
    #[must_use]
    pub fn filters(&self) -> &[Technique] {
        &self.filters
    }

    /// Samplers in insertion order.
    #[must_use]
    pub fn samplers(&self) -> &[Technique] {
        &self.samplers
    }

    /// Filter by name.
    #[must_use]
    pub fn get_filter(&self, name: &str) -> Option<&Technique> {
        self.filters.iter().find(|t| t.name == name)
    }

    /// Sampler by name.
    #[must_use]
    pub fn get_sampler(&self, name: &str) -> Option<&Technique> {
        self.samplers.iter().find(|t| t.name == name)
    }

    /// Technique by handle.
    #[must_use]
    pub fn technique(&self, id: TechniqueId) -> Option<&Technique> {
        self.techniques_of(id.kind()).iter().find(|t| t.id() == id)
    }

    /// Technique by handle, for mutation.
    pub fn technique_mut(&mut self, id: TechniqueId) -> Option<&mut Technique> {
        self.techniques_of_mut(id.kind())
            .iter_mut()
            .find(|t| t.id() == id)
    }

    /// Display name of `version`, resolving its technique through the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTechnique`] if the version is unlinked or its
    /// technique is not in the catalog.
    pub fn version_name(&self, version: &TechniqueVersion) -> Result<String> {
        let technique = version
            .technique()
            .and_then(|id| self.technique(id))
            .ok_or_else(|| Error::MissingTechnique {
                tag: version.tag.clone(),
            })?;
        version.get_name(technique)
    }

    /// Add a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRenderer`] if the name is taken.
    pub fn add_renderer(&mut self, renderer: Renderer) -> Result<&mut Renderer> {
        if self.get_renderer(&renderer.name).is_some() {
            return Err(Error::DuplicateRenderer(renderer.name));
        }
        debug!(name = %renderer.name, id = %renderer.id(), "renderer added");
        let idx = self.renderers.len();
        self.renderers.push(renderer);
        Ok(&mut self.renderers[idx])
    }

    /// Renderers in insertion order.
    #[must_use]
    pub fn renderers(&self) -> &[Renderer] {
        &self.renderers
    }

    /// Renderer by name.
    #[must_use]
    pub fn get_renderer(&self, name: &str) -> Option<&Renderer> {
        self.renderers.iter().find(|r| r.name == name)
    }

    /// Renderer by name, for mutation.
    pub fn get_renderer_mut(&mut self, name: &str) -> Option<&mut Renderer> {
        self.renderers.iter_mut().find(|r| r.name == name)
    }

    /// Every scene of every renderer, renderer order first.
    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.renderers.iter().flat_map(Renderer::scenes)
    }

    /// Scene by handle.
    #[must_use]
    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.renderers.iter().find_map(|r| r.get_scene_by_id(id))
    }

    /// Reference image of a scene, resolved through its owning renderer.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownScene`] if no renderer owns the scene
    /// - [`Scene::get_reference`] failures
    pub fn scene_reference(&self, id: SceneId) -> Result<PathBuf> {
        self.renderers
            .iter()
            .find_map(|r| r.scene_reference(id).transpose())
            .unwrap_or(Err(Error::UnknownScene(id)))
    }

    /// Verify the region-error contract of every result in the catalog:
    /// each region of the result's scene is scored exactly once.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, or [`Error::UnknownScene`] for a
    /// result whose scene is not in the catalog.
    pub fn check_region_coverage(&self) -> Result<()> {
        let results = self
            .filters
            .iter()
            .chain(&self.samplers)
            .flat_map(Technique::versions)
            .flat_map(TechniqueVersion::results);
        for result in results {
            let scene = self.scene(result.scene()).ok_or_else(|| {
                warn!(result = %result.id(), scene = %result.scene(), "result for unknown scene");
                Error::UnknownScene(result.scene())
            })?;
            result.check_region_coverage(scene)?;
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Catalog`.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    allocator: Option<Arc<IdAllocator>>,
    metrics: Vec<IqaMetric>,
}

impl CatalogBuilder {
    /// Create a new builder: private allocator, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing allocator (e.g. one shared with another catalog).
    #[must_use]
    pub fn allocator(mut self, allocator: Arc<IdAllocator>) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Use the process-wide allocator.
    #[must_use]
    pub fn global_allocator(self) -> Self {
        self.allocator(IdAllocator::global())
    }

    /// Register the built-in metrics (MSE, PSNR, SSIM, rMSE).
    #[must_use]
    pub fn builtin_metrics(mut self) -> Self {
        self.metrics
            .extend(MetricRegistry::with_builtins().iter().cloned());
        self
    }

    /// Register an additional metric.
    #[must_use]
    pub fn metric(mut self, metric: IqaMetric) -> Self {
        self.metrics.push(metric);
        self
    }

    /// Build the `Catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateMetric`] if two configured metrics share an
    /// acronym.
    pub fn build(self) -> Result<Catalog> {
        let metrics = MetricRegistry::try_from(self.metrics)?;
        Ok(Catalog {
            allocator: self
                .allocator
                .unwrap_or_else(|| Arc::new(IdAllocator::new())),
            filters: Vec::new(),
            samplers: Vec::new(),
            renderers: Vec::new(),
            metrics,
        })
    }
}
