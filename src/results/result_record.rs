//! Technique Result - one evaluation of a version on a scene at a sample count

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::RegionError;
use crate::identity::{
    IdAllocator, Identity, RegionId, ResultId, SceneId, TechniqueKind, VersionId,
};
use crate::metric::MetricRegistry;
use crate::scene::Scene;
use crate::{Error, Result};

/// Outcome of running a technique version on a scene at `spp` samples per pixel.
///
/// Filter versions own `Result` records and sampler versions own
/// `SamplerResult` records; both are this type, told apart by [`kind`](Self::kind).
///
/// ## Metrics
///
/// - `metrics` holds whole-image scores keyed by IQA metric acronym
/// - region errors hold per-region scores, at most one per region
///
/// An aborted run may carry an incomplete metric map. Deserialization
/// re-attaches region errors through [`TechniqueResult::add_region_error`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResult")]
pub struct TechniqueResult {
    identity: Identity,
    kind: TechniqueKind,
    version: Option<VersionId>,
    scene: SceneId,
    spp: u32,
    region_errors: Vec<RegionError>,
    /// Wall-clock execution time.
    pub exec_time: Duration,
    /// Whole-image metric acronym to score.
    pub metrics: BTreeMap<String, f64>,
    /// Whether the run was aborted before completing.
    pub aborted: bool,
}

#[derive(Deserialize)]
struct RawResult {
    identity: Identity,
    kind: TechniqueKind,
    version: Option<VersionId>,
    scene: SceneId,
    spp: u32,
    region_errors: Vec<RegionError>,
    exec_time: Duration,
    metrics: BTreeMap<String, f64>,
    aborted: bool,
}

impl TryFrom<RawResult> for TechniqueResult {
    type Error = Error;

    fn try_from(raw: RawResult) -> Result<Self> {
        let mut result = Self {
            identity: raw.identity,
            kind: raw.kind,
            version: raw.version,
            scene: raw.scene,
            spp: raw.spp,
            region_errors: Vec::with_capacity(raw.region_errors.len()),
            exec_time: raw.exec_time,
            metrics: raw.metrics,
            aborted: raw.aborted,
        };
        for region_error in raw.region_errors {
            result.add_region_error(region_error)?;
        }
        Ok(result)
    }
}

impl TechniqueResult {
    /// Create an empty result for `scene` at `spp`.
    pub fn new(ids: &IdAllocator, kind: TechniqueKind, scene: SceneId, spp: u32) -> Self {
        Self {
            identity: ids.identity(kind.result_kind()),
            kind,
            version: None,
            scene,
            spp,
            region_errors: Vec::new(),
            exec_time: Duration::ZERO,
            metrics: BTreeMap::new(),
            aborted: false,
        }
    }

    /// Result handle.
    #[must_use]
    pub const fn id(&self) -> ResultId {
        ResultId::new(self.kind, self.identity)
    }

    /// Session identifier.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.identity.uuid()
    }

    /// Filter or sampler result.
    #[must_use]
    pub const fn kind(&self) -> TechniqueKind {
        self.kind
    }

    /// Owning version, once added to one.
    #[must_use]
    pub const fn version(&self) -> Option<VersionId> {
        self.version
    }

    pub(crate) fn link_version(&mut self, version: VersionId) {
        self.version = Some(version);
    }

    /// Evaluated scene.
    #[must_use]
    pub const fn scene(&self) -> SceneId {
        self.scene
    }

    /// Samples per pixel.
    #[must_use]
    pub const fn spp(&self) -> u32 {
        self.spp
    }

    /// Whole-image score for a metric acronym.
    #[must_use]
    pub fn metric(&self, acronym: &str) -> Option<f64> {
        self.metrics.get(acronym).copied()
    }

    /// Record a whole-image score, returning the previous one.
    pub fn set_metric(&mut self, acronym: impl Into<String>, value: f64) -> Option<f64> {
        self.metrics.insert(acronym.into(), value)
    }

    /// Registry acronyms with no whole-image score on this result.
    #[must_use]
    pub fn missing_metrics<'r>(&self, registry: &'r MetricRegistry) -> Vec<&'r str> {
        registry
            .iter()
            .map(|m| m.acronym())
            .filter(|acronym| !self.metrics.contains_key(*acronym))
            .collect()
    }

    /// Region errors in insertion order.
    #[must_use]
    pub fn region_errors(&self) -> &[RegionError] {
        &self.region_errors
    }

    /// Mutable access to the region errors; the list itself cannot be resized.
    pub fn region_errors_mut(&mut self) -> &mut [RegionError] {
        &mut self.region_errors
    }

    /// Region error for `region`, if recorded.
    #[must_use]
    pub fn get_region_error(&self, region: RegionId) -> Option<&RegionError> {
        self.region_errors.iter().find(|e| e.region() == region)
    }

    /// Region error for `region`, for mutation.
    pub fn get_region_error_mut(&mut self, region: RegionId) -> Option<&mut RegionError> {
        self.region_errors.iter_mut().find(|e| e.region() == region)
    }

    /// Append a region error.
    ///
    /// # Errors
    ///
    /// - [`Error::ResultMismatch`] if the region error points at another result
    /// - [`Error::DuplicateRegionError`] if the region already has one
    pub fn add_region_error(&mut self, region_error: RegionError) -> Result<&mut RegionError> {
        if region_error.result() != self.id() {
            return Err(Error::ResultMismatch {
                expected: region_error.result(),
                actual: self.id(),
            });
        }
        if self.get_region_error(region_error.region()).is_some() {
            return Err(Error::DuplicateRegionError {
                result: self.id(),
                region: region_error.region(),
            });
        }
        debug!(result = %self.id(), region = %region_error.region(), "region error added");
        let idx = self.region_errors.len();
        self.region_errors.push(region_error);
        Ok(&mut self.region_errors[idx])
    }

    /// Allocate and append an empty region error for `region`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRegionError`] if the region already has one.
    pub fn new_region_error(
        &mut self,
        ids: &IdAllocator,
        region: RegionId,
    ) -> Result<&mut RegionError> {
        let region_error = RegionError::new(ids, self.id(), region);
        self.add_region_error(region_error)
    }

    /// Verify that every region of `scene` has exactly one region error here
    /// and that no region error points outside the scene.
    ///
    /// # Errors
    ///
    /// - [`Error::SceneMismatch`] if this result was produced for another scene
    /// - [`Error::UnknownRegion`] for a region error naming a foreign region
    /// - [`Error::IncompleteRegionErrors`] if any scene region is uncovered
    pub fn check_region_coverage(&self, scene: &Scene) -> Result<()> {
        if scene.id() != self.scene {
            return Err(Error::SceneMismatch {
                result: self.id(),
                expected: self.scene,
                actual: scene.id(),
            });
        }
        if let Some(stray) = self
            .region_errors
            .iter()
            .find(|e| scene.get_region(e.region()).is_none())
        {
            warn!(result = %self.id(), region = %stray.region(), "region error outside scene");
            return Err(Error::UnknownRegion {
                scene: self.scene,
                region: stray.region(),
            });
        }
        let missing = scene
            .regions()
            .iter()
            .filter(|r| self.get_region_error(r.id()).is_none())
            .count();
        if missing > 0 {
            warn!(result = %self.id(), missing, "incomplete region errors");
            return Err(Error::IncompleteRegionErrors {
                result: self.id(),
                scene: self.scene,
                missing,
            });
        }
        Ok(())
    }
}
