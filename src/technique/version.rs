//! Technique Version - one executable build of a filter or sampler

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::Technique;
use crate::identity::{IdAllocator, Identity, SceneId, TechniqueId, TechniqueKind, VersionId};
use crate::results::TechniqueResult;
use crate::{Error, Result};

/// Released build of a technique, owning the results produced with it.
///
/// ## Result lookups
///
/// Results are a flat list in insertion order; reports iterate it as-is.
/// Lookups by `(scene, spp)` are linear scans, which is fine for the
/// scenes x sample-counts cardinality of one version.
///
/// Deserialization re-attaches every result through
/// [`TechniqueVersion::add_result`], so a stored version can never hold two
/// results for the same `(scene, spp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVersion")]
pub struct TechniqueVersion {
    identity: Identity,
    kind: TechniqueKind,
    technique: Option<TechniqueId>,
    results: Vec<TechniqueResult>,
    /// Release tag (e.g. `"v1"`).
    pub tag: String,
    /// Executable implementing this version.
    pub executable: PathBuf,
    /// Free-form message set by the execution driver.
    pub message: String,
    /// Free-form status set by the execution driver.
    pub status: String,
}

#[derive(Deserialize)]
struct RawVersion {
    identity: Identity,
    kind: TechniqueKind,
    technique: Option<TechniqueId>,
    results: Vec<TechniqueResult>,
    tag: String,
    executable: PathBuf,
    message: String,
    status: String,
}

impl TryFrom<RawVersion> for TechniqueVersion {
    type Error = Error;

    fn try_from(raw: RawVersion) -> Result<Self> {
        let mut version = Self {
            identity: raw.identity,
            kind: raw.kind,
            technique: raw.technique,
            results: Vec::with_capacity(raw.results.len()),
            tag: raw.tag,
            executable: raw.executable,
            message: raw.message,
            status: raw.status,
        };
        for result in raw.results {
            if let Some(owner) = result.version().filter(|&owner| owner != version.id()) {
                return Err(Error::OwnerMismatch {
                    child: result.id().to_string(),
                    owner: owner.to_string(),
                    parent: version.id().to_string(),
                });
            }
            version.add_result(result)?;
        }
        Ok(version)
    }
}

impl TechniqueVersion {
    /// Create an unlinked version.
    pub fn new(ids: &IdAllocator, kind: TechniqueKind, tag: impl Into<String>) -> Self {
        Self {
            identity: ids.identity(kind.version_kind()),
            kind,
            technique: None,
            results: Vec::new(),
            tag: tag.into(),
            executable: PathBuf::new(),
            message: String::new(),
            status: String::new(),
        }
    }

    /// Version handle.
    #[must_use]
    pub const fn id(&self) -> VersionId {
        VersionId::new(self.kind, self.identity)
    }

    /// Session identifier.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.identity.uuid()
    }

    /// Filter version or sampler version.
    #[must_use]
    pub const fn kind(&self) -> TechniqueKind {
        self.kind
    }

    /// Owning technique, once added to one.
    #[must_use]
    pub const fn technique(&self) -> Option<TechniqueId> {
        self.technique
    }

    pub(super) fn link_technique(&mut self, technique: TechniqueId) {
        self.technique = Some(technique);
    }

    /// Display name `"<technique name>-<tag>"`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingTechnique`] if the version was never added to a technique
    /// - [`Error::TechniqueMismatch`] if `technique` is not the owner
    pub fn get_name(&self, technique: &Technique) -> Result<String> {
        let owner = self.technique.ok_or_else(|| Error::MissingTechnique {
            tag: self.tag.clone(),
        })?;
        if owner != technique.id() {
            return Err(Error::TechniqueMismatch {
                tag: self.tag.clone(),
                expected: owner,
                actual: technique.id(),
            });
        }
        Ok(format!("{}-{}", technique.name, self.tag))
    }

    /// Results in insertion order.
    #[must_use]
    pub fn results(&self) -> &[TechniqueResult] {
        &self.results
    }

    /// Mutable access to the results; the list itself cannot be resized.
    pub fn results_mut(&mut self) -> &mut [TechniqueResult] {
        &mut self.results
    }

    /// Whether a result exists for `scene` at `spp`.
    #[must_use]
    pub fn has_result(&self, scene: SceneId, spp: u32) -> bool {
        self.get_result(scene, spp).is_some()
    }

    /// Result for `scene` at `spp`.
    #[must_use]
    pub fn get_result(&self, scene: SceneId, spp: u32) -> Option<&TechniqueResult> {
        self.results
            .iter()
            .find(|r| r.scene() == scene && r.spp() == spp)
    }

    /// Result for `scene` at `spp`, for mutation.
    pub fn get_result_mut(&mut self, scene: SceneId, spp: u32) -> Option<&mut TechniqueResult> {
        self.results
            .iter_mut()
            .find(|r| r.scene() == scene && r.spp() == spp)
    }

    /// All results for `scene`, in insertion order.
    #[must_use]
    pub fn get_results(&self, scene: SceneId) -> Vec<&TechniqueResult> {
        self.results.iter().filter(|r| r.scene() == scene).collect()
    }

    /// Distinct scenes with results, in first-seen order.
    #[must_use]
    pub fn scenes(&self) -> Vec<SceneId> {
        let mut scenes: Vec<SceneId> = Vec::new();
        for r in &self.results {
            if !scenes.contains(&r.scene()) {
                scenes.push(r.scene());
            }
        }
        scenes
    }

    /// Sample counts evaluated for `scene`, in insertion order.
    #[must_use]
    pub fn spps(&self, scene: SceneId) -> Vec<u32> {
        self.results
            .iter()
            .filter(|r| r.scene() == scene)
            .map(TechniqueResult::spp)
            .collect()
    }

    /// Take ownership of `result` and point its back-reference here.
    ///
    /// # Errors
    ///
    /// - [`Error::KindMismatch`] if a sampler result is added to a filter version (or vice versa)
    /// - [`Error::DuplicateResult`] if `(scene, spp)` already has a result
    pub fn add_result(&mut self, mut result: TechniqueResult) -> Result<&mut TechniqueResult> {
        if result.kind() != self.kind {
            return Err(Error::KindMismatch {
                expected: self.kind,
                actual: result.kind(),
            });
        }
        if self.has_result(result.scene(), result.spp()) {
            return Err(Error::DuplicateResult {
                tag: self.tag.clone(),
                scene: result.scene(),
                spp: result.spp(),
            });
        }
        result.link_version(self.id());
        debug!(
            version = %self.id(),
            result = %result.id(),
            scene = %result.scene(),
            spp = result.spp(),
            "result added"
        );
        let idx = self.results.len();
        self.results.push(result);
        Ok(&mut self.results[idx])
    }

    /// Allocate an empty result for `scene` at `spp` and add it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateResult`] if `(scene, spp)` already has a result.
    pub fn new_result(
        &mut self,
        ids: &IdAllocator,
        scene: SceneId,
        spp: u32,
    ) -> Result<&mut TechniqueResult> {
        if self.has_result(scene, spp) {
            return Err(Error::DuplicateResult {
                tag: self.tag.clone(),
                scene,
                spp,
            });
        }
        self.add_result(TechniqueResult::new(ids, self.kind, scene, spp))
    }
}
