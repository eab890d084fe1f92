//! Technique - a filter or sampler algorithm under test

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::TechniqueVersion;
use crate::identity::{IdAllocator, Identity, TechniqueId, TechniqueKind, VersionId};
use crate::{Error, Result};

/// Filter or sampler, owning its released versions in insertion order.
///
/// Deserialization re-attaches every version through
/// [`Technique::add_version`], so kind, tag and ownership checks still apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTechnique")]
pub struct Technique {
    identity: Identity,
    kind: TechniqueKind,
    versions: Vec<TechniqueVersion>,
    /// Short name, used as the prefix of version names.
    pub name: String,
    /// Long, human-readable name.
    pub full_name: String,
    /// Free-form comment.
    pub comment: String,
    /// Publication to cite.
    pub citation: String,
}

#[derive(Deserialize)]
struct RawTechnique {
    identity: Identity,
    kind: TechniqueKind,
    versions: Vec<TechniqueVersion>,
    name: String,
    full_name: String,
    comment: String,
    citation: String,
}

impl TryFrom<RawTechnique> for Technique {
    type Error = Error;

    fn try_from(raw: RawTechnique) -> Result<Self> {
        let mut technique = Self {
            identity: raw.identity,
            kind: raw.kind,
            versions: Vec::with_capacity(raw.versions.len()),
            name: raw.name,
            full_name: raw.full_name,
            comment: raw.comment,
            citation: raw.citation,
        };
        for version in raw.versions {
            if let Some(owner) = version.technique().filter(|&owner| owner != technique.id()) {
                return Err(Error::OwnerMismatch {
                    child: version.id().to_string(),
                    owner: owner.to_string(),
                    parent: technique.id().to_string(),
                });
            }
            technique.add_version(version)?;
        }
        Ok(technique)
    }
}

impl Technique {
    /// Create a technique with no versions.
    pub fn new(ids: &IdAllocator, kind: TechniqueKind, name: impl Into<String>) -> Self {
        TechniqueBuilder::new(kind, name).build(ids)
    }

    /// Create a filter.
    pub fn filter(ids: &IdAllocator, name: impl Into<String>) -> Self {
        Self::new(ids, TechniqueKind::Filter, name)
    }

    /// Create a sampler.
    pub fn sampler(ids: &IdAllocator, name: impl Into<String>) -> Self {
        Self::new(ids, TechniqueKind::Sampler, name)
    }

    /// Create a builder for a technique with descriptive fields.
    #[must_use]
    pub fn builder(kind: TechniqueKind, name: impl Into<String>) -> TechniqueBuilder {
        TechniqueBuilder::new(kind, name)
    }

    /// Technique handle.
    #[must_use]
    pub const fn id(&self) -> TechniqueId {
        TechniqueId::new(self.kind, self.identity)
    }

    /// Session identifier.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.identity.uuid()
    }

    /// Filter or sampler.
    #[must_use]
    pub const fn kind(&self) -> TechniqueKind {
        self.kind
    }

    /// Versions in insertion order.
    #[must_use]
    pub fn versions(&self) -> &[TechniqueVersion] {
        &self.versions
    }

    /// Mutable access to the versions; the list itself cannot be resized.
    pub fn versions_mut(&mut self) -> &mut [TechniqueVersion] {
        &mut self.versions
    }

    /// First version tagged `tag`.
    #[must_use]
    pub fn get_version(&self, tag: &str) -> Option<&TechniqueVersion> {
        self.versions.iter().find(|v| v.tag == tag)
    }

    /// First version tagged `tag`, for mutation.
    pub fn get_version_mut(&mut self, tag: &str) -> Option<&mut TechniqueVersion> {
        self.versions.iter_mut().find(|v| v.tag == tag)
    }

    /// Version by handle.
    #[must_use]
    pub fn get_version_by_id(&self, id: VersionId) -> Option<&TechniqueVersion> {
        self.versions.iter().find(|v| v.id() == id)
    }

    /// Take ownership of `version` and point its back-reference here.
    ///
    /// # Errors
    ///
    /// - [`Error::KindMismatch`] if a sampler version is added to a filter (or vice versa)
    /// - [`Error::DuplicateVersion`] if the tag is already used
    pub fn add_version(&mut self, mut version: TechniqueVersion) -> Result<&mut TechniqueVersion> {
        if version.kind() != self.kind {
            return Err(Error::KindMismatch {
                expected: self.kind,
                actual: version.kind(),
            });
        }
        if self.get_version(&version.tag).is_some() {
            return Err(Error::DuplicateVersion {
                technique: self.name.clone(),
                tag: version.tag,
            });
        }
        version.link_technique(self.id());
        debug!(technique = %self.name, tag = %version.tag, id = %version.id(), "version added");
        let idx = self.versions.len();
        self.versions.push(version);
        Ok(&mut self.versions[idx])
    }

    /// Allocate a version tagged `tag` and add it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateVersion`] if the tag is already used.
    pub fn new_version(
        &mut self,
        ids: &IdAllocator,
        tag: impl Into<String>,
    ) -> Result<&mut TechniqueVersion> {
        let tag = tag.into();
        if self.get_version(&tag).is_some() {
            return Err(Error::DuplicateVersion {
                technique: self.name.clone(),
                tag,
            });
        }
        self.add_version(TechniqueVersion::new(ids, self.kind, tag))
    }
}

/// Builder for `Technique`.
#[derive(Debug)]
pub struct TechniqueBuilder {
    kind: TechniqueKind,
    name: String,
    full_name: String,
    comment: String,
    citation: String,
}

impl TechniqueBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(kind: TechniqueKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            full_name: String::new(),
            comment: String::new(),
            citation: String::new(),
        }
    }

    /// Set the long name.
    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = full_name.into();
        self
    }

    /// Set the comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the citation.
    #[must_use]
    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = citation.into();
        self
    }

    /// Build the `Technique`, allocating its id.
    pub fn build(self, ids: &IdAllocator) -> Technique {
        Technique {
            identity: ids.identity(self.kind.technique_kind()),
            kind: self.kind,
            versions: Vec::new(),
            name: self.name,
            full_name: self.full_name,
            comment: self.comment,
            citation: self.citation,
        }
    }
}
