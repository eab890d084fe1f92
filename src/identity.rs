//! Identity allocation and typed entity handles
//!
//! Every entity carries two identifiers:
//!
//! - a **sequence id**, unique within its [`EntityKind`] and handed out in
//!   creation order starting at 1;
//! - a **session identifier** (UUID v4), unique across all kinds and stable
//!   when sequence ids are renumbered or datasets are merged.
//!
//! Sequence ids come from an [`IdAllocator`], a single service holding one
//! counter per kind. Parents refer back to children (and results to scenes)
//! through the typed handles defined here; equality of handles is entity
//! identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::trace;
use uuid::Uuid;

/// Concrete entity kinds, each with its own id sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// Image filter technique.
    Filter,
    /// Sampler technique.
    Sampler,
    /// Release of a filter.
    FilterVersion,
    /// Release of a sampler.
    SamplerVersion,
    /// Renderer owning scenes.
    Renderer,
    /// Benchmark scene.
    Scene,
    /// Sub-region of a scene image.
    ImageRegion,
    /// Filter evaluation result.
    Result,
    /// Sampler evaluation result.
    SamplerResult,
    /// Per-region metric scores.
    RegionError,
}

impl EntityKind {
    /// Number of entity kinds.
    pub const COUNT: usize = 10;

    /// All kinds, in counter order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Filter,
        Self::Sampler,
        Self::FilterVersion,
        Self::SamplerVersion,
        Self::Renderer,
        Self::Scene,
        Self::ImageRegion,
        Self::Result,
        Self::SamplerResult,
        Self::RegionError,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    /// Lower-case name used in logs and handle display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Sampler => "sampler",
            Self::FilterVersion => "filter-version",
            Self::SamplerVersion => "sampler-version",
            Self::Renderer => "renderer",
            Self::Scene => "scene",
            Self::ImageRegion => "region",
            Self::Result => "result",
            Self::SamplerResult => "sampler-result",
            Self::RegionError => "region-error",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Technique family discriminator shared by techniques, versions and results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TechniqueKind {
    /// Image-space filter (denoiser).
    Filter,
    /// Sample-placement technique.
    Sampler,
}

impl TechniqueKind {
    /// Entity kind of the technique itself.
    #[must_use]
    pub const fn technique_kind(self) -> EntityKind {
        match self {
            Self::Filter => EntityKind::Filter,
            Self::Sampler => EntityKind::Sampler,
        }
    }

    /// Entity kind of its versions.
    #[must_use]
    pub const fn version_kind(self) -> EntityKind {
        match self {
            Self::Filter => EntityKind::FilterVersion,
            Self::Sampler => EntityKind::SamplerVersion,
        }
    }

    /// Entity kind of its results.
    #[must_use]
    pub const fn result_kind(self) -> EntityKind {
        match self {
            Self::Filter => EntityKind::Result,
            Self::Sampler => EntityKind::SamplerResult,
        }
    }
}

impl fmt::Display for TechniqueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.technique_kind().as_str())
    }
}

/// Sequence id plus session identifier, assigned once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    seq: u64,
    uuid: Uuid,
}

impl Identity {
    /// Sequence id within the entity's kind.
    #[must_use]
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    /// Session identifier, unique across all kinds.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }
}

/// Per-kind sequence id allocator.
///
/// Counters start at 1 and only move forward. They are atomics, so one
/// allocator may be shared between threads without extra locking.
///
/// # Example
///
/// ```rust
/// use renderbench_model::identity::{EntityKind, IdAllocator};
///
/// let ids = IdAllocator::new();
/// assert_eq!(ids.allocate(EntityKind::Filter), 1);
/// assert_eq!(ids.allocate(EntityKind::Sampler), 1);
/// assert_eq!(ids.allocate(EntityKind::Filter), 2);
/// ```
#[derive(Debug)]
pub struct IdAllocator {
    next: [AtomicU64; EntityKind::COUNT],
}

impl IdAllocator {
    /// Create an allocator with every counter at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: std::array::from_fn(|_| AtomicU64::new(1)),
        }
    }

    /// Process-wide allocator.
    #[must_use]
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<IdAllocator>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Return the next unused id for `kind` and advance its counter.
    pub fn allocate(&self, kind: EntityKind) -> u64 {
        let seq = self.next[kind.index()].fetch_add(1, Ordering::Relaxed);
        trace!(%kind, seq, "allocated sequence id");
        seq
    }

    /// Next id `allocate` would return for `kind`.
    #[must_use]
    pub fn peek(&self, kind: EntityKind) -> u64 {
        self.next[kind.index()].load(Ordering::Relaxed)
    }

    /// Allocate a sequence id and pair it with a fresh UUID.
    pub fn identity(&self, kind: EntityKind) -> Identity {
        Identity {
            seq: self.allocate(kind),
            uuid: Uuid::new_v4(),
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! family_handle {
    ($(#[$attr:meta])* $name:ident, $entity_kind:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name {
            kind: TechniqueKind,
            identity: Identity,
        }

        impl $name {
            pub(crate) const fn new(kind: TechniqueKind, identity: Identity) -> Self {
                Self { kind, identity }
            }

            /// Technique family.
            #[must_use]
            pub const fn kind(&self) -> TechniqueKind {
                self.kind
            }

            /// Sequence id within the family.
            #[must_use]
            pub const fn seq(&self) -> u64 {
                self.identity.seq()
            }

            /// Session identifier of the referenced entity.
            #[must_use]
            pub const fn uuid(&self) -> Uuid {
                self.identity.uuid()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", self.kind.$entity_kind(), self.seq())
            }
        }
    };
}

macro_rules! entity_handle {
    ($(#[$attr:meta])* $name:ident, $kind:expr) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Identity);

        impl $name {
            pub(crate) const fn new(identity: Identity) -> Self {
                Self(identity)
            }

            /// Sequence id within the entity kind.
            #[must_use]
            pub const fn seq(&self) -> u64 {
                self.0.seq()
            }

            /// Session identifier of the referenced entity.
            #[must_use]
            pub const fn uuid(&self) -> Uuid {
                self.0.uuid()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $kind, self.seq())
            }
        }
    };
}

// Handles carry the full identity: two entities from different allocators
// may share a sequence id but never a UUID.

family_handle!(
    /// Handle to a filter or sampler.
    TechniqueId,
    technique_kind
);

family_handle!(
    /// Handle to a filter version or sampler version.
    VersionId,
    version_kind
);

family_handle!(
    /// Handle to a filter result or sampler result.
    ResultId,
    result_kind
);

entity_handle!(
    /// Handle to a renderer.
    RendererId,
    EntityKind::Renderer
);

entity_handle!(
    /// Handle to a scene.
    SceneId,
    EntityKind::Scene
);

entity_handle!(
    /// Handle to an image region.
    RegionId,
    EntityKind::ImageRegion
);

entity_handle!(
    /// Handle to a region error.
    RegionErrorId,
    EntityKind::RegionError
);
