//! Error types for the benchmark model
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

use crate::identity::{RegionId, RendererId, ResultId, SceneId, TechniqueId, TechniqueKind};

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Benchmark model error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Scene reference image requested before the scene was linked to a renderer
    #[error("Scene '{scene}' has no owning renderer\nAdd it with `Renderer::add_scene` before resolving its reference image")]
    MissingRenderer {
        /// Scene name
        scene: String,
    },

    /// Scene resolved against a renderer that does not own it
    #[error("Scene '{scene}' belongs to {expected}, not {actual}")]
    RendererMismatch {
        /// Scene name
        scene: String,
        /// Renderer the scene is linked to
        expected: RendererId,
        /// Renderer it was resolved against
        actual: RendererId,
    },

    /// Version name requested before the version was linked to a technique
    #[error("Technique version '{tag}' has no owning technique\nAdd it with `Technique::add_version` before deriving its name")]
    MissingTechnique {
        /// Version tag
        tag: String,
    },

    /// Version resolved against a technique that does not own it
    #[error("Technique version '{tag}' belongs to {expected}, not {actual}")]
    TechniqueMismatch {
        /// Version tag
        tag: String,
        /// Technique the version is linked to
        expected: TechniqueId,
        /// Technique it was resolved against
        actual: TechniqueId,
    },

    /// Child record linked to a different parent than the one holding it
    #[error("{child} is linked to {owner}, not {parent}\nRecords must be attached through their owner's `add_*` method")]
    OwnerMismatch {
        /// Child handle
        child: String,
        /// Parent the child is linked to
        owner: String,
        /// Parent holding the child
        parent: String,
    },

    /// Filter entity combined with a sampler entity (or vice versa)
    #[error("Technique kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        /// Kind required by the owner
        expected: TechniqueKind,
        /// Kind of the rejected entity
        actual: TechniqueKind,
    },

    /// A technique with this name already exists in the catalog
    #[error("Duplicate {kind} technique '{name}'")]
    DuplicateTechnique {
        /// Technique kind
        kind: TechniqueKind,
        /// Technique name
        name: String,
    },

    /// A version with this tag already exists on the technique
    #[error("Duplicate version tag '{tag}' for technique '{technique}'")]
    DuplicateVersion {
        /// Technique name
        technique: String,
        /// Version tag
        tag: String,
    },

    /// A renderer with this name already exists in the catalog
    #[error("Duplicate renderer '{0}'")]
    DuplicateRenderer(String),

    /// A scene with this name already exists under the renderer
    #[error("Duplicate scene '{scene}' under renderer '{renderer}'")]
    DuplicateScene {
        /// Renderer name
        renderer: String,
        /// Scene name
        scene: String,
    },

    /// The version already holds a result for this (scene, spp) pair
    #[error("Version '{tag}' already has a result for {scene} at {spp} spp")]
    DuplicateResult {
        /// Version tag
        tag: String,
        /// Scene handle
        scene: SceneId,
        /// Samples per pixel
        spp: u32,
    },

    /// The result already holds a region error for this region
    #[error("{result} already has a region error for {region}")]
    DuplicateRegionError {
        /// Owning result
        result: ResultId,
        /// Region handle
        region: RegionId,
    },

    /// Region error points at a different result than the one it was added to
    #[error("Region error belongs to {expected}, not {actual}")]
    ResultMismatch {
        /// Result the region error points at
        expected: ResultId,
        /// Result it was added to
        actual: ResultId,
    },

    /// Result checked against a scene it was not produced for
    #[error("{result} was produced for {expected}, not {actual}")]
    SceneMismatch {
        /// Result handle
        result: ResultId,
        /// Scene the result points at
        expected: SceneId,
        /// Scene it was checked against
        actual: SceneId,
    },

    /// Scene handle not found in the catalog
    #[error("Unknown scene: {0}")]
    UnknownScene(SceneId),

    /// Region handle not found in the result's scene
    #[error("Unknown region {region} for {scene}")]
    UnknownRegion {
        /// Scene handle
        scene: SceneId,
        /// Region handle
        region: RegionId,
    },

    /// Region errors do not cover the scene's regions
    #[error("{result} is missing region errors for {missing} region(s) of {scene}")]
    IncompleteRegionErrors {
        /// Result handle
        result: ResultId,
        /// Scene handle
        scene: SceneId,
        /// Number of uncovered regions
        missing: usize,
    },

    /// Region bounds are empty or inverted
    #[error("Invalid region bounds: x [{xmin}, {xmax}), y [{ymin}, {ymax})\nRequire xmin < xmax and ymin < ymax")]
    InvalidBounds {
        /// Left edge
        xmin: u32,
        /// Top edge
        ymin: u32,
        /// Right edge
        xmax: u32,
        /// Bottom edge
        ymax: u32,
    },

    /// Noise-source weight outside [0, 1]
    #[error("Invalid {field} weight {value}: must be within [0, 1]")]
    InvalidWeight {
        /// Weight name
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Metric acronym already registered
    #[error("Duplicate IQA metric '{0}'")]
    DuplicateMetric(String),

    /// Metric acronym not registered
    #[error("Unknown IQA metric '{0}'")]
    UnknownMetric(String),
}
