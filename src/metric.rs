//! IQA metric definitions and registry
//!
//! A metric entry describes how to *interpret* a score (sign convention,
//! whether an error map accompanies it), never the score itself. Scores live
//! in [`TechniqueResult`] and [`RegionError`](crate::results::RegionError)
//! maps keyed by the metric acronym.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::results::TechniqueResult;
use crate::{Error, Result};

/// Image-quality-assessment metric definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IqaMetric {
    acronym: String,
    name: String,
    reference: bool,
    lower_is_better: bool,
    has_error_map: bool,
    command: Option<PathBuf>,
}

impl IqaMetric {
    /// Create a built-in, full-reference, lower-is-better metric without error map.
    ///
    /// Use [`IqaMetric::builder`] to change any of those defaults.
    #[must_use]
    pub fn new(acronym: impl Into<String>, name: impl Into<String>) -> Self {
        IqaMetricBuilder::new(acronym, name).build()
    }

    /// Create a builder for a metric definition.
    #[must_use]
    pub fn builder(acronym: impl Into<String>, name: impl Into<String>) -> IqaMetricBuilder {
        IqaMetricBuilder::new(acronym, name)
    }

    /// Short key used in result metric maps (e.g. `"MSE"`).
    #[must_use]
    pub fn acronym(&self) -> &str {
        &self.acronym
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the metric compares against the reference image.
    #[must_use]
    pub const fn reference(&self) -> bool {
        self.reference
    }

    /// Whether smaller scores are better.
    #[must_use]
    pub const fn lower_is_better(&self) -> bool {
        self.lower_is_better
    }

    /// Whether an error-map image accompanies each score.
    #[must_use]
    pub const fn has_error_map(&self) -> bool {
        self.has_error_map
    }

    /// Executable computing the metric; `None` for built-in metrics.
    #[must_use]
    pub fn command(&self) -> Option<&Path> {
        self.command.as_deref()
    }

    /// Whether the metric is computed in-process.
    #[must_use]
    pub const fn is_builtin(&self) -> bool {
        self.command.is_none()
    }

    /// Compare two scores so that `Ordering::Less` means `a` is better.
    #[must_use]
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        if self.lower_is_better {
            a.total_cmp(&b)
        } else {
            b.total_cmp(&a)
        }
    }

    /// Whether score `a` is strictly better than `b`.
    #[must_use]
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }
}

/// Builder for `IqaMetric`.
#[derive(Debug)]
pub struct IqaMetricBuilder {
    acronym: String,
    name: String,
    reference: bool,
    lower_is_better: bool,
    has_error_map: bool,
    command: Option<PathBuf>,
}

impl IqaMetricBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(acronym: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            acronym: acronym.into(),
            name: name.into(),
            reference: true,
            lower_is_better: true,
            has_error_map: false,
            command: None,
        }
    }

    /// Set whether the metric needs the reference image.
    #[must_use]
    pub const fn reference(mut self, reference: bool) -> Self {
        self.reference = reference;
        self
    }

    /// Set the sign convention.
    #[must_use]
    pub const fn lower_is_better(mut self, lower_is_better: bool) -> Self {
        self.lower_is_better = lower_is_better;
        self
    }

    /// Set whether an error map is produced.
    #[must_use]
    pub const fn has_error_map(mut self, has_error_map: bool) -> Self {
        self.has_error_map = has_error_map;
        self
    }

    /// Set the external executable computing the metric.
    #[must_use]
    pub fn command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Build the `IqaMetric`.
    #[must_use]
    pub fn build(self) -> IqaMetric {
        IqaMetric {
            acronym: self.acronym,
            name: self.name,
            reference: self.reference,
            lower_is_better: self.lower_is_better,
            has_error_map: self.has_error_map,
            command: self.command,
        }
    }
}

/// Ordered registry of metric definitions with unique acronyms.
///
/// ## Design
///
/// Entries are kept in a vector (registration order is report column order)
/// with an `FxHashMap` acronym index for O(1) lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<IqaMetric>", into = "Vec<IqaMetric>")]
pub struct MetricRegistry {
    metrics: Vec<IqaMetric>,
    index: FxHashMap<String, usize>,
}

impl TryFrom<Vec<IqaMetric>> for MetricRegistry {
    type Error = Error;

    /// Register every metric in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateMetric`] for the first repeated acronym.
    fn try_from(metrics: Vec<IqaMetric>) -> Result<Self> {
        let mut registry = Self::new();
        for metric in metrics {
            registry.register(metric)?;
        }
        Ok(registry)
    }
}

impl From<MetricRegistry> for Vec<IqaMetric> {
    fn from(registry: MetricRegistry) -> Self {
        registry.metrics
    }
}

impl MetricRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in metrics: MSE, PSNR, SSIM and rMSE.
    #[must_use]
    pub fn with_builtins() -> Self {
        let metrics = vec![
            IqaMetric::builder("MSE", "Mean Squared Error")
                .has_error_map(true)
                .build(),
            IqaMetric::builder("PSNR", "Peak Signal-to-Noise Ratio")
                .lower_is_better(false)
                .build(),
            IqaMetric::builder("SSIM", "Structural Similarity")
                .lower_is_better(false)
                .has_error_map(true)
                .build(),
            IqaMetric::builder("rMSE", "Relative Mean Squared Error")
                .has_error_map(true)
                .build(),
        ];
        let index = metrics
            .iter()
            .enumerate()
            .map(|(i, m)| (m.acronym.clone(), i))
            .collect();
        Self { metrics, index }
    }

    /// Number of registered metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether no metric is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Register a metric.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateMetric`] if the acronym is already taken.
    pub fn register(&mut self, metric: IqaMetric) -> Result<()> {
        if self.index.contains_key(metric.acronym()) {
            warn!(acronym = %metric.acronym, "duplicate metric rejected");
            return Err(Error::DuplicateMetric(metric.acronym));
        }
        debug!(acronym = %metric.acronym, "metric registered");
        self.index.insert(metric.acronym.clone(), self.metrics.len());
        self.metrics.push(metric);
        Ok(())
    }

    /// Look up a metric by acronym.
    #[must_use]
    pub fn get(&self, acronym: &str) -> Option<&IqaMetric> {
        self.index.get(acronym).map(|&i| &self.metrics[i])
    }

    /// Whether the acronym is registered.
    #[must_use]
    pub fn contains(&self, acronym: &str) -> bool {
        self.index.contains_key(acronym)
    }

    /// Metrics in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &IqaMetric> {
        self.metrics.iter()
    }

    /// Whether score `a` beats `b` under the metric's sign convention.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMetric`] if the acronym is not registered.
    pub fn is_better(&self, acronym: &str, a: f64, b: f64) -> Result<bool> {
        self.require(acronym).map(|m| m.is_better(a, b))
    }

    /// Order results best-first by their whole-image score for `acronym`.
    ///
    /// Aborted results and results without that score are left out. Equal
    /// scores keep their input order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMetric`] if the acronym is not registered.
    pub fn rank<'a, I>(&self, acronym: &str, results: I) -> Result<Vec<&'a TechniqueResult>>
    where
        I: IntoIterator<Item = &'a TechniqueResult>,
    {
        let metric = self.require(acronym)?;
        let mut scored: Vec<(f64, &TechniqueResult)> = results
            .into_iter()
            .filter(|r| !r.aborted)
            .filter_map(|r| r.metric(acronym).map(|score| (score, r)))
            .collect();
        scored.sort_by(|(a, _), (b, _)| metric.compare(*a, *b));
        Ok(scored.into_iter().map(|(_, r)| r).collect())
    }

    fn require(&self, acronym: &str) -> Result<&IqaMetric> {
        self.get(acronym)
            .ok_or_else(|| Error::UnknownMetric(acronym.to_string()))
    }
}

impl PartialEq for MetricRegistry {
    fn eq(&self, other: &Self) -> bool {
        self.metrics == other.metrics
    }
}
