//! Region Error - metric scores for one region of one result

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::{EntityKind, IdAllocator, Identity, RegionErrorId, RegionId, ResultId};

/// Scores of the IQA metrics evaluated over a single [`ImageRegion`](crate::scene::ImageRegion).
///
/// Both the region and the result are referenced by handle; the region error
/// itself is owned by the result's region-error list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionError {
    identity: Identity,
    region: RegionId,
    result: ResultId,
    /// Metric acronym to score.
    pub metrics: BTreeMap<String, f64>,
}

impl RegionError {
    /// Create an empty region error for `region` of `result`.
    pub fn new(ids: &IdAllocator, result: ResultId, region: RegionId) -> Self {
        Self {
            identity: ids.identity(EntityKind::RegionError),
            region,
            result,
            metrics: BTreeMap::new(),
        }
    }

    /// Region error handle.
    #[must_use]
    pub const fn id(&self) -> RegionErrorId {
        RegionErrorId::new(self.identity)
    }

    /// Session identifier.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.identity.uuid()
    }

    /// Scored region.
    #[must_use]
    pub const fn region(&self) -> RegionId {
        self.region
    }

    /// Result this region error belongs to.
    #[must_use]
    pub const fn result(&self) -> ResultId {
        self.result
    }

    /// Score for a metric acronym.
    #[must_use]
    pub fn metric(&self, acronym: &str) -> Option<f64> {
        self.metrics.get(acronym).copied()
    }

    /// Record a score, returning the previous one.
    pub fn set_metric(&mut self, acronym: impl Into<String>, value: f64) -> Option<f64> {
        self.metrics.insert(acronym.into(), value)
    }
}
