//! Image Region - rectangular sub-area of a scene with its own weights

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::NoiseWeights;
use crate::identity::{EntityKind, IdAllocator, Identity, RegionId};
use crate::{Error, Result};

/// Pixel bounds of a region, half-open: `[xmin, xmax) x [ymin, ymax)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct RegionBounds {
    xmin: u32,
    ymin: u32,
    xmax: u32,
    ymax: u32,
}

#[derive(Deserialize)]
struct RawBounds {
    xmin: u32,
    ymin: u32,
    xmax: u32,
    ymax: u32,
}

impl TryFrom<RawBounds> for RegionBounds {
    type Error = Error;

    fn try_from(raw: RawBounds) -> Result<Self> {
        Self::new(raw.xmin, raw.ymin, raw.xmax, raw.ymax)
    }
}

impl RegionBounds {
    /// Create bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBounds`] unless `xmin < xmax` and `ymin < ymax`.
    pub fn new(xmin: u32, ymin: u32, xmax: u32, ymax: u32) -> Result<Self> {
        if xmin < xmax && ymin < ymax {
            Ok(Self {
                xmin,
                ymin,
                xmax,
                ymax,
            })
        } else {
            Err(Error::InvalidBounds {
                xmin,
                ymin,
                xmax,
                ymax,
            })
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn xmin(&self) -> u32 {
        self.xmin
    }

    /// Top edge.
    #[must_use]
    pub const fn ymin(&self) -> u32 {
        self.ymin
    }

    /// Right edge (exclusive).
    #[must_use]
    pub const fn xmax(&self) -> u32 {
        self.xmax
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub const fn ymax(&self) -> u32 {
        self.ymax
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.xmax - self.xmin
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.ymax - self.ymin
    }

    /// Pixel count.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// Whether pixel `(x, y)` lies inside.
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.xmin && x < self.xmax && y >= self.ymin && y < self.ymax
    }
}

/// Sub-region of a scene image, owned by its [`Scene`](super::Scene).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRegion {
    identity: Identity,
    bounds: RegionBounds,
    /// Noise-source weights for this region only.
    pub weights: NoiseWeights,
}

impl ImageRegion {
    /// Create a region with zero weights.
    pub fn new(ids: &IdAllocator, bounds: RegionBounds) -> Self {
        Self {
            identity: ids.identity(EntityKind::ImageRegion),
            bounds,
            weights: NoiseWeights::default(),
        }
    }

    /// Region handle.
    #[must_use]
    pub const fn id(&self) -> RegionId {
        RegionId::new(self.identity)
    }

    /// Session identifier.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.identity.uuid()
    }

    /// Pixel bounds.
    #[must_use]
    pub const fn bounds(&self) -> RegionBounds {
        self.bounds
    }
}
