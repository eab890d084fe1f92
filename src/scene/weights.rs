//! Noise-source weights for scenes and regions

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Noise sources a scene or region is weighted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoiseSource {
    /// Depth of field.
    DepthOfField,
    /// Motion blur.
    MotionBlur,
    /// Soft shadows.
    SoftShadow,
    /// Glossy reflections.
    Glossy,
    /// Global illumination.
    GlobalIllumination,
}

impl NoiseSource {
    /// All sources, in field order.
    pub const ALL: [Self; 5] = [
        Self::DepthOfField,
        Self::MotionBlur,
        Self::SoftShadow,
        Self::Glossy,
        Self::GlobalIllumination,
    ];

    /// Short field name (`dof`, `mb`, `ss`, `glossy`, `gi`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DepthOfField => "dof",
            Self::MotionBlur => "mb",
            Self::SoftShadow => "ss",
            Self::Glossy => "glossy",
            Self::GlobalIllumination => "gi",
        }
    }
}

/// Weight of each noise source, every value within `[0, 1]`.
///
/// Scene and region weights are independent: a region may be dominated by a
/// different source than its scene.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct NoiseWeights {
    dof: f64,
    mb: f64,
    ss: f64,
    glossy: f64,
    gi: f64,
}

#[derive(Deserialize)]
struct RawWeights {
    dof: f64,
    mb: f64,
    ss: f64,
    glossy: f64,
    gi: f64,
}

impl TryFrom<RawWeights> for NoiseWeights {
    type Error = Error;

    fn try_from(raw: RawWeights) -> Result<Self> {
        Self::new(raw.dof, raw.mb, raw.ss, raw.glossy, raw.gi)
    }
}

fn check(source: NoiseSource, value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidWeight {
            field: source.as_str(),
            value,
        })
    }
}

impl NoiseWeights {
    /// Create weights, rejecting any value outside `[0, 1]` (including NaN).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWeight`] naming the first offending source.
    pub fn new(dof: f64, mb: f64, ss: f64, glossy: f64, gi: f64) -> Result<Self> {
        Ok(Self {
            dof: check(NoiseSource::DepthOfField, dof)?,
            mb: check(NoiseSource::MotionBlur, mb)?,
            ss: check(NoiseSource::SoftShadow, ss)?,
            glossy: check(NoiseSource::Glossy, glossy)?,
            gi: check(NoiseSource::GlobalIllumination, gi)?,
        })
    }

    /// Weight of a single source.
    #[must_use]
    pub const fn weight(&self, source: NoiseSource) -> f64 {
        match source {
            NoiseSource::DepthOfField => self.dof,
            NoiseSource::MotionBlur => self.mb,
            NoiseSource::SoftShadow => self.ss,
            NoiseSource::Glossy => self.glossy,
            NoiseSource::GlobalIllumination => self.gi,
        }
    }

    /// Replace the weight of a single source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWeight`] if `value` is outside `[0, 1]`.
    pub fn set(&mut self, source: NoiseSource, value: f64) -> Result<()> {
        let value = check(source, value)?;
        match source {
            NoiseSource::DepthOfField => self.dof = value,
            NoiseSource::MotionBlur => self.mb = value,
            NoiseSource::SoftShadow => self.ss = value,
            NoiseSource::Glossy => self.glossy = value,
            NoiseSource::GlobalIllumination => self.gi = value,
        }
        Ok(())
    }

    /// Source with the largest weight; `None` when every weight is zero.
    ///
    /// Ties resolve to the earliest source in [`NoiseSource::ALL`].
    #[must_use]
    pub fn dominant(&self) -> Option<NoiseSource> {
        let mut best: Option<(NoiseSource, f64)> = None;
        for source in NoiseSource::ALL {
            let w = self.weight(source);
            if w > best.map_or(0.0, |(_, b)| b) {
                best = Some((source, w));
            }
        }
        best.map(|(source, _)| source)
    }
}
