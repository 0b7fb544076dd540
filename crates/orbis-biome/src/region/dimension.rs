//! Dimension definition: the noise fields and bands that start every descent.

use super::{NoiseRange, SurfaceType};
use crate::error::BandError;
use crate::seed::round_to_precision;

/// Type-noise bands selecting the surface type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceBands {
    /// Land band.
    pub land: NoiseRange,
    /// Shore band.
    pub shore: NoiseRange,
    /// Sea band.
    pub sea: NoiseRange,
}

impl SurfaceBands {
    /// The surface type whose band contains `value`, checked land, shore, then sea.
    pub fn surface_for(&self, value: f64) -> Option<SurfaceType> {
        SurfaceType::ALL
            .into_iter()
            .find(|&surface| self.band(surface).contains(value))
    }

    /// The band for `surface`.
    pub const fn band(&self, surface: SurfaceType) -> NoiseRange {
        match surface {
            SurfaceType::Land => self.land,
            SurfaceType::Shore => self.shore,
            SurfaceType::Sea => self.sea,
        }
    }

    /// Check that the bands are non-inverted and non-overlapping, and that every
    /// value type noise can round to at `precision` lands in exactly one band.
    ///
    /// Rounded samples are `k / precision` for integer `k`, so the check walks
    /// that grid over `[-1, 1]`; its cost grows linearly with `precision`.
    pub fn validate(&self, precision: f64) -> Result<(), BandError> {
        let mut bands: Vec<(SurfaceType, NoiseRange)> = SurfaceType::ALL
            .into_iter()
            .map(|surface| (surface, self.band(surface)))
            .collect();
        for &(surface, band) in &bands {
            if band.min > band.max {
                return Err(BandError::Inverted {
                    surface,
                    min: band.min,
                    max: band.max,
                });
            }
        }

        bands.sort_by(|a, b| a.1.min.total_cmp(&b.1.min));
        for pair in bands.windows(2) {
            let ((lower, lower_band), (upper, upper_band)) = (pair[0], pair[1]);
            if upper_band.min <= lower_band.max {
                return Err(BandError::Overlap { lower, upper });
            }
        }

        let lowest = (0.5 - precision).floor() as i64;
        let highest = (precision + 0.5).floor() as i64;
        for k in lowest..=highest {
            let value = k as f64 / precision;
            if self.surface_for(value).is_none() {
                return Err(BandError::Uncovered { value });
            }
        }
        Ok(())
    }
}

/// One top-level entry of a dimension: a region selected by a range of region noise.
#[derive(Clone, Debug, PartialEq)]
pub struct RootLayer {
    /// Region name.
    pub region: String,
    /// Region-noise values selecting it.
    pub range: NoiseRange,
}

impl RootLayer {
    /// Create a root layer over `[min, max]`.
    pub fn new(region: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            region: region.into(),
            range: NoiseRange::new(min, max),
        }
    }
}

/// Dimension-wide classification settings.
#[derive(Clone, Debug, PartialEq)]
pub struct DimensionDef {
    /// Dimension name (used in error messages).
    pub name: String,
    /// Seed of the surface-type noise field.
    pub type_seed: i64,
    /// Zoom of the surface-type noise field.
    pub type_zoom: f64,
    /// Seed of the top-level region noise field.
    pub region_seed: i64,
    /// Zoom of the top-level region noise field.
    pub region_zoom: f64,
    /// Rounding precision applied to every noise and context value (100 = two decimals).
    pub precision: f64,
    /// Land/shore/sea bands over the type noise.
    pub bands: SurfaceBands,
    /// Ordered top-level region layers.
    pub roots: Vec<RootLayer>,
}
