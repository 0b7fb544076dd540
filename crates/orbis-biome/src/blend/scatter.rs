//! Jittered-grid scatter points.

use glam::DVec2;

use crate::error::BlendError;
use crate::seed::{derive_cell_seed, unit_pair};

/// Fraction of the grid spacing a point may stray from its cell center, per axis.
const JITTER: f64 = 0.25;

/// Generates one scatter point per grid cell, jittered around the cell center.
///
/// Points depend only on `(seed, cell)`, so any chunk can regenerate the points
/// it shares with its neighbours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScatteredPointSampler {
    spacing: f64,
}

impl ScatteredPointSampler {
    /// Create a sampler with `frequency` points per world unit along each axis.
    pub fn new(frequency: f64) -> Result<Self, BlendError> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(BlendError::InvalidFrequency(frequency));
        }
        Ok(Self {
            spacing: 1.0 / frequency,
        })
    }

    /// Grid spacing in world units.
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Upper bound on the distance from any location to its nearest scatter point.
    pub fn max_gap(&self) -> f64 {
        (0.5 + JITTER) * self.spacing * std::f64::consts::SQRT_2
    }

    /// The scatter point of grid cell `(cell_x, cell_z)`.
    pub fn point_in_cell(&self, seed: i64, cell_x: i64, cell_z: i64) -> DVec2 {
        let (u, v) = unit_pair(derive_cell_seed(seed, cell_x, cell_z));
        let center = DVec2::new(cell_x as f64 + 0.5, cell_z as f64 + 0.5) * self.spacing;
        let jitter = DVec2::new(u - 0.5, v - 0.5) * (2.0 * JITTER * self.spacing);
        center + jitter
    }

    /// All scatter points closer than `radius` to the cells of the chunk at
    /// `(origin_x, origin_z)`, ordered by grid row then column.
    ///
    /// A cell `(xi, zi)` sits at world position `(origin_x + xi, origin_z + zi)`.
    pub fn scatter_points(
        &self,
        seed: i64,
        origin_x: i64,
        origin_z: i64,
        chunk_width: usize,
        radius: f64,
    ) -> Vec<DVec2> {
        let min = DVec2::new(origin_x as f64, origin_z as f64);
        let max = min + DVec2::splat(chunk_width.saturating_sub(1) as f64);

        let (lo, hi) = (self.cell_of(min - radius), self.cell_of(max + radius));
        let radius_sq = radius * radius;
        let mut points = Vec::new();
        for cell_z in lo.1..=hi.1 {
            for cell_x in lo.0..=hi.0 {
                let point = self.point_in_cell(seed, cell_x, cell_z);
                let nearest = point.clamp(min, max);
                if point.distance_squared(nearest) < radius_sq {
                    points.push(point);
                }
            }
        }
        points
    }

    #[inline]
    fn cell_of(&self, position: DVec2) -> (i64, i64) {
        let cell = (position / self.spacing).floor();
        (cell.x as i64, cell.y as i64)
    }
}
