//! Per-chunk weight computation over scatter points.

use glam::DVec2;

use super::scatter::ScatteredPointSampler;
use super::weight_map::{WeightMap, WeightMapBuilder};
use crate::biome::BiomeId;
use crate::error::BlendError;

/// Distance within which a scatter point contributes weight. Always positive and finite.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct BlendRadius(f64);

impl BlendRadius {
    /// Validate `radius`. Zero, negative, and non-finite values are rejected.
    pub fn new(radius: f64) -> Result<Self, BlendError> {
        if radius.is_finite() && radius > 0.0 {
            Ok(Self(radius))
        } else {
            Err(BlendError::InvalidRadius(radius))
        }
    }

    /// The radius in world units.
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Blends biome classifications into a [`WeightMap`] per chunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeBlender {
    sampler: ScatteredPointSampler,
    blend_radius: BlendRadius,
    chunk_width: usize,
}

impl BiomeBlender {
    /// Create a blender.
    ///
    /// The effective blend radius is `min_blend_radius + sampler.max_gap()`, so
    /// every cell has at least one scatter point in range.
    pub fn new(
        point_frequency: f64,
        min_blend_radius: f64,
        chunk_width: usize,
    ) -> Result<Self, BlendError> {
        let sampler = ScatteredPointSampler::new(point_frequency)?;
        if !(min_blend_radius.is_finite() && min_blend_radius >= 0.0) {
            return Err(BlendError::InvalidRadius(min_blend_radius));
        }
        if chunk_width == 0 {
            return Err(BlendError::InvalidChunkWidth);
        }
        Ok(Self {
            blend_radius: BlendRadius::new(min_blend_radius + sampler.max_gap())?,
            sampler,
            chunk_width,
        })
    }

    /// The scatter-point grid this blender samples.
    pub fn sampler(&self) -> &ScatteredPointSampler {
        &self.sampler
    }

    /// Effective blend radius, including the sampler's maximum gap.
    pub fn blend_radius(&self) -> f64 {
        self.blend_radius.get()
    }

    /// Cells per chunk side.
    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    /// Blend the chunk whose cell `(0, 0)` is at `(origin_x, origin_z)`.
    ///
    /// `classify` is called exactly once per scatter point in range; its first
    /// error aborts the chunk.
    pub fn blend_for_chunk<E, F>(
        &self,
        seed: i64,
        origin_x: i64,
        origin_z: i64,
        classify: F,
    ) -> Result<WeightMap, E>
    where
        F: FnMut(f64, f64) -> Result<BiomeId, E>,
    {
        let points = self.sampler.scatter_points(
            seed,
            origin_x,
            origin_z,
            self.chunk_width,
            self.blend_radius.get(),
        );
        blend_points(
            &points,
            origin_x,
            origin_z,
            self.chunk_width,
            self.blend_radius,
            classify,
        )
    }
}

/// Blend an explicit set of points over one chunk.
///
/// Every point is classified up front, then each cell sums `(r² - d²)²` per
/// biome over the points closer than `radius` and normalizes to 1. Cells with
/// no point in range get no weight at all.
pub fn blend_points<E, F>(
    points: &[DVec2],
    origin_x: i64,
    origin_z: i64,
    chunk_width: usize,
    radius: BlendRadius,
    mut classify: F,
) -> Result<WeightMap, E>
where
    F: FnMut(f64, f64) -> Result<BiomeId, E>,
{
    let classified = points
        .iter()
        .map(|&point| Ok((point, classify(point.x, point.y)?)))
        .collect::<Result<Vec<(DVec2, BiomeId)>, E>>()?;

    let radius_sq = radius.get() * radius.get();
    let mut builder = WeightMapBuilder::new(chunk_width);
    let mut cell: Vec<(BiomeId, f64)> = Vec::with_capacity(8);

    for zi in 0..chunk_width {
        for xi in 0..chunk_width {
            let position = DVec2::new((origin_x + xi as i64) as f64, (origin_z + zi as i64) as f64);
            cell.clear();
            let mut total = 0.0;
            for &(point, biome) in &classified {
                let dist_sq = position.distance_squared(point);
                if dist_sq >= radius_sq {
                    continue;
                }
                let falloff = radius_sq - dist_sq;
                let weight = falloff * falloff;
                total += weight;
                match cell.iter_mut().find(|(b, _)| *b == biome) {
                    Some((_, sum)) => *sum += weight,
                    None => cell.push((biome, weight)),
                }
            }
            if total <= 0.0 {
                continue;
            }
            let index = zi * chunk_width + xi;
            for &(biome, weight) in &cell {
                builder.set(biome, index, weight / total);
            }
        }
    }

    Ok(builder.finish())
}
