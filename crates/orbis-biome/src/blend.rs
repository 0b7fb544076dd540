//! Scattered-point biome blending.
//!
//! A chunk's weight map is built from a jittered grid of scatter points around
//! the chunk: each point is classified once, and every cell mixes the biomes of
//! the points within the blend radius, weighted by `(r² - d²)²`.

mod blender;
mod scatter;
mod weight_map;

pub use blender::{BiomeBlender, BlendRadius, blend_points};
pub use scatter::ScatteredPointSampler;
pub use weight_map::{Iter, WeightEntry, WeightMap};
