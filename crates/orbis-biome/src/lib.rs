//! Biome classification and blending: a noise-driven region tree resolves every
//! `(x, z)` coordinate to a biome, and a scattered-point blender turns those
//! classifications into smooth per-cell weight maps for each chunk.

mod async_blending;
mod error;
mod legacy;
mod noise_source;
mod registry;
mod resolver;
mod seed;
mod tree;

pub mod biome;
pub mod blend;
pub mod presets;
pub mod region;

pub use glam;

pub use async_blending::{AsyncChunkBlender, BlendTask, BlendedChunk, ChunkOrigin, blend_chunk_sync};
pub use biome::{BiomeDef, BiomeId};
pub use blend::{BiomeBlender, BlendRadius, ScatteredPointSampler, WeightEntry, WeightMap, blend_points};
pub use error::{BandError, BlendError, ClassifyError, RegistryError, TreeError};
pub use legacy::{Climate, LegacyBiome, LegacyClassifier, LegacySettings};
pub use noise_source::{NoiseSource, OpenSimplexField};
pub use region::{
    ContextSettings, DimensionDef, LayerDef, NoiseRange, RegionDef, RootLayer, SurfaceBands,
    SurfaceType,
};
pub use registry::{RegionId, Registry};
pub use resolver::{Classifier, RegionResolver};
pub use seed::{derive_cell_seed, fold_seed, round_to_precision};
pub use tree::{ClassificationTree, CompiledRegion, Layer};
