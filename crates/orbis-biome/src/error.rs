//! Error types for registration, tree construction, and classification.

use crate::region::SurfaceType;

/// Errors that can occur when registering biomes and regions.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A biome with this name is already registered.
    #[error("duplicate biome name: {0}")]
    DuplicateBiomeName(String),
    /// A biome with this numeric id is already registered.
    #[error("duplicate biome id {id} (biome `{name}`)")]
    DuplicateBiomeId {
        /// The colliding id.
        id: u16,
        /// Name of the biome that tried to claim it.
        name: String,
    },
    /// A region with this name is already registered.
    #[error("duplicate region name: {0}")]
    DuplicateRegionName(String),
}

/// Errors detected while compiling a [`ClassificationTree`](crate::ClassificationTree).
///
/// All of these are load-time failures: a tree that builds successfully never
/// references an unknown name.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A layer references a region name that is not registered.
    #[error("`{owner}` references unknown region `{name}`")]
    UnknownRegion {
        /// Region or dimension declaring the layer.
        owner: String,
        /// The unresolved name.
        name: String,
    },
    /// A layer references a biome name that is not registered.
    #[error("`{owner}` references unknown biome `{name}`")]
    UnknownBiome {
        /// Region declaring the layer.
        owner: String,
        /// The unresolved name.
        name: String,
    },
    /// The dimension has no top-level region layers.
    #[error("dimension `{0}` declares no root region layers")]
    NoRootRegions(String),
    /// The land/shore/sea bands overlap, leave a gap, or do not cover `[-1, 1]`.
    #[error("invalid surface bands in dimension `{dimension}`: {source}")]
    InvalidSurfaceBands {
        /// Dimension name.
        dimension: String,
        /// What is wrong with the bands.
        #[source]
        source: BandError,
    },
    /// The rounding precision is zero, negative, or not finite.
    #[error("precision must be positive and finite, got {0}")]
    InvalidPrecision(f64),
    /// A noise zoom is zero, negative, or not finite.
    #[error("zoom of `{owner}` must be positive and finite, got {zoom}")]
    InvalidZoom {
        /// Region or dimension owning the zoom.
        owner: String,
        /// The rejected value.
        zoom: f64,
    },
    /// A layer range has `min > max`.
    #[error("layer range [{min}, {max}] in `{owner}` is inverted")]
    InvertedRange {
        /// Region or dimension declaring the layer.
        owner: String,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Registering the preset's biomes or regions failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Ways a set of [`SurfaceBands`](crate::region::SurfaceBands) can fail validation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BandError {
    /// A band has `min > max`.
    #[error("{surface} band [{min}, {max}] is inverted")]
    Inverted {
        /// Surface type owning the band.
        surface: SurfaceType,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Two bands share part of the type-noise axis.
    #[error("{lower} and {upper} bands overlap")]
    Overlap {
        /// Band starting lower.
        lower: SurfaceType,
        /// Band starting higher.
        upper: SurfaceType,
    },
    /// A rounded type-noise value in `[-1, 1]` falls in no band.
    #[error("rounded type noise {value} matches no band")]
    Uncovered {
        /// The first uncovered grid value.
        value: f64,
    },
}

/// Errors raised while classifying a single coordinate.
///
/// Every variant means the classification tree is malformed for this input;
/// classification is deterministic, so retrying reproduces the same error.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    /// The rounded type noise falls outside every surface band.
    #[error("type noise {value} at ({x}, {z}) matches no surface band")]
    NoSurfaceType {
        /// World x.
        x: f64,
        /// World z.
        z: f64,
        /// Rounded type noise.
        value: f64,
    },
    /// No layer of the searched list contains the noise value.
    #[error("no {surface} layer of `{scope}` contains noise {value} at ({x}, {z})")]
    NoMatchingLayer {
        /// Region (or dimension, for root layers) whose list was searched.
        scope: String,
        /// Active surface type.
        surface: SurfaceType,
        /// Rounded noise or context value that failed to match.
        value: f64,
        /// World x.
        x: f64,
        /// World z.
        z: f64,
    },
    /// A region was reached twice on one descent path.
    #[error("region `{region}` revisited while descending at ({x}, {z})")]
    Cycle {
        /// The repeated region.
        region: String,
        /// World x.
        x: f64,
        /// World z.
        z: f64,
    },
}

/// Invalid blender or scatter settings.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BlendError {
    /// Scatter-point frequency is zero, negative, or not finite.
    #[error("point frequency must be positive and finite, got {0}")]
    InvalidFrequency(f64),
    /// A blend radius is negative or not finite; an effective radius must also be nonzero.
    #[error("invalid blend radius {0}")]
    InvalidRadius(f64),
    /// Chunks need at least one cell per side.
    #[error("chunk width must be at least 1")]
    InvalidChunkWidth,
}
