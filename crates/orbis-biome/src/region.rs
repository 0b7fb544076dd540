//! Region tree definitions: surface types, noise ranges, layers, regions, and dimensions.
//!
//! These are the uncompiled, name-based definitions handed to the
//! [`Registry`](crate::Registry). [`ClassificationTree::build`](crate::ClassificationTree::build)
//! resolves the names and validates the ranges.

mod def;
mod dimension;
mod layer;

pub use def::RegionDef;
pub use dimension::{DimensionDef, RootLayer, SurfaceBands};
pub use layer::{ContextSettings, LayerDef, NoiseRange, SurfaceType};
