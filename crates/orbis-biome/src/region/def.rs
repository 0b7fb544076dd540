//! Region definition: an internal node of the classification tree.

use super::{ContextSettings, LayerDef, SurfaceType};

/// Descriptor for a region.
///
/// A region owns its own noise field (`seed`, sampled at `x / zoom`) and three
/// independent layer lists, one per [`SurfaceType`]. Within a list the first
/// layer whose range contains the value wins.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionDef {
    /// Unique region name.
    pub name: String,
    /// Seed of this region's noise field.
    pub seed: i64,
    /// Spatial divisor applied to coordinates before sampling. Larger is broader.
    pub zoom: f64,
    /// Which surface types reuse the parent's context value.
    pub context: ContextSettings,
    /// Layers searched for land coordinates.
    pub land: Vec<LayerDef>,
    /// Layers searched for shore coordinates.
    pub shore: Vec<LayerDef>,
    /// Layers searched for sea coordinates.
    pub sea: Vec<LayerDef>,
}

impl RegionDef {
    /// Create a region with empty layer lists and no context flags.
    pub fn new(name: impl Into<String>, seed: i64, zoom: f64) -> Self {
        Self {
            name: name.into(),
            seed,
            zoom,
            context: ContextSettings::default(),
            land: Vec::new(),
            shore: Vec::new(),
            sea: Vec::new(),
        }
    }

    /// Replace the context flags.
    pub fn with_context(mut self, context: ContextSettings) -> Self {
        self.context = context;
        self
    }

    /// Append a layer to the list for `surface`.
    pub fn with_layer(mut self, surface: SurfaceType, layer: LayerDef) -> Self {
        self.layers_mut(surface).push(layer);
        self
    }

    /// The layer list for `surface`.
    pub fn layers(&self, surface: SurfaceType) -> &[LayerDef] {
        match surface {
            SurfaceType::Land => &self.land,
            SurfaceType::Shore => &self.shore,
            SurfaceType::Sea => &self.sea,
        }
    }

    fn layers_mut(&mut self, surface: SurfaceType) -> &mut Vec<LayerDef> {
        match surface {
            SurfaceType::Land => &mut self.land,
            SurfaceType::Shore => &mut self.shore,
            SurfaceType::Sea => &mut self.sea,
        }
    }
}
