//! Classification tree: a [`Registry`] and [`DimensionDef`] compiled into an
//! index-based, immutable structure.
//!
//! Every layer name is resolved once at build time, so the resolver's hot loop
//! never touches a string or a hash map.

use crate::biome::{BiomeDef, BiomeId};
use crate::error::TreeError;
use crate::region::{ContextSettings, DimensionDef, LayerDef, NoiseRange, SurfaceBands, SurfaceType};
use crate::registry::{RegionId, Registry};

/// A compiled layer entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Layer {
    /// Descend into a child region.
    Region {
        /// Child region.
        region: RegionId,
        /// Selecting range.
        range: NoiseRange,
    },
    /// Stop at a biome.
    Biome {
        /// Result biome.
        biome: BiomeId,
        /// Selecting range.
        range: NoiseRange,
    },
}

impl Layer {
    /// The selecting range.
    #[inline]
    pub fn range(&self) -> NoiseRange {
        match self {
            Self::Region { range, .. } | Self::Biome { range, .. } => *range,
        }
    }

    /// First layer in declaration order whose closed range contains `value`.
    #[inline]
    pub fn first_match(layers: &[Self], value: f64) -> Option<&Self> {
        layers.iter().find(|layer| layer.range().contains(value))
    }
}

/// A region with its layer names resolved.
#[derive(Clone, Debug)]
pub struct CompiledRegion {
    name: String,
    seed: i64,
    zoom: f64,
    context: ContextSettings,
    land: Vec<Layer>,
    shore: Vec<Layer>,
    sea: Vec<Layer>,
}

impl CompiledRegion {
    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Seed of the region's noise field.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Zoom of the region's noise field.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Context flags.
    pub fn context(&self) -> ContextSettings {
        self.context
    }

    /// Compiled layers for `surface`.
    pub fn layers(&self, surface: SurfaceType) -> &[Layer] {
        match surface {
            SurfaceType::Land => &self.land,
            SurfaceType::Shore => &self.shore,
            SurfaceType::Sea => &self.sea,
        }
    }
}

/// The static, pre-loaded hierarchy of regions and biomes for one dimension.
///
/// Built once, then shared read-only (typically behind an `Arc`) by every
/// resolver and worker thread.
#[derive(Clone, Debug)]
pub struct ClassificationTree {
    dimension: String,
    type_seed: i64,
    type_zoom: f64,
    region_seed: i64,
    region_zoom: f64,
    precision: f64,
    bands: SurfaceBands,
    roots: Vec<(RegionId, NoiseRange)>,
    regions: Vec<CompiledRegion>,
    registry: Registry,
}

impl ClassificationTree {
    /// Compile `registry` and `dimension` into a tree.
    ///
    /// # Errors
    ///
    /// Fails on any unresolved region or biome name, inverted layer range,
    /// non-positive zoom or precision, empty root list, or surface bands that
    /// do not partition `[-1, 1]`.
    pub fn build(registry: Registry, dimension: DimensionDef) -> Result<Self, TreeError> {
        let DimensionDef {
            name,
            type_seed,
            type_zoom,
            region_seed,
            region_zoom,
            precision,
            bands,
            roots,
        } = dimension;

        if !(precision.is_finite() && precision > 0.0) {
            return Err(TreeError::InvalidPrecision(precision));
        }
        check_zoom(&name, type_zoom)?;
        check_zoom(&name, region_zoom)?;
        bands
            .validate(precision)
            .map_err(|source| TreeError::InvalidSurfaceBands {
                dimension: name.clone(),
                source,
            })?;

        if roots.is_empty() {
            return Err(TreeError::NoRootRegions(name));
        }
        let roots = roots
            .iter()
            .map(|root| {
                check_range(&name, root.range)?;
                let region =
                    registry
                        .resolve_region(&root.region)
                        .ok_or_else(|| TreeError::UnknownRegion {
                            owner: name.clone(),
                            name: root.region.clone(),
                        })?;
                Ok((region, root.range))
            })
            .collect::<Result<Vec<_>, TreeError>>()?;

        let regions = registry
            .regions()
            .iter()
            .map(|def| {
                check_zoom(&def.name, def.zoom)?;
                let compile = |surface| compile_layers(&registry, &def.name, def.layers(surface));
                Ok(CompiledRegion {
                    name: def.name.clone(),
                    seed: def.seed,
                    zoom: def.zoom,
                    context: def.context,
                    land: compile(SurfaceType::Land)?,
                    shore: compile(SurfaceType::Shore)?,
                    sea: compile(SurfaceType::Sea)?,
                })
            })
            .collect::<Result<Vec<_>, TreeError>>()?;

        tracing::debug!(
            dimension = %name,
            regions = regions.len(),
            biomes = registry.biome_count(),
            "classification tree built"
        );

        Ok(Self {
            dimension: name,
            type_seed,
            type_zoom,
            region_seed,
            region_zoom,
            precision,
            bands,
            roots,
            regions,
            registry,
        })
    }

    /// Dimension name.
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// Seed and zoom of the surface-type noise field.
    pub fn type_noise(&self) -> (i64, f64) {
        (self.type_seed, self.type_zoom)
    }

    /// Seed and zoom of the top-level region noise field.
    pub fn region_noise(&self) -> (i64, f64) {
        (self.region_seed, self.region_zoom)
    }

    /// Rounding precision.
    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Surface bands.
    pub fn bands(&self) -> &SurfaceBands {
        &self.bands
    }

    /// Top-level region layers in declaration order.
    pub fn roots(&self) -> &[(RegionId, NoiseRange)] {
        &self.roots
    }

    /// All compiled regions; position `i` has `RegionId(i)`.
    pub fn regions(&self) -> &[CompiledRegion] {
        &self.regions
    }

    /// The compiled region for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn region(&self, id: RegionId) -> &CompiledRegion {
        &self.regions[id.index()]
    }

    /// The biome definition for `id`, if it belongs to this tree.
    pub fn biome(&self, id: BiomeId) -> Option<&BiomeDef> {
        self.registry.biome(id)
    }

    /// The registry the tree was built from.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

fn check_zoom(owner: &str, zoom: f64) -> Result<(), TreeError> {
    if zoom.is_finite() && zoom > 0.0 {
        Ok(())
    } else {
        Err(TreeError::InvalidZoom {
            owner: owner.to_string(),
            zoom,
        })
    }
}

fn check_range(owner: &str, range: NoiseRange) -> Result<(), TreeError> {
    if range.min > range.max {
        return Err(TreeError::InvertedRange {
            owner: owner.to_string(),
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}

fn compile_layers(
    registry: &Registry,
    owner: &str,
    layers: &[LayerDef],
) -> Result<Vec<Layer>, TreeError> {
    layers
        .iter()
        .map(|layer| {
            check_range(owner, layer.range())?;
            match layer {
                LayerDef::Region { name, range } => registry
                    .resolve_region(name)
                    .map(|region| Layer::Region {
                        region,
                        range: *range,
                    })
                    .ok_or_else(|| TreeError::UnknownRegion {
                        owner: owner.to_string(),
                        name: name.clone(),
                    }),
                LayerDef::Biome { name, range } => registry
                    .resolve_biome(name)
                    .map(|biome| Layer::Biome {
                        biome,
                        range: *range,
                    })
                    .ok_or_else(|| TreeError::UnknownBiome {
                        owner: owner.to_string(),
                        name: name.clone(),
                    }),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BandError;
    use crate::region::{RegionDef, RootLayer};

    fn bands() -> SurfaceBands {
        SurfaceBands {
            land: NoiseRange::new(0.31, 1.0),
            shore: NoiseRange::new(0.15, 0.30),
            sea: NoiseRange::new(-1.0, 0.14),
        }
    }

    fn dimension(roots: Vec<RootLayer>) -> DimensionDef {
        DimensionDef {
            name: "overworld".into(),
            type_seed: 1,
            type_zoom: 850.0,
            region_seed: 2,
            region_zoom: 2500.0,
            precision: 100.0,
            bands: bands(),
            roots,
        }
    }

    fn world_registry() -> Registry {
        let mut reg = Registry::new();
        reg.register_biome(BiomeDef::new(1, "plains", [0, 255, 0]))
            .unwrap();
        reg.register_region(
            RegionDef::new("world", 3, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("plains", -1.0, 1.0)),
        )
        .unwrap();
        reg
    }

    #[test]
    fn test_build_resolves_names() {
        let tree =
            ClassificationTree::build(world_registry(), dimension(vec![RootLayer::new("world", -1.0, 1.0)]))
                .unwrap();
        assert_eq!(tree.roots().len(), 1);
        let world = tree.region(tree.roots()[0].0);
        assert_eq!(world.name(), "world");
        assert_eq!(
            world.layers(SurfaceType::Land),
            &[Layer::Biome {
                biome: BiomeId(1),
                range: NoiseRange::FULL
            }]
        );
        assert!(world.layers(SurfaceType::Sea).is_empty());
        assert_eq!(tree.biome(BiomeId(1)).unwrap().name, "plains");
    }

    #[test]
    fn test_unknown_root_region_is_lookup_error() {
        let result =
            ClassificationTree::build(world_registry(), dimension(vec![RootLayer::new("moon", -1.0, 1.0)]));
        assert!(matches!(
            result,
            Err(TreeError::UnknownRegion { ref name, .. }) if name == "moon"
        ));
    }

    #[test]
    fn test_unknown_biome_is_lookup_error() {
        let mut reg = world_registry();
        reg.register_region(
            RegionDef::new("broken", 4, 100.0)
                .with_layer(SurfaceType::Sea, LayerDef::biome("kelp_forest", -1.0, 1.0)),
        )
        .unwrap();
        let result =
            ClassificationTree::build(reg, dimension(vec![RootLayer::new("world", -1.0, 1.0)]));
        assert!(matches!(
            result,
            Err(TreeError::UnknownBiome { ref owner, ref name }) if owner == "broken" && name == "kelp_forest"
        ));
    }

    #[test]
    fn test_unknown_child_region_is_lookup_error() {
        let mut reg = world_registry();
        reg.register_region(
            RegionDef::new("parent", 4, 100.0)
                .with_layer(SurfaceType::Land, LayerDef::region("missing", -1.0, 1.0)),
        )
        .unwrap();
        let result =
            ClassificationTree::build(reg, dimension(vec![RootLayer::new("world", -1.0, 1.0)]));
        assert!(matches!(result, Err(TreeError::UnknownRegion { .. })));
    }

    #[test]
    fn test_empty_roots_rejected() {
        let result = ClassificationTree::build(world_registry(), dimension(Vec::new()));
        assert!(matches!(result, Err(TreeError::NoRootRegions(_))));
    }

    #[test]
    fn test_invalid_precision_rejected() {
        let mut dim = dimension(vec![RootLayer::new("world", -1.0, 1.0)]);
        dim.precision = 0.0;
        let result = ClassificationTree::build(world_registry(), dim);
        assert!(matches!(result, Err(TreeError::InvalidPrecision(_))));
    }

    #[test]
    fn test_invalid_region_zoom_rejected() {
        let mut reg = world_registry();
        reg.register_region(RegionDef::new("flat", 5, 0.0)).unwrap();
        let result =
            ClassificationTree::build(reg, dimension(vec![RootLayer::new("world", -1.0, 1.0)]));
        assert!(matches!(result, Err(TreeError::InvalidZoom { ref owner, .. }) if owner == "flat"));
    }

    #[test]
    fn test_inverted_layer_rejected() {
        let mut reg = world_registry();
        reg.register_region(
            RegionDef::new("upside_down", 6, 100.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("plains", 0.5, -0.5)),
        )
        .unwrap();
        let result =
            ClassificationTree::build(reg, dimension(vec![RootLayer::new("world", -1.0, 1.0)]));
        assert!(matches!(result, Err(TreeError::InvertedRange { .. })));
    }

    #[test]
    fn test_invalid_bands_rejected() {
        let mut dim = dimension(vec![RootLayer::new("world", -1.0, 1.0)]);
        dim.bands.shore = NoiseRange::new(0.0, 0.5);
        let result = ClassificationTree::build(world_registry(), dim);
        assert!(matches!(result, Err(TreeError::InvalidSurfaceBands { .. })));
    }

    #[test]
    fn test_off_grid_bands_rejected() {
        let mut dim = dimension(vec![RootLayer::new("world", -1.0, 1.0)]);
        dim.bands.sea = NoiseRange::new(-1.0, 0.095);
        dim.bands.shore = NoiseRange::new(0.105, 0.295);
        dim.bands.land = NoiseRange::new(0.305, 1.0);
        let result = ClassificationTree::build(world_registry(), dim);
        assert!(matches!(
            result,
            Err(TreeError::InvalidSurfaceBands {
                source: BandError::Uncovered { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_first_match_prefers_declaration_order() {
        let layers = [
            Layer::Biome {
                biome: BiomeId(1),
                range: NoiseRange::new(-1.0, 0.5),
            },
            Layer::Biome {
                biome: BiomeId(2),
                range: NoiseRange::new(0.5, 1.0),
            },
        ];
        assert!(matches!(
            Layer::first_match(&layers, 0.5),
            Some(Layer::Biome { biome: BiomeId(1), .. })
        ));
        assert!(matches!(
            Layer::first_match(&layers, 0.51),
            Some(Layer::Biome { biome: BiomeId(2), .. })
        ));
        assert!(Layer::first_match(&layers[..1], 0.9).is_none());
    }
}
