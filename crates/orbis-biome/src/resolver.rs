//! Region resolver: descends a [`ClassificationTree`] from the dimension's root
//! layers down to a terminal biome.

use std::sync::Arc;

use crate::biome::BiomeId;
use crate::error::ClassifyError;
use crate::noise_source::{NoiseSource, OpenSimplexField};
use crate::region::SurfaceType;
use crate::registry::RegionId;
use crate::seed::round_to_precision;
use crate::tree::{ClassificationTree, Layer};

/// Anything that maps a world coordinate to a biome.
///
/// Implemented by [`RegionResolver`] and the legacy flat classifier; the chunk
/// blending pool holds one behind an `Arc<dyn Classifier>`.
pub trait Classifier: Send + Sync {
    /// Classify the coordinate `(x, z)`.
    fn classify(&self, x: f64, z: f64) -> Result<BiomeId, ClassifyError>;
}

/// Resolves coordinates to biomes by walking a [`ClassificationTree`].
///
/// Every noise field the tree needs (type, top-level region, and one per
/// region) is built once in [`RegionResolver::new`], so `classify` takes `&self`
/// and is safe to call from any number of threads.
pub struct RegionResolver<N = OpenSimplexField> {
    tree: Arc<ClassificationTree>,
    type_field: N,
    region_field: N,
    region_fields: Vec<N>,
}

impl<N: NoiseSource> RegionResolver<N> {
    /// Create a resolver for `tree`, seeding one field per region.
    pub fn new(tree: Arc<ClassificationTree>) -> Self {
        let type_field = N::with_seed(tree.type_noise().0);
        let region_field = N::with_seed(tree.region_noise().0);
        let region_fields = tree
            .regions()
            .iter()
            .map(|region| N::with_seed(region.seed()))
            .collect();
        Self {
            tree,
            type_field,
            region_field,
            region_fields,
        }
    }

    /// The tree this resolver walks.
    pub fn tree(&self) -> &ClassificationTree {
        &self.tree
    }

    /// Determine the surface type at `(x, z)`.
    pub fn surface_type(&self, x: f64, z: f64) -> Result<SurfaceType, ClassifyError> {
        let value = self.sample(&self.type_field, x, z, self.tree.type_noise().1);
        self.tree
            .bands()
            .surface_for(value)
            .ok_or(ClassifyError::NoSurfaceType { x, z, value })
    }

    /// Classify `(x, z)`.
    ///
    /// 1. Surface type from the type noise.
    /// 2. Initial region from the top-level region noise; its position inside the
    ///    matched root range becomes the first context value.
    /// 3. Per region: sample the region's own field (or reuse the parent context
    ///    when the region's flag for this surface type is set) and take the first
    ///    matching layer, descending on region layers until a biome layer matches.
    ///
    /// # Errors
    ///
    /// [`ClassifyError::NoSurfaceType`] / [`ClassifyError::NoMatchingLayer`] when a
    /// value is not covered, [`ClassifyError::Cycle`] when a region repeats on the
    /// descent path.
    pub fn classify(&self, x: f64, z: f64) -> Result<BiomeId, ClassifyError> {
        let surface = self.surface_type(x, z)?;
        let precision = self.tree.precision();

        let root_value = self.sample(&self.region_field, x, z, self.tree.region_noise().1);
        let (mut region, mut context) = self
            .tree
            .roots()
            .iter()
            .find(|(_, range)| range.contains(root_value))
            .map(|&(region, range)| (region, range.context(root_value, precision)))
            .ok_or_else(|| ClassifyError::NoMatchingLayer {
                scope: self.tree.dimension().to_string(),
                surface,
                value: root_value,
                x,
                z,
            })?;

        let mut path: Vec<RegionId> = Vec::with_capacity(4);
        loop {
            if path.contains(&region) {
                return Err(ClassifyError::Cycle {
                    region: self.tree.region(region).name().to_string(),
                    x,
                    z,
                });
            }
            path.push(region);

            let def = self.tree.region(region);
            let value = if def.context().uses_parent_context(surface) {
                context
            } else {
                self.sample(&self.region_fields[region.index()], x, z, def.zoom())
            };

            match Layer::first_match(def.layers(surface), value) {
                Some(&Layer::Region {
                    region: child,
                    range,
                }) => {
                    context = range.context(value, precision);
                    region = child;
                }
                Some(&Layer::Biome { biome, .. }) => return Ok(biome),
                None => {
                    return Err(ClassifyError::NoMatchingLayer {
                        scope: def.name().to_string(),
                        surface,
                        value,
                        x,
                        z,
                    });
                }
            }
        }
    }

    #[inline]
    fn sample(&self, field: &N, x: f64, z: f64, zoom: f64) -> f64 {
        round_to_precision(field.sample(x / zoom, z / zoom), self.tree.precision())
    }
}

impl<N: NoiseSource> Classifier for RegionResolver<N> {
    fn classify(&self, x: f64, z: f64) -> Result<BiomeId, ClassifyError> {
        RegionResolver::classify(self, x, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeDef;
    use crate::region::{
        ContextSettings, DimensionDef, LayerDef, NoiseRange, RegionDef, RootLayer, SurfaceBands,
    };
    use crate::registry::Registry;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Noise whose value is its seed in hundredths, independent of position.
    ///
    /// Lets tests dial in exact (boundary) values per field.
    struct SeedValueNoise {
        seed: i64,
    }

    impl NoiseSource for SeedValueNoise {
        fn with_seed(seed: i64) -> Self {
            Self { seed }
        }

        fn seed(&self) -> i64 {
            self.seed
        }

        fn sample(&self, _x: f64, _z: f64) -> f64 {
            self.seed as f64 / 100.0
        }
    }

    const LAND: i64 = 50;
    const SHORE: i64 = 20;
    const SEA: i64 = -50;

    fn bands() -> SurfaceBands {
        SurfaceBands {
            land: NoiseRange::new(0.31, 1.0),
            shore: NoiseRange::new(0.15, 0.30),
            sea: NoiseRange::new(-1.0, 0.14),
        }
    }

    fn dimension(type_seed: i64, region_seed: i64, roots: Vec<RootLayer>) -> DimensionDef {
        DimensionDef {
            name: "test".into(),
            type_seed,
            type_zoom: 850.0,
            region_seed,
            region_zoom: 2500.0,
            precision: 100.0,
            bands: bands(),
            roots,
        }
    }

    fn registry_with_biomes(names: &[&str]) -> Registry {
        let mut reg = Registry::new();
        for (i, name) in names.iter().enumerate() {
            reg.register_biome(BiomeDef::new(i as u16 + 1, *name, [i as u8 * 40, 0, 0]))
                .unwrap();
        }
        reg
    }

    fn stub_resolver(registry: Registry, dim: DimensionDef) -> RegionResolver<SeedValueNoise> {
        RegionResolver::new(Arc::new(ClassificationTree::build(registry, dim).unwrap()))
    }

    fn world_plains_tree() -> Arc<ClassificationTree> {
        let mut reg = registry_with_biomes(&["plains", "ocean", "beach"]);
        reg.register_region(
            RegionDef::new("World", 7, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("plains", -1.0, 1.0))
                .with_layer(SurfaceType::Shore, LayerDef::biome("beach", -1.0, 1.0))
                .with_layer(SurfaceType::Sea, LayerDef::biome("ocean", -1.0, 1.0)),
        )
        .unwrap();
        let dim = dimension(11, 12, vec![RootLayer::new("World", -1.0, 1.0)]);
        Arc::new(ClassificationTree::build(reg, dim).unwrap())
    }

    #[test]
    fn test_world_plains_every_land_coordinate() {
        let resolver: RegionResolver = RegionResolver::new(world_plains_tree());
        let plains = resolver.tree().registry().resolve_biome("plains").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut land_seen = 0;
        for _ in 0..2000 {
            let x = rng.random_range(-50_000.0..50_000.0);
            let z = rng.random_range(-50_000.0..50_000.0);
            if resolver.surface_type(x, z).unwrap() == SurfaceType::Land {
                land_seen += 1;
                assert_eq!(resolver.classify(x, z).unwrap(), plains, "at ({x}, {z})");
            }
        }
        assert!(land_seen > 0, "Sampled area should contain some land");
    }

    #[test]
    fn test_classify_deterministic() {
        let tree = world_plains_tree();
        let a: RegionResolver = RegionResolver::new(Arc::clone(&tree));
        let b: RegionResolver = RegionResolver::new(tree);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..500 {
            let x = rng.random_range(-10_000.0..10_000.0);
            let z = rng.random_range(-10_000.0..10_000.0);
            let first = a.classify(x, z).unwrap();
            assert_eq!(first, a.classify(x, z).unwrap(), "Repeated call changed result");
            assert_eq!(first, b.classify(x, z).unwrap(), "Second resolver disagrees");
        }
    }

    #[test]
    fn test_surface_type_selects_layer_list() {
        let registry = {
            let mut reg = registry_with_biomes(&["plains", "ocean", "beach"]);
            reg.register_region(
                RegionDef::new("World", 0, 300.0)
                    .with_layer(SurfaceType::Land, LayerDef::biome("plains", -1.0, 1.0))
                    .with_layer(SurfaceType::Shore, LayerDef::biome("beach", -1.0, 1.0))
                    .with_layer(SurfaceType::Sea, LayerDef::biome("ocean", -1.0, 1.0)),
            )
            .unwrap();
            reg
        };
        let roots = || vec![RootLayer::new("World", -1.0, 1.0)];
        for (type_seed, expected) in [(LAND, "plains"), (SHORE, "beach"), (SEA, "ocean")] {
            let resolver = stub_resolver(registry.clone(), dimension(type_seed, 0, roots()));
            let biome = resolver.classify(0.0, 0.0).unwrap();
            assert_eq!(resolver.tree().biome(biome).unwrap().name, expected);
        }
    }

    #[test]
    fn test_boundary_value_goes_to_first_layer() {
        let mut reg = registry_with_biomes(&["lower", "upper"]);
        // The region field samples exactly 0.5, which both ranges include.
        reg.register_region(
            RegionDef::new("Split", 50, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("lower", -1.0, 0.5))
                .with_layer(SurfaceType::Land, LayerDef::biome("upper", 0.5, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(
            reg,
            dimension(LAND, 0, vec![RootLayer::new("Split", -1.0, 1.0)]),
        );
        let biome = resolver.classify(3.0, 4.0).unwrap();
        assert_eq!(resolver.tree().biome(biome).unwrap().name, "lower");
    }

    #[test]
    fn test_root_boundary_value_goes_to_first_root() {
        let mut reg = registry_with_biomes(&["a", "b"]);
        reg.register_region(
            RegionDef::new("A", 0, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("a", -1.0, 1.0)),
        )
        .unwrap();
        reg.register_region(
            RegionDef::new("B", 0, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("b", -1.0, 1.0)),
        )
        .unwrap();
        // Region noise is exactly -0.33: the max of A and the min of B.
        let resolver = stub_resolver(
            reg,
            dimension(
                LAND,
                -33,
                vec![
                    RootLayer::new("A", -1.0, -0.33),
                    RootLayer::new("B", -0.33, 1.0),
                ],
            ),
        );
        let biome = resolver.classify(0.0, 0.0).unwrap();
        assert_eq!(resolver.tree().biome(biome).unwrap().name, "a");
    }

    #[test]
    fn test_descends_into_child_region() {
        let mut reg = registry_with_biomes(&["desert", "savanna", "badlands"]);
        reg.register_region(
            RegionDef::new("Hot", 80, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::region("Lowlands", 0.5, 1.0))
                .with_layer(SurfaceType::Land, LayerDef::biome("badlands", -1.0, 0.49)),
        )
        .unwrap();
        reg.register_region(
            RegionDef::new("Lowlands", -30, 150.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("desert", -1.0, 0.0))
                .with_layer(SurfaceType::Land, LayerDef::biome("savanna", 0.01, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(reg, dimension(LAND, 0, vec![RootLayer::new("Hot", -1.0, 1.0)]));
        let biome = resolver.classify(0.0, 0.0).unwrap();
        assert_eq!(resolver.tree().biome(biome).unwrap().name, "desert");
    }

    #[test]
    fn test_context_flag_reuses_parent_context() {
        let mut reg = registry_with_biomes(&["cold_beach", "stony_shore"]);
        // Root range [0, 1] with region noise 0.75 gives context 0.5.
        // The region's own field samples -0.8, which would pick cold_beach.
        reg.register_region(
            RegionDef::new("Cold", -80, 300.0)
                .with_context(ContextSettings {
                    use_shore_context: true,
                    ..Default::default()
                })
                .with_layer(SurfaceType::Shore, LayerDef::biome("cold_beach", -1.0, 0.0))
                .with_layer(SurfaceType::Shore, LayerDef::biome("stony_shore", 0.01, 1.0)),
        )
        .unwrap();
        let dim = dimension(
            SHORE,
            75,
            vec![
                RootLayer::new("Cold", 0.0, 1.0),
                RootLayer::new("Cold", -1.0, -0.01),
            ],
        );
        let resolver = stub_resolver(reg, dim);
        let biome = resolver.classify(0.0, 0.0).unwrap();
        assert_eq!(resolver.tree().biome(biome).unwrap().name, "stony_shore");
    }

    #[test]
    fn test_context_flag_ignored_for_other_surface() {
        let mut reg = registry_with_biomes(&["tundra", "taiga"]);
        reg.register_region(
            RegionDef::new("Cold", -80, 300.0)
                .with_context(ContextSettings {
                    use_shore_context: true,
                    ..Default::default()
                })
                .with_layer(SurfaceType::Land, LayerDef::biome("tundra", -1.0, 0.0))
                .with_layer(SurfaceType::Land, LayerDef::biome("taiga", 0.01, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(
            reg,
            dimension(LAND, 75, vec![RootLayer::new("Cold", 0.0, 1.0)]),
        );
        let biome = resolver.classify(0.0, 0.0).unwrap();
        assert_eq!(resolver.tree().biome(biome).unwrap().name, "tundra");
    }

    #[test]
    fn test_child_context_from_parent_layer_range() {
        let mut reg = registry_with_biomes(&["low", "high"]);
        // Parent samples 0.75 inside [0.5, 1.0] -> context 0.0 for the child.
        reg.register_region(
            RegionDef::new("Parent", 75, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::region("Child", 0.5, 1.0))
                .with_layer(SurfaceType::Land, LayerDef::biome("low", -1.0, 0.49)),
        )
        .unwrap();
        reg.register_region(
            RegionDef::new("Child", -90, 300.0)
                .with_context(ContextSettings {
                    use_land_context: true,
                    ..Default::default()
                })
                .with_layer(SurfaceType::Land, LayerDef::biome("low", -1.0, -0.01))
                .with_layer(SurfaceType::Land, LayerDef::biome("high", 0.0, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(reg, dimension(LAND, 0, vec![RootLayer::new("Parent", -1.0, 1.0)]));
        let biome = resolver.classify(0.0, 0.0).unwrap();
        assert_eq!(resolver.tree().biome(biome).unwrap().name, "high");
    }

    #[test]
    fn test_self_reference_is_cycle_error() {
        let mut reg = registry_with_biomes(&["unused"]);
        reg.register_region(
            RegionDef::new("Loop", 0, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::region("Loop", -1.0, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(reg, dimension(LAND, 0, vec![RootLayer::new("Loop", -1.0, 1.0)]));
        let err = resolver.classify(0.0, 0.0).unwrap_err();
        assert!(
            matches!(err, ClassifyError::Cycle { ref region, .. } if region == "Loop"),
            "expected cycle error, got {err:?}"
        );
    }

    #[test]
    fn test_mutual_reference_is_cycle_error() {
        let mut reg = registry_with_biomes(&["unused"]);
        reg.register_region(
            RegionDef::new("Ping", 0, 300.0)
                .with_layer(SurfaceType::Sea, LayerDef::region("Pong", -1.0, 1.0)),
        )
        .unwrap();
        reg.register_region(
            RegionDef::new("Pong", 0, 300.0)
                .with_layer(SurfaceType::Sea, LayerDef::region("Ping", -1.0, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(reg, dimension(SEA, 0, vec![RootLayer::new("Ping", -1.0, 1.0)]));
        let err = resolver.classify(0.0, 0.0).unwrap_err();
        assert!(
            matches!(err, ClassifyError::Cycle { ref region, .. } if region == "Ping"),
            "expected cycle error, got {err:?}"
        );
    }

    #[test]
    fn test_uncovered_layer_value_is_configuration_error() {
        let mut reg = registry_with_biomes(&["half"]);
        reg.register_region(
            RegionDef::new("Half", -50, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("half", 0.0, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(reg, dimension(LAND, 0, vec![RootLayer::new("Half", -1.0, 1.0)]));
        let err = resolver.classify(1.0, 2.0).unwrap_err();
        assert_eq!(
            err,
            ClassifyError::NoMatchingLayer {
                scope: "Half".into(),
                surface: SurfaceType::Land,
                value: -0.5,
                x: 1.0,
                z: 2.0,
            }
        );
    }

    #[test]
    fn test_uncovered_root_value_is_configuration_error() {
        let mut reg = registry_with_biomes(&["plains"]);
        reg.register_region(
            RegionDef::new("World", 0, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("plains", -1.0, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(
            reg,
            dimension(LAND, -90, vec![RootLayer::new("World", 0.0, 1.0)]),
        );
        let err = resolver.classify(0.0, 0.0).unwrap_err();
        assert!(matches!(err, ClassifyError::NoMatchingLayer { ref scope, .. } if scope == "test"));
    }

    #[test]
    fn test_missing_surface_list_is_configuration_error() {
        let mut reg = registry_with_biomes(&["plains"]);
        reg.register_region(
            RegionDef::new("World", 0, 300.0)
                .with_layer(SurfaceType::Land, LayerDef::biome("plains", -1.0, 1.0)),
        )
        .unwrap();
        let resolver = stub_resolver(reg, dimension(SEA, 0, vec![RootLayer::new("World", -1.0, 1.0)]));
        let err = resolver.classify(0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::NoMatchingLayer {
                surface: SurfaceType::Sea,
                ..
            }
        ));
    }

    #[test]
    fn test_resolver_is_shareable_across_threads() {
        let resolver: Arc<RegionResolver> = Arc::new(RegionResolver::new(world_plains_tree()));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let resolver = Arc::clone(&resolver);
                std::thread::spawn(move || {
                    (0..200)
                        .map(|i| resolver.classify(i as f64 * 37.0, t as f64 * 911.0).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        for (t, handle) in handles.into_iter().enumerate() {
            let from_thread = handle.join().unwrap();
            for (i, biome) in from_thread.into_iter().enumerate() {
                assert_eq!(biome, resolver.classify(i as f64 * 37.0, t as f64 * 911.0).unwrap());
            }
        }
    }
}
