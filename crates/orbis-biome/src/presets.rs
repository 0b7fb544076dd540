//! Ready-made classification trees.
//!
//! Both presets sample the same type and region fields as
//! [`LegacySettings::default`], so they partition the world into the same
//! land/shore/sea areas and climates.

use crate::biome::BiomeDef;
use crate::error::TreeError;
use crate::legacy::{Climate, LegacyBiome, LegacySettings};
use crate::region::{ContextSettings, DimensionDef, LayerDef, RegionDef, RootLayer, SurfaceType};
use crate::registry::Registry;
use crate::tree::ClassificationTree;

const PRECISION: f64 = 100.0;

fn dimension(name: &str, settings: &LegacySettings) -> DimensionDef {
    DimensionDef {
        name: name.to_string(),
        type_seed: settings.type_seed,
        type_zoom: settings.type_zoom,
        region_seed: settings.region_seed,
        region_zoom: settings.region_zoom,
        precision: PRECISION,
        bands: settings.bands,
        roots: Climate::ALL
            .into_iter()
            .map(|climate| {
                let range = climate.range();
                RootLayer::new(climate.name(), range.min, range.max)
            })
            .collect(),
    }
}

/// Registry holding the 15 legacy biomes under their legacy ids.
pub fn legacy_registry() -> Result<Registry, TreeError> {
    let mut registry = Registry::new();
    for biome in LegacyBiome::ALL {
        registry.register_biome(biome.def())?;
    }
    Ok(registry)
}

/// The legacy classifier expressed as a one-level tree.
pub fn legacy_tree() -> Result<ClassificationTree, TreeError> {
    legacy_tree_with(&LegacySettings::default())
}

/// [`legacy_tree`] over custom seeds, zooms, and bands.
///
/// One root region per climate, each sampling the legacy biome field.
pub fn legacy_tree_with(settings: &LegacySettings) -> Result<ClassificationTree, TreeError> {
    let mut registry = legacy_registry()?;
    for climate in Climate::ALL {
        let mut region = RegionDef::new(climate.name(), settings.biome_seed, settings.biome_zoom);
        for biome in LegacyBiome::ALL.into_iter().filter(|b| b.climate() == climate) {
            let range = biome.range();
            region = region.with_layer(
                biome.surface(),
                LayerDef::biome(biome.name(), range.min, range.max),
            );
        }
        registry.register_region(region)?;
    }
    ClassificationTree::build(registry, dimension("legacy", settings))
}

/// A multi-level tree: nested sub-regions under the hot and temperate
/// climates, and context-driven layers in the temperate forests and on cold
/// shores.
pub fn orbis_tree() -> Result<ClassificationTree, TreeError> {
    let settings = LegacySettings::default();
    let seed = |offset: i64| settings.biome_seed.wrapping_add(offset);

    let mut registry = Registry::new();
    let biomes = [
        BiomeDef::new(1, "desert", [237, 201, 175]),
        BiomeDef::new(2, "savanna", [189, 178, 95]),
        BiomeDef::new(3, "badlands", [217, 69, 21]),
        BiomeDef::new(4, "warm_beach", [250, 222, 85]),
        BiomeDef::new(5, "warm_ocean", [0, 170, 200]),
        BiomeDef::new(6, "plains", [141, 179, 96]),
        BiomeDef::new(7, "forest", [5, 102, 33]),
        BiomeDef::new(8, "dark_forest", [64, 81, 26]),
        BiomeDef::new(9, "beach", [230, 215, 150]),
        BiomeDef::new(10, "ocean", [0, 0, 200]),
        BiomeDef::new(11, "tundra", [200, 220, 220]),
        BiomeDef::new(12, "taiga", [49, 85, 74]),
        BiomeDef::new(13, "snowy_peaks", [240, 240, 255]),
        BiomeDef::new(14, "snowy_beach", [250, 240, 192]),
        BiomeDef::new(15, "stony_shore", [162, 162, 132]),
        BiomeDef::new(16, "frozen_ocean", [112, 112, 214]),
    ];
    for biome in biomes {
        registry.register_biome(biome)?;
    }

    use SurfaceType::{Land, Sea, Shore};
    let regions = [
        RegionDef::new("hot", seed(0), settings.biome_zoom)
            .with_layer(Land, LayerDef::region("hot_lowlands", -1.0, 0.0))
            .with_layer(Land, LayerDef::biome("badlands", 0.01, 1.0))
            .with_layer(Shore, LayerDef::biome("warm_beach", -1.0, 1.0))
            .with_layer(Sea, LayerDef::biome("warm_ocean", -1.0, 1.0)),
        RegionDef::new("hot_lowlands", seed(1), 150.0)
            .with_layer(Land, LayerDef::biome("desert", -1.0, 0.0))
            .with_layer(Land, LayerDef::biome("savanna", 0.01, 1.0)),
        RegionDef::new("temperate", seed(2), settings.biome_zoom)
            .with_layer(Land, LayerDef::biome("plains", -1.0, -0.33))
            .with_layer(Land, LayerDef::region("temperate_forests", -0.32, 1.0))
            .with_layer(Shore, LayerDef::biome("beach", -1.0, 1.0))
            .with_layer(Sea, LayerDef::biome("ocean", -1.0, 1.0)),
        // Forest density follows the position inside the parent's forest band.
        RegionDef::new("temperate_forests", seed(3), 200.0)
            .with_context(ContextSettings {
                use_land_context: true,
                ..Default::default()
            })
            .with_layer(Land, LayerDef::biome("forest", -1.0, 0.2))
            .with_layer(Land, LayerDef::biome("dark_forest", 0.21, 1.0)),
        RegionDef::new("cold", seed(4), settings.biome_zoom)
            .with_context(ContextSettings {
                use_shore_context: true,
                ..Default::default()
            })
            .with_layer(Land, LayerDef::biome("tundra", -1.0, -0.33))
            .with_layer(Land, LayerDef::biome("taiga", -0.32, 0.33))
            .with_layer(Land, LayerDef::biome("snowy_peaks", 0.34, 1.0))
            .with_layer(Shore, LayerDef::biome("snowy_beach", -1.0, 0.0))
            .with_layer(Shore, LayerDef::biome("stony_shore", 0.01, 1.0))
            .with_layer(Sea, LayerDef::biome("frozen_ocean", -1.0, 1.0)),
    ];
    for region in regions {
        registry.register_region(region)?;
    }

    ClassificationTree::build(registry, dimension("orbis", &settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeId;
    use crate::legacy::LegacyClassifier;
    use crate::resolver::RegionResolver;
    use hashbrown::HashSet;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::sync::Arc;

    #[test]
    fn test_legacy_tree_builds() {
        let tree = legacy_tree().unwrap();
        assert_eq!(tree.roots().len(), 3);
        assert_eq!(tree.regions().len(), 3);
        assert_eq!(tree.registry().biome_count(), 15);
        let hot = tree.region(tree.roots()[0].0);
        assert_eq!(hot.name(), "hot");
        assert_eq!(hot.layers(SurfaceType::Land).len(), 3);
        assert_eq!(hot.layers(SurfaceType::Shore).len(), 1);
        assert_eq!(hot.layers(SurfaceType::Sea).len(), 1);
    }

    #[test]
    fn test_legacy_tree_agrees_with_legacy_classifier() {
        let resolver: RegionResolver = RegionResolver::new(Arc::new(legacy_tree().unwrap()));
        let legacy: LegacyClassifier = LegacyClassifier::default();
        for gz in 0..48 {
            for gx in 0..128 {
                let (x, z) = (gx as f64 * 32.0, gz as f64 * 32.0);
                let expected = legacy.classify_legacy(x, z).unwrap().id();
                assert_eq!(
                    resolver.classify(x, z).unwrap(),
                    expected,
                    "Tree and legacy classifier disagree at ({x}, {z})"
                );
            }
        }
    }

    #[test]
    fn test_orbis_tree_classifies_everywhere() {
        let resolver: RegionResolver = RegionResolver::new(Arc::new(orbis_tree().unwrap()));
        let mut rng = ChaCha8Rng::seed_from_u64(2021);
        let mut seen = HashSet::new();
        for _ in 0..20_000 {
            let x = rng.random_range(-200_000.0..200_000.0);
            let z = rng.random_range(-200_000.0..200_000.0);
            let biome = resolver
                .classify(x, z)
                .unwrap_or_else(|e| panic!("classification failed at ({x}, {z}): {e}"));
            assert!(resolver.tree().biome(biome).is_some());
            seen.insert(biome);
        }
        assert!(seen.len() > 8, "Expected a varied map, saw {} biomes", seen.len());
    }

    #[test]
    fn test_orbis_tree_surface_matches_legacy() {
        let resolver: RegionResolver = RegionResolver::new(Arc::new(orbis_tree().unwrap()));
        let legacy: LegacyClassifier = LegacyClassifier::default();
        let sea = [BiomeId(5), BiomeId(10), BiomeId(16)];
        for i in 0..500 {
            let (x, z) = (i as f64 * 97.0, i as f64 * -53.0);
            let from_tree = resolver.classify(x, z).unwrap();
            let legacy_surface = legacy.classify_legacy(x, z).unwrap().surface();
            assert_eq!(
                sea.contains(&from_tree),
                legacy_surface == SurfaceType::Sea,
                "Sea areas diverge at ({x}, {z})"
            );
        }
    }
}
