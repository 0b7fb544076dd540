//! Legacy flat classifier: 15 fixed biomes chosen by thresholds.
//!
//! Kept as a baseline and as a reference for the one-level tree in
//! [`presets::legacy_tree`](crate::presets::legacy_tree), which must agree with it.

use crate::biome::{BiomeDef, BiomeId};
use crate::error::ClassifyError;
use crate::noise_source::{NoiseSource, OpenSimplexField};
use crate::region::{NoiseRange, SurfaceBands, SurfaceType};
use crate::resolver::Classifier;
use crate::seed::round_to_precision;

/// Values are rounded to two decimals throughout.
const PRECISION: f64 = 100.0;

const LOW: NoiseRange = NoiseRange::new(-1.0, -0.33);
const MID: NoiseRange = NoiseRange::new(-0.32, 0.33);
const HIGH: NoiseRange = NoiseRange::new(0.34, 1.0);

/// Climate band chosen by the region noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Climate {
    Hot,
    Temperate,
    Cold,
}

impl Climate {
    /// All climates, in threshold order.
    pub const ALL: [Self; 3] = [Self::Hot, Self::Temperate, Self::Cold];

    /// Climate for a rounded region-noise value: `<= -0.33` hot, `[-0.32, 0.33]`
    /// temperate, `>= 0.34` cold.
    pub fn from_noise(value: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|climate| climate.range().contains(value))
    }

    /// Region-noise range selecting this climate.
    pub const fn range(self) -> NoiseRange {
        match self {
            Self::Hot => LOW,
            Self::Temperate => MID,
            Self::Cold => HIGH,
        }
    }

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Temperate => "temperate",
            Self::Cold => "cold",
        }
    }
}

/// One of the 15 legacy biomes. Discriminants are the biome ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum LegacyBiome {
    HotDarkerRed = 1,
    HotDarkRed = 2,
    HotRed = 3,
    HotYellow = 4,
    HotCyan = 5,
    TemperateBlue = 6,
    TemperateDarkYellow = 7,
    TemperateGreen = 8,
    TemperateDarkGreen = 9,
    TemperateDarkerGreen = 10,
    ColdDarkBlue = 11,
    ColdDarkerYellow = 12,
    ColdMagenta = 13,
    ColdDarkMagenta = 14,
    ColdDarkerMagenta = 15,
}

struct Row {
    biome: LegacyBiome,
    name: &'static str,
    climate: Climate,
    surface: SurfaceType,
    range: NoiseRange,
    color: [u8; 3],
}

const fn row(
    biome: LegacyBiome,
    name: &'static str,
    climate: Climate,
    surface: SurfaceType,
    range: NoiseRange,
    color: [u8; 3],
) -> Row {
    Row {
        biome,
        name,
        climate,
        surface,
        range,
        color,
    }
}

use Climate::{Cold, Hot, Temperate};
use SurfaceType::{Land, Sea, Shore};

/// Indexed by `id - 1`.
const TABLE: [Row; 15] = [
    row(LegacyBiome::HotDarkerRed, "hot_darker_red", Hot, Land, LOW, [124, 0, 0]),
    row(LegacyBiome::HotDarkRed, "hot_dark_red", Hot, Land, MID, [178, 0, 0]),
    row(LegacyBiome::HotRed, "hot_red", Hot, Land, HIGH, [255, 0, 0]),
    row(LegacyBiome::HotYellow, "hot_yellow", Hot, Shore, NoiseRange::FULL, [255, 255, 0]),
    row(LegacyBiome::HotCyan, "hot_cyan", Hot, Sea, NoiseRange::FULL, [0, 255, 255]),
    row(LegacyBiome::TemperateBlue, "temperate_blue", Temperate, Sea, NoiseRange::FULL, [0, 0, 255]),
    row(LegacyBiome::TemperateDarkYellow, "temperate_dark_yellow", Temperate, Shore, NoiseRange::FULL, [178, 178, 0]),
    row(LegacyBiome::TemperateGreen, "temperate_green", Temperate, Land, LOW, [0, 255, 0]),
    row(LegacyBiome::TemperateDarkGreen, "temperate_dark_green", Temperate, Land, MID, [0, 178, 0]),
    row(LegacyBiome::TemperateDarkerGreen, "temperate_darker_green", Temperate, Land, HIGH, [0, 124, 0]),
    row(LegacyBiome::ColdDarkBlue, "cold_dark_blue", Cold, Sea, NoiseRange::FULL, [0, 0, 178]),
    row(LegacyBiome::ColdDarkerYellow, "cold_darker_yellow", Cold, Shore, NoiseRange::FULL, [124, 124, 0]),
    row(LegacyBiome::ColdMagenta, "cold_magenta", Cold, Land, LOW, [255, 0, 255]),
    row(LegacyBiome::ColdDarkMagenta, "cold_dark_magenta", Cold, Land, MID, [178, 0, 178]),
    row(LegacyBiome::ColdDarkerMagenta, "cold_darker_magenta", Cold, Land, HIGH, [124, 0, 124]),
];

impl LegacyBiome {
    /// All 15 biomes in id order.
    pub const ALL: [Self; 15] = [
        Self::HotDarkerRed,
        Self::HotDarkRed,
        Self::HotRed,
        Self::HotYellow,
        Self::HotCyan,
        Self::TemperateBlue,
        Self::TemperateDarkYellow,
        Self::TemperateGreen,
        Self::TemperateDarkGreen,
        Self::TemperateDarkerGreen,
        Self::ColdDarkBlue,
        Self::ColdDarkerYellow,
        Self::ColdMagenta,
        Self::ColdDarkMagenta,
        Self::ColdDarkerMagenta,
    ];

    #[inline]
    fn row(self) -> &'static Row {
        &TABLE[self as usize - 1]
    }

    /// Numeric id (1..=15).
    pub const fn id(self) -> BiomeId {
        BiomeId(self as u16)
    }

    /// Biome for a numeric id, if it is one of the 15.
    pub fn from_id(id: BiomeId) -> Option<Self> {
        Self::ALL.get((id.0 as usize).checked_sub(1)?).copied()
    }

    /// Snake-case name, e.g. `"hot_darker_red"`.
    pub fn name(self) -> &'static str {
        self.row().name
    }

    /// Climate band the biome belongs to.
    pub fn climate(self) -> Climate {
        self.row().climate
    }

    /// Surface type the biome belongs to.
    pub fn surface(self) -> SurfaceType {
        self.row().surface
    }

    /// Biome-noise range within its climate and surface. Shore and sea biomes
    /// cover the full range.
    pub fn range(self) -> NoiseRange {
        self.row().range
    }

    /// RGB map color.
    pub fn color(self) -> [u8; 3] {
        self.row().color
    }

    /// Registry definition for this biome.
    pub fn def(self) -> BiomeDef {
        BiomeDef::new(self as u16, self.name(), self.color())
    }

    /// The biome for `climate` and `surface` whose range contains the rounded
    /// biome-noise `value`.
    pub fn lookup(climate: Climate, surface: SurfaceType, value: f64) -> Option<Self> {
        TABLE
            .iter()
            .find(|row| row.climate == climate && row.surface == surface && row.range.contains(value))
            .map(|row| row.biome)
    }
}

/// Seeds, zooms, and bands of the legacy classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct LegacySettings {
    /// Seed of the climate (region) field.
    pub region_seed: i64,
    /// Zoom of the climate field.
    pub region_zoom: f64,
    /// Seed of the surface-type field.
    pub type_seed: i64,
    /// Zoom of the surface-type field.
    pub type_zoom: f64,
    /// Seed of the biome field.
    pub biome_seed: i64,
    /// Zoom of the biome field.
    pub biome_zoom: f64,
    /// Land/shore/sea bands over the type field.
    pub bands: SurfaceBands,
}

impl Default for LegacySettings {
    fn default() -> Self {
        Self {
            region_seed: 1_242_352_482_951_642_511,
            region_zoom: 2500.0,
            type_seed: 2_235_650_352_155_145,
            type_zoom: 850.0,
            biome_seed: 235_623_651_371_436_421,
            biome_zoom: 300.0,
            bands: SurfaceBands {
                land: NoiseRange::new(0.31, 1.0),
                shore: NoiseRange::new(0.15, 0.30),
                sea: NoiseRange::new(-1.0, 0.14),
            },
        }
    }
}

/// Flat classifier over three noise fields: climate, surface type, and biome.
pub struct LegacyClassifier<N = OpenSimplexField> {
    settings: LegacySettings,
    region_field: N,
    type_field: N,
    biome_field: N,
}

impl<N: NoiseSource> LegacyClassifier<N> {
    /// Build the three fields from `settings`.
    pub fn new(settings: LegacySettings) -> Self {
        Self {
            region_field: N::with_seed(settings.region_seed),
            type_field: N::with_seed(settings.type_seed),
            biome_field: N::with_seed(settings.biome_seed),
            settings,
        }
    }

    /// Seeds, zooms, and bands in use.
    pub fn settings(&self) -> &LegacySettings {
        &self.settings
    }

    /// Classify `(x, z)` into one of the 15 legacy biomes.
    pub fn classify_legacy(&self, x: f64, z: f64) -> Result<LegacyBiome, ClassifyError> {
        let s = &self.settings;
        let region_value = sample(&self.region_field, x, z, s.region_zoom);
        let type_value = sample(&self.type_field, x, z, s.type_zoom);

        let surface = s
            .bands
            .surface_for(type_value)
            .ok_or(ClassifyError::NoSurfaceType {
                x,
                z,
                value: type_value,
            })?;
        let climate = Climate::from_noise(region_value).ok_or_else(|| {
            ClassifyError::NoMatchingLayer {
                scope: "legacy climate".to_string(),
                surface,
                value: region_value,
                x,
                z,
            }
        })?;

        let biome_value = sample(&self.biome_field, x, z, s.biome_zoom);
        LegacyBiome::lookup(climate, surface, biome_value).ok_or_else(|| {
            ClassifyError::NoMatchingLayer {
                scope: climate.name().to_string(),
                surface,
                value: biome_value,
                x,
                z,
            }
        })
    }
}

impl Default for LegacyClassifier {
    fn default() -> Self {
        Self::new(LegacySettings::default())
    }
}

impl<N: NoiseSource> Classifier for LegacyClassifier<N> {
    fn classify(&self, x: f64, z: f64) -> Result<BiomeId, ClassifyError> {
        self.classify_legacy(x, z).map(LegacyBiome::id)
    }
}

#[inline]
fn sample<N: NoiseSource>(field: &N, x: f64, z: f64, zoom: f64) -> f64 {
    round_to_precision(field.sample(x / zoom, z / zoom), PRECISION)
}
