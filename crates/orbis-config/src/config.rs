//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const FILE_NAME: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Area to classify and which classifier to use.
    pub world: WorldConfig,
    /// Scatter-point blending settings.
    pub blend: BlendConfig,
    /// Worker pool sizing.
    pub workers: WorkerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Which classifier drives the blend.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
pub enum ClassifierKind {
    /// Multi-level region tree with sub-regions and context layers.
    #[default]
    Orbis,
    /// The 15-biome flat table expressed as a one-level region tree.
    LegacyTree,
    /// The 15-biome flat threshold classifier.
    Legacy,
}

/// World area and classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Scatter seed.
    pub seed: i64,
    /// Width of the blended area in world units.
    pub width: u32,
    /// Height (z extent) of the blended area in world units.
    pub height: u32,
    /// Classifier whose output is blended.
    pub classifier: ClassifierKind,
}

/// Scatter-point blending settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlendConfig {
    /// Scatter points per world unit along each axis.
    pub point_frequency: f64,
    /// Blend radius before the sampler's maximum gap is added.
    pub min_blend_radius: f64,
    /// Cells per chunk edge.
    pub chunk_width: u32,
}

/// Worker pool sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkerConfig {
    /// Worker thread count (0 = all cores but two).
    pub threads: u32,
    /// Maximum queued chunks before submissions are rejected.
    pub max_concurrent: u32,
    /// Capacity of the finished-chunk channel.
    pub result_capacity: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 235_623_651_371_436_421,
            width: 4096,
            height: 1536,
            classifier: ClassifierKind::default(),
        }
    }
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            point_frequency: 0.04,
            min_blend_radius: 32.0,
            chunk_width: 16,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            max_concurrent: 64,
            result_capacity: 128,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Effective thread count, resolving 0 from `available_cores`.
    pub fn thread_count(&self, available_cores: usize) -> usize {
        match self.threads {
            0 => available_cores.max(2).saturating_sub(2).max(1),
            n => n as usize,
        }
    }
}

impl Config {
    /// Platform config directory for Orbis, e.g. `~/.config/orbis` on Linux.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("orbis"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(FILE_NAME);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(FILE_NAME), serialized).map_err(ConfigError::WriteError)
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(FILE_NAME))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
