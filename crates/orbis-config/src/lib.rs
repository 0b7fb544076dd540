//! Runtime configuration for the Orbis biome tools.
//!
//! Settings persist to disk as `config.ron`, can be overridden from the
//! command line via clap, and support hot-reload detection. Every section
//! falls back to defaults for missing fields, so old files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{BlendConfig, ClassifierKind, Config, DebugConfig, WorkerConfig, WorldConfig};
pub use error::ConfigError;
