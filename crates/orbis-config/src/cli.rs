//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::{ClassifierKind, Config};

/// Orbis biome demo command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orbis", about = "Blend biome maps from layered noise")]
pub struct CliArgs {
    /// Scatter seed.
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Area width in world units.
    #[arg(long)]
    pub width: Option<u32>,

    /// Area height in world units.
    #[arg(long)]
    pub height: Option<u32>,

    /// Classifier to blend with.
    #[arg(long, value_enum)]
    pub classifier: Option<ClassifierKind>,

    /// Scatter points per world unit.
    #[arg(long)]
    pub point_frequency: Option<f64>,

    /// Minimum blend radius.
    #[arg(long)]
    pub blend_radius: Option<f64>,

    /// Worker threads (0 = auto).
    #[arg(long)]
    pub threads: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(w) = args.width {
            self.world.width = w;
        }
        if let Some(h) = args.height {
            self.world.height = h;
        }
        if let Some(kind) = args.classifier {
            self.world.classifier = kind;
        }
        if let Some(freq) = args.point_frequency {
            self.blend.point_frequency = freq;
        }
        if let Some(radius) = args.blend_radius {
            self.blend.min_blend_radius = radius;
        }
        if let Some(threads) = args.threads {
            self.workers.threads = threads;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1024),
            classifier: Some(ClassifierKind::Legacy),
            log_level: Some("debug".to_string()),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.width, 1024);
        assert_eq!(config.world.classifier, ClassifierKind::Legacy);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.world.height, 1536);
        assert_eq!(config.blend.point_frequency, 0.04);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_arguments() {
        let args = CliArgs::try_parse_from([
            "orbis",
            "--seed",
            "-5",
            "--classifier",
            "legacy-tree",
            "--blend-radius",
            "24",
            "--threads",
            "3",
        ])
        .unwrap();
        let mut config = Config::default();
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, -5);
        assert_eq!(config.world.classifier, ClassifierKind::LegacyTree);
        assert_eq!(config.blend.min_blend_radius, 24.0);
        assert_eq!(config.workers.threads, 3);
    }

    #[test]
    fn test_unknown_classifier_rejected() {
        assert!(CliArgs::try_parse_from(["orbis", "--classifier", "voronoi"]).is_err());
    }
}
