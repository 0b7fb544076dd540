//! Blends a rectangular area of chunks on the worker pool and reports biome
//! coverage through the log.

mod stats;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use orbis_biome::presets;
use orbis_biome::{
    AsyncChunkBlender, BiomeBlender, BlendError, BlendTask, BlendedChunk, ChunkOrigin, ClassifyError,
    Classifier, LegacyBiome, LegacyClassifier, OpenSimplexField, RegionResolver, TreeError,
};
use orbis_config::{ClassifierKind, CliArgs, Config};
use tracing::{debug, info, warn};

use crate::stats::{BiomeInfo, CoverageStats, Palette, blend_color};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("failed to build classification tree: {0}")]
    Tree(#[from] TreeError),
    #[error("invalid blend settings: {0}")]
    Blend(#[from] BlendError),
    #[error("failed to start blend workers: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("chunk at ({x}, {z}) failed: {source}")]
    Chunk {
        x: i64,
        z: i64,
        #[source]
        source: ClassifyError,
    },
    #[error("workers went idle with {received} of {expected} chunks delivered")]
    Stalled { received: usize, expected: usize },
}

/// Build the configured classifier and the palette of every biome it can return.
fn build_classifier(kind: ClassifierKind) -> Result<(Arc<dyn Classifier>, Palette), DemoError> {
    let tree = match kind {
        ClassifierKind::Legacy => {
            let palette: Palette = LegacyBiome::ALL
                .into_iter()
                .map(|biome| {
                    let info = BiomeInfo {
                        name: biome.name().to_string(),
                        color: biome.color(),
                    };
                    (biome.id(), info)
                })
                .collect();
            let classifier: Arc<dyn Classifier> =
                Arc::new(LegacyClassifier::<OpenSimplexField>::default());
            return Ok((classifier, palette));
        }
        ClassifierKind::LegacyTree => presets::legacy_tree()?,
        ClassifierKind::Orbis => presets::orbis_tree()?,
    };

    let palette: Palette = tree
        .registry()
        .biomes()
        .iter()
        .map(|def| {
            let info = BiomeInfo {
                name: def.name.clone(),
                color: def.color,
            };
            (def.id, info)
        })
        .collect();
    debug!(
        dimension = tree.dimension(),
        regions = tree.regions().len(),
        "classification tree ready"
    );
    let resolver: Arc<dyn Classifier> =
        Arc::new(RegionResolver::<OpenSimplexField>::new(Arc::new(tree)));
    Ok((resolver, palette))
}

/// Chunk origins covering `width × height`, row by row.
fn chunk_origins(width: u32, height: u32, chunk_width: u32) -> Vec<ChunkOrigin> {
    let step = chunk_width.max(1) as usize;
    (0..height)
        .step_by(step)
        .flat_map(|z| {
            (0..width)
                .step_by(step)
                .map(move |x| ChunkOrigin::new(i64::from(x), i64::from(z)))
        })
        .collect()
}

struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl Raster {
    fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width * height],
        }
    }

    fn mean_color(&self) -> [f64; 3] {
        let n = self.pixels.len().max(1) as f64;
        let mut sum = [0.0; 3];
        for pixel in &self.pixels {
            for c in 0..3 {
                sum[c] += f64::from(pixel[c]);
            }
        }
        sum.map(|s| s / n)
    }
}

/// Write a finished chunk into the raster and the statistics.
fn absorb(
    chunk: BlendedChunk,
    chunk_width: usize,
    palette: &Palette,
    raster: &mut Raster,
    stats: &mut CoverageStats,
) -> Result<(), DemoError> {
    let BlendedChunk {
        origin,
        result,
        blend_time_us,
    } = chunk;
    let map = result.map_err(|source| DemoError::Chunk {
        x: origin.x,
        z: origin.z,
        source,
    })?;

    // Chunks on the far edges may overhang the area.
    let (ox, oz) = (origin.x as usize, origin.z as usize);
    let cols = chunk_width.min(raster.width - ox);
    let rows = chunk_width.min(raster.height - oz);
    let cells: Vec<usize> = (0..rows)
        .flat_map(|zi| (0..cols).map(move |xi| zi * chunk_width + xi))
        .collect();

    for &index in &cells {
        let (xi, zi) = (index % chunk_width, index / chunk_width);
        raster.pixels[(oz + zi) * raster.width + ox + xi] = blend_color(&map, index, palette);
    }
    stats.record(&map, cells, blend_time_us);
    Ok(())
}

fn run(config: &Config) -> Result<(), DemoError> {
    let start = Instant::now();
    let (classifier, palette) = build_classifier(config.world.classifier)?;
    let chunk_width = config.blend.chunk_width as usize;
    let blender = Arc::new(BiomeBlender::new(
        config.blend.point_frequency,
        config.blend.min_blend_radius,
        chunk_width,
    )?);
    info!(
        classifier = ?config.world.classifier,
        blend_radius = blender.blend_radius(),
        spacing = blender.sampler().spacing(),
        "blender configured"
    );

    let threads = config.workers.thread_count(num_cpus::get());
    let pool = AsyncChunkBlender::new(
        threads,
        config.workers.max_concurrent as usize,
        config.workers.result_capacity as usize,
        blender,
        classifier,
    )
    .map_err(DemoError::Spawn)?;

    let origins = chunk_origins(config.world.width, config.world.height, config.blend.chunk_width);
    let expected = origins.len();
    let mut raster = Raster::new(config.world.width, config.world.height);
    let mut stats = CoverageStats::new();
    let mut received = 0;
    let mut queue = origins.into_iter().map(|origin| BlendTask {
        origin,
        seed: config.world.seed,
    });
    let mut next = queue.next();

    while received < expected {
        // Submit until the pool pushes back.
        while let Some(task) = next {
            match pool.submit(task) {
                Ok(()) => next = queue.next(),
                Err(task) => {
                    next = Some(task);
                    break;
                }
            }
        }

        let results = pool.drain_results();
        if results.is_empty() {
            if next.is_none() && pool.in_flight_count() == 0 && received < expected {
                // A result may have landed between the drain and the count.
                let late = pool.drain_results();
                if late.is_empty() {
                    return Err(DemoError::Stalled { received, expected });
                }
                for chunk in late {
                    received += 1;
                    absorb(chunk, chunk_width, &palette, &mut raster, &mut stats)?;
                }
                continue;
            }
            std::thread::sleep(Duration::from_millis(1));
            continue;
        }
        for chunk in results {
            received += 1;
            absorb(chunk, chunk_width, &palette, &mut raster, &mut stats)?;
        }
    }

    let elapsed = start.elapsed();
    info!(
        chunks = stats.chunks(),
        threads,
        elapsed_ms = elapsed.as_millis() as u64,
        mean_blend_us = stats.mean_blend_time_us(),
        "blended {}x{} area",
        config.world.width,
        config.world.height
    );
    info!(
        mean_chain_length = stats.mean_chain_length(),
        max_weight_deviation = stats.max_deviation(),
        covered_cells = stats.covered_cells(),
        "weight maps"
    );
    if stats.uncovered_cells() > 0 {
        warn!(cells = stats.uncovered_cells(), "cells without any scatter point in range");
    }
    let [r, g, b] = raster.mean_color();
    debug!("mean color ({r:.1}, {g:.1}, {b:.1})");

    for (biome, share) in stats.shares() {
        let name = palette.get(&biome).map_or("unknown", |info| info.name.as_str());
        info!(biome = name, id = biome.0, "{:>6.2}% of area", share * 100.0);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(Config::default_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    orbis_log::init_logging(Some(&config_dir.join("logs")), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
