//! Coverage statistics and color mixing over blended chunks.

use hashbrown::HashMap;
use orbis_biome::{BiomeId, WeightMap};

/// Display data for one biome.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeInfo {
    pub name: String,
    pub color: [u8; 3],
}

pub type Palette = HashMap<BiomeId, BiomeInfo>;

/// Weighted mix of the biome colors at cell `index`.
///
/// Channels are truncated, matching a plain `as u8` conversion of the sums.
pub fn blend_color(map: &WeightMap, index: usize, palette: &Palette) -> [u8; 3] {
    let channel = |c: usize| {
        map.weighted(index, |biome| {
            palette
                .get(&biome)
                .map_or(0.0, |info| f64::from(info.color[c]))
        })
        .clamp(0.0, 255.0) as u8
    };
    [channel(0), channel(1), channel(2)]
}

/// Running totals over every blended chunk.
#[derive(Debug, Default)]
pub struct CoverageStats {
    chunks: u64,
    chain_total: u64,
    covered_cells: u64,
    uncovered_cells: u64,
    max_deviation: f64,
    blend_time_us: u64,
    biome_weight: HashMap<BiomeId, f64>,
}

impl CoverageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk in. `cells` limits which cell indices count, for chunks
    /// that overhang the area edge.
    pub fn record(&mut self, map: &WeightMap, cells: impl IntoIterator<Item = usize>, blend_time_us: u64) {
        self.chunks += 1;
        self.chain_total += map.len() as u64;
        self.blend_time_us += blend_time_us;

        for index in cells {
            let sum = map.weight_sum(index);
            if sum == 0.0 {
                self.uncovered_cells += 1;
                continue;
            }
            self.covered_cells += 1;
            self.max_deviation = self.max_deviation.max((sum - 1.0).abs());
            for entry in map {
                let weight = entry.weights()[index];
                if weight > 0.0 {
                    *self.biome_weight.entry(entry.biome()).or_insert(0.0) += weight;
                }
            }
        }
    }

    pub fn chunks(&self) -> u64 {
        self.chunks
    }

    pub fn covered_cells(&self) -> u64 {
        self.covered_cells
    }

    pub fn uncovered_cells(&self) -> u64 {
        self.uncovered_cells
    }

    /// Largest distance of a covered cell's weight sum from 1.
    pub fn max_deviation(&self) -> f64 {
        self.max_deviation
    }

    pub fn mean_chain_length(&self) -> f64 {
        if self.chunks == 0 {
            0.0
        } else {
            self.chain_total as f64 / self.chunks as f64
        }
    }

    pub fn mean_blend_time_us(&self) -> u64 {
        self.blend_time_us.checked_div(self.chunks).unwrap_or(0)
    }

    /// Share of the covered area per biome, largest first.
    pub fn shares(&self) -> Vec<(BiomeId, f64)> {
        if self.covered_cells == 0 {
            return Vec::new();
        }
        let total = self.covered_cells as f64;
        let mut shares: Vec<_> = self
            .biome_weight
            .iter()
            .map(|(&biome, &weight)| (biome, weight / total))
            .collect();
        shares.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        shares
    }
}
