//! Sparse per-chunk biome weights stored as a singly linked chain.

use hashbrown::HashMap;

use crate::biome::BiomeId;

/// One biome's weights for every cell of a chunk, linked to the next biome.
#[derive(Debug)]
pub struct WeightEntry {
    biome: BiomeId,
    weights: Box<[f64]>,
    next: Option<Box<WeightEntry>>,
}

impl WeightEntry {
    /// Biome this entry weighs.
    pub fn biome(&self) -> BiomeId {
        self.biome
    }

    /// Weights indexed by `zi * chunk_width + xi`.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Next entry in the chain.
    pub fn next(&self) -> Option<&WeightEntry> {
        self.next.as_deref()
    }
}

/// The blend result for one chunk: a chain with one entry per contributing biome.
///
/// Only biomes that received a nonzero weight somewhere in the chunk have an
/// entry, in the order they were first encountered. For every covered cell the
/// weights across the chain sum to 1.
#[derive(Debug)]
pub struct WeightMap {
    head: Option<Box<WeightEntry>>,
    chunk_width: usize,
}

impl WeightMap {
    /// Width of the chunk this map covers.
    pub fn chunk_width(&self) -> usize {
        self.chunk_width
    }

    /// Number of cells per entry.
    pub fn cell_count(&self) -> usize {
        self.chunk_width * self.chunk_width
    }

    /// First entry of the chain.
    pub fn head(&self) -> Option<&WeightEntry> {
        self.head.as_deref()
    }

    /// Iterate the chain from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Number of biomes in the chain.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// `true` if no biome contributed to any cell.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Total weight of cell `index` over the chain; 1 for covered cells, 0 otherwise.
    pub fn weight_sum(&self, index: usize) -> f64 {
        self.iter().map(|entry| entry.weights[index]).sum()
    }

    /// Weight of `biome` in cell `index`, 0 if the biome has no entry.
    pub fn weight_of(&self, biome: BiomeId, index: usize) -> f64 {
        self.iter()
            .find(|entry| entry.biome == biome)
            .map_or(0.0, |entry| entry.weights[index])
    }

    /// Weighted sum of a per-biome attribute at cell `index`.
    pub fn weighted(&self, index: usize, mut attribute: impl FnMut(BiomeId) -> f64) -> f64 {
        self.iter()
            .map(|entry| attribute(entry.biome) * entry.weights[index])
            .sum()
    }

    /// The biome with the largest weight in cell `index`. Ties go to the earlier entry.
    pub fn dominant(&self, index: usize) -> Option<BiomeId> {
        let mut best: Option<(BiomeId, f64)> = None;
        for entry in self.iter() {
            let weight = entry.weights[index];
            if weight > 0.0 && best.is_none_or(|(_, w)| weight > w) {
                best = Some((entry.biome, weight));
            }
        }
        best.map(|(biome, _)| biome)
    }
}

impl Drop for WeightMap {
    fn drop(&mut self) {
        // Unlink iteratively so long chains cannot overflow the stack.
        let mut next = self.head.take();
        while let Some(mut entry) = next {
            next = entry.next.take();
        }
    }
}

impl<'a> IntoIterator for &'a WeightMap {
    type Item = &'a WeightEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the entries of a [`WeightMap`].
pub struct Iter<'a> {
    next: Option<&'a WeightEntry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a WeightEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.next?;
        self.next = entry.next.as_deref();
        Some(entry)
    }
}

/// Accumulates weights per biome, creating an entry the first time a biome
/// receives weight.
pub(crate) struct WeightMapBuilder {
    chunk_width: usize,
    slots: HashMap<BiomeId, usize>,
    entries: Vec<(BiomeId, Box<[f64]>)>,
}

impl WeightMapBuilder {
    pub(crate) fn new(chunk_width: usize) -> Self {
        Self {
            chunk_width,
            slots: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn set(&mut self, biome: BiomeId, index: usize, weight: f64) {
        let cells = self.chunk_width * self.chunk_width;
        let entries = &mut self.entries;
        let slot = *self.slots.entry(biome).or_insert_with(|| {
            entries.push((biome, vec![0.0; cells].into_boxed_slice()));
            entries.len() - 1
        });
        self.entries[slot].1[index] = weight;
    }

    /// Link the entries head-first in first-seen order.
    pub(crate) fn finish(self) -> WeightMap {
        let mut head = None;
        for (biome, weights) in self.entries.into_iter().rev() {
            head = Some(Box::new(WeightEntry {
                biome,
                weights,
                next: head,
            }));
        }
        WeightMap {
            head,
            chunk_width: self.chunk_width,
        }
    }
}
