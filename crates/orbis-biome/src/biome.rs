//! Biome definition: the terminal result of classification.

/// Unique numeric identifier for a biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

/// Full descriptor for a biome type.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDef {
    /// Stable numeric identifier, unique within a registry.
    pub id: BiomeId,
    /// Human-readable biome name (e.g., "temperate_forest"), unique within a registry.
    pub name: String,
    /// Display color used by consumers when blending biome output.
    pub color: [u8; 3],
}

impl BiomeDef {
    /// Convenience constructor.
    pub fn new(id: u16, name: impl Into<String>, color: [u8; 3]) -> Self {
        Self {
            id: BiomeId(id),
            name: name.into(),
            color,
        }
    }
}
