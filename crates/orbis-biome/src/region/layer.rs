//! Layer entries and the value types they are built from.

use std::fmt;

use crate::seed::round_to_precision;

/// Surface category of a coordinate, chosen once per coordinate from the type noise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceType {
    /// Dry land.
    Land,
    /// Transition band between land and sea.
    Shore,
    /// Open water.
    Sea,
}

impl SurfaceType {
    /// All surface types in band-matching order.
    pub const ALL: [Self; 3] = [Self::Land, Self::Shore, Self::Sea];

    /// Lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Land => "land",
            Self::Shore => "shore",
            Self::Sea => "sea",
        }
    }
}

impl fmt::Display for SurfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Closed interval `[min, max]` of noise values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseRange {
    /// Lower bound (inclusive).
    pub min: f64,
    /// Upper bound (inclusive).
    pub max: f64,
}

impl NoiseRange {
    /// The whole noise domain `[-1, 1]`.
    pub const FULL: Self = Self::new(-1.0, 1.0);

    /// Create a range. Bounds are validated when the tree is built.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `value` lies in the range, both ends inclusive.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Position of `value` inside the range, re-mapped linearly to `[-1, 1]`
    /// and rounded to `precision`.
    ///
    /// A zero-width range has no interior, so its context is `0.0`.
    pub fn context(&self, value: f64, precision: f64) -> f64 {
        let width = self.max - self.min;
        if width <= 0.0 {
            return 0.0;
        }
        let t = (value - self.min) / width;
        round_to_precision(t * 2.0 - 1.0, precision)
    }
}

/// One entry of a region's per-surface layer list.
///
/// Either descends into a child region or terminates at a biome, in both cases
/// when the current noise value falls inside `range`.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerDef {
    /// Descend into the named child region.
    Region {
        /// Child region name.
        name: String,
        /// Noise values selecting this layer.
        range: NoiseRange,
    },
    /// Stop at the named biome.
    Biome {
        /// Biome name.
        name: String,
        /// Noise values selecting this layer.
        range: NoiseRange,
    },
}

impl LayerDef {
    /// A child-region layer over `[min, max]`.
    pub fn region(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::Region {
            name: name.into(),
            range: NoiseRange::new(min, max),
        }
    }

    /// A terminal biome layer over `[min, max]`.
    pub fn biome(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::Biome {
            name: name.into(),
            range: NoiseRange::new(min, max),
        }
    }

    /// The referenced region or biome name.
    pub fn name(&self) -> &str {
        match self {
            Self::Region { name, .. } | Self::Biome { name, .. } => name,
        }
    }

    /// The selecting noise range.
    pub fn range(&self) -> NoiseRange {
        match self {
            Self::Region { range, .. } | Self::Biome { range, .. } => *range,
        }
    }
}

/// Per-surface flags telling a region to reuse its parent's context value
/// instead of sampling its own noise field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContextSettings {
    /// Reuse parent context for land coordinates.
    pub use_land_context: bool,
    /// Reuse parent context for shore coordinates.
    pub use_shore_context: bool,
    /// Reuse parent context for sea coordinates.
    pub use_sea_context: bool,
}

impl ContextSettings {
    /// Whether the flag for `surface` is set.
    pub const fn uses_parent_context(&self, surface: SurfaceType) -> bool {
        match surface {
            SurfaceType::Land => self.use_land_context,
            SurfaceType::Shore => self.use_shore_context,
            SurfaceType::Sea => self.use_sea_context,
        }
    }
}
