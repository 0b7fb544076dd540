//! Seeded 2D noise fields.
//!
//! The classifiers only ever see noise through [`NoiseSource`]. Fields are
//! value types carrying their seed: "reseeding" builds a new field instead of
//! mutating one that other threads may be sampling.

use std::fmt;

use noise::{NoiseFn, OpenSimplex};

use crate::seed::fold_seed;

/// A deterministic, seeded 2D noise function returning values in `[-1, 1]`.
pub trait NoiseSource: Send + Sync {
    /// Build a field for `seed`. Two fields built from the same seed sample identically.
    fn with_seed(seed: i64) -> Self
    where
        Self: Sized;

    /// The seed this field was built from.
    fn seed(&self) -> i64;

    /// Sample the field at `(x, z)`.
    fn sample(&self, x: f64, z: f64) -> f64;
}

/// Peak magnitude of the `noise` crate's 2D OpenSimplex output.
///
/// The raw field stays within about `±0.544`; dividing by this stretches it
/// over `[-1, 1]` so layer ranges near the ends are reachable.
const OPEN_SIMPLEX_2D_AMPLITUDE: f64 = 0.544;

/// [`NoiseSource`] backed by the `noise` crate's 2D OpenSimplex, rescaled to `[-1, 1]`.
#[derive(Clone)]
pub struct OpenSimplexField {
    seed: i64,
    noise: OpenSimplex,
}

impl NoiseSource for OpenSimplexField {
    fn with_seed(seed: i64) -> Self {
        Self {
            seed,
            noise: OpenSimplex::new(fold_seed(seed)),
        }
    }

    fn seed(&self) -> i64 {
        self.seed
    }

    #[inline]
    fn sample(&self, x: f64, z: f64) -> f64 {
        // Rare peaks sit slightly above the measured amplitude.
        (self.noise.get([x, z]) / OPEN_SIMPLEX_2D_AMPLITUDE).clamp(-1.0, 1.0)
    }
}

impl fmt::Debug for OpenSimplexField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenSimplexField")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
