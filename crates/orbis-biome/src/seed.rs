//! Deterministic seed and value utilities.
//!
//! Scatter-point jitter is derived from a hash of the world seed and the grid
//! cell, never from the noise fields, so any chunk can recompute any point
//! without shared state.

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Fold a 64-bit seed into the 32-bit seed accepted by the noise backend.
///
/// Both halves contribute, so seeds differing only in their high bits still
/// produce different fields.
#[inline]
pub fn fold_seed(seed: i64) -> u32 {
    let bits = seed as u64;
    (bits ^ (bits >> 32)) as u32
}

/// 64-bit avalanche finalizer (splitmix64).
#[inline]
fn mix64(mut v: u64) -> u64 {
    v ^= v >> 30;
    v = v.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    v ^= v >> 27;
    v = v.wrapping_mul(0x94d0_49bb_1331_11eb);
    v ^= v >> 31;
    v
}

/// Derive a u64 hash for a scatter grid cell from the world seed and cell coordinates.
///
/// A fixed integer mix, so scatter points are stable across runs, threads,
/// platforms, and toolchains.
#[inline]
pub fn derive_cell_seed(world_seed: i64, cell_x: i64, cell_z: i64) -> u64 {
    let h = mix64(world_seed as u64 ^ 0x9e37_79b9_7f4a_7c15);
    let h = mix64(h ^ (cell_x as u64).wrapping_mul(0xc2b2_ae3d_27d4_eb4f));
    mix64(h ^ (cell_z as u64).wrapping_mul(0x1656_67b1_9e37_79f9))
}

/// Split a 64-bit hash into two independent values in `[0, 1)`.
#[inline]
pub(crate) fn unit_pair(hash: u64) -> (f64, f64) {
    const SCALE: f64 = 1.0 / 4_294_967_296.0;
    ((hash >> 32) as f64 * SCALE, (hash & 0xFFFF_FFFF) as f64 * SCALE)
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Round `value` to `1 / precision` steps, halves rounding up.
///
/// `precision = 100.0` keeps two decimals: `0.125 -> 0.13`, `-0.125 -> -0.12`.
#[inline]
pub fn round_to_precision(value: f64, precision: f64) -> f64 {
    (value * precision + 0.5).floor() / precision
}
