//! Deterministic seeded generation utilities.
//!
//! Provides per-layer seed derivation from a world seed, seeded lattice
//! permutation tables for tileable noise, and deterministic trigonometry via
//! `libm` so spherical sampling is bit-identical across platforms.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

// ---------------------------------------------------------------------------
// Seed derivation
// ---------------------------------------------------------------------------

/// Derive the seed of a world layer (terrain, population, temperature).
///
/// Layers are offset from the world seed by a small constant, so a world with
/// seed `s` uses `s`, `s + 1` and `s + 2` for its three noise fields.
#[inline]
pub fn layer_seed(world_seed: u64, offset: u64) -> u64 {
    world_seed.wrapping_add(offset)
}

/// Build a 256-entry lattice permutation table for the given seed.
///
/// The table is a Fisher-Yates shuffle of `0..=255` driven by `ChaCha8Rng`,
/// so the same seed yields the same table on every platform.
pub fn permutation_table(seed: u64) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, slot) in table.iter_mut().enumerate() {
        *slot = i as u8;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    table.shuffle(&mut rng);
    table
}

// ---------------------------------------------------------------------------
// Deterministic math (libm)
// ---------------------------------------------------------------------------

/// Deterministic sine using libm (not platform libc).
#[inline]
pub fn det_sin(x: f64) -> f64 {
    libm::sin(x)
}

/// Deterministic cosine using libm.
#[inline]
pub fn det_cos(x: f64) -> f64 {
    libm::cos(x)
}
