//! Multi-octave fractal noise.
//!
//! Composites several octaves of 2D gradient noise, each at a higher
//! frequency and lower amplitude than the last, and normalizes the sum by the
//! total amplitude so results stay in `[-1, 1]`. Two sources are supported:
//! the `noise` crate's [`Perlin`] for open planes, and [`TiledPerlin`] for
//! lattices that must repeat with an integer period (seamless wraparound).

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::seed::permutation_table;

/// Smallest noise scale accepted; non-positive scales are clamped up to it.
pub const MIN_SCALE: f64 = 1e-6;

/// Octave layering shared by every fractal sampler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Octaves {
    /// Number of layers. Zero is treated as one.
    pub count: u32,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
}

impl Octaves {
    /// `(frequency, amplitude)` of each octave, starting at `(1, 1)`.
    pub fn layers(self) -> impl Iterator<Item = (f64, f64)> {
        let Octaves {
            count,
            persistence,
            lacunarity,
        } = self;
        (0..count.max(1)).scan((1.0, 1.0), move |state, _| {
            let layer = *state;
            state.0 *= lacunarity;
            state.1 *= persistence;
            Some(layer)
        })
    }
}

/// Generation parameters for a fractal noise field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Seed for deterministic generation.
    pub seed: u64,
    /// Multiplier from cell coordinates to noise coordinates. Smaller values
    /// produce broader features.
    pub scale: f64,
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Amplitude multiplier between successive octaves. Default: 0.5.
    pub persistence: f64,
    /// Frequency multiplier between successive octaves. Default: 2.0.
    pub lacunarity: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            seed: 0,
            scale: 0.1,
            octaves: 6,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl NoiseParams {
    /// Scale clamped to [`MIN_SCALE`].
    pub fn effective_scale(&self) -> f64 {
        self.scale.max(MIN_SCALE)
    }

    pub fn octaves(&self) -> Octaves {
        Octaves {
            count: self.octaves,
            persistence: self.persistence,
            lacunarity: self.lacunarity,
        }
    }
}

/// Fractal Brownian motion over any 2D noise function.
///
/// Returns the amplitude-weighted mean of the octaves, clamped to `[-1, 1]`.
pub fn fbm(source: &impl NoiseFn<f64, 2>, x: f64, y: f64, octaves: Octaves) -> f64 {
    let mut total = 0.0;
    let mut max_amplitude = 0.0;
    for (frequency, amplitude) in octaves.layers() {
        total += source.get([x * frequency, y * frequency]) * amplitude;
        max_amplitude += amplitude;
    }
    normalize(total, max_amplitude)
}

/// Fractal Brownian motion over a lattice that repeats every `repeat` units.
///
/// Each octave's period is `trunc(repeat * frequency)`, so with an integer
/// lacunarity every octave tiles with the same period in input space.
pub fn fbm_tiled(source: &TiledPerlin, x: f64, y: f64, repeat: u32, octaves: Octaves) -> f64 {
    let mut total = 0.0;
    let mut max_amplitude = 0.0;
    for (frequency, amplitude) in octaves.layers() {
        let period = (f64::from(repeat) * frequency) as u32;
        total += source.sample(x * frequency, y * frequency, period, period) * amplitude;
        max_amplitude += amplitude;
    }
    normalize(total, max_amplitude)
}

#[inline]
fn normalize(total: f64, max_amplitude: f64) -> f64 {
    if max_amplitude == 0.0 {
        0.0
    } else {
        (total / max_amplitude).clamp(-1.0, 1.0)
    }
}

/// Build the open-plane source for a seed.
///
/// The `noise` crate seeds with `u32`; the upper half of the seed is dropped.
pub fn perlin(seed: u64) -> Perlin {
    Perlin::new(seed as u32)
}

/// Classic 2D gradient noise whose lattice wraps with a caller-chosen period.
///
/// Lattice corners are reduced modulo the period before hashing, so
/// `sample(x + period_x, y, ..)` equals `sample(x, y, ..)` up to float
/// rounding of the fractional coordinate.
#[derive(Clone, Debug)]
pub struct TiledPerlin {
    perm: [u8; 256],
}

impl TiledPerlin {
    pub fn new(seed: u64) -> Self {
        Self {
            perm: permutation_table(seed),
        }
    }

    #[inline]
    fn hash(&self, ix: i64, iy: i64) -> u8 {
        let a = self.perm[(ix & 255) as usize] as i64;
        self.perm[((a + iy) & 255) as usize]
    }

    /// Sample at `(x, y)` with the lattice repeating every `period_x` by
    /// `period_y` cells. Periods of zero are treated as one.
    pub fn sample(&self, x: f64, y: f64, period_x: u32, period_y: u32) -> f64 {
        let px = i64::from(period_x.max(1));
        let py = i64::from(period_y.max(1));

        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;

        let ix0 = (x0 as i64).rem_euclid(px);
        let iy0 = (y0 as i64).rem_euclid(py);
        let ix1 = (ix0 + 1) % px;
        let iy1 = (iy0 + 1) % py;

        let u = fade(fx);
        let v = fade(fy);

        let n00 = grad(self.hash(ix0, iy0), fx, fy);
        let n10 = grad(self.hash(ix1, iy0), fx - 1.0, fy);
        let n01 = grad(self.hash(ix0, iy1), fx, fy - 1.0);
        let n11 = grad(self.hash(ix1, iy1), fx - 1.0, fy - 1.0);

        lerp(v, lerp(u, n00, n10), lerp(u, n01, n11)).clamp(-1.0, 1.0)
    }
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn octaves(count: u32) -> Octaves {
        Octaves {
            count,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    #[test]
    fn test_octave_layers() {
        let layers: Vec<(f64, f64)> = octaves(3).layers().collect();
        assert_eq!(layers, vec![(1.0, 1.0), (2.0, 0.5), (4.0, 0.25)]);
    }

    #[test]
    fn test_zero_octaves_treated_as_one() {
        assert_eq!(octaves(0).layers().count(), 1);
    }

    #[test]
    fn test_determinism_same_seed_same_coord() {
        let a = fbm(&perlin(42), 3.7, 1.2, octaves(6));
        let b = fbm(&perlin(42), 3.7, 1.2, octaves(6));
        assert_eq!(a, b, "Same seed + same coord must produce identical noise");
    }

    #[test]
    fn test_different_seeds_produce_different_noise() {
        let a = fbm(&perlin(1), 5.3, 5.9, octaves(4));
        let b = fbm(&perlin(999), 5.3, 5.9, octaves(4));
        assert!(
            (a - b).abs() > EPSILON,
            "Different seeds should produce different noise: {a} vs {b}"
        );
    }

    #[test]
    fn test_fbm_within_unit_range() {
        let source = perlin(7);
        for i in 0..50 {
            for j in 0..50 {
                let v = fbm(&source, i as f64 * 0.37, j as f64 * 0.41, octaves(6));
                assert!((-1.0..=1.0).contains(&v), "fbm value {v} out of range");
            }
        }
    }

    #[test]
    fn test_more_octaves_adds_detail() {
        let source = perlin(7);
        let step = 0.05;
        let count = 1000;
        let mut diff_1 = 0.0;
        let mut diff_8 = 0.0;
        for i in 0..count {
            let x = i as f64 * step + 0.123;
            let delta = |n| {
                fbm(&source, x + step, 0.31, octaves(n)) - fbm(&source, x, 0.31, octaves(n))
            };
            diff_1 += delta(1).abs();
            diff_8 += delta(8).abs();
        }
        assert!(
            diff_8 > diff_1,
            "8 octaves should have more high-frequency detail than 1: {diff_1} vs {diff_8}"
        );
    }

    #[test]
    fn test_tiled_sample_repeats_with_period() {
        let source = TiledPerlin::new(3);
        for &(x, y) in &[(0.25, 0.75), (3.5, 1.1), (6.9, 7.3)] {
            let base = source.sample(x, y, 8, 8);
            let shifted_x = source.sample(x + 8.0, y, 8, 8);
            let shifted_y = source.sample(x, y - 8.0, 8, 8);
            assert!((base - shifted_x).abs() < EPSILON, "x period broken at ({x}, {y})");
            assert!((base - shifted_y).abs() < EPSILON, "y period broken at ({x}, {y})");
        }
    }

    #[test]
    fn test_tiled_sample_zero_at_lattice_points() {
        let source = TiledPerlin::new(11);
        assert_eq!(source.sample(2.0, 5.0, 16, 16), 0.0);
    }

    #[test]
    fn test_tiled_sample_continuous_across_seam() {
        let source = TiledPerlin::new(5);
        let period = 4;
        let before = source.sample(4.0 - 1e-7, 1.3, period, period);
        let after = source.sample(0.0, 1.3, period, period);
        assert!(
            (before - after).abs() < 1e-5,
            "Seam discontinuity: {before} vs {after}"
        );
    }

    #[test]
    fn test_fbm_tiled_repeats_in_input_space() {
        let source = TiledPerlin::new(9);
        let a = fbm_tiled(&source, 1.25, 2.5, 4, octaves(5));
        let b = fbm_tiled(&source, 5.25, 2.5, 4, octaves(5));
        assert!((a - b).abs() < EPSILON, "Octave periods must scale with frequency");
        assert!((-1.0..=1.0).contains(&a));
    }

    #[test]
    fn test_effective_scale_clamped() {
        let params = NoiseParams {
            scale: -3.0,
            ..Default::default()
        };
        assert_eq!(params.effective_scale(), MIN_SCALE);
        let params = NoiseParams {
            scale: f64::NAN,
            ..Default::default()
        };
        assert_eq!(params.effective_scale(), MIN_SCALE);
    }
}
