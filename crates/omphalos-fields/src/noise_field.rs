//! Grid of fractal noise values in `[0, 1]`, generated once at construction.

use crate::fractal::{NoiseParams, fbm, perlin};
use crate::grid::{Grid, clip_unit};

/// Value returned for coordinates outside the field: "neutral / unknown".
pub const NOISE_SENTINEL: f64 = 0.5;

/// A deterministic noise field such as terrain, temperature or population.
///
/// Cell `(x, y)` holds the fractal noise at `(x * scale, y * scale)` mapped
/// from `[-1, 1]` into `[0, 1]`. Identical parameters always produce an
/// identical grid.
#[derive(Clone, Debug)]
pub struct NoiseField {
    params: NoiseParams,
    grid: Grid,
}

impl NoiseField {
    /// Generate a `width` by `height` field.
    pub fn generate(width: usize, height: usize, params: NoiseParams) -> Self {
        let source = perlin(params.seed);
        let scale = params.effective_scale();
        let octaves = params.octaves();

        let grid = Grid::from_fn(width, height, |x, y| {
            let value = fbm(&source, x as f64 * scale, y as f64 * scale, octaves);
            clip_unit((value + 1.0) / 2.0)
        });

        Self { params, grid }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Parameters the field was generated from.
    pub fn params(&self) -> &NoiseParams {
        &self.params
    }

    /// Stored value, or [`NOISE_SENTINEL`] outside the field.
    pub fn get_value(&self, x: i64, y: i64) -> f64 {
        self.grid.get(x, y).unwrap_or(NOISE_SENTINEL)
    }

    /// Value at a float coordinate (truncated), or [`NOISE_SENTINEL`] outside.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        self.grid
            .locate(x, y)
            .map_or(NOISE_SENTINEL, |(x, y)| self.get_value(x, y))
    }

    /// Overwrite a cell, clipping the value into `[0, 1]`.
    ///
    /// Writes outside the field are ignored and return `false`.
    pub fn set_value(&mut self, x: i64, y: i64, value: f64) -> bool {
        self.grid.set(x, y, clip_unit(value))
    }

    /// Read-only view of the underlying grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
