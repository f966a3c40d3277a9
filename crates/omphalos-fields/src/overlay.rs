//! Temporary modifier layers that blend into a noise field and fade out.
//!
//! Overlay cells live in `[0, 1]` with `0.5` as the neutral value. When
//! combined with a field each cell acts as a multiplicative factor of
//! `2 * cell`, so neutral leaves the field untouched. Every update pulls the
//! overlay back toward neutral; once it has settled the overlay retires.

use crate::grid::{Grid, clamp_decay_rate, clip_unit};
use crate::noise_field::NoiseField;

/// The neutral overlay value (factor 1.0).
pub const NEUTRAL: f64 = 0.5;

/// Maximum distance from [`NEUTRAL`] at which a cell counts as settled.
pub const SETTLE_TOLERANCE: f64 = 0.01;

/// Lifecycle of an overlay.
///
/// `Inactive` is terminal: the owner stops applying and updating the overlay
/// and discards it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    Active,
    Inactive,
}

/// A neutral-centered modifier grid.
#[derive(Clone, Debug)]
pub struct Overlay {
    decay_rate: f64,
    grid: Grid,
    state: OverlayState,
}

impl Overlay {
    /// Create a fully neutral, active overlay. `decay_rate` is clamped into `[0, 1)`.
    pub fn new(width: usize, height: usize, decay_rate: f64) -> Self {
        Self {
            decay_rate: clamp_decay_rate(decay_rate),
            grid: Grid::filled(width, height, NEUTRAL),
            state: OverlayState::Active,
        }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn decay_rate(&self) -> f64 {
        self.decay_rate
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == OverlayState::Active
    }

    /// Blend a circular effect centred on `(x, y)`.
    ///
    /// Each cell within `radius` moves halfway toward
    /// `0.5 + intensity * falloff`, so repeated applications converge on the
    /// target instead of stacking. Cells at exactly `radius` are pulled
    /// halfway toward neutral.
    pub fn apply_effect(&mut self, x: i64, y: i64, radius: u32, intensity: f64) {
        self.grid.for_each_in_radius(x, y, radius, |cell, falloff| {
            let effect = NEUTRAL + intensity * falloff;
            *cell = clip_unit(*cell * 0.5 + effect * 0.5);
        });
    }

    /// Decay every cell toward neutral and retire the overlay once settled.
    ///
    /// Returns the state after the update.
    pub fn update(&mut self) -> OverlayState {
        let rate = self.decay_rate;
        self.grid
            .map_in_place(|v| clip_unit(v * (1.0 - rate) + NEUTRAL * rate));

        let settled = self
            .grid
            .as_slice()
            .iter()
            .all(|v| (v - NEUTRAL).abs() <= SETTLE_TOLERANCE);
        if settled {
            self.state = OverlayState::Inactive;
        }
        self.state
    }

    /// Overlay value at a cell, or [`NEUTRAL`] outside the overlay.
    pub fn get_value(&self, x: i64, y: i64) -> f64 {
        self.grid.get(x, y).unwrap_or(NEUTRAL)
    }

    /// Value at a float coordinate (truncated), or [`NEUTRAL`] outside.
    pub fn value_at(&self, x: f64, y: f64) -> f64 {
        self.grid
            .locate(x, y)
            .map_or(NEUTRAL, |(x, y)| self.get_value(x, y))
    }

    /// Multiplicative factor at a cell: `2 * value` (1.0 when neutral).
    pub fn factor(&self, x: i64, y: i64) -> f64 {
        self.get_value(x, y) * 2.0
    }

    /// Combined value of one field cell, as in [`combine_with_field`].
    ///
    /// [`combine_with_field`]: Overlay::combine_with_field
    pub fn combine_cell(&self, field: &NoiseField, x: i64, y: i64) -> f64 {
        clip_unit(field.get_value(x, y) * self.factor(x, y))
    }

    /// Multiply `field` by this overlay's factors, clipped to `[0, 1]`.
    ///
    /// Pure: neither operand is modified. The result has the field's
    /// dimensions; field cells the overlay does not cover use a neutral factor.
    pub fn combine_with_field(&self, field: &NoiseField) -> Grid {
        Grid::from_fn(field.width(), field.height(), |x, y| {
            self.combine_cell(field, x as i64, y as i64)
        })
    }

    /// Read-only view of the underlying grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
