//! Dense row-major 2D scalar buffer shared by every field type.

/// Owned `width * height` buffer of `f64` values stored row by row.
///
/// Dimensions are fixed at construction. All coordinate access is
/// bounds-checked; out-of-range reads return `None` and out-of-range
/// writes are ignored, so callers can map misses to their own sentinel.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Grid {
    /// Create a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Create a zero-initialised grid.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Create a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat index of an integer coordinate, or `None` when outside the grid.
    #[inline]
    pub fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Resolve a float coordinate to a cell.
    ///
    /// A coordinate is inside when `0 <= x < width` and `0 <= y < height`;
    /// it is then truncated toward zero. Non-finite input is outside.
    pub fn locate(&self, x: f64, y: f64) -> Option<(i64, i64)> {
        let inside = x >= 0.0 && y >= 0.0 && x < self.width as f64 && y < self.height as f64;
        inside.then(|| (x as i64, y as i64))
    }

    pub fn get(&self, x: i64, y: i64) -> Option<f64> {
        self.index(x, y).map(|i| self.data[i])
    }

    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut f64> {
        self.index(x, y).map(|i| &mut self.data[i])
    }

    /// Write a cell. Returns `false` (and writes nothing) when out of bounds.
    pub fn set(&mut self, x: i64, y: i64, value: f64) -> bool {
        match self.get_mut(x, y) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // `max(1)` keeps `chunks_exact` valid for zero-width grids (which have no data).
        self.data.chunks_exact(self.width.max(1))
    }

    /// Apply `f` to every cell in place.
    pub fn map_in_place(&mut self, mut f: impl FnMut(f64) -> f64) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Sum of all cells.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Visit every cell within `radius` of `(cx, cy)` with its linear falloff.
    ///
    /// A cell is visited when it lies inside the grid and its Euclidean
    /// distance from the centre is at most `radius`. The falloff is
    /// `1 - distance / radius`, so cells at exactly `radius` are visited with
    /// a falloff of zero. A zero radius visits only the centre with a falloff
    /// of one.
    ///
    /// Only the part of the bounding square that overlaps the grid is walked,
    /// so the cost is bounded by the grid size for any centre and radius.
    pub fn for_each_in_radius(
        &mut self,
        cx: i64,
        cy: i64,
        radius: u32,
        mut f: impl FnMut(&mut f64, f64),
    ) {
        let Some((x0, x1)) = clip_span(cx, radius, self.width) else {
            return;
        };
        let Some((y0, y1)) = clip_span(cy, radius, self.height) else {
            return;
        };
        let (cx, cy) = (i128::from(cx), i128::from(cy));
        let r = f64::from(radius);

        for y in y0..=y1 {
            let dy = y as i128 - cy;
            for x in x0..=x1 {
                let dx = x as i128 - cx;
                let distance = ((dx * dx + dy * dy) as f64).sqrt();
                if distance > r {
                    continue;
                }
                let falloff = if radius == 0 { 1.0 } else { 1.0 - distance / r };
                f(&mut self.data[y * self.width + x], falloff);
            }
        }
    }
}

/// Cell range `[lo, hi]` covered by `centre ± radius` on an axis of `len`
/// cells, or `None` when the two do not overlap.
fn clip_span(centre: i64, radius: u32, len: usize) -> Option<(usize, usize)> {
    let last = i128::try_from(len).ok()? - 1;
    let centre = i128::from(centre);
    let r = i128::from(radius);
    let lo = (centre - r).max(0);
    let hi = (centre + r).min(last);
    (lo <= hi).then(|| (lo as usize, hi as usize))
}

/// Largest accepted decay rate. A rate of one would erase a field in a
/// single tick, so rates live in `[0, 1)`.
pub(crate) const MAX_DECAY_RATE: f64 = 1.0 - f64::EPSILON;

/// Clamp a per-tick decay rate into `[0, MAX_DECAY_RATE]`; NaN becomes 0.
#[inline]
pub(crate) fn clamp_decay_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, MAX_DECAY_RATE)
    }
}

/// Clip a value into `[0, 1]`, mapping NaN to the neutral midpoint.
#[inline]
pub(crate) fn clip_unit(v: f64) -> f64 {
    if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::from_fn(3, 2, |x, y| (y * 10 + x) as f64);
        assert_eq!(grid.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(grid.get(2, 1), Some(12.0));
        let rows: Vec<&[f64]> = grid.rows().collect();
        assert_eq!(rows, vec![&[0.0, 1.0, 2.0][..], &[10.0, 11.0, 12.0][..]]);
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut grid = Grid::zeros(4, 4);
        assert_eq!(grid.get(-1, 0), None);
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 4), None);
        assert!(!grid.set(10, 10, 1.0));
        assert_eq!(grid.sum(), 0.0, "Rejected write must not touch any cell");
    }

    #[test]
    fn test_locate_truncates_and_rejects_outside() {
        let grid = Grid::zeros(10, 5);
        assert_eq!(grid.locate(9.9, 4.5), Some((9, 4)));
        assert_eq!(grid.locate(0.0, 0.0), Some((0, 0)));
        assert_eq!(grid.locate(10.0, 0.0), None);
        assert_eq!(grid.locate(-0.5, 1.0), None);
        assert_eq!(grid.locate(f64::NAN, 1.0), None);
    }

    #[test]
    fn test_radius_visits_disc_with_linear_falloff() {
        let mut grid = Grid::zeros(11, 11);
        grid.for_each_in_radius(5, 5, 2, |cell, falloff| *cell = falloff);

        assert_eq!(grid.get(5, 5), Some(1.0));
        assert_eq!(grid.get(6, 5), Some(0.5));
        assert_eq!(grid.get(7, 5), Some(0.0), "Edge of the disc has zero falloff");
        // (2, 2) offset is outside the disc: sqrt(8) > 2.
        assert_eq!(grid.get(7, 7), Some(0.0));
        assert_eq!(grid.get(8, 5), Some(0.0));
    }

    #[test]
    fn test_radius_clipped_at_grid_edge() {
        let mut grid = Grid::zeros(3, 3);
        let mut visited = 0;
        grid.for_each_in_radius(0, 0, 1, |_, _| visited += 1);
        // Centre, right and below: the other six offsets fall outside.
        assert_eq!(visited, 3);
    }

    #[test]
    fn test_zero_radius_hits_centre_only() {
        let mut grid = Grid::zeros(3, 3);
        grid.for_each_in_radius(1, 1, 0, |cell, falloff| *cell += falloff);
        assert_eq!(grid.sum(), 1.0);
        assert_eq!(grid.get(1, 1), Some(1.0));
    }

    #[test]
    fn test_extreme_centres_do_not_overflow() {
        let mut grid = Grid::zeros(10, 10);
        let mut visited = 0;
        for (cx, cy) in [(i64::MAX, 0), (i64::MIN, 0), (0, i64::MAX), (i64::MIN, i64::MIN)] {
            grid.for_each_in_radius(cx, cy, u32::MAX, |_, _| visited += 1);
        }
        assert_eq!(visited, 0, "Centres far outside the grid touch nothing");

        grid.for_each_in_radius(9, 9, 1, |cell, _| *cell += 1.0);
        grid.for_each_in_radius(i64::MIN, i64::MAX, 3, |cell, _| *cell += 1.0);
        assert_eq!(grid.sum(), 3.0, "Corner disc clipped to three cells");
    }

    #[test]
    fn test_huge_radius_clipped_to_grid() {
        let radius = 20_000;
        let mut grid = Grid::filled(10, 10, -1.0);
        grid.for_each_in_radius(5, 5, radius, |cell, falloff| *cell = falloff);

        for y in 0..10i64 {
            for x in 0..10i64 {
                let (dx, dy) = (x - 5, y - 5);
                let expected = 1.0 - ((dx * dx + dy * dy) as f64).sqrt() / f64::from(radius);
                let got = grid.get(x, y).unwrap();
                assert!(
                    (got - expected).abs() < 1e-15,
                    "Cell ({x}, {y}) falloff {got}, expected {expected}"
                );
            }
        }
    }

    #[test]
    fn test_clip_span() {
        assert_eq!(clip_span(5, 2, 10), Some((3, 7)));
        assert_eq!(clip_span(0, 3, 10), Some((0, 3)));
        assert_eq!(clip_span(12, 2, 10), None);
        assert_eq!(clip_span(11, 2, 10), Some((9, 9)));
        assert_eq!(clip_span(i64::MAX, u32::MAX, 10), None);
        assert_eq!(clip_span(0, 1, 0), None, "Empty axis has no cells");
    }

    #[test]
    fn test_decay_rate_stays_below_one() {
        assert_eq!(clamp_decay_rate(-0.5), 0.0);
        assert_eq!(clamp_decay_rate(f64::NAN), 0.0);
        assert_eq!(clamp_decay_rate(0.25), 0.25);
        assert!(clamp_decay_rate(1.0) < 1.0);
        assert_eq!(clamp_decay_rate(7.0), MAX_DECAY_RATE);
    }

    #[test]
    fn test_clip_unit() {
        assert_eq!(clip_unit(-0.3), 0.0);
        assert_eq!(clip_unit(1.7), 1.0);
        assert_eq!(clip_unit(0.25), 0.25);
        assert_eq!(clip_unit(f64::NAN), 0.5);
    }
}
