use tracing::{debug, warn};

use super::parallel_iter::map_range;
use super::{CorrelationCfg, CorrelationError, Window};
use crate::grid::ElevationGrid;

/// Output of `correlate`: same geometry as the inputs, coefficient or unset.
pub type CorrelationGrid = ElevationGrid;

/// Centered sums of one fully-covered window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowStats {
    pub count: usize,
    pub mean1: f64,
    pub mean2: f64,
    pub sum_sq_x: f64,
    pub sum_sq_y: f64,
    pub sum_xy: f64,
}

impl WindowStats {
    /// `sum_xy / (sqrt(sum_sq_x) · sqrt(sum_sq_y))`; NaN for zero variance.
    #[inline]
    pub fn coefficient(&self) -> f64 {
        self.sum_xy / (self.sum_sq_x.sqrt() * self.sum_sq_y.sqrt())
    }

    /// Statistics of the window centered at `(i, j)`, or `None` unless every
    /// footprint cell is set in both grids.
    ///
    /// Pre: the footprint lies inside both grids.
    pub fn collect(
        grid1: &ElevationGrid,
        grid2: &ElevationGrid,
        window: &Window,
        i: usize,
        j: usize,
    ) -> Option<Self> {
        let cell = |(dr, dc): (isize, isize)| ((i as isize + dr) as usize, (j as isize + dc) as usize);

        let covered = window
            .offsets()
            .map(cell)
            .filter(|&(r, c)| grid1.is_set(r, c) && grid2.is_set(r, c))
            .count();
        if covered < window.cell_count() {
            return None;
        }

        let count = window.cell_count();
        let (mut mean1, mut mean2) = (0.0, 0.0);
        for (r, c) in window.offsets().map(cell) {
            mean1 += grid1.value(r, c);
            mean2 += grid2.value(r, c);
        }
        mean1 /= count as f64;
        mean2 /= count as f64;

        let (mut sum_sq_x, mut sum_sq_y, mut sum_xy) = (0.0, 0.0, 0.0);
        for (r, c) in window.offsets().map(cell) {
            let dx = grid1.value(r, c) - mean1;
            let dy = grid2.value(r, c) - mean2;
            sum_sq_x += dx * dx;
            sum_sq_y += dy * dy;
            sum_xy += dx * dy;
        }
        Some(Self {
            count,
            mean1,
            mean2,
            sum_sq_x,
            sum_sq_y,
            sum_xy,
        })
    }
}

/// Raw Pearson coefficient of the window at `(i, j)` before range handling;
/// `None` for incomplete coverage or zero variance.
pub fn window_coefficient(
    grid1: &ElevationGrid,
    grid2: &ElevationGrid,
    window: &Window,
    i: usize,
    j: usize,
) -> Option<f64> {
    let r = WindowStats::collect(grid1, grid2, window, i, j)?.coefficient();
    (!r.is_nan()).then_some(r)
}

/// Correlate two grids over a moving window.
///
/// Pre: identical `rows × cols` (otherwise `DimensionMismatch`), `cfg.radius >= 1`.
/// Post: a grid with `grid1`'s geometry; border, incompletely covered and
/// zero-variance cells are unset, all other cells hold `r ∈ [-1, 1]`.
pub fn correlate(
    grid1: &ElevationGrid,
    grid2: &ElevationGrid,
    cfg: CorrelationCfg,
) -> Result<CorrelationGrid, CorrelationError> {
    if grid1.shape() != grid2.shape() {
        return Err(CorrelationError::DimensionMismatch {
            left: grid1.shape(),
            right: grid2.shape(),
        });
    }
    if cfg.radius == 0 {
        return Err(CorrelationError::invalid_window("radius must be >= 1"));
    }
    let (rows, cols) = grid1.shape();
    if cfg.radius.saturating_mul(2).saturating_add(1) > rows.min(cols) {
        debug!(rows, cols, radius = cfg.radius, "window larger than grid; all cells unset");
        return Ok(CorrelationGrid::new_unset(*grid1.geometry()));
    }
    let window = Window::from_radius(cfg.radius, cfg.shape)?;
    if grid1.geometry() != grid2.geometry() {
        warn!(
            left = ?grid1.geometry(),
            right = ?grid2.geometry(),
            "grid origins or cell sizes differ; using the first grid's geometry"
        );
    }

    let n = window.radius();
    // The window must fit: n <= i < rows - (n + 1).
    let row_end = rows.saturating_sub(n + 1).max(n);
    let col_end = cols.saturating_sub(n + 1).max(n);
    debug!(
        rows,
        cols,
        radius = n,
        shape = %window.shape(),
        footprint = window.cell_count(),
        "correlate"
    );

    let computed = map_range(n..row_end, |i| {
        (n..col_end)
            .map(|j| {
                window_coefficient(grid1, grid2, &window, i, j)
                    .map(|r| cfg.out_of_range.apply(r))
                    .filter(|r| r.is_finite() && (-1.0..=1.0).contains(r))
            })
            .collect::<Vec<_>>()
    });

    let mut out = CorrelationGrid::new_unset(*grid1.geometry());
    let mut written = 0usize;
    for (i, row) in (n..row_end).zip(computed) {
        for (j, r) in (n..col_end).zip(row) {
            if let Some(r) = r {
                out.set(i, j, r);
                written += 1;
            }
        }
    }
    debug!(written, "correlation cells set");
    Ok(out)
}
