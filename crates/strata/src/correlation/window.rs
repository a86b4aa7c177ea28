//! Window footprints: square and stepped disk ("diamond").

use std::fmt;
use std::str::FromStr;

use super::CorrelationError;

/// Largest accepted window radius (a 131073-cell edge).
pub const MAX_RADIUS: usize = 1 << 16;

/// Footprint shape of the moving window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindowShape {
    /// Full `(2n+1) × (2n+1)` square.
    #[default]
    Square,
    /// Stepped disk: half-width `n − |k|` in row offset `k`.
    Disk,
}

impl fmt::Display for WindowShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowShape::Square => f.write_str("square"),
            WindowShape::Disk => f.write_str("disk"),
        }
    }
}

impl FromStr for WindowShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "square" | "quadrat" => Ok(WindowShape::Square),
            "disk" | "circle" | "kreis" => Ok(WindowShape::Disk),
            other => Err(format!("unknown window shape '{other}' (expected square or disk)")),
        }
    }
}

/// Window of radius `n` with a precomputed half-width per row offset.
///
/// Invariants:
/// - `radius >= 1`, `half_widths.len() == 2 * radius + 1`.
/// - `half_widths[k + radius]` is the column half-width of row offset `k`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Window {
    radius: usize,
    shape: WindowShape,
    half_widths: Vec<usize>,
    cell_count: usize,
}

impl Window {
    pub fn from_radius(radius: usize, shape: WindowShape) -> Result<Self, CorrelationError> {
        if radius == 0 {
            return Err(CorrelationError::invalid_window("radius must be >= 1"));
        }
        if radius > MAX_RADIUS {
            return Err(CorrelationError::invalid_window(format!(
                "radius {radius} exceeds {MAX_RADIUS}"
            )));
        }
        let half_widths: Vec<usize> = (0..=2 * radius)
            .map(|t| match shape {
                WindowShape::Square => radius,
                WindowShape::Disk => radius - t.abs_diff(radius),
            })
            .collect();
        let cell_count = half_widths.iter().map(|h| 2 * h + 1).sum();
        Ok(Self {
            radius,
            shape,
            half_widths,
            cell_count,
        })
    }

    /// Window from its edge length (`3`, `5`, `7`, ...).
    pub fn from_size(size: usize, shape: WindowShape) -> Result<Self, CorrelationError> {
        if size < 3 || size % 2 == 0 {
            return Err(CorrelationError::invalid_window(format!(
                "window size must be odd and >= 3 (got {size})"
            )));
        }
        Self::from_radius((size - 1) / 2, shape)
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    #[inline]
    pub fn shape(&self) -> WindowShape {
        self.shape
    }

    /// Edge length `2n + 1`.
    #[inline]
    pub fn size(&self) -> usize {
        2 * self.radius + 1
    }

    /// Number of footprint cells; full coverage means exactly this many set cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Column half-width for row offset `k`; `None` outside `-n ..= n`.
    #[inline]
    pub fn half_width(&self, k: isize) -> Option<usize> {
        let t = usize::try_from(k.checked_add(self.radius as isize)?).ok()?;
        self.half_widths.get(t).copied()
    }

    /// `(row, col)` offsets of all footprint cells, row by row.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        let n = self.radius as isize;
        self.half_widths
            .iter()
            .enumerate()
            .flat_map(move |(t, &h)| {
                let h = h as isize;
                (-h..=h).map(move |l| (t as isize - n, l))
            })
    }

    /// `"7x7"`-style label.
    pub fn label(&self) -> String {
        format!("{0}x{0}", self.size())
    }
}

/// Labels `"3x3"`, `"5x5"`, ... for radii `1 ..= max_radius`.
pub fn window_size_options(max_radius: usize) -> Vec<String> {
    (1..=max_radius)
        .map(|i| format!("{0}x{0}", 2 * i + 1))
        .collect()
}
