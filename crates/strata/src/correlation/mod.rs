//! Moving-window correlation of two elevation grids.
//!
//! Purpose
//! - Measure local similarity of two surfaces (e.g. two strata rasterized from
//!   TINs onto the same grid) by the Pearson coefficient over a square or
//!   disk-shaped window of radius `n` centered on every interior cell.
//!
//! Contract
//! - Inputs share `rows × cols`; otherwise `DimensionMismatch`.
//! - Output has the input shape; every cell starts unset. A value is written
//!   only if the window lies inside the grid (`n <= i < rows − (n+1)`, same
//!   for columns), every footprint cell is set in both grids, both windows
//!   have non-zero variance, and the coefficient is finite.
//! - Coefficients outside `[-1, 1]` (floating-point drift) are clamped by
//!   default; `OutOfRangePolicy::RoundLegacy` reproduces the old rounding.
//! - Each window recomputes its statistics; no running sums.
//!
//! Configuration is an immutable `CorrelationCfg` passed by value.

mod engine;
mod parallel_iter;
mod window;

pub use engine::{correlate, window_coefficient, CorrelationGrid, WindowStats};
pub use window::{window_size_options, Window, WindowShape, MAX_RADIUS};

use std::fmt;

/// Errors surfaced by the correlation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    /// The two grids differ in shape (`rows × cols`).
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Window radius/size cannot be realized.
    InvalidWindowSize { reason: String },
}

impl CorrelationError {
    pub(crate) fn invalid_window(reason: impl Into<String>) -> Self {
        Self::InvalidWindowSize {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CorrelationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationError::DimensionMismatch { left, right } => write!(
                f,
                "grid dimensions differ: {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            ),
            CorrelationError::InvalidWindowSize { reason } => {
                write!(f, "invalid window size: {reason}")
            }
        }
    }
}

impl std::error::Error for CorrelationError {}

/// What to do with a coefficient that drifted outside `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutOfRangePolicy {
    /// `r = max(-1, min(1, r))`.
    #[default]
    Clamp,
    /// Round to the nearest integer, as older tooling did. Values still
    /// outside `[-1, 1]` afterwards are left unset.
    RoundLegacy,
}

impl OutOfRangePolicy {
    /// Values inside `[-1, 1]` and NaN pass through untouched.
    #[inline]
    pub fn apply(self, r: f64) -> f64 {
        if !(r > 1.0 || r < -1.0) {
            return r;
        }
        match self {
            OutOfRangePolicy::Clamp => r.clamp(-1.0, 1.0),
            OutOfRangePolicy::RoundLegacy => r.round(),
        }
    }
}

/// Correlation run configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorrelationCfg {
    /// Window radius `n >= 1`; the window spans `(2n+1) × (2n+1)` cells.
    pub radius: usize,
    pub shape: WindowShape,
    pub out_of_range: OutOfRangePolicy,
}

impl Default for CorrelationCfg {
    fn default() -> Self {
        Self {
            radius: 3,
            shape: WindowShape::Square,
            out_of_range: OutOfRangePolicy::Clamp,
        }
    }
}

#[cfg(test)]
mod tests;
