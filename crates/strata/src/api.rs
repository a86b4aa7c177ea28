//! Curated caller-facing surface.
//!
//! The two entry points external collaborators (exporters, the CLI) call into:
//! `compute_orientation` per triangle and `correlate` per grid pair.

pub use crate::correlation::{
    window_size_options, CorrelationCfg, CorrelationError, CorrelationGrid, OutOfRangePolicy,
    Window, WindowShape,
};
pub use crate::geom3::{Crs, Triangle, Vec3};
pub use crate::grid::{ElevationGrid, Envelope, GridError, GridGeometry, ZConflict};
pub use crate::orientation::{AngleUnit, CompassDirection, Orientation, OrientationError};

/// Pre: `triangle` uses a projected or local metric CRS.
/// Post: the orientation of the triangle's plane, or `GeographicCrs`.
pub fn compute_orientation(triangle: &Triangle) -> Result<Orientation, OrientationError> {
    Orientation::new(triangle)
}

/// Pre: `grid1` and `grid2` share `rows × cols`; `window_radius >= 1`.
/// Post: a grid of the same shape holding the windowed correlation coefficient;
/// cells without full coverage, zero variance, or within the border are unset.
pub fn correlate(
    grid1: &ElevationGrid,
    grid2: &ElevationGrid,
    window_radius: usize,
    shape: WindowShape,
) -> Result<CorrelationGrid, CorrelationError> {
    let cfg = CorrelationCfg {
        radius: window_radius,
        shape,
        ..CorrelationCfg::default()
    };
    crate::correlation::correlate(grid1, grid2, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_orientation_rejects_geographic_crs() {
        let tri = Triangle::new(
            Vec3::new(7.0, 51.0, 0.0),
            Vec3::new(7.1, 51.0, 0.0),
            Vec3::new(7.0, 51.1, 10.0),
        )
        .with_crs(Crs::Geographic(4326));
        assert!(matches!(
            compute_orientation(&tri),
            Err(OrientationError::GeographicCrs { .. })
        ));
    }

    #[test]
    fn correlate_rejects_zero_radius() {
        let geom = GridGeometry::new(5, 5, 0.0, 0.0, 1.0).unwrap();
        let g = ElevationGrid::new_unset(geom);
        assert!(matches!(
            correlate(&g, &g, 0, WindowShape::Square),
            Err(CorrelationError::InvalidWindowSize { .. })
        ));
    }
}
