//! Orientation analysis of triangulated strata and windowed surface correlation.
//!
//! Two numeric engines live here:
//! - `orientation`: dip, azimuth (dip direction), strike and compass class of a
//!   single triangle, with explicit degenerate states (zero area, horizontal,
//!   vertical).
//! - `correlation`: per-cell Pearson coefficient of two elevation grids over a
//!   moving square or disk-shaped window, propagating "no data".
//!
//! API Policy
//! - Callers should go through `api` or `prelude`; module internals may move.
//! - File formats, rasterization and CLI parsing are not part of this crate.

pub mod api;
pub mod correlation;
pub mod geom3;
pub mod grid;
pub mod orientation;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use geom3::{Crs, Triangle, Vec3};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::correlation::{
        correlate, window_size_options, CorrelationCfg, CorrelationError, CorrelationGrid,
        OutOfRangePolicy, Window, WindowShape,
    };
    pub use crate::geom3::{Crs, Triangle, Vec3};
    pub use crate::grid::{ElevationGrid, Envelope, GridError, GridGeometry, ZConflict};
    pub use crate::orientation::{AngleUnit, CompassDirection, Orientation, OrientationError};
}
