//! Elevation grids consumed (and produced) by the correlation engine.
//!
//! An `ElevationGrid` is a `rows × cols` scalar field with an independent
//! "is set" mask. Unset cells carry no data; they are distinct from a valid 0.
//! Row `i` runs along y (from the origin), column `j` along x.
//!
//! Grids are produced by an external TIN rasterizer; `ZConflict` documents
//! that collaborator's policy for cells hit by several triangles.

use std::fmt;

use nalgebra::{DMatrix, Vector2};

/// Errors raised when building grids from raw parts.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Cell size must be finite and positive.
    InvalidCellSize { cell_size: f64 },
    /// Value buffer length does not match `rows * cols`.
    ShapeMismatch { expected: usize, got: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidCellSize { cell_size } => {
                write!(f, "cell size must be finite and > 0 (got {cell_size})")
            }
            GridError::ShapeMismatch { expected, got } => {
                write!(f, "expected {expected} grid values, got {got}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Axis-aligned 2D bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Envelope {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    #[inline]
    pub fn extent_x(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn extent_y(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Common area of two envelopes; `None` if they do not overlap.
    pub fn intersect(&self, other: &Envelope) -> Option<Envelope> {
        let res = Envelope {
            x_min: self.x_min.max(other.x_min),
            x_max: self.x_max.min(other.x_max),
            y_min: self.y_min.max(other.y_min),
            y_max: self.y_max.min(other.y_max),
        };
        (res.x_min <= res.x_max && res.y_min <= res.y_max).then_some(res)
    }
}

/// Equidistant grid geometry: shape, lower-left origin and square cell size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridGeometry {
    pub rows: usize,
    pub cols: usize,
    pub origin: Vector2<f64>,
    pub cell_size: f64,
}

impl GridGeometry {
    pub fn new(
        rows: usize,
        cols: usize,
        origin_x: f64,
        origin_y: f64,
        cell_size: f64,
    ) -> Result<Self, GridError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize { cell_size });
        }
        Ok(Self {
            rows,
            cols,
            origin: Vector2::new(origin_x, origin_y),
            cell_size,
        })
    }

    /// Geometry covering `bbox`: origin at the lower-left corner,
    /// `floor(extent / cell_size) + 1` cells per axis.
    pub fn from_envelope(bbox: &Envelope, cell_size: f64) -> Result<Self, GridError> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridError::InvalidCellSize { cell_size });
        }
        let rows = (bbox.extent_y() / cell_size).floor() as usize + 1;
        let cols = (bbox.extent_x() / cell_size).floor() as usize + 1;
        Self::new(rows, cols, bbox.x_min, bbox.y_min, cell_size)
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// World coordinates of grid point `(i, j)`.
    pub fn cell_center(&self, i: usize, j: usize) -> Vector2<f64> {
        self.origin + Vector2::new(j as f64, i as f64) * self.cell_size
    }
}

/// Rule for resolving several elevations projecting onto one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ZConflict {
    #[default]
    Max,
    Min,
    Average,
}

impl ZConflict {
    /// Combine the cell's current value (built from `hits` earlier samples)
    /// with an incoming elevation.
    pub fn resolve(self, current: Option<f64>, incoming: f64, hits: usize) -> f64 {
        let Some(cur) = current else {
            return incoming;
        };
        match self {
            ZConflict::Max => cur.max(incoming),
            ZConflict::Min => cur.min(incoming),
            ZConflict::Average => {
                let n = hits.max(1) as f64;
                (cur * n + incoming) / (n + 1.0)
            }
        }
    }
}

/// Row/column-indexed scalar field with a per-cell "is set" mask.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationGrid {
    geometry: GridGeometry,
    values: DMatrix<f64>,
    mask: DMatrix<bool>,
}

impl ElevationGrid {
    /// Grid with every cell unset.
    pub fn new_unset(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            values: DMatrix::zeros(geometry.rows, geometry.cols),
            mask: DMatrix::from_element(geometry.rows, geometry.cols, false),
        }
    }

    /// Row-major values; `None` marks an unset cell.
    pub fn from_values(geometry: GridGeometry, values: &[Option<f64>]) -> Result<Self, GridError> {
        if values.len() != geometry.len() {
            return Err(GridError::ShapeMismatch {
                expected: geometry.len(),
                got: values.len(),
            });
        }
        let mut grid = Self::new_unset(geometry);
        for (k, v) in values.iter().enumerate() {
            if let Some(z) = v {
                grid.set(k / geometry.cols, k % geometry.cols, *z);
            }
        }
        Ok(grid)
    }

    /// Fully-set grid from a row-major closure.
    pub fn from_fn(geometry: GridGeometry, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let values = DMatrix::from_fn(geometry.rows, geometry.cols, |i, j| f(i, j));
        Self {
            geometry,
            values,
            mask: DMatrix::from_element(geometry.rows, geometry.cols, true),
        }
    }

    #[inline]
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.geometry.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.geometry.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.geometry.shape()
    }

    #[inline]
    pub fn is_set(&self, i: usize, j: usize) -> bool {
        self.mask[(i, j)]
    }

    /// Raw stored value; meaningful only where `is_set`.
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[(i, j)]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.is_set(i, j).then(|| self.values[(i, j)])
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, z: f64) {
        self.values[(i, j)] = z;
        self.mask[(i, j)] = true;
    }

    #[inline]
    pub fn unset(&mut self, i: usize, j: usize) {
        self.values[(i, j)] = 0.0;
        self.mask[(i, j)] = false;
    }

    /// Number of set cells.
    pub fn count_set(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Row-major copy of the grid with `None` for unset cells.
    pub fn to_values(&self) -> Vec<Option<f64>> {
        let mut out = Vec::with_capacity(self.geometry.len());
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                out.push(self.get(i, j));
            }
        }
        out
    }

    /// Cell-wise map over set cells; unset cells stay unset.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = self.clone();
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                if self.is_set(i, j) {
                    out.values[(i, j)] = f(self.values[(i, j)]);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_intersection() {
        let a = Envelope::new(0.0, 10.0, 0.0, 5.0);
        let b = Envelope::new(4.0, 20.0, -3.0, 2.0);
        assert_eq!(a.intersect(&b), Some(Envelope::new(4.0, 10.0, 0.0, 2.0)));
        let far = Envelope::new(50.0, 60.0, 50.0, 60.0);
        assert_eq!(a.intersect(&far), None);
    }

    #[test]
    fn geometry_from_envelope_counts_cells() {
        let bbox = Envelope::new(100.0, 1100.0, 200.0, 699.0);
        let g = GridGeometry::from_envelope(&bbox, 250.0).unwrap();
        assert_eq!(g.shape(), (2, 5));
        assert_eq!(g.origin, Vector2::new(100.0, 200.0));
        assert_eq!(g.cell_center(1, 4), Vector2::new(1100.0, 450.0));
        assert!(matches!(
            GridGeometry::from_envelope(&bbox, 0.0),
            Err(GridError::InvalidCellSize { .. })
        ));
    }

    #[test]
    fn set_unset_roundtrip() {
        let geom = GridGeometry::new(2, 3, 0.0, 0.0, 1.0).unwrap();
        let mut g = ElevationGrid::new_unset(geom);
        assert_eq!(g.count_set(), 0);
        g.set(1, 2, 0.0);
        assert!(g.is_set(1, 2));
        assert_eq!(g.get(1, 2), Some(0.0));
        assert_eq!(g.get(0, 0), None);
        g.unset(1, 2);
        assert_eq!(g.count_set(), 0);
    }

    #[test]
    fn from_values_is_row_major() {
        let geom = GridGeometry::new(2, 2, 0.0, 0.0, 1.0).unwrap();
        let g = ElevationGrid::from_values(geom, &[Some(1.0), None, Some(3.0), Some(4.0)]).unwrap();
        assert_eq!(g.get(0, 0), Some(1.0));
        assert_eq!(g.get(0, 1), None);
        assert_eq!(g.get(1, 0), Some(3.0));
        assert_eq!(g.to_values(), vec![Some(1.0), None, Some(3.0), Some(4.0)]);
        assert_eq!(
            ElevationGrid::from_values(geom, &[Some(1.0)]),
            Err(GridError::ShapeMismatch {
                expected: 4,
                got: 1
            })
        );
    }

    #[test]
    fn z_conflict_policies() {
        assert_eq!(ZConflict::Max.resolve(None, 3.0, 0), 3.0);
        assert_eq!(ZConflict::Max.resolve(Some(1.0), 3.0, 1), 3.0);
        assert_eq!(ZConflict::Min.resolve(Some(1.0), 3.0, 1), 1.0);
        assert_eq!(ZConflict::Average.resolve(Some(1.0), 3.0, 1), 2.0);
        assert_eq!(ZConflict::Average.resolve(Some(2.0), 5.0, 2), 3.0);
    }
}
