//! JSON grid files for `correlate`.
//!
//! ```json
//! { "rows": 3, "cols": 4, "origin": [500000.0, 5700000.0], "cell_size": 10.0,
//!   "values": [1.0, null, ...] }
//! ```
//! `values` is row-major; `null` marks an unset cell.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strata::grid::{ElevationGrid, GridGeometry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFile {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub origin: [f64; 2],
    #[serde(default = "unit_cell")]
    pub cell_size: f64,
    pub values: Vec<Option<f64>>,
}

fn unit_cell() -> f64 {
    1.0
}

impl GridFile {
    pub fn to_grid(&self) -> Result<ElevationGrid> {
        let geometry = GridGeometry::new(
            self.rows,
            self.cols,
            self.origin[0],
            self.origin[1],
            self.cell_size,
        )?;
        Ok(ElevationGrid::from_values(geometry, &self.values)?)
    }

    pub fn from_grid(grid: &ElevationGrid) -> Self {
        let g = grid.geometry();
        Self {
            rows: g.rows,
            cols: g.cols,
            origin: [g.origin.x, g.origin.y],
            cell_size: g.cell_size,
            values: grid.to_values(),
        }
    }
}

pub fn read_grid(path: &Path) -> Result<ElevationGrid> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: GridFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing grid {}", path.display()))?;
    file.to_grid()
        .with_context(|| format!("invalid grid {}", path.display()))
}

pub fn write_grid(path: &Path, grid: &ElevationGrid) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let doc = GridFile::from_grid(grid);
    fs::write(path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))
}
