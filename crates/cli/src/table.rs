//! `orient-table`: per-triangle orientation attributes for a CSV of triangles.
//!
//! Input columns `x1 y1 z1 x2 y2 z2 x3 y3 z3` (extra columns are ignored).
//! Output columns, one row per input triangle, angles in the chosen unit with
//! the unit suffix (`dipDEG`, `azimuthGRAD`, ...):
//! `zero_area horizontal vertical dip* azimuth* strike* clar compass compass_class z_center`
//! plus `hemi_x hemi_y hemi_z` with `--hemisphere`.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use strata::prelude::{AngleUnit, Crs, Orientation, Triangle};

pub const COORD_COLUMNS: [&str; 9] = ["x1", "y1", "z1", "x2", "y2", "z2", "x3", "y3", "z3"];

pub struct TableOpts {
    pub unit: AngleUnit,
    pub hemisphere: bool,
}

/// Read triangles from a CSV file with header.
pub fn read_triangles(input: &Path, crs: Crs) -> Result<Vec<Triangle>> {
    let lf = LazyCsvReader::new(input)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", input.display()))?;
    let exprs: Vec<Expr> = COORD_COLUMNS
        .iter()
        .map(|&name| col(name).cast(DataType::Float64))
        .collect();
    let df = lf
        .select(exprs)
        .collect()
        .with_context(|| format!("reading coordinate columns x1..z3 from {}", input.display()))?;

    let columns = COORD_COLUMNS
        .iter()
        .map(|&name| Ok(df.column(name)?.f64()?.clone()))
        .collect::<PolarsResult<Vec<Float64Chunked>>>()?;

    let mut out = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let mut c = [0.0; 9];
        for (k, column) in columns.iter().enumerate() {
            let Some(v) = column.get(row) else {
                bail!("row {row}: missing value in column {}", COORD_COLUMNS[k]);
            };
            c[k] = v;
        }
        out.push(Triangle::from_coords(c).with_crs(crs));
    }
    Ok(out)
}

/// Attribute table for `triangles`.
pub fn orientation_frame(triangles: &[Triangle], opts: &TableOpts) -> Result<DataFrame> {
    let n = triangles.len();
    let mut zero_area = Vec::with_capacity(n);
    let mut horizontal = Vec::with_capacity(n);
    let mut vertical = Vec::with_capacity(n);
    let mut dip = Vec::with_capacity(n);
    let mut azimuth = Vec::with_capacity(n);
    let mut strike = Vec::with_capacity(n);
    let mut clar = Vec::with_capacity(n);
    let mut compass = Vec::with_capacity(n);
    let mut compass_class = Vec::with_capacity(n);
    let mut z_center = Vec::with_capacity(n);
    let mut hemi = Vec::with_capacity(if opts.hemisphere { n } else { 0 });

    for (row, tri) in triangles.iter().enumerate() {
        let o = Orientation::new(tri).with_context(|| format!("triangle {row}"))?;
        zero_area.push(o.has_zero_area());
        horizontal.push(o.is_horizontal());
        vertical.push(o.is_vertical());
        dip.push(o.dip_in(opts.unit));
        azimuth.push(o.azimuth_in(opts.unit));
        strike.push(o.strike_in(opts.unit));
        clar.push(o.clar_notation());
        compass.push(o.compass_direction_label());
        compass_class.push(o.compass_direction_class() as u32);
        z_center.push(tri.center().z);
        if opts.hemisphere {
            hemi.push(o.hemisphere_point());
        }
    }

    let suffix = opts.unit.suffix();
    let mut df = df!(
        "zero_area" => zero_area,
        "horizontal" => horizontal,
        "vertical" => vertical,
        format!("dip{suffix}").as_str() => dip,
        format!("azimuth{suffix}").as_str() => azimuth,
        format!("strike{suffix}").as_str() => strike,
        "clar" => clar,
        "compass" => compass,
        "compass_class" => compass_class,
        "z_center" => z_center
    )?;
    if opts.hemisphere {
        for (name, axis) in [("hemi_x", 0usize), ("hemi_y", 1), ("hemi_z", 2)] {
            let values: Vec<f64> = hemi.iter().map(|p| p[axis]).collect();
            df.with_column(Series::new(name.into(), values))?;
        }
    }
    Ok(df)
}

/// Write `df` as Parquet if `out` ends in `.parquet`, CSV otherwise.
pub fn write_frame(df: &mut DataFrame, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    if out.extension().is_some_and(|e| e == "parquet") {
        ParquetWriter::new(&mut file).finish(df)?;
    } else {
        CsvWriter::new(&mut file).include_header(true).finish(df)?;
    }
    Ok(())
}
