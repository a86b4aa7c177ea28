use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use strata::prelude::*;
use tracing_subscriber::fmt::SubscriberBuilder;

mod gridio;
mod provenance;
mod table;

use provenance::Payload;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Triangle orientation and grid correlation for geological strata")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

/// Coordinate reference of the input points.
#[derive(clap::Args, Clone, Copy, Debug)]
struct CrsArgs {
    /// EPSG code of the coordinates (projected unless --geographic)
    #[arg(long)]
    epsg: Option<u32>,
    /// Coordinates are geographic (degrees); orientation is then refused
    #[arg(long, requires = "epsg")]
    geographic: bool,
}

impl CrsArgs {
    fn crs(self) -> Crs {
        match (self.epsg, self.geographic) {
            (Some(code), true) => Crs::Geographic(code),
            (Some(code), false) => Crs::Projected(code),
            (None, _) => Crs::Local,
        }
    }
}

#[derive(Subcommand)]
enum Action {
    /// Dip, azimuth, strike and compass direction of one triangle
    Orient {
        /// x1 y1 z1 x2 y2 z2 x3 y3 z3
        #[arg(num_args = 9, value_names = ["X1", "Y1", "Z1", "X2", "Y2", "Z2", "X3", "Y3", "Z3"], allow_negative_numbers = true)]
        coords: Vec<f64>,
        /// deg, gon or rad
        #[arg(long, default_value = "deg")]
        unit: AngleUnit,
        /// Print a JSON object instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        crs: CrsArgs,
    },
    /// Orientation attribute table for a CSV of triangles (columns x1..z3)
    OrientTable {
        #[arg(long)]
        input: PathBuf,
        /// .csv or .parquet
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "deg")]
        unit: AngleUnit,
        /// Add lower-hemisphere projection columns hemi_x, hemi_y, hemi_z
        #[arg(long)]
        hemisphere: bool,
        #[command(flatten)]
        crs: CrsArgs,
    },
    /// Moving-window correlation of two JSON grids
    Correlate {
        #[arg(long)]
        grid1: PathBuf,
        #[arg(long)]
        grid2: PathBuf,
        /// Window radius n; the window spans (2n+1) x (2n+1) cells
        #[arg(long, default_value_t = 3)]
        radius: usize,
        /// square or disk
        #[arg(long, default_value = "square")]
        shape: WindowShape,
        /// Round out-of-range coefficients instead of clamping them
        #[arg(long)]
        legacy_rounding: bool,
        #[arg(long)]
        out: PathBuf,
    },
    /// List window size labels (3x3, 5x5, ...)
    WindowSizes {
        #[arg(long, default_value_t = 6)]
        max: usize,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Orient {
            coords,
            unit,
            json,
            crs,
        } => orient(&coords, unit, json, crs.crs()),
        Action::OrientTable {
            input,
            out,
            unit,
            hemisphere,
            crs,
        } => orient_table(input, out, unit, hemisphere, crs.crs()),
        Action::Correlate {
            grid1,
            grid2,
            radius,
            shape,
            legacy_rounding,
            out,
        } => {
            let out_of_range = if legacy_rounding {
                OutOfRangePolicy::RoundLegacy
            } else {
                OutOfRangePolicy::Clamp
            };
            let cfg = CorrelationCfg {
                radius,
                shape,
                out_of_range,
            };
            run_correlate(grid1, grid2, cfg, out)
        }
        Action::WindowSizes { max } => {
            for label in window_size_options(max) {
                println!("{label}");
            }
            Ok(())
        }
        Action::Report => report(),
    }
}

fn orient(coords: &[f64], unit: AngleUnit, as_json: bool, crs: Crs) -> Result<()> {
    let c: [f64; 9] = coords
        .try_into()
        .context("expected exactly nine coordinates")?;
    let tri = Triangle::from_coords(c).with_crs(crs);
    tracing::info!(%tri, %crs, "orient");
    let o = Orientation::new(&tri)?;
    let text = describe(&o, unit, as_json)?;
    println!("{text}");
    Ok(())
}

fn describe(o: &Orientation, unit: AngleUnit, as_json: bool) -> Result<String> {
    if as_json {
        let doc = json!({
            "unit": unit.suffix(),
            "dip": o.dip_in(unit),
            "azimuth": o.azimuth_in(unit),
            "strike": o.strike_in(unit),
            "clar": o.clar_notation(),
            "compass": o.compass_direction_label(),
            "compass_class": o.compass_direction_class(),
            "zero_area": o.has_zero_area(),
            "horizontal": o.is_horizontal(),
            "vertical": o.is_vertical(),
        });
        return Ok(serde_json::to_string_pretty(&doc)?);
    }
    let s = unit.suffix();
    Ok(format!(
        "dip{s}: {}\nazimuth{s}: {}\nstrike{s}: {}\nclar: {}\ncompass: {}",
        o.dip_in(unit),
        o.azimuth_in(unit),
        o.strike_in(unit),
        o.clar_notation(),
        o.compass_direction_label()
    ))
}

fn orient_table(
    input: PathBuf,
    out: PathBuf,
    unit: AngleUnit,
    hemisphere: bool,
    crs: Crs,
) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), ?unit, hemisphere, %crs, "orient-table");
    let triangles = table::read_triangles(&input, crs)?;
    let opts = table::TableOpts { unit, hemisphere };
    let mut df = table::orientation_frame(&triangles, &opts)?;
    tracing::info!(rows = df.height(), cols = df.width(), "orientation_table");
    table::write_frame(&mut df, &out)?;

    let payload = Payload::new(
        "orient-table",
        json!({
            "unit": unit.suffix(),
            "hemisphere": hemisphere,
            "crs": crs.to_string(),
            "triangles": triangles.len(),
        }),
    )
    .with_input(&input);
    provenance::write_sidecar(&out, payload)?;
    Ok(())
}

fn run_correlate(grid1: PathBuf, grid2: PathBuf, cfg: CorrelationCfg, out: PathBuf) -> Result<()> {
    tracing::info!(
        grid1 = %grid1.display(),
        grid2 = %grid2.display(),
        radius = cfg.radius,
        shape = %cfg.shape,
        out_of_range = ?cfg.out_of_range,
        out = %out.display(),
        "correlate"
    );
    let a = gridio::read_grid(&grid1)?;
    let b = gridio::read_grid(&grid2)?;
    let r = correlate(&a, &b, cfg)?;
    tracing::info!(
        set = r.count_set(),
        total = r.geometry().len(),
        "correlation_grid"
    );
    gridio::write_grid(&out, &r)?;

    let payload = Payload::new(
        "correlate",
        json!({
            "radius": cfg.radius,
            "window": Window::from_radius(cfg.radius, cfg.shape).ok().map(|w| w.label()),
            "shape": cfg.shape.to_string(),
            "out_of_range": format!("{:?}", cfg.out_of_range),
        }),
    )
    .with_input(&grid1)
    .with_input(&grid2);
    provenance::write_sidecar(&out, payload)?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = provenance::document(&Payload::new("report", json!({})), &[]);
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
