//! Units, compass classes and errors used by `Orientation`.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::geom3::Crs;

/// Radians → degrees.
pub const RAD_TO_DEG: f64 = 180.0 / PI;
/// Radians → gon (400 gon per full turn).
pub const RAD_TO_GON: f64 = 200.0 / PI;
/// Sentinel for azimuth/strike values that are undefined for degenerate triangles.
pub const UNDEFINED: f64 = -1.0;

/// Angle unit for exported orientation attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AngleUnit {
    #[default]
    Degree,
    Gon,
    Rad,
}

impl AngleUnit {
    /// Convert a radian value; the `UNDEFINED` sentinel is passed through unscaled.
    #[inline]
    pub fn convert(self, rad: f64) -> f64 {
        if rad == UNDEFINED {
            return UNDEFINED;
        }
        match self {
            AngleUnit::Degree => rad * RAD_TO_DEG,
            AngleUnit::Gon => rad * RAD_TO_GON,
            AngleUnit::Rad => rad,
        }
    }

    /// Attribute-name suffix (`dipDEG`, `azimuthGRAD`, ...).
    pub fn suffix(self) -> &'static str {
        match self {
            AngleUnit::Degree => "DEG",
            AngleUnit::Gon => "GRAD",
            AngleUnit::Rad => "RAD",
        }
    }
}

impl FromStr for AngleUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleUnit::Degree),
            "gon" | "grad" => Ok(AngleUnit::Gon),
            "rad" | "radian" | "radians" => Ok(AngleUnit::Rad),
            other => Err(format!("unknown angle unit '{other}' (expected deg, gon or rad)")),
        }
    }
}

/// 8-point compass direction of the dip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompassDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassDirection {
    /// Clockwise from north.
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::N,
        CompassDirection::NE,
        CompassDirection::E,
        CompassDirection::SE,
        CompassDirection::S,
        CompassDirection::SW,
        CompassDirection::W,
        CompassDirection::NW,
    ];

    /// Octant index `k` (45° sectors centered on N, NE, ...); taken modulo 8.
    #[inline]
    pub fn from_octant(k: i64) -> Self {
        Self::ALL[k.rem_euclid(8) as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            CompassDirection::N => "N",
            CompassDirection::NE => "NE",
            CompassDirection::E => "E",
            CompassDirection::SE => "SE",
            CompassDirection::S => "S",
            CompassDirection::SW => "SW",
            CompassDirection::W => "W",
            CompassDirection::NW => "NW",
        }
    }

    /// Integer class code, N = 1 through NW = 8 (0 is reserved for "undefined").
    pub fn class(self) -> u8 {
        match self {
            CompassDirection::N => 1,
            CompassDirection::NE => 2,
            CompassDirection::E => 3,
            CompassDirection::SE => 4,
            CompassDirection::S => 5,
            CompassDirection::SW => 6,
            CompassDirection::W => 7,
            CompassDirection::NW => 8,
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors surfaced by orientation analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum OrientationError {
    /// The triangle uses a geographic (angular) CRS; re-project first.
    GeographicCrs { crs: Crs },
    /// Dip left `[0, π/2]`; indicates a numerical failure, never clamped.
    NumericalDip { dip_rad: f64 },
}

impl fmt::Display for OrientationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrientationError::GeographicCrs { crs } => write!(
                f,
                "orientation requires a metric coordinate system, got geographic {crs}"
            ),
            OrientationError::NumericalDip { dip_rad } => {
                write!(f, "numerical dip computation error (dip = {dip_rad} rad)")
            }
        }
    }
}

impl std::error::Error for OrientationError {}
