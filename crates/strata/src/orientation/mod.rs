//! Orientation of a triangle: dip, azimuth (dip direction), strike, compass class.
//!
//! Conventions
//! - x heads East, y heads North, z heads up. Azimuth 0° = N, 90° = E.
//! - Vertex order is irrelevant: the stored face normal is flipped to point
//!   upward, so the triangle always "runs downhill" and dip ∈ [0°, 90°].
//! - Degenerate triangles are states, not errors. With the upward normal `n`:
//!   zero area (`|n| = 0`), horizontal (`n.x = n.y = 0`), vertical (`n.z = 0`).
//!   A zero-area triangle is also horizontal and vertical.
//! - Undefined azimuth/strike values are reported as `-1` in every unit,
//!   undefined compass directions as `"-"` (class 0).
//!
//! Angles are computed on demand from the stored normal; the three flags are
//! fixed at construction, where the dip range is also verified once.

mod types;

pub use types::{AngleUnit, CompassDirection, OrientationError, RAD_TO_DEG, RAD_TO_GON, UNDEFINED};

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use crate::geom3::{Triangle, Vec3};

/// Orientation of a single triangle's plane.
///
/// Invariants:
/// - `dir.z >= 0` (upward normal, unnormalized).
/// - `dip_rad()` lies in `[0, π/2]` (checked in `new`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    dir: Vec3,
    has_zero_area: bool,
    is_horizontal: bool,
    is_vertical: bool,
}

impl Orientation {
    /// Fails for geographic coordinates and if the dip check detects a
    /// numerical breakdown.
    pub fn new(tri: &Triangle) -> Result<Self, OrientationError> {
        if tri.crs.is_geographic() {
            return Err(OrientationError::GeographicCrs { crs: tri.crs });
        }
        let orient = Self::from_normal(upward_normal(tri));
        let dip = orient.dip_rad();
        if !(0.0..=FRAC_PI_2).contains(&dip) {
            return Err(OrientationError::NumericalDip { dip_rad: dip });
        }
        Ok(orient)
    }

    fn from_normal(dir: Vec3) -> Self {
        Self {
            dir,
            has_zero_area: dir.norm() == 0.0,
            is_horizontal: dir.x == 0.0 && dir.y == 0.0,
            is_vertical: dir.z == 0.0,
        }
    }

    /// Upward face normal (length = twice the triangle area).
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.dir
    }

    #[inline]
    pub fn has_zero_area(&self) -> bool {
        self.has_zero_area
    }

    /// Triangle lies parallel to the x-y plane (also true for zero area).
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.is_horizontal
    }

    /// Triangle is parallel to the z-axis (also true for zero area).
    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.is_vertical
    }

    #[inline]
    fn direction_undefined(&self) -> bool {
        self.has_zero_area || self.is_horizontal || self.is_vertical
    }

    #[inline]
    fn strike_undefined(&self) -> bool {
        self.has_zero_area || self.is_horizontal
    }

    // ----- dip -----

    /// Dip in radians, `0 ..= π/2`. 0 for zero area, π/2 for vertical triangles.
    pub fn dip_rad(&self) -> f64 {
        if self.has_zero_area {
            return 0.0;
        }
        if self.is_vertical {
            return FRAC_PI_2;
        }
        let horiz = if self.dir.x == 0.0 && self.dir.y == 0.0 {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(self.dir.x, self.dir.y, 0.0)
        };
        FRAC_PI_2 - self.dir.angle(&horiz)
    }

    /// Dip in degrees, `0 ..= 90`.
    pub fn dip(&self) -> f64 {
        self.dip_rad() * RAD_TO_DEG
    }

    pub fn dip_int(&self) -> i32 {
        self.dip().round() as i32
    }

    /// Dip in gon, `0 ..= 100`.
    pub fn dip_gon(&self) -> f64 {
        self.dip_rad() * RAD_TO_GON
    }

    pub fn dip_gon_int(&self) -> i32 {
        self.dip_gon().round() as i32
    }

    pub fn dip_in(&self, unit: AngleUnit) -> f64 {
        unit.convert(self.dip_rad())
    }

    // ----- azimuth (dip direction) -----

    /// Bearing of the normal's horizontal projection, measured clockwise from
    /// north, in `[0, 2π)`. Only meaningful if that projection is non-zero.
    fn dip_direction_rad(&self) -> f64 {
        if self.dir.x == 0.0 {
            return if self.dir.y > 0.0 { 0.0 } else { PI };
        }
        let north = Vec3::new(0.0, 1.0, 0.0);
        let v2 = Vec3::new(self.dir.x, self.dir.y, 0.0);
        let phi = north.angle(&v2);
        if self.dir.x > 0.0 {
            return phi;
        }
        // A tiny negative x can leave phi at exactly 0.
        let az = TAU - phi;
        if az >= TAU {
            0.0
        } else {
            az
        }
    }

    /// Azimuth in radians, or `-1` for zero-area, horizontal and vertical triangles.
    pub fn azimuth_rad(&self) -> f64 {
        if self.direction_undefined() {
            return UNDEFINED;
        }
        self.dip_direction_rad()
    }

    /// Azimuth in degrees, `0 <= azimuth < 360`, or `-1` if undefined.
    pub fn azimuth(&self) -> f64 {
        AngleUnit::Degree.convert(self.azimuth_rad())
    }

    /// Rounded azimuth `0 ..= 359` (360 wraps to 0), or `-1` if undefined.
    pub fn azimuth_int(&self) -> i32 {
        if self.direction_undefined() {
            return -1;
        }
        let res = self.azimuth().round() as i32;
        if res >= 360 {
            0
        } else {
            res
        }
    }

    /// Azimuth in gon, `0 <= azimuth < 400`, or `-1` if undefined.
    pub fn azimuth_gon(&self) -> f64 {
        AngleUnit::Gon.convert(self.azimuth_rad())
    }

    /// Rounded azimuth in gon `0 ..= 399` (400 wraps to 0), or `-1` if undefined.
    pub fn azimuth_gon_int(&self) -> i32 {
        if self.direction_undefined() {
            return -1;
        }
        let res = self.azimuth_gon().round() as i32;
        if res >= 400 {
            0
        } else {
            res
        }
    }

    pub fn azimuth_in(&self, unit: AngleUnit) -> f64 {
        unit.convert(self.azimuth_rad())
    }

    // ----- strike -----

    /// Strike in radians, `0 <= strike < π`, or `-1` for zero-area and
    /// horizontal triangles. Defined for vertical triangles.
    pub fn strike_rad(&self) -> f64 {
        if self.strike_undefined() {
            return UNDEFINED;
        }
        let mut strike = self.dip_direction_rad() + FRAC_PI_2;
        while strike >= PI {
            strike -= PI;
        }
        strike
    }

    /// Strike in degrees, `0 <= strike < 180`, or `-1` if undefined.
    pub fn strike(&self) -> f64 {
        AngleUnit::Degree.convert(self.strike_rad())
    }

    /// Rounded strike `0 ..= 179` (180 maps to 0), or `-1` if undefined.
    pub fn strike_int(&self) -> i32 {
        if self.strike_undefined() {
            return -1;
        }
        let val = self.strike().round() as i32;
        if val == 180 {
            0
        } else {
            val
        }
    }

    pub fn strike_gon(&self) -> f64 {
        AngleUnit::Gon.convert(self.strike_rad())
    }

    /// Rounded strike in gon `0 ..= 199` (200 maps to 0), or `-1` if undefined.
    pub fn strike_gon_int(&self) -> i32 {
        if self.strike_undefined() {
            return -1;
        }
        let val = self.strike_gon().round() as i32;
        if val == 200 {
            0
        } else {
            val
        }
    }

    pub fn strike_in(&self, unit: AngleUnit) -> f64 {
        unit.convert(self.strike_rad())
    }

    // ----- classification and notation -----

    /// 8-point compass direction of the dip, `None` when the azimuth is undefined.
    pub fn compass_direction(&self) -> Option<CompassDirection> {
        if self.direction_undefined() {
            return None;
        }
        let k = (self.azimuth() / 45.0).round() as i64;
        Some(CompassDirection::from_octant(k))
    }

    /// `"N"`, `"NE"`, ..., `"NW"`, or `"-"` if undeterminable.
    pub fn compass_direction_label(&self) -> &'static str {
        self.compass_direction().map_or("-", CompassDirection::label)
    }

    /// Integer class: 0 = undefined, N = 1, NE = 2, ..., NW = 8.
    pub fn compass_direction_class(&self) -> u8 {
        self.compass_direction().map_or(0, CompassDirection::class)
    }

    /// Clar notation `"<azimuth>/<dip>"` with integer degrees.
    pub fn clar_notation(&self) -> String {
        format!("{}/{}", self.azimuth_int(), self.dip_int())
    }

    /// Dip/azimuth pole on the lower unit hemisphere (stereonet point).
    ///
    /// `x = sin(90° − φ)·sin(dip)`, `y = cos(90° − φ)·sin(dip)`, `z = −cos(dip)`
    /// with φ the azimuth in degrees. The `-1` azimuth sentinel is used as-is.
    pub fn hemisphere_point(&self) -> Vec3 {
        let dip = self.dip_rad();
        let phi = (90.0 - self.azimuth()).to_radians();
        Vec3::new(phi.sin() * dip.sin(), phi.cos() * dip.sin(), -dip.cos())
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.clar_notation(),
            self.compass_direction_label()
        )
    }
}

impl TryFrom<&Triangle> for Orientation {
    type Error = OrientationError;

    fn try_from(tri: &Triangle) -> Result<Self, Self::Error> {
        Orientation::new(tri)
    }
}

/// Face normal `(p1 − p0) × (p2 − p0)`, negated if it points downward.
fn upward_normal(tri: &Triangle) -> Vec3 {
    let n = tri.normal();
    if n.z < 0.0 {
        -n
    } else {
        n
    }
}
