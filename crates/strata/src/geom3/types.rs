use std::fmt;

use super::Vec3;

/// Coordinate reference system tag of a geometry.
///
/// Only the distinction "metric/flat" vs "geographic/angular" matters to the
/// numeric engines; the EPSG code is carried for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Crs {
    /// Local engineering coordinates without a registered CRS (assumed metric).
    #[default]
    Local,
    /// Projected CRS with metric units, e.g. EPSG:25832.
    Projected(u32),
    /// Geographic CRS with angular units, e.g. EPSG:4326.
    Geographic(u32),
}

impl Crs {
    #[inline]
    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Geographic(_))
    }

    pub fn epsg(&self) -> Option<u32> {
        match *self {
            Crs::Local => None,
            Crs::Projected(code) | Crs::Geographic(code) => Some(code),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Local => write!(f, "local"),
            Crs::Projected(code) | Crs::Geographic(code) => write!(f, "EPSG:{code}"),
        }
    }
}

/// Triangle given by three ordered corner points.
///
/// Winding order is kept as given; orientation analysis does not depend on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub p: [Vec3; 3],
    pub crs: Crs,
}

impl Triangle {
    #[inline]
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3) -> Self {
        Self {
            p: [p0, p1, p2],
            crs: Crs::Local,
        }
    }

    /// Nine coordinates `x1 y1 z1 x2 y2 z2 x3 y3 z3`.
    pub fn from_coords(c: [f64; 9]) -> Self {
        Self::new(
            Vec3::new(c[0], c[1], c[2]),
            Vec3::new(c[3], c[4], c[5]),
            Vec3::new(c[6], c[7], c[8]),
        )
    }

    #[inline]
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = crs;
        self
    }

    /// Centroid of the three corners.
    pub fn center(&self) -> Vec3 {
        (self.p[0] + self.p[1] + self.p[2]) / 3.0
    }

    /// Unnormalized face normal `(p1 − p0) × (p2 − p0)`; sign follows winding.
    pub fn normal(&self) -> Vec3 {
        let dir1 = self.p[1] - self.p[0];
        let dir2 = self.p[2] - self.p[0];
        dir1.cross(&dir2)
    }

    pub fn area(&self) -> f64 {
        0.5 * self.normal().norm()
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.p;
        write!(
            f,
            "(({}, {}, {}), ({}, {}, {}), ({}, {}, {})) [{}]",
            a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z, self.crs
        )
    }
}
