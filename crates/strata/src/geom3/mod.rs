//! 3D primitives for triangulated surfaces.
//!
//! Purpose
//! - `Vec3` is nalgebra's `Vector3<f64>`; subtraction, cross product, length
//!   and angle-between come from nalgebra directly.
//! - `Triangle` holds three ordered corners plus the coordinate reference
//!   system tag the orientation engine checks before doing Euclidean math.

mod types;

pub use types::{Crs, Triangle};

/// 3D vector/point alias used throughout the crate.
pub type Vec3 = nalgebra::Vector3<f64>;
