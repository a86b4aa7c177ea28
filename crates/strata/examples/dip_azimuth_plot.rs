//! Dip/azimuth stereonet points for a synthetic folded surface.
//!
//! Usage:
//!   cargo run -p strata --example dip_azimuth_plot -- [triangles]
//!
//! Prints `x y z dip azimuth compass` per triangle: the lower-hemisphere pole
//! that a stereonet plot would place, followed by the attributes it came from.
//! The surface is an anticline `z = 20·cos(x/40)` sampled on a 10 m lattice
//! with a little seeded noise, so poles cluster east and west.

use rand::{rngs::StdRng, Rng, SeedableRng};
use strata::prelude::*;

fn main() {
    let count: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(24);
    let mut rng = StdRng::seed_from_u64(2025);
    let surface = |x: f64, y: f64, noise: f64| 20.0 * (x / 40.0).cos() + 0.05 * y + noise;

    println!("x y z dip azimuth compass");
    for k in 0..count {
        let x0 = 10.0 * (k % 12) as f64;
        let y0 = 10.0 * (k / 12) as f64;
        let mut z = || rng.gen_range(-0.2..0.2);
        let tri = Triangle::new(
            Vec3::new(x0, y0, surface(x0, y0, z())),
            Vec3::new(x0 + 10.0, y0, surface(x0 + 10.0, y0, z())),
            Vec3::new(x0, y0 + 10.0, surface(x0, y0 + 10.0, z())),
        );
        let o = match Orientation::new(&tri) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("triangle {k}: {e}");
                continue;
            }
        };
        let p = o.hemisphere_point();
        println!(
            "{:.4} {:.4} {:.4} {} {} {}",
            p.x,
            p.y,
            p.z,
            o.dip_int(),
            o.azimuth_int(),
            o.compass_direction_label()
        );
    }
}
