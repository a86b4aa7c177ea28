use super::*;
use crate::grid::{ElevationGrid, GridGeometry};
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn geom(rows: usize, cols: usize) -> GridGeometry {
    GridGeometry::new(rows, cols, 0.0, 0.0, 10.0).unwrap()
}

fn random_grid(rows: usize, cols: usize, seed: u64) -> ElevationGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    ElevationGrid::from_fn(geom(rows, cols), |_, _| rng.gen_range(-500.0..500.0))
}

fn cfg(radius: usize, shape: WindowShape) -> CorrelationCfg {
    CorrelationCfg {
        radius,
        shape,
        ..CorrelationCfg::default()
    }
}

fn is_border(i: usize, j: usize, rows: usize, cols: usize, n: usize) -> bool {
    i < n || j < n || i + n + 1 >= rows || j + n + 1 >= cols
}

const SHAPES: [WindowShape; 2] = [WindowShape::Square, WindowShape::Disk];

#[test]
fn disk_cell_count_matches_triangular_cut() {
    for size in [3usize, 5, 7] {
        let w = Window::from_size(size, WindowShape::Disk).unwrap();
        let n = (size - 1) / 2;
        let corner: usize = (0..=n).sum();
        assert_eq!(w.cell_count(), size * size - 4 * corner, "size {size}");
        assert_eq!(w.offsets().count(), w.cell_count());
    }
    assert_eq!(Window::from_size(3, WindowShape::Disk).unwrap().cell_count(), 5);
    assert_eq!(Window::from_size(5, WindowShape::Disk).unwrap().cell_count(), 13);
    assert_eq!(Window::from_size(7, WindowShape::Disk).unwrap().cell_count(), 25);
}

#[test]
fn disk_half_widths_taper_by_one_per_row() {
    let w = Window::from_radius(2, WindowShape::Disk).unwrap();
    let hw: Vec<usize> = (-2..=2).filter_map(|k| w.half_width(k)).collect();
    assert_eq!(hw, vec![0, 1, 2, 1, 0]);
    assert_eq!(w.half_width(3), None);
    assert_eq!(w.half_width(-3), None);
    assert_eq!(w.half_width(isize::MIN), None);
    assert!(w.offsets().all(|(dr, dc)| dr.abs() + dc.abs() <= 2));

    let sq = Window::from_radius(2, WindowShape::Square).unwrap();
    assert_eq!(sq.cell_count(), 25);
    assert_eq!(sq.label(), "5x5");
    assert_eq!(sq.size(), 5);
}

#[test]
fn invalid_window_sizes_are_rejected() {
    for bad in [Window::from_radius(0, WindowShape::Square), Window::from_size(4, WindowShape::Disk), Window::from_size(1, WindowShape::Square)] {
        assert!(matches!(bad, Err(CorrelationError::InvalidWindowSize { .. })));
    }
    let g = random_grid(6, 6, 1);
    assert!(matches!(
        correlate(&g, &g, cfg(0, WindowShape::Disk)),
        Err(CorrelationError::InvalidWindowSize { .. })
    ));
}

#[test]
fn window_size_option_labels() {
    assert_eq!(window_size_options(3), vec!["3x3", "5x5", "7x7"]);
    assert!(window_size_options(0).is_empty());
}

#[test]
fn dimension_mismatch_is_an_error() {
    let a = random_grid(8, 9, 1);
    let b = random_grid(9, 8, 2);
    let err = correlate(&a, &b, cfg(1, WindowShape::Square)).unwrap_err();
    assert_eq!(
        err,
        CorrelationError::DimensionMismatch {
            left: (8, 9),
            right: (9, 8)
        }
    );
    assert!(err.to_string().contains("8x9"));
}

#[test]
fn identical_grids_correlate_to_one() {
    let g = random_grid(12, 15, 7);
    for shape in SHAPES {
        for n in 1..=3 {
            let r = correlate(&g, &g, cfg(n, shape)).unwrap();
            for i in 0..12 {
                for j in 0..15 {
                    if is_border(i, j, 12, 15, n) {
                        assert!(!r.is_set(i, j), "border ({i},{j}) set for n={n}");
                    } else {
                        let v = r.get(i, j).expect("interior cell set");
                        assert!((v - 1.0).abs() < 1e-12, "r={v}");
                    }
                }
            }
        }
    }
}

#[test]
fn negated_grid_correlates_to_minus_one() {
    let g = random_grid(10, 10, 11);
    let neg = g.map_values(|z| -z);
    for shape in SHAPES {
        let r = correlate(&g, &neg, cfg(2, shape)).unwrap();
        assert_eq!(r.count_set(), 5 * 5);
        for v in r.to_values().into_iter().flatten() {
            assert!((v + 1.0).abs() < 1e-12, "r={v}");
        }
    }
}

#[test]
fn affine_transform_keeps_coefficient() {
    let g = random_grid(9, 9, 3);
    let h = g.map_values(|z| 3.5 * z - 120.0);
    let r = correlate(&g, &h, cfg(1, WindowShape::Disk)).unwrap();
    assert_eq!(r.count_set(), 6 * 6);
    assert!(r.to_values().into_iter().flatten().all(|v| (v - 1.0).abs() < 1e-12));
}

#[test]
fn hand_computed_square_and_disk_windows() {
    // Only (1, 1) is interior in a 4x4 grid with n = 1.
    let g1 = ElevationGrid::from_fn(geom(4, 4), |i, j| (3 * i + j + 1) as f64);
    let window2 = [[2.0, 1.0, 4.0], [3.0, 6.0, 5.0], [8.0, 7.0, 10.0]];
    let g2 = ElevationGrid::from_fn(geom(4, 4), |i, j| {
        if i < 3 && j < 3 {
            window2[i][j]
        } else {
            0.0
        }
    });

    let sq = correlate(&g1, &g2, cfg(1, WindowShape::Square)).unwrap();
    assert_eq!(sq.count_set(), 1);
    assert!((sq.get(1, 1).unwrap() - 0.9332565252573829).abs() < 1e-12);

    let disk = correlate(&g1, &g2, cfg(1, WindowShape::Disk)).unwrap();
    assert_eq!(disk.count_set(), 1);
    assert!((disk.get(1, 1).unwrap() - 0.9284766908852592).abs() < 1e-12);

    let w = Window::from_radius(1, WindowShape::Square).unwrap();
    let stats = WindowStats::collect(&g1, &g2, &w, 1, 1).unwrap();
    assert_eq!(stats.count, 9);
    assert!((stats.mean1 - 5.0).abs() < 1e-12);
    assert!((stats.mean2 - 46.0 / 9.0).abs() < 1e-12);
}

#[test]
fn unset_cell_blanks_every_window_touching_it() {
    let g1 = random_grid(11, 11, 5);
    let mut g2 = random_grid(11, 11, 6);
    g2.unset(5, 6);
    for shape in SHAPES {
        let n = 2;
        let window = Window::from_radius(n, shape).unwrap();
        let r = correlate(&g1, &g2, cfg(n, shape)).unwrap();
        for i in 0..11 {
            for j in 0..11 {
                if is_border(i, j, 11, 11, n) {
                    assert!(!r.is_set(i, j));
                    continue;
                }
                let touches = window
                    .offsets()
                    .any(|(dr, dc)| (i as isize + dr, j as isize + dc) == (5, 6));
                assert_eq!(r.is_set(i, j), !touches, "{shape} at ({i},{j})");
            }
        }
    }
}

#[test]
fn zero_variance_windows_stay_unset() {
    let flat = ElevationGrid::from_fn(geom(7, 7), |_, _| 42.0);
    let g = random_grid(7, 7, 9);
    for shape in SHAPES {
        let r = correlate(&flat, &g, cfg(1, shape)).unwrap();
        assert_eq!(r.count_set(), 0);
        let w = Window::from_radius(1, shape).unwrap();
        assert_eq!(window_coefficient(&flat, &g, &w, 3, 3), None);
    }
}

#[test]
fn grid_smaller_than_window_yields_all_unset() {
    let g = random_grid(4, 20, 2);
    let r = correlate(&g, &g, cfg(2, WindowShape::Square)).unwrap();
    assert_eq!(r.shape(), (4, 20));
    assert_eq!(r.count_set(), 0);
}

#[test]
fn radius_far_beyond_grid_yields_all_unset() {
    let g = random_grid(5, 5, 1);
    for shape in SHAPES {
        let r = correlate(&g, &g, cfg(1 << 40, shape)).unwrap();
        assert_eq!(r.shape(), (5, 5));
        assert_eq!(r.count_set(), 0);
        let r = correlate(&g, &g, cfg(usize::MAX, shape)).unwrap();
        assert_eq!(r.count_set(), 0);
    }
}

#[test]
fn oversized_radius_is_an_invalid_window() {
    assert!(matches!(
        Window::from_radius(1 << 40, WindowShape::Square),
        Err(CorrelationError::InvalidWindowSize { .. })
    ));
    assert!(matches!(
        Window::from_radius(MAX_RADIUS + 1, WindowShape::Disk),
        Err(CorrelationError::InvalidWindowSize { .. })
    ));
    let w = Window::from_radius(MAX_RADIUS, WindowShape::Disk).unwrap();
    assert_eq!(w.size(), 2 * MAX_RADIUS + 1);
}

#[test]
fn out_of_range_policies() {
    assert_eq!(OutOfRangePolicy::Clamp.apply(1.0000000002), 1.0);
    assert_eq!(OutOfRangePolicy::Clamp.apply(-1.02), -1.0);
    assert_eq!(OutOfRangePolicy::RoundLegacy.apply(-1.02), -1.0);
    assert_eq!(OutOfRangePolicy::Clamp.apply(1.6), 1.0);
    assert_eq!(OutOfRangePolicy::RoundLegacy.apply(1.6), 2.0);
    assert_eq!(OutOfRangePolicy::RoundLegacy.apply(0.6), 0.6);
    assert!(OutOfRangePolicy::Clamp.apply(f64::NAN).is_nan());
    assert_eq!(CorrelationCfg::default().out_of_range, OutOfRangePolicy::Clamp);
}

#[test]
fn shape_parsing() {
    assert_eq!("Kreis".parse::<WindowShape>(), Ok(WindowShape::Disk));
    assert_eq!("square".parse::<WindowShape>(), Ok(WindowShape::Square));
    assert!("hexagon".parse::<WindowShape>().is_err());
}

fn masked_grid(rows: usize, cols: usize) -> impl Strategy<Value = ElevationGrid> {
    proptest::collection::vec(
        prop_oneof![1 => Just(None), 6 => (-100.0..100.0f64).prop_map(Some)],
        rows * cols,
    )
    .prop_map(move |vals| ElevationGrid::from_values(geom(rows, cols), &vals).unwrap())
}

proptest! {
    #[test]
    fn prop_output_is_unset_or_in_range(
        (g1, g2) in (masked_grid(9, 10), masked_grid(9, 10)),
        n in 1usize..4,
        disk in any::<bool>(),
    ) {
        let shape = if disk { WindowShape::Disk } else { WindowShape::Square };
        let window = Window::from_radius(n, shape).unwrap();
        let r = correlate(&g1, &g2, cfg(n, shape)).unwrap();
        prop_assert_eq!(r.shape(), (9, 10));
        for i in 0..9 {
            for j in 0..10 {
                if is_border(i, j, 9, 10, n) {
                    prop_assert!(!r.is_set(i, j));
                    continue;
                }
                let full = window.offsets().all(|(dr, dc)| {
                    let (a, b) = ((i as isize + dr) as usize, (j as isize + dc) as usize);
                    g1.is_set(a, b) && g2.is_set(a, b)
                });
                if !full {
                    prop_assert!(!r.is_set(i, j));
                }
                if let Some(v) = r.get(i, j) {
                    prop_assert!((-1.0..=1.0).contains(&v));
                }
            }
        }
    }

    #[test]
    fn prop_correlation_is_symmetric(
        (g1, g2) in (masked_grid(8, 8), masked_grid(8, 8)),
        n in 1usize..3,
    ) {
        for shape in SHAPES {
            let ab = correlate(&g1, &g2, cfg(n, shape)).unwrap();
            let ba = correlate(&g2, &g1, cfg(n, shape)).unwrap();
            prop_assert_eq!(ab.to_values(), ba.to_values());
        }
    }
}
