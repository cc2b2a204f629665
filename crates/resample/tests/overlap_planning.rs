//! Integration tests for per-axis overlap planning

use ctools_resample::{output_length, AxisOverlap, Error};
use rstest::rstest;

const TOLERANCE: f64 = 1e-9;

fn indices(table: &AxisOverlap, cell: usize) -> Vec<usize> {
    table.row(cell).iter().map(|o| o.index).collect()
}

fn weights(table: &AxisOverlap, cell: usize) -> Vec<f64> {
    table.row(cell).iter().map(|o| o.weight).collect()
}

#[test]
fn exact_alignment() {
    // 4 input voxels of 1 mm onto 2 voxels of 2 mm
    let table = AxisOverlap::plan(2, 2.0, 4, 1.0).unwrap();

    assert_eq!(table.boundaries(), &[0.0, 2.0, 4.0]);
    assert_eq!(table.capacity(), 4);
    assert_eq!(indices(&table, 0), vec![0, 1]);
    assert_eq!(indices(&table, 1), vec![2, 3]);
    assert_eq!(weights(&table, 0), vec![1.0, 1.0]);
    assert_eq!(weights(&table, 1), vec![1.0, 1.0]);
}

#[rstest]
#[case(8)]
#[case(9)]
#[case(64)]
fn identity(#[case] n: usize) {
    let table = AxisOverlap::plan(n, 0.5, n, 0.5).unwrap();
    assert_eq!(table.len(), n);
    for cell in 0..n {
        assert_eq!(table.row(cell).len(), 1);
        assert_eq!(table.row(cell)[0].index, cell);
        assert_eq!(table.row(cell)[0].weight, 1.0);
    }
}

#[test]
fn fractional_edges() {
    // 10 voxels of 1 mm onto 4 of 1.7 mm: edges at 1.6, 3.3, 5.0, 6.7, 8.4
    let table = AxisOverlap::plan(4, 1.7, 10, 1.0).unwrap();
    let expected = [1.6, 3.3, 5.0, 6.7, 8.4];
    for (a, b) in table.boundaries().iter().zip(expected) {
        assert!((a - b).abs() < TOLERANCE, "{a} != {b}");
    }

    assert_eq!(indices(&table, 0), vec![1, 2, 3]);
    let w = weights(&table, 0);
    assert!((w[0] - 0.4).abs() < TOLERANCE);
    assert_eq!(w[1], 1.0);
    assert!((w[2] - 0.3).abs() < TOLERANCE);

    // cell ending exactly on an input edge does not touch the next voxel
    assert_eq!(indices(&table, 1), vec![3, 4]);
    assert!((weights(&table, 1)[1] - 1.0).abs() < TOLERANCE);
}

#[test]
fn odd_lengths_use_truncating_centre() {
    // 5 voxels of 1 mm onto 2 of 2 mm: the last input voxel is left out
    let table = AxisOverlap::plan(2, 2.0, 5, 1.0).unwrap();
    assert_eq!(table.boundaries(), &[0.0, 2.0, 4.0]);
    assert_eq!(indices(&table, 1), vec![2, 3]);
}

#[test]
fn upsampling_splits_voxels() {
    // 4 voxels of 1 mm onto 8 of 0.5 mm
    let table = AxisOverlap::plan(8, 0.5, 4, 1.0).unwrap();
    assert_eq!(table.capacity(), 2);
    for cell in 0..8 {
        assert_eq!(indices(&table, cell), vec![cell / 2]);
        assert_eq!(weights(&table, cell), vec![0.5]);
    }
}

#[rstest]
#[case(10, 1.0, 1.7)]
#[case(512, 0.977, 2.0)]
#[case(100, 2.5, 1.0)]
#[case(33, 0.7, 1.4)]
#[case(7, 1.0, 0.3)]
#[case(64, 0.5, 0.5)]
#[case(300, 0.625, 5.0)]
fn table_properties(#[case] n: usize, #[case] d: f32, #[case] nd: f32) {
    let nn = output_length(n, d, nd);
    let table = AxisOverlap::plan(nn, nd as f64, n, d as f64).unwrap();

    assert_eq!(table.len(), nn);
    assert_eq!(table.boundaries().len(), nn + 1);
    assert_eq!(table.capacity(), (nd as f64 / d as f64).floor() as usize + 2);
    assert!(table.is_conservative(TOLERANCE));

    for cell in 0..nn {
        let row = table.row(cell);
        assert!(row.len() <= table.capacity());
        assert!(row.len() + 2 >= table.capacity());

        for overlap in row {
            assert!((0.0..=1.0).contains(&overlap.weight));
            assert!(overlap.index < n);
        }

        // ordered and contiguous
        for pair in row.windows(2) {
            assert_eq!(pair[0].index + 1, pair[1].index);
        }

        let sum: f64 = row.iter().map(|o| o.weight).sum();
        assert!((sum - table.coverage(cell)).abs() < TOLERANCE);
    }
}

#[rstest]
#[case(0, 1.0, 4, 1.0)]
#[case(2, 1.0, 0, 1.0)]
fn empty_axis(#[case] nn: usize, #[case] nd: f64, #[case] n: usize, #[case] d: f64) {
    assert!(matches!(
        AxisOverlap::plan(nn, nd, n, d),
        Err(Error::InvalidAxisLength { .. })
    ));
}

#[rstest]
#[case(0.0, 1.0)]
#[case(1.0, -1.0)]
#[case(f64::NAN, 1.0)]
#[case(1.0, f64::INFINITY)]
fn invalid_spacing(#[case] nd: f64, #[case] d: f64) {
    assert!(matches!(
        AxisOverlap::plan(2, nd, 4, d),
        Err(Error::InvalidSpacing(_))
    ));
}

#[test]
fn output_wider_than_input() {
    // 4 cells of 1.7 mm need 6.8 mm but only 4 mm of input exist
    assert!(matches!(
        AxisOverlap::plan(4, 1.7, 4, 1.0),
        Err(Error::OverlapOutOfBounds { cell: 0, .. })
    ));
}
