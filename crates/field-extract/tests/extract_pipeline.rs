//! End-to-end extraction over a synthetic source dataset.
//!
//! The source is a symmetric point cloud with uniform B and U, so the
//! frame flip maps the cloud onto itself and every grid point lands
//! exactly on a source point. That makes the interpolated output exactly
//! predictable:
//!
//!   B = (1, 2, 3) nT, U = (4, 5, 6) km/s in GSE
//!   -> B' = (-1, -2, 3), U' = (-4, -5, 6) in EPhiO
//!   -> E = -1e-6 (U' x B') = (3e-6, -6e-6, -3e-6) V/m

use std::path::{Path, PathBuf};

use field_extract::pipeline::EXPORT_VARIABLES;
use field_extract::transform::{
    VAR_BX, VAR_BY, VAR_BZ, VAR_UX, VAR_UY, VAR_UZ, VAR_X, VAR_Y, VAR_Z,
};
use field_extract::{ExtractError, ExtractionPipeline, RegionSpec};
use plt_parser::{read_ascii, write_ascii, Dataset};

const SOURCE_B: [f64; 3] = [1.0, 2.0, 3.0];
const SOURCE_U: [f64; 3] = [4.0, 5.0, 6.0];

/// Write a source dataset: a 5x5x5 cloud on [-2, 2]^3 with uniform fields.
fn write_source(dir: &Path, file: &str, b: [f64; 3], u: [f64; 3]) -> PathBuf {
    let names = [
        VAR_X, VAR_Y, VAR_Z, VAR_BX, VAR_BY, VAR_BZ, VAR_UX, VAR_UY, VAR_UZ,
    ];
    let vars = names.iter().map(|s| s.to_string()).collect();
    let mut ds = Dataset::new("synthetic magnetosphere", vars).unwrap();

    let mut points = Vec::new();
    for xi in -2i32..=2 {
        for yi in -2i32..=2 {
            for zi in -2i32..=2 {
                points.push([xi as f64, yi as f64, zi as f64]);
            }
        }
    }
    let zi = ds.add_ordered_zone("3d field data", points.len());
    let zone = ds.zone_mut(zi).unwrap();
    for axis in 0..3 {
        let column: Vec<f64> = points.iter().map(|p| p[axis]).collect();
        zone.values_mut(axis).copy_from_slice(&column);
    }
    for axis in 0..3 {
        let n = points.len();
        zone.values_mut(3 + axis).copy_from_slice(&vec![b[axis]; n]);
        zone.values_mut(6 + axis).copy_from_slice(&vec![u[axis]; n]);
    }

    let path = dir.join(file);
    let all: Vec<usize> = (0..names.len()).collect();
    write_ascii(&path, &ds, &all, &[zi]).unwrap();
    path
}

fn small_region() -> RegionSpec {
    RegionSpec::new(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0, 1.0).unwrap()
}

#[test]
fn test_end_to_end_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "run.dat", SOURCE_B, SOURCE_U);
    let output = dir.path().join("out.dat");

    let pipeline = ExtractionPipeline::new(small_region()).unwrap();
    let summary = pipeline.extract(&source, &output).unwrap();
    assert_eq!(summary.shape, (3, 3, 3));
    assert_eq!(summary.num_points, 27);
    assert_eq!(summary.output, output);

    let result = read_ascii(&output).unwrap();
    assert_eq!(result.variables(), &EXPORT_VARIABLES);
    assert_eq!(result.num_zones(), 1);

    let zone = result.zone(0).unwrap();
    assert_eq!(zone.num_points(), 27);
    assert!(zone.name().starts_with("EPhiO, xmin -1, xmax 1"));

    // Flat ordering: index = ii*9 + jj*3 + kk, z fastest.
    let (x, y, z) = (zone.values(0), zone.values(1), zone.values(2));
    assert_eq!([x[0], y[0], z[0]], [-1.0, -1.0, -1.0]);
    assert_eq!([x[5], y[5], z[5]], [-1.0, 0.0, 1.0]);
    assert_eq!([x[26], y[26], z[26]], [1.0, 1.0, 1.0]);

    // Uniform fields survive interpolation exactly (every grid point is an
    // exact hit on a flipped source point).
    let expect = [
        (3, -SOURCE_B[0]),
        (4, -SOURCE_B[1]),
        (5, SOURCE_B[2]),
        (6, 3e-6),
        (7, -6e-6),
        (8, -3e-6),
    ];
    for (vi, want) in expect {
        for &got in zone.values(vi) {
            assert!(
                (got - want).abs() < 1e-15,
                "variable {}: got {got}, want {want}",
                EXPORT_VARIABLES[vi]
            );
        }
    }
}

#[test]
fn test_degenerate_axis_plane_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "run.dat", SOURCE_B, SOURCE_U);
    let output = dir.path().join("plane.dat");

    let region = RegionSpec::new(-1.0, 1.0, 0.0, 0.0, -1.0, 1.0, 1.0).unwrap();
    let summary = ExtractionPipeline::new(region)
        .unwrap()
        .extract(&source, &output)
        .unwrap();
    assert_eq!(summary.shape, (3, 1, 3));
    assert_eq!(summary.num_points, 9);

    let result = read_ascii(&output).unwrap();
    assert!(result.zone(0).unwrap().values(1).iter().all(|&y| y == 0.0));
}

#[test]
fn test_interpolation_failure_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let nan = [f64::NAN; 3];
    let source = write_source(dir.path(), "run.dat", nan, nan);
    let output = dir.path().join("out.dat");

    let err = ExtractionPipeline::new(small_region())
        .unwrap()
        .extract(&source, &output)
        .unwrap_err();
    assert!(matches!(err, ExtractError::Interpolation(_)));
    assert!(!output.exists(), "failed run must not leave an output file");
}

#[test]
fn test_missing_variable_aborts_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let source = write_source(dir.path(), "run.dat", SOURCE_B, SOURCE_U);
    let output = dir.path().join("out.dat");

    // Re-write the source without U_z.
    let full = read_ascii(&source).unwrap();
    let kept: Vec<usize> = (0..8).collect();
    write_ascii(&source, &full, &kept, &[0]).unwrap();

    let err = ExtractionPipeline::new(small_region())
        .unwrap()
        .extract(&source, &output)
        .unwrap_err();
    assert!(matches!(err, ExtractError::MissingVariable(_)));
    assert!(!output.exists());
}

#[test]
fn test_unreadable_source_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ExtractionPipeline::new(small_region())
        .unwrap()
        .extract(&dir.path().join("missing.dat"), &dir.path().join("out.dat"))
        .unwrap_err();
    assert!(matches!(err, ExtractError::Load { .. }));
}

#[test]
fn test_invalid_region_rejected_at_construction() {
    let region = RegionSpec {
        h: 0.0,
        ..RegionSpec::default()
    };
    assert!(matches!(
        ExtractionPipeline::new(region),
        Err(ExtractError::InvalidGridSpec(_))
    ));
}
