//! File-level tests for the XYZRGB loader
//!
//! These go through real files on disk so the open/close paths and the
//! best-effort behavior on missing files are covered.

use cloudview_core::{ColoredPoint3d, Drawable, Point3d, PointCloudModel};
use cloudview_io::*;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn write_cloud(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_read_point_cloud_from_file() {
    let file = write_cloud("X Y Z R G B\n1.0 2.0 3.0 255.0 0.0 0.0\n4.0 5.0 6.0 0.0 128.9 0.0\n");

    let cloud = XyzRgbReader::read_point_cloud(file.path());
    assert_eq!(cloud.len(), 2);
    assert_eq!(cloud[0], ColoredPoint3d::new(1.0, 2.0, 3.0, [255, 0, 0]));
    assert_eq!(cloud[1], ColoredPoint3d::new(4.0, 5.0, 6.0, [0, 128, 0]));
}

#[test]
fn test_missing_file_is_empty_cloud() {
    let dir = tempdir().unwrap();
    let cloud = read_colored_point_cloud(dir.path().join("does_not_exist.txt"));
    assert!(cloud.is_empty());
}

#[test]
fn test_load_reports_missing_file() {
    let dir = tempdir().unwrap();
    let result = XyzRgbReader::load(dir.path().join("nope.txt"), &XyzRgbReadOptions::default());
    assert!(matches!(result, Err(IoError::FileNotFound { .. })));
}

#[test]
fn test_load_reports_skipped_lines() {
    let file = write_cloud("1 2 3 4 5 6\nnot a point\n7 8 9 10 11 12\n1 2 three 4 5 6\n");

    let report = XyzRgbReader::load(file.path(), &XyzRgbReadOptions::default()).unwrap();
    assert_eq!(report.point_count(), 2);
    assert_eq!(report.status(), LoadStatus::Partial { skipped: 2 });

    let lines: Vec<usize> = report.skipped.iter().map(|s| s.line_number).collect();
    assert_eq!(lines, vec![2, 4]);
}

#[test]
fn test_load_of_all_malformed_file_is_empty_not_error() {
    let file = write_cloud("X Y Z R G B\na b c d e f\n1 2 3\n");

    let report = XyzRgbReader::load(file.path(), &XyzRgbReadOptions::default()).unwrap();
    assert_eq!(report.status(), LoadStatus::Empty);
    assert!(report.into_non_empty(file.path()).is_err());
}

#[test]
fn test_invalid_utf8_line_does_not_stop_the_load() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"1 2 3 4 5 6\n").unwrap();
    file.write_all(&[0xff, 0xfe, b'\n']).unwrap();
    file.write_all(b"7 8 9 10 11 12\n13 14 15 16 17 18\n").unwrap();
    file.flush().unwrap();

    let cloud = XyzRgbReader::read_point_cloud(file.path());
    assert_eq!(cloud.len(), 3);

    let report = XyzRgbReader::load(file.path(), &XyzRgbReadOptions::default()).unwrap();
    assert_eq!(report.point_count(), 3);
    assert_eq!(report.status(), LoadStatus::Partial { skipped: 1 });
}

#[test]
fn test_loaded_cloud_builds_model() {
    let file = write_cloud("0 0 0 10 20 30\n2 4 6 40 50 60\n");

    let model = PointCloudModel::from_cloud(XyzRgbReader::read_point_cloud(file.path()));
    assert_eq!(model.vertex_count(), 2);
    assert_eq!(model.colors.values[1], [40, 50, 60]);
    assert_eq!(model.center(), Some(Point3d::new(1.0, 2.0, 3.0)));
}

#[test]
fn test_wrap_policy_through_file() {
    let file = write_cloud("0 0 0 256 -1 511.9\n");
    let options = XyzRgbReadOptions {
        color_narrowing: ColorNarrowing::Wrap,
        ..Default::default()
    };

    let cloud = XyzRgbReader::read_point_cloud_with_options(file.path(), &options);
    assert_eq!(cloud[0].color, [0, 255, 255]);
}
