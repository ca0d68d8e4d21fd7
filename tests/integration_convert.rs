//! End-to-end tests for the USNO-B1 converter public API
//!
//! These tests build a small synthetic catalog tree on disk, run the
//! converter over it and inspect the CSV files it produces.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use usno_b1_converter::{
    ConverterConfig, Converter, ConverterError, OutputSchema, RawRow, Zone, ZoneRange,
};

fn row(ra: i32, spd: i32, photometry: i32) -> RawRow {
    RawRow::new([
        ra,
        spd,
        1_450_105_012,
        123_456_789,
        1_452_452_001,
        photometry,
        photometry,
        0,
        photometry,
        photometry,
        150_005_000,
        150_005_000,
        0,
        150_005_000,
        150_005_000,
        11,
        12,
        0,
        14,
        15,
    ])
}

fn write_zone(root: &Path, zone: u32, rows: &[RawRow]) {
    let path = Zone::new(zone).input_path(root);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let bytes: Vec<u8> = rows.iter().flat_map(RawRow::to_le_bytes).collect();
    fs::write(path, bytes).unwrap();
}

fn config(temp_dir: &TempDir, zones: ZoneRange) -> ConverterConfig {
    let input_root = temp_dir.path().join("input-data");
    fs::create_dir_all(&input_root).unwrap();
    ConverterConfig::default()
        .with_input_root(input_root)
        .with_output_root(temp_dir.path().join("output"))
        .with_zones(zones)
        .with_run_scoped_output(false)
        .with_progress(false)
}

/// Parse an output file into header and data rows using the csv crate
fn read_csv(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .unwrap();
    let header = reader.headers().unwrap().iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

/// Test a full run over several folders of zones
///
/// Purpose: Validate folder layout, numbering, sentinels and header output together
/// Benefit: Catches regressions where modules agree in isolation but not end to end
#[test]
fn test_convert_across_folders() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(&temp_dir, ZoneRange::Bounded { start: 8, end: 11 });

    write_zone(&config.input_root, 8, &[row(100, 200, 1_650_011_234)]);
    write_zone(
        &config.input_root,
        9,
        &[row(0, 32_400_000, 1_650_011_234), row(5, 5, 1_650_011_234)],
    );
    write_zone(&config.input_root, 10, &[row(7, 7, 1_650_011_234)]);
    // zone 11 intentionally absent

    let stats = Converter::new(config.clone()).unwrap().run().unwrap();
    assert_eq!(stats.zones_converted, 3);
    assert_eq!(stats.files_missing, 1);
    assert_eq!(stats.rows_written, 4);

    let (header, rows) = read_csv(&config.output_root.join("usno-b1-0.csv"));
    assert_eq!(header, OutputSchema::usno_b1().columns());
    assert_eq!(rows.len(), 4);

    let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(
        ids,
        vec!["0008-0000001", "0009-0000001", "0009-0000002", "0010-0000001"]
    );

    let schema = OutputSchema::usno_b1();
    let col = |name: &str| schema.index_of(name).unwrap();

    // zero position compacts to "0"
    assert_eq!(rows[1][col("j2000_ra")], "0");
    assert_eq!(rows[1][col("j2000_dec")], "0");

    // blue_2 band has no detection
    for name in ["blue_2_mag", "blue_2_field", "blue_2_survey", "blue_2_galaxy_star_sep"] {
        assert_eq!(rows[0][col(name)], "?");
    }
    for name in ["blue_2_xi_res", "blue_2_eta_res", "blue_2_calibration_source"] {
        assert_eq!(rows[0][col(name)], "?");
    }
    assert_eq!(rows[0][col("blue_2_scan_lookback_index")], "?");
    assert_eq!(rows[0][col("ir_scan_lookback_index")], "15");
    assert_eq!(rows[0][col("red_1_mag")], "12.34");
}

#[test]
fn test_bad_file_and_bad_rows_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(&temp_dir, ZoneRange::Bounded { start: 0, end: 1 });

    let zone0 = Zone::new(0).input_path(&config.input_root);
    fs::create_dir_all(zone0.parent().unwrap()).unwrap();
    fs::write(&zone0, vec![0u8; 80 * 3 + 1]).unwrap();

    let mut negative = *row(1, 1, 1).values();
    negative[11] = -1;
    write_zone(
        &config.input_root,
        1,
        &[row(1, 1, 1), RawRow::new(negative), row(2, 2, 2)],
    );

    let stats = Converter::new(config.clone()).unwrap().run().unwrap();
    assert_eq!(stats.files_skipped_size, 1);
    assert_eq!(stats.rows_skipped, 1);

    let (_, rows) = read_csv(&config.output_root.join("usno-b1-0.csv"));
    let ids: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(ids, vec!["0001-0000001", "0001-0000002"]);
}

#[test]
fn test_rotation_produces_sequential_files() {
    let temp_dir = TempDir::new().unwrap();
    let config = config(&temp_dir, ZoneRange::OpenEnded { start: 0 }).with_rotation_threshold(1);

    for zone in 0..4 {
        write_zone(&config.input_root, zone, &[row(1, 1, 1)]);
    }

    let stats = Converter::new(config.clone()).unwrap().run().unwrap();
    // The header alone reaches a one-byte threshold, so every zone gets its own file
    assert_eq!(stats.output_files, 5);

    let (_, first) = read_csv(&config.output_root.join("usno-b1-0.csv"));
    assert!(first.is_empty());
    for index in 1..=4 {
        let (header, rows) = read_csv(&config.output_root.join(format!("usno-b1-{index}.csv")));
        assert_eq!(header.len(), 57);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], format!("{:04}-0000001", index - 1));
    }
}

#[test]
fn test_missing_input_root_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = ConverterConfig::default().with_input_root(temp_dir.path().join("absent"));
    assert!(matches!(
        Converter::new(config),
        Err(ConverterError::InputNotFound { .. })
    ));
}
