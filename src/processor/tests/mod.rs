//! Integration tests for the processor module
//!
//! Tests the complete conversion pipeline against synthetic zone trees.


use crate::config::{ConverterConfig, ZoneRange};
use crate::constants::INTS_PER_ROW;
use crate::models::{RawRow, Zone};
use crate::processor::writer::output_file_path;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A row where every field is valid and every band is detected
pub fn valid_row(seed: i32) -> [i32; INTS_PER_ROW] {
    [
        12_960_000 + seed,
        16_200_000,
        1_450_105_012,
        123_456_789,
        1_452_452_001,
        1_650_011_234,
        1_650_011_234,
        1_650_011_234,
        1_650_011_234,
        1_650_011_234,
        150_005_000,
        150_005_000,
        150_005_000,
        150_005_000,
        150_005_000,
        1,
        2,
        3,
        4,
        5,
    ]
}

/// Write a zone file made of the given rows
pub fn write_zone(input_root: &Path, zone: u32, rows: &[[i32; INTS_PER_ROW]]) -> PathBuf {
    let bytes: Vec<u8> = rows
        .iter()
        .flat_map(|values| RawRow::new(*values).to_le_bytes())
        .collect();
    write_zone_bytes(input_root, zone, &bytes)
}

/// Write a zone file with arbitrary contents
pub fn write_zone_bytes(input_root: &Path, zone: u32, bytes: &[u8]) -> PathBuf {
    let path = Zone::new(zone).input_path(input_root);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, bytes).unwrap();
    path
}

/// Configuration writing straight into `<temp>/output` with no progress bar
pub fn test_config(temp_dir: &TempDir, zones: ZoneRange) -> ConverterConfig {
    let input_root = temp_dir.path().join("input-data");
    fs::create_dir_all(&input_root).unwrap();

    ConverterConfig::default()
        .with_input_root(input_root)
        .with_output_root(temp_dir.path().join("output"))
        .with_zones(zones)
        .with_run_scoped_output(false)
        .with_progress(false)
}

/// Lines of output file `index`
pub fn read_output(config: &ConverterConfig, index: usize) -> Vec<String> {
    let path = output_file_path(&config.output_root, index);
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Identifier column of every data line in output file `index`
pub fn output_ids(config: &ConverterConfig, index: usize) -> Vec<String> {
    read_output(config, index)
        .iter()
        .skip(1)
        .map(|line| line.split(',').next().unwrap().to_string())
        .collect()
}
