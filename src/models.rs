//! Core data structures for USNO-B1 conversion.
//!
//! Defines zones and their file layout, raw catalog rows, and the
//! statistics collected over a conversion run.

use crate::constants::{INTS_PER_ROW, ROW_LENGTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One declination zone of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Zone {
    number: u32,
}

impl Zone {
    pub fn new(number: u32) -> Self {
        Self { number }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Folder holding this zone's file: the first three digits of the
    /// zero-padded zone number, so ten consecutive zones share a folder
    pub fn folder_name(&self) -> String {
        let mut padded = format!("{:04}", self.number);
        padded.truncate(3);
        padded
    }

    pub fn file_name(&self) -> String {
        format!("b{:04}.cat", self.number)
    }

    /// Resolve `<root>/<folder>/b<zone>.cat`
    pub fn input_path(&self, input_root: &Path) -> PathBuf {
        input_root.join(self.folder_name()).join(self.file_name())
    }
}

/// One fixed-stride catalog row: 20 little-endian signed integers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRow([i32; INTS_PER_ROW]);

impl RawRow {
    pub fn new(values: [i32; INTS_PER_ROW]) -> Self {
        Self(values)
    }

    pub fn from_le_bytes(bytes: &[u8; ROW_LENGTH]) -> Self {
        let mut values = [0i32; INTS_PER_ROW];
        for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(4)) {
            *value = i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(values)
    }

    pub fn to_le_bytes(&self) -> [u8; ROW_LENGTH] {
        let mut bytes = [0u8; ROW_LENGTH];
        for (chunk, value) in bytes.chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    pub fn values(&self) -> &[i32; INTS_PER_ROW] {
        &self.0
    }
}

/// Statistics for one conversion run
#[derive(Debug, Default, Clone, Serialize)]
pub struct ConversionStats {
    pub zones_converted: usize,
    pub files_skipped_size: usize,
    pub files_missing: usize,
    pub rows_written: u64,
    pub rows_skipped: u64,
    pub output_files: usize,
    pub output_dir: PathBuf,
    pub processing_time_ms: u128,
}

impl ConversionStats {
    pub fn files_skipped(&self) -> usize {
        self.files_skipped_size + self.files_missing
    }
}
