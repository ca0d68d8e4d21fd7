//! Configuration management and validation.
//!
//! Provides the run configuration: where the zone files live, which zones
//! to convert, where output goes and when output files rotate.

use crate::constants::{
    DEFAULT_INPUT_ROOT, DEFAULT_OUTPUT_ROOT, DEFAULT_ROTATION_THRESHOLD_BYTES, MAX_ZONE,
};
use crate::error::{ConverterError, Result};
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which zones a run visits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ZoneRange {
    /// Every zone from `start` to `end` inclusive; missing files are skipped
    Bounded { start: u32, end: u32 },
    /// Zones from `start` until the first missing file, which ends the run
    OpenEnded { start: u32 },
}

impl Default for ZoneRange {
    fn default() -> Self {
        ZoneRange::Bounded {
            start: 0,
            end: MAX_ZONE,
        }
    }
}

impl ZoneRange {
    pub fn start(&self) -> u32 {
        match *self {
            ZoneRange::Bounded { start, .. } | ZoneRange::OpenEnded { start } => start,
        }
    }

    /// Number of zones for a bounded range
    pub fn zone_count(&self) -> Option<u64> {
        match *self {
            ZoneRange::Bounded { start, end } => Some(u64::from(end.saturating_sub(start)) + 1),
            ZoneRange::OpenEnded { .. } => None,
        }
    }
}

/// Configuration for a USNO-B1 conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Root of the input tree (`<root>/<folder>/b<zone>.cat`)
    pub input_root: PathBuf,

    /// Directory that receives output (or the run directory inside it)
    pub output_root: PathBuf,

    /// Zones to convert
    pub zones: ZoneRange,

    /// Soft size cap per output file, checked between zones
    pub rotation_threshold_bytes: u64,

    /// Write into a fresh `run-<timestamp>` directory under `output_root`
    pub run_scoped_output: bool,

    /// Show a progress bar on stderr
    pub show_progress: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from(DEFAULT_INPUT_ROOT),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            zones: ZoneRange::default(),
            rotation_threshold_bytes: DEFAULT_ROTATION_THRESHOLD_BYTES,
            run_scoped_output: true,
            show_progress: true,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a JSON file; absent keys take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| ConverterError::file_io(path, source))?;
        let config: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| ConverterError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_input_root(mut self, input_root: impl Into<PathBuf>) -> Self {
        self.input_root = input_root.into();
        self
    }

    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }

    pub fn with_zones(mut self, zones: ZoneRange) -> Self {
        self.zones = zones;
        self
    }

    pub fn with_rotation_threshold(mut self, bytes: u64) -> Self {
        self.rotation_threshold_bytes = bytes;
        self
    }

    pub fn with_run_scoped_output(mut self, enabled: bool) -> Self {
        self.run_scoped_output = enabled;
        self
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Check the configuration before any file is touched
    pub fn validate(&self) -> Result<()> {
        match self.zones {
            ZoneRange::Bounded { start, end } => {
                if end < start {
                    return Err(ConverterError::configuration(format!(
                        "zone range end {end} is before start {start}"
                    )));
                }
                if end > MAX_ZONE {
                    return Err(ConverterError::configuration(format!(
                        "zone {end} is beyond the last catalog zone {MAX_ZONE}"
                    )));
                }
            }
            ZoneRange::OpenEnded { start } => {
                if start > MAX_ZONE {
                    return Err(ConverterError::configuration(format!(
                        "zone {start} is beyond the last catalog zone {MAX_ZONE}"
                    )));
                }
            }
        }

        if self.rotation_threshold_bytes == 0 {
            return Err(ConverterError::configuration(
                "rotation threshold must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Directory this run writes into, given the run start time
    pub fn output_dir<Tz: TimeZone>(&self, started_at: &DateTime<Tz>) -> PathBuf
    where
        Tz::Offset: std::fmt::Display,
    {
        if self.run_scoped_output {
            self.output_root
                .join(format!("run-{}", started_at.format("%Y%m%d-%H%M%S")))
        } else {
            self.output_root.clone()
        }
    }
}
