//! Zone file discovery and row streaming
//!
//! Walks zone numbers, resolves each zone's `.cat` file, applies the
//! whole-file size check and streams fixed-size rows out of valid files
//! with per-zone object numbering.

use crate::config::ZoneRange;
use crate::constants::{MAX_ZONE, ROW_LENGTH};
use crate::decoder::{DecodedRow, decode_row};
use crate::error::{ConverterError, Result};
use crate::models::{RawRow, Zone};
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What the iterator found for one zone
#[derive(Debug)]
pub enum ZoneOutcome {
    /// File exists and has a whole number of rows
    Ready(ZoneFile),
    /// File length is not a multiple of the row length; never opened
    SizeMismatch { zone: Zone, path: PathBuf, len: u64 },
    /// File absent in a bounded run
    Missing { zone: Zone, path: PathBuf },
}

impl ZoneOutcome {
    pub fn zone(&self) -> Zone {
        match self {
            ZoneOutcome::Ready(file) => file.zone(),
            ZoneOutcome::SizeMismatch { zone, .. } | ZoneOutcome::Missing { zone, .. } => *zone,
        }
    }
}

/// Iterator over the zones of a run
#[derive(Debug)]
pub struct ZoneFileIterator {
    input_root: PathBuf,
    next_zone: u32,
    last_zone: u32,
    open_ended: bool,
    finished: bool,
}

impl ZoneFileIterator {
    pub fn new(input_root: impl Into<PathBuf>, zones: ZoneRange) -> Self {
        let (next_zone, last_zone, open_ended) = match zones {
            ZoneRange::Bounded { start, end } => (start, end, false),
            ZoneRange::OpenEnded { start } => (start, MAX_ZONE, true),
        };

        Self {
            input_root: input_root.into(),
            next_zone,
            last_zone,
            open_ended,
            finished: next_zone > last_zone,
        }
    }

    fn resolve(&self, zone: Zone) -> Result<Option<ZoneOutcome>> {
        let path = zone.input_path(&self.input_root);

        let len = match fs::metadata(&path) {
            Ok(metadata) => metadata.len(),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                if self.open_ended {
                    info!(
                        "No file for zone {}, end of catalog reached",
                        zone.number()
                    );
                    return Ok(None);
                }
                return Ok(Some(ZoneOutcome::Missing { zone, path }));
            }
            Err(error) => return Err(ConverterError::file_io(path, error)),
        };

        if len % ROW_LENGTH as u64 != 0 {
            return Ok(Some(ZoneOutcome::SizeMismatch { zone, path, len }));
        }

        let file = ZoneFile::open(zone, path, len)?;
        Ok(Some(ZoneOutcome::Ready(file)))
    }
}

impl Iterator for ZoneFileIterator {
    type Item = Result<ZoneOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let zone = Zone::new(self.next_zone);
        if self.next_zone >= self.last_zone {
            self.finished = true;
        } else {
            self.next_zone += 1;
        }

        match self.resolve(zone) {
            Ok(Some(outcome)) => Some(Ok(outcome)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

/// An open zone file positioned at its next row
#[derive(Debug)]
pub struct ZoneFile {
    zone: Zone,
    path: PathBuf,
    reader: BufReader<File>,
    rows_remaining: u64,
    object_counter: u32,
    rows_skipped: u64,
}

impl ZoneFile {
    fn open(zone: Zone, path: PathBuf, len: u64) -> Result<Self> {
        let file = File::open(&path).map_err(|source| ConverterError::file_io(&path, source))?;
        debug!("Opened {} ({} rows)", path.display(), len / ROW_LENGTH as u64);

        Ok(Self {
            zone,
            path,
            reader: BufReader::new(file),
            rows_remaining: len / ROW_LENGTH as u64,
            object_counter: 1,
            rows_skipped: 0,
        })
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Counter value the next accepted row will receive
    pub fn object_counter(&self) -> u32 {
        self.object_counter
    }

    pub fn rows_skipped(&self) -> u64 {
        self.rows_skipped
    }

    /// Read and decode the next row; `None` at end of file.
    ///
    /// The object counter advances only for rows that decode to a record.
    pub fn next_row(&mut self) -> Result<Option<DecodedRow>> {
        if self.rows_remaining == 0 {
            return Ok(None);
        }

        let mut buffer = [0u8; ROW_LENGTH];
        self.reader
            .read_exact(&mut buffer)
            .map_err(|source| ConverterError::file_io(&self.path, source))?;
        self.rows_remaining -= 1;

        let decoded = decode_row(
            &RawRow::from_le_bytes(&buffer),
            self.zone.number(),
            self.object_counter,
        );

        match decoded {
            DecodedRow::Record(_) => self.object_counter += 1,
            DecodedRow::Skip => {
                self.rows_skipped += 1;
                debug!(
                    "Skipping row with negative field in zone {} before object {}",
                    self.zone.number(),
                    self.object_counter
                );
            }
        }

        Ok(Some(decoded))
    }
}
