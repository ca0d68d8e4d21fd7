//! Main conversion engine.
//!
//! Orchestrates a USNO-B1 run: zone discovery, row decoding and CSV
//! output with rotation, collecting statistics and diagnostics as it goes.

pub mod discovery;
pub mod writer;

#[cfg(test)]
pub mod tests;

use self::discovery::{ZoneFile, ZoneFileIterator, ZoneOutcome};
use self::writer::{OutputDestination, OutputRotator};

use crate::config::ConverterConfig;
use crate::decoder::DecodedRow;
use crate::error::{ConverterError, Result};
use crate::models::ConversionStats;
use crate::schema::OutputSchema;

use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Converter from catalog zone files to rotated CSV output
#[derive(Debug)]
pub struct Converter {
    config: ConverterConfig,
    schema: OutputSchema,
}

impl Converter {
    /// Create a converter, validating the configuration and input root
    pub fn new(config: ConverterConfig) -> Result<Self> {
        config.validate()?;

        if !config.input_root.is_dir() {
            return Err(ConverterError::InputNotFound {
                path: config.input_root.clone(),
            });
        }

        Ok(Self {
            config,
            schema: OutputSchema::usno_b1(),
        })
    }

    /// Convert every zone of the configured range
    pub fn run(&self) -> Result<ConversionStats> {
        let start_time = Instant::now();
        let output_dir = self.config.output_dir(&Local::now());

        info!(
            "Converting zones from {} into {}",
            self.config.input_root.display(),
            output_dir.display()
        );

        let rotator = OutputRotator::new(
            output_dir.clone(),
            &self.schema,
            self.config.rotation_threshold_bytes,
        );
        let mut destination = rotator.open_first()?;

        let mut stats = ConversionStats {
            output_files: 1,
            output_dir,
            ..Default::default()
        };

        let progress = self.progress_bar();
        let mut current_folder: Option<String> = None;

        for outcome in ZoneFileIterator::new(&self.config.input_root, self.config.zones) {
            let outcome = outcome?;
            let zone = outcome.zone();

            let folder = zone.folder_name();
            if current_folder.as_deref() != Some(folder.as_str()) {
                info!("Entering folder {}", folder);
                current_folder = Some(folder);
            }
            progress.set_message(format!("zone {:04}", zone.number()));

            match outcome {
                ZoneOutcome::Missing { path, .. } => {
                    warn!("Skipping zone {}: {} not found", zone.number(), path.display());
                    stats.files_missing += 1;
                }
                ZoneOutcome::SizeMismatch { path, len, .. } => {
                    warn!(
                        "Skipping {}: size {} bytes is not a whole number of rows",
                        path.display(),
                        len
                    );
                    stats.files_skipped_size += 1;
                }
                ZoneOutcome::Ready(mut zone_file) => {
                    let previous_index = destination.index();
                    destination = rotator.rotate_if_needed(destination)?;
                    if destination.index() != previous_index {
                        stats.output_files += 1;
                    }

                    self.convert_zone(&mut zone_file, &mut destination, &mut stats)?;
                    stats.zones_converted += 1;
                }
            }

            progress.inc(1);
        }

        destination.close()?;
        progress.finish_and_clear();

        stats.processing_time_ms = start_time.elapsed().as_millis();
        info!(
            "Wrote {} rows to {} output files ({} rows skipped, {} files skipped)",
            stats.rows_written,
            stats.output_files,
            stats.rows_skipped,
            stats.files_skipped()
        );

        Ok(stats)
    }

    /// Stream one zone file into the active destination
    fn convert_zone(
        &self,
        zone_file: &mut ZoneFile,
        destination: &mut OutputDestination,
        stats: &mut ConversionStats,
    ) -> Result<()> {
        let mut written = 0u64;

        while let Some(decoded) = zone_file.next_row()? {
            match decoded {
                DecodedRow::Record(record) => {
                    destination.write_record(&record)?;
                    written += 1;
                }
                DecodedRow::Skip => stats.rows_skipped += 1,
            }
        }

        stats.rows_written += written;
        if zone_file.rows_skipped() > 0 {
            warn!(
                "Skipped {} rows with negative fields in {}",
                zone_file.rows_skipped(),
                zone_file.path().display()
            );
        }
        debug!(
            "Zone {}: {} rows written to {}",
            zone_file.zone().number(),
            written,
            destination.path().display()
        );

        Ok(())
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        match self.config.zones.zone_count() {
            Some(total) => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::with_template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} zones {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb
            }
        }
    }
}
