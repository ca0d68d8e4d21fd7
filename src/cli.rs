//! Command-line interface components.

use crate::config::{ConverterConfig, ZoneRange};
use crate::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "usno-b1-converter")]
#[command(about = "Convert USNO-B1 binary catalog zone files to CSV")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Root of the catalog tree, laid out as <folder>/b<zone>.cat
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory that receives the output files
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// First zone to convert
    #[arg(long)]
    pub start: Option<u32>,

    /// Last zone to convert (inclusive)
    #[arg(long, conflicts_with = "open_ended")]
    pub end: Option<u32>,

    /// Convert from the start zone until the first missing zone file
    #[arg(long)]
    pub open_ended: bool,

    /// Start a new output file once the current one reaches this many MiB
    #[arg(long, value_name = "MIB")]
    pub threshold_mb: Option<u64>,

    /// Write output files directly into the output directory instead of a
    /// timestamped run directory
    #[arg(long)]
    pub no_run_dir: bool,

    /// JSON configuration file; command-line flags take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors, and hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Build the run configuration: config file first, then flags
    pub fn into_config(self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_json_file(path)?,
            None => ConverterConfig::default(),
        };
        config.zones = self.zone_range(config.zones);

        if let Some(input_dir) = self.input_dir {
            config.input_root = input_dir;
        }
        if let Some(output) = self.output {
            config.output_root = output;
        }
        if let Some(megabytes) = self.threshold_mb {
            config.rotation_threshold_bytes = megabytes.saturating_mul(1024 * 1024);
        }
        if self.no_run_dir {
            config.run_scoped_output = false;
        }
        if self.quiet {
            config.show_progress = false;
        }

        config.validate()?;
        Ok(config)
    }

    /// Layer the zone flags over `configured`. The mode only changes when
    /// `--end` or `--open-ended` is given.
    fn zone_range(&self, configured: ZoneRange) -> ZoneRange {
        let start = self.start.unwrap_or(configured.start());

        if self.open_ended {
            return ZoneRange::OpenEnded { start };
        }

        match (self.end, configured) {
            (Some(end), _) => ZoneRange::Bounded { start, end },
            (None, ZoneRange::Bounded { end, .. }) => ZoneRange::Bounded { start, end },
            (None, ZoneRange::OpenEnded { .. }) => ZoneRange::OpenEnded { start },
        }
    }
}
