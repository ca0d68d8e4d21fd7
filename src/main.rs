use anyhow::Context;
use clap::Parser;
use colored::*;
use std::process;
use tracing::debug;
use usno_b1_converter::cli::Args;
use usno_b1_converter::{ConversionStats, Converter};

fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args) {
        eprintln!("Failed to initialise logging: {}", error);
        process::exit(1);
    }

    match run(args) {
        Ok(stats) => {
            print_summary(&stats);
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<ConversionStats> {
    let config = args.into_config().context("Invalid configuration")?;
    let converter = Converter::new(config).context("Failed to set up converter")?;
    converter.run().context("Conversion failed")
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("usno_b1_converter={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

fn print_summary(stats: &ConversionStats) {
    println!("\n{}", "Conversion Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        stats.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Zones converted:".bright_cyan(),
        stats.zones_converted.to_string().bright_white()
    );
    if stats.files_skipped() > 0 {
        println!(
            "  {} {} ({} wrong size, {} missing)",
            "Files skipped:".bright_red(),
            stats.files_skipped().to_string().bright_red().bold(),
            stats.files_skipped_size,
            stats.files_missing
        );
    }
    println!(
        "  {} {}",
        "Rows written:".bright_cyan(),
        stats.rows_written.to_string().bright_white().bold()
    );
    if stats.rows_skipped > 0 {
        println!(
            "  {} {}",
            "Rows skipped:".bright_yellow(),
            stats.rows_skipped.to_string().bright_yellow()
        );
    }
    println!(
        "  {} {} in {}",
        "Output files:".bright_cyan(),
        stats.output_files.to_string().bright_white(),
        stats.output_dir.display()
    );
}
