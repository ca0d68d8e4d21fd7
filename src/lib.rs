//! USNO-B1 Converter Library
//!
//! A Rust library for converting the USNO-B1 astrometric catalog from its
//! packed binary zone files into CSV.
//!
//! This library provides tools for:
//! - Extracting sub-fields from packed decimal integers
//! - Decoding 80-byte catalog rows into 57 typed output columns
//! - Walking zone files with whole-file and per-row validity checks
//! - Writing CSV output that rotates to a new file past a size threshold

pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod models;
pub mod packed;
pub mod processor;
pub mod schema;

// Re-export commonly used types
pub use config::{ConverterConfig, ZoneRange};
pub use decoder::{DecodedRow, OutputRecord, decode_row};
pub use error::{ConverterError, Result};
pub use models::{ConversionStats, RawRow, Zone};
pub use packed::extract;
pub use processor::Converter;
pub use schema::OutputSchema;
