//! Row decoding.
//!
//! Turns one raw catalog row into the 57 rendered output fields, or a skip
//! when the row fails validation. Decoding is stateless apart from the
//! object counter supplied by the caller.

use crate::constants::{
    EPOCH_BASE_YEAR, INTS_PER_ROW, MISSING_PLACEHOLDER, PACKED_LENGTH, PROPER_MOTION_OFFSET,
    PROPER_MOTION_QUANTUM, RESIDUAL_OFFSET, RESIDUAL_PACKED_LENGTH, fields,
};
use crate::models::RawRow;
use crate::packed::extract;
use crate::schema::{Band, COLUMN_COUNT};

/// Result of decoding one row
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedRow {
    Record(OutputRecord),
    /// Row had a negative field; nothing is emitted and the counter holds
    Skip,
}

/// One output line: rendered fields in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    fields: Vec<String>,
}

impl OutputRecord {
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Comma-joined line, without terminator
    pub fn to_line(&self) -> String {
        self.fields.join(",")
    }
}

/// A computed column value before rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    /// Band had no detection (raw packed value was zero)
    Missing,
    /// Computed value is exactly zero; rendered as a bare `0`
    Zero,
    Integer(i64),
    Decimal { value: f64, places: usize },
}

impl FieldValue {
    pub fn integer(value: i64) -> Self {
        if value == 0 {
            Self::Zero
        } else {
            Self::Integer(value)
        }
    }

    pub fn decimal(value: f64, places: usize) -> Self {
        if value == 0.0 {
            Self::Zero
        } else {
            Self::Decimal { value, places }
        }
    }

    pub fn render(&self) -> String {
        match *self {
            Self::Missing => MISSING_PLACEHOLDER.to_string(),
            Self::Zero => "0".to_string(),
            Self::Integer(value) => value.to_string(),
            Self::Decimal { value, places } => format!("{value:.places$}"),
        }
    }
}

/// A row whose integers have all passed the sign check
#[derive(Debug, Clone, Copy)]
struct ValidRow([u32; INTS_PER_ROW]);

impl ValidRow {
    fn check(row: &RawRow) -> Option<Self> {
        let mut values = [0u32; INTS_PER_ROW];
        for (out, &raw) in values.iter_mut().zip(row.values()) {
            *out = u32::try_from(raw).ok()?;
        }
        Some(Self(values))
    }

    fn get(&self, index: usize) -> u32 {
        self.0[index]
    }
}

/// Decode one row for the given zone and per-zone object counter
pub fn decode_row(row: &RawRow, zone_number: u32, object_counter: u32) -> DecodedRow {
    let Some(row) = ValidRow::check(row) else {
        return DecodedRow::Skip;
    };

    let mut fields = Vec::with_capacity(COLUMN_COUNT);
    fields.push(object_id(zone_number, object_counter));
    fields.extend(decode_values(&row).iter().map(FieldValue::render));

    DecodedRow::Record(OutputRecord { fields })
}

/// Catalog identifier `ZZZZ-NNNNNNN`
pub fn object_id(zone_number: u32, object_counter: u32) -> String {
    format!("{:04}-{:07}", zone_number, object_counter)
}

fn decode_values(row: &ValidRow) -> Vec<FieldValue> {
    let mut values = Vec::with_capacity(COLUMN_COUNT - 1);

    values.push(FieldValue::decimal(degrees(row.get(fields::RA)), 6));
    // Stored as south polar distance
    values.push(FieldValue::decimal(
        degrees(row.get(fields::SOUTH_POLAR_DISTANCE)) - 90.0,
        6,
    ));

    values.extend(proper_motion(u64::from(row.get(fields::PROPER_MOTION))));
    values.extend(motion_errors(u64::from(row.get(fields::MOTION_ERRORS))));
    values.extend(position_errors(u64::from(row.get(fields::POSITION_ERRORS))));

    for band in Band::ALL {
        let raw = row.get(fields::PHOTOMETRY_START + band.index());
        values.extend(gated(raw, photometry));
    }
    for band in Band::ALL {
        let raw = row.get(fields::RESIDUALS_START + band.index());
        values.extend(gated(raw, residuals));
    }
    for band in Band::ALL {
        let raw = row.get(fields::LOOKBACK_START + band.index());
        values.extend(gated(raw, |index| [FieldValue::integer(index as i64)]));
    }

    values
}

/// Zero raw value means no detection in the band: every column of the
/// group becomes the missing placeholder instead of being decoded.
fn gated<const N: usize>(raw: u32, decode: impl FnOnce(u64) -> [FieldValue; N]) -> [FieldValue; N] {
    if raw == 0 {
        [FieldValue::Missing; N]
    } else {
        decode(u64::from(raw))
    }
}

/// 0.01 arcsec units to degrees
fn degrees(centi_arcsec: u32) -> f64 {
    f64::from(centi_arcsec) / 100.0 / 60.0 / 60.0
}

fn digits(packed: u64, start: u32, len: u32) -> i64 {
    extract(packed, PACKED_LENGTH, start, len) as i64
}

fn residual_digits(packed: u64, start: u32, len: u32) -> i64 {
    extract(packed, RESIDUAL_PACKED_LENGTH, start, len) as i64
}

/// pm_ra, pm_dec, pm_prob, pm_catalog_correction_flag
pub fn proper_motion(packed: u64) -> [FieldValue; 4] {
    [
        FieldValue::integer(digits(packed, 6, 4) * PROPER_MOTION_QUANTUM - PROPER_MOTION_OFFSET),
        FieldValue::integer(digits(packed, 2, 4) * PROPER_MOTION_QUANTUM - PROPER_MOTION_OFFSET),
        FieldValue::integer(digits(packed, 1, 1)),
        FieldValue::integer(digits(packed, 0, 1)),
    ]
}

/// pm_ra_sigma, pm_dec_sigma, ra_fit_sigma, dec_fit_sigma, num_detections,
/// diffraction_spike_flag
pub fn motion_errors(packed: u64) -> [FieldValue; 6] {
    [
        FieldValue::integer(digits(packed, 7, 3)),
        FieldValue::integer(digits(packed, 4, 3)),
        FieldValue::integer(digits(packed, 3, 1)),
        FieldValue::integer(digits(packed, 2, 1)),
        FieldValue::integer(digits(packed, 1, 1)),
        FieldValue::integer(digits(packed, 0, 1)),
    ]
}

/// j2000_ra_sigma, j2000_dec_sigma, epoch, ys4_correlation_flag
pub fn position_errors(packed: u64) -> [FieldValue; 4] {
    [
        FieldValue::integer(digits(packed, 7, 3)),
        FieldValue::integer(digits(packed, 4, 3)),
        FieldValue::decimal(digits(packed, 1, 3) as f64 / 10.0 + EPOCH_BASE_YEAR, 1),
        FieldValue::integer(digits(packed, 0, 1)),
    ]
}

/// mag, field, survey, galaxy_star_sep
pub fn photometry(packed: u64) -> [FieldValue; 4] {
    [
        FieldValue::decimal(digits(packed, 6, 4) as f64 / 100.0, 2),
        FieldValue::integer(digits(packed, 3, 3)),
        FieldValue::integer(digits(packed, 2, 1)),
        FieldValue::integer(digits(packed, 0, 2)),
    ]
}

/// xi_res, eta_res, calibration_source
pub fn residuals(packed: u64) -> [FieldValue; 3] {
    [
        FieldValue::decimal(residual_digits(packed, 5, 4) as f64 / 100.0 - RESIDUAL_OFFSET, 2),
        FieldValue::decimal(residual_digits(packed, 1, 4) as f64 / 100.0 - RESIDUAL_OFFSET, 2),
        FieldValue::integer(residual_digits(packed, 0, 1)),
    ]
}
