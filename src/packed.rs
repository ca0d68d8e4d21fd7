//! Packed decimal field extraction.
//!
//! Several catalog integers carry more than one value: the decimal digit
//! string, zero-padded to a fixed length, is cut into sub-fields at fixed
//! digit offsets. Extraction here works on powers of ten instead of
//! rendering and slicing strings.

/// Extract the sub-field `[start_offset, start_offset + field_length)` from
/// the decimal digits of `packed`, left-padded with zeros to `expected_length`.
///
/// Values with more digits than `expected_length` are not truncated: the
/// offsets then index into the longer natural digit string. A slice starting
/// at or past the end of the padded string yields 0, and a slice running past
/// the end is cut short.
pub fn extract(packed: u64, expected_length: u32, start_offset: u32, field_length: u32) -> u64 {
    let padded_length = expected_length.max(digit_count(packed));
    if start_offset >= padded_length || field_length == 0 {
        return 0;
    }

    let end = start_offset.saturating_add(field_length).min(padded_length);
    let shifted = match 10u64.checked_pow(padded_length - end) {
        Some(divisor) => packed / divisor,
        None => 0,
    };

    match 10u64.checked_pow(end - start_offset) {
        Some(modulus) => shifted % modulus,
        None => shifted,
    }
}

/// Number of decimal digits in `value` (zero has one digit)
pub fn digit_count(value: u64) -> u32 {
    value.checked_ilog10().map_or(1, |log| log + 1)
}
