//! Catalog layout constants for the USNO-B1 converter
//!
//! Row geometry, raw field positions and the packed-field layouts
//! described by the USNO-B1 binary format notes.

// =============================================================================
// Row Geometry
// =============================================================================

/// Number of packed 32-bit integers in a catalog row
pub const INTS_PER_ROW: usize = 20;

/// Size of one catalog row in bytes
pub const ROW_LENGTH: usize = INTS_PER_ROW * 4;

/// Highest zone number in the full catalog (zones are one degree of south polar distance)
pub const MAX_ZONE: u32 = 1799;

// =============================================================================
// Raw Field Positions
// =============================================================================

/// Positions of the raw integers inside a row
pub mod fields {
    /// RA in units of 0.01 arcsec
    pub const RA: usize = 0;

    /// South polar distance in units of 0.01 arcsec
    pub const SOUTH_POLAR_DISTANCE: usize = 1;

    /// Packed proper motion, probability and catalog correction flag
    pub const PROPER_MOTION: usize = 2;

    /// Packed proper motion errors, fit sigmas, detections and spike flag
    pub const MOTION_ERRORS: usize = 3;

    /// Packed position errors, epoch and YS4.0 correlation flag
    pub const POSITION_ERRORS: usize = 4;

    /// First of the five packed photometry fields
    pub const PHOTOMETRY_START: usize = 5;

    /// First of the five packed residual fields
    pub const RESIDUALS_START: usize = 10;

    /// First of the five scan lookback indices
    pub const LOOKBACK_START: usize = 15;
}

// =============================================================================
// Packed Field Layout
// =============================================================================

/// Digit count of the astrometric and photometric packed fields
pub const PACKED_LENGTH: u32 = 10;

/// Digit count of the residual packed fields
pub const RESIDUAL_PACKED_LENGTH: u32 = 9;

/// Proper motion is stored in 2 mas/yr quanta offset by 10000 mas/yr
pub const PROPER_MOTION_QUANTUM: i64 = 2;
pub const PROPER_MOTION_OFFSET: i64 = 10_000;

/// Epoch is stored in tenths of a year after 1950
pub const EPOCH_BASE_YEAR: f64 = 1950.0;

/// Residuals are stored in 0.01 arcsec offset by 50 arcsec
pub const RESIDUAL_OFFSET: f64 = 50.0;

// =============================================================================
// Output
// =============================================================================

/// Placeholder written for every column of a band with no detection
pub const MISSING_PLACEHOLDER: &str = "?";

/// Default soft size cap for one output file
pub const DEFAULT_ROTATION_THRESHOLD_BYTES: u64 = 50 * 1024 * 1024;

/// Default input tree root, laid out as `<folder>/b<zone>.cat`
pub const DEFAULT_INPUT_ROOT: &str = "input-data";

/// Default parent directory for run output
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// Output files are named `usno-b1-<N>.csv`
pub const OUTPUT_FILE_PREFIX: &str = "usno-b1-";
pub const OUTPUT_FILE_EXTENSION: &str = "csv";
