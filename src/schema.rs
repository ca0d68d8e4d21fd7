//! Output column schema.
//!
//! The 57 output columns in their fixed order. The schema is an ordinary
//! immutable value handed to whoever writes headers, never global state.

/// Photographic survey band of a detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    Blue1,
    Red1,
    Blue2,
    Red2,
    Ir,
}

impl Band {
    /// All bands in catalog order
    pub const ALL: [Band; 5] = [Band::Blue1, Band::Red1, Band::Blue2, Band::Red2, Band::Ir];

    /// Column name prefix for this band
    pub fn prefix(self) -> &'static str {
        match self {
            Band::Blue1 => "blue_1",
            Band::Red1 => "red_1",
            Band::Blue2 => "blue_2",
            Band::Red2 => "red_2",
            Band::Ir => "ir",
        }
    }

    /// Offset of this band within each five-field group of the row
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Astrometric columns, in output order
pub const ASTROMETRY_COLUMNS: [&str; 17] = [
    "usno_b1_id",
    "j2000_ra",
    "j2000_dec",
    "pm_ra",
    "pm_dec",
    "pm_prob",
    "pm_catalog_correction_flag",
    "pm_ra_sigma",
    "pm_dec_sigma",
    "ra_fit_sigma",
    "dec_fit_sigma",
    "num_detections",
    "diffraction_spike_flag",
    "j2000_ra_sigma",
    "j2000_dec_sigma",
    "epoch",
    "ys4_correlation_flag",
];

/// Per-band photometry column suffixes
pub const PHOTOMETRY_SUFFIXES: [&str; 4] = ["mag", "field", "survey", "galaxy_star_sep"];

/// Per-band residual column suffixes
pub const RESIDUAL_SUFFIXES: [&str; 3] = ["xi_res", "eta_res", "calibration_source"];

pub const LOOKBACK_SUFFIX: &str = "scan_lookback_index";

pub const COLUMN_COUNT: usize = ASTROMETRY_COLUMNS.len()
    + Band::ALL.len() * (PHOTOMETRY_SUFFIXES.len() + RESIDUAL_SUFFIXES.len() + 1);

/// Ordered list of output columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    columns: Vec<String>,
}

impl Default for OutputSchema {
    fn default() -> Self {
        Self::usno_b1()
    }
}

impl OutputSchema {
    /// The USNO-B1 CSV layout
    pub fn usno_b1() -> Self {
        let mut columns: Vec<String> = ASTROMETRY_COLUMNS.iter().map(|c| c.to_string()).collect();

        for band in Band::ALL {
            for suffix in PHOTOMETRY_SUFFIXES {
                columns.push(format!("{}_{}", band.prefix(), suffix));
            }
        }
        for band in Band::ALL {
            for suffix in RESIDUAL_SUFFIXES {
                columns.push(format!("{}_{}", band.prefix(), suffix));
            }
        }
        for band in Band::ALL {
            columns.push(format!("{}_{}", band.prefix(), LOOKBACK_SUFFIX));
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Comma-joined header, without line terminator
    pub fn header_line(&self) -> String {
        self.columns.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_57_columns() {
        let schema = OutputSchema::usno_b1();
        assert_eq!(schema.len(), 57);
        assert!(!schema.is_empty());
        assert_eq!(COLUMN_COUNT, 57);
    }

    #[test]
    fn test_schema_column_order() {
        let schema = OutputSchema::usno_b1();
        let columns = schema.columns();

        assert_eq!(columns[0], "usno_b1_id");
        assert_eq!(columns[16], "ys4_correlation_flag");
        assert_eq!(columns[17], "blue_1_mag");
        assert_eq!(columns[20], "blue_1_galaxy_star_sep");
        assert_eq!(columns[21], "red_1_mag");
        assert_eq!(columns[36], "ir_galaxy_star_sep");
        assert_eq!(columns[37], "blue_1_xi_res");
        assert_eq!(columns[51], "ir_calibration_source");
        assert_eq!(columns[52], "blue_1_scan_lookback_index");
        assert_eq!(columns[56], "ir_scan_lookback_index");
    }

    #[test]
    fn test_index_of() {
        let schema = OutputSchema::default();
        assert_eq!(schema.index_of("pm_prob"), Some(5));
        assert_eq!(schema.index_of("red_2_eta_res"), Some(47));
        assert_eq!(schema.index_of("not_a_column"), None);
    }

    #[test]
    fn test_header_line() {
        let header = OutputSchema::usno_b1().header_line();
        assert!(header.starts_with("usno_b1_id,j2000_ra,j2000_dec,pm_ra,"));
        assert!(header.ends_with(",red_2_scan_lookback_index,ir_scan_lookback_index"));
        assert_eq!(header.split(',').count(), 57);
    }
}
