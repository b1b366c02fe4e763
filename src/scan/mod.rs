//! Band-restricted extremum location and matrix slicing.
//!
//! Responsibilities:
//!
//! - resolve wavelength bands to row ranges (`band_rows`)
//! - locate the global extremum of a band (parallel scan)
//! - extract kinetic traces, spectra, and the post-extremum decay tail

pub mod extremum;
pub mod trace;

pub use extremum::*;
pub use trace::*;

use crate::domain::Band;

/// A slicing request that yields no data.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    /// No wavelength row falls inside the band.
    EmptyBand { band: Band },
    /// An explicit row range was empty.
    EmptyRange,
    /// No wavelength row lies above the designated wavelength.
    WavelengthOutOfRange { nm: f64, max: f64 },
    /// No time column lies above the designated delay time.
    TimeOutOfRange { us: f64, max: f64 },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::EmptyBand { band } => {
                write!(f, "No wavelength rows inside band {}.", band.display())
            }
            ScanError::EmptyRange => write!(f, "Wavelength sub-range contains no rows."),
            ScanError::WavelengthOutOfRange { nm, max } => write!(
                f,
                "No wavelength above {nm} nm (axis ends at {max} nm)."
            ),
            ScanError::TimeOutOfRange { us, max } => {
                write!(f, "No delay time above {us} µs (axis ends at {max} µs).")
            }
        }
    }
}

impl std::error::Error for ScanError {}
