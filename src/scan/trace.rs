//! Designated-wavelength traces, designated-time spectra, and decay tails.
//!
//! Designation follows the same convention as band cutoffs: the first axis
//! entry strictly greater than the requested value wins. The actual axis
//! value is always reported back so titles/exports show the measured
//! wavelength or delay, not the requested one.

use std::ops::Range;

use crate::domain::{Extremum, SpectralMatrix, Spectrum, TimeSeries};
use crate::math::{savgol_filter, DEFAULT_SAVGOL_ORDER};
use crate::scan::ScanError;

/// First row whose wavelength strictly exceeds `nm`.
pub fn wavelength_row(matrix: &SpectralMatrix, nm: f64) -> Result<usize, ScanError> {
    matrix
        .wavelengths()
        .iter()
        .position(|&w| w > nm)
        .ok_or(ScanError::WavelengthOutOfRange {
            nm,
            max: matrix.wavelength(matrix.n_wavelengths() - 1),
        })
}

/// First column whose delay time strictly exceeds `us`.
pub fn time_column(matrix: &SpectralMatrix, us: f64) -> Result<usize, ScanError> {
    matrix
        .times()
        .iter()
        .position(|&t| t > us)
        .ok_or(ScanError::TimeOutOfRange {
            us,
            max: matrix.time(matrix.n_times() - 1),
        })
}

/// Kinetic trace at a designated wavelength: `(row index, full trace)`.
pub fn trace_at_wavelength(
    matrix: &SpectralMatrix,
    nm: f64,
) -> Result<(usize, TimeSeries), ScanError> {
    let row = wavelength_row(matrix, nm)?;
    Ok((row, matrix.row_series(row)))
}

/// Spectrum at a designated delay time, restricted to `rows`.
pub fn spectrum_at_time(
    matrix: &SpectralMatrix,
    us: f64,
    rows: Range<usize>,
) -> Result<(usize, Spectrum), ScanError> {
    let col = time_column(matrix, us)?;
    Ok((col, matrix.column_spectrum(col, rows)))
}

/// The decay tail for fitting: the extremum's wavelength row restricted to
/// delay times ≥ the extremum's time.
pub fn decay_tail(matrix: &SpectralMatrix, extremum: &Extremum) -> TimeSeries {
    matrix.tail_series(extremum.wavelength_index, extremum.time_index)
}

/// Display-side smoothing with the project's default polynomial order.
pub fn smoothed(values: &[f64], window: usize) -> Option<Vec<f64>> {
    savgol_filter(values, window, DEFAULT_SAVGOL_ORDER)
}
