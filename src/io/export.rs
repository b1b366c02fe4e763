//! Result exports.
//!
//! The CSV exports are meant to be easy to consume in spreadsheets or
//! downstream scripts; the JSON fit report is the machine-readable record of
//! a decay analysis.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::{Extremum, ExtremumMode, Spectrum, TimeSeries};
use crate::error::AppError;
use crate::fit::DecayFit;

/// Machine-readable record of one decay analysis.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub input: String,
    pub mode: ExtremumMode,
    pub band: String,
    pub display_scale: f64,
    pub extremum: Extremum,
    pub fit: DecayFit,
    pub half_life: f64,
}

/// Write a kinetic trace (display-scaled), optionally with the fitted curve.
///
/// `fitted` is aligned to the tail of the series: the last `fitted.len()`
/// rows get a fit column value.
pub fn write_trace_csv(
    path: &Path,
    series: &TimeSeries,
    fitted: Option<&[f64]>,
) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create '{}': {e}", path.display())))?;

    let header = if fitted.is_some() {
        "time_us,dabs_mod,fit_mod"
    } else {
        "time_us,dabs_mod"
    };
    writeln!(file, "{header}").map_err(|e| write_err(path, e))?;

    let fit_offset = fitted.map(|f| series.len().saturating_sub(f.len()));
    for (i, (&t, &v)) in series.times.iter().zip(series.values.iter()).enumerate() {
        match (fitted, fit_offset) {
            (Some(f), Some(offset)) if i >= offset => {
                writeln!(file, "{t},{v},{}", f[i - offset]).map_err(|e| write_err(path, e))?;
            }
            (Some(_), _) => {
                writeln!(file, "{t},{v},").map_err(|e| write_err(path, e))?;
            }
            (None, _) => {
                writeln!(file, "{t},{v}").map_err(|e| write_err(path, e))?;
            }
        }
    }
    Ok(())
}

/// Write a spectrum slice (display-scaled).
pub fn write_spectrum_csv(path: &Path, spectrum: &Spectrum) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create '{}': {e}", path.display())))?;

    writeln!(file, "wavelength_nm,dabs_mod").map_err(|e| write_err(path, e))?;
    for (&w, &v) in spectrum.wavelengths.iter().zip(spectrum.values.iter()) {
        writeln!(file, "{w},{v}").map_err(|e| write_err(path, e))?;
    }
    Ok(())
}

/// Write the fit report as pretty JSON.
pub fn write_fit_json(path: &Path, report: &FitReport) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::usage(format!("Failed to write '{}': {e}", path.display())))?;
    Ok(())
}

fn write_err(path: &Path, e: std::io::Error) -> AppError {
    AppError::usage(format!("Failed to write '{}': {e}", path.display()))
}
