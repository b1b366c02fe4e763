//! Instrument CSV ingest.
//!
//! The export format is a bare delimited grid preceded by a few preamble
//! lines of acquisition metadata (5 by default):
//!
//! - first data row: corner cell, then the delay-time axis
//! - remaining rows: wavelength, then one absorbance per time column
//!
//! Design goals:
//! - **strict cells**: every absorbance/axis cell must parse as a finite
//!   number, with the source line in the error message
//! - **lenient corner**: cell (0,0) is unused and ignored
//! - **no analysis here**: shape/axis invariants live in `SpectralMatrix`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use nalgebra::DMatrix;

use crate::domain::SpectralMatrix;
use crate::error::AppError;

/// Load and validate an instrument CSV into a `SpectralMatrix`.
pub fn load_matrix(path: &Path, skip_rows: usize) -> Result<SpectralMatrix, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_matrix(file, skip_rows)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))
}

fn parse_matrix<R: Read>(reader: R, skip_rows: usize) -> Result<SpectralMatrix, AppError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut times: Vec<f64> = Vec::new();
    let mut wavelengths: Vec<f64> = Vec::new();
    let mut values: Vec<f64> = Vec::new();

    for (idx, record) in rdr.records().enumerate() {
        let record = record
            .map_err(|e| AppError::data(format!("CSV read error at record {}: {e}", idx + 1)))?;
        if idx < skip_rows {
            continue;
        }
        let line = idx + 1;
        let data_idx = idx - skip_rows;

        if data_idx == 0 {
            // Axis row: corner cell is ignored, the rest is the time axis.
            if record.len() < 2 {
                return Err(AppError::data(format!(
                    "line {line}: time-axis row has no time columns"
                )));
            }
            for (col, cell) in record.iter().enumerate().skip(1) {
                times.push(parse_cell(cell, line, col)?);
            }
            continue;
        }

        if record.len() != times.len() + 1 {
            return Err(AppError::data(format!(
                "line {line}: expected {} columns, found {}",
                times.len() + 1,
                record.len()
            )));
        }
        for (col, cell) in record.iter().enumerate() {
            let v = parse_cell(cell, line, col)?;
            if col == 0 {
                wavelengths.push(v);
            } else {
                values.push(v);
            }
        }
    }

    if times.is_empty() {
        return Err(AppError::data(format!(
            "No matrix found after skipping {skip_rows} preamble rows."
        )));
    }

    let matrix = DMatrix::from_row_slice(wavelengths.len(), times.len(), &values);
    SpectralMatrix::new(wavelengths, times, matrix).map_err(|e| AppError::data(e.to_string()))
}

fn parse_cell(cell: &str, line: usize, col: usize) -> Result<f64, AppError> {
    let v: f64 = cell.parse().map_err(|_| {
        AppError::data(format!("line {line}, column {}: invalid number '{cell}'", col + 1))
    })?;
    if !v.is_finite() {
        return Err(AppError::data(format!(
            "line {line}, column {}: non-finite value '{cell}'",
            col + 1
        )));
    }
    Ok(v)
}
