//! The loaded spectral matrix and its structural invariants.
//!
//! Layout mirrors the instrument export: rows are wavelengths, columns are
//! delay times, cell `(r, c)` is the measured absorbance at wavelength `r`
//! and delay `c`. The axes live alongside the value block rather than inside
//! it, so indexing here is already header-free.
//!
//! The matrix is read-only once constructed; all analysis is slicing.

use nalgebra::DMatrix;

use crate::domain::{Spectrum, TimeSeries};

/// Structural validation failure when building a [`SpectralMatrix`].
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Axis lengths do not match the value block dimensions.
    ShapeMismatch {
        rows: usize,
        cols: usize,
        wavelengths: usize,
        times: usize,
    },
    /// Fewer than 2 wavelength rows or 2 time columns.
    TooSmall { rows: usize, cols: usize },
    /// An axis is not sorted ascending (non-decreasing).
    AxisNotSorted { axis: &'static str, index: usize },
    /// A non-finite absorbance or axis value.
    NonFinite { axis: &'static str, index: usize },
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::ShapeMismatch {
                rows,
                cols,
                wavelengths,
                times,
            } => write!(
                f,
                "Matrix shape {rows}x{cols} does not match axes ({wavelengths} wavelengths, {times} times)."
            ),
            MatrixError::TooSmall { rows, cols } => write!(
                f,
                "Matrix too small: {rows}x{cols} (need at least 2 wavelength rows and 2 time columns)."
            ),
            MatrixError::AxisNotSorted { axis, index } => {
                write!(f, "{axis} axis is not sorted ascending at index {index}.")
            }
            MatrixError::NonFinite { axis, index } => {
                write!(f, "Non-finite value in {axis} at index {index}.")
            }
        }
    }
}

impl std::error::Error for MatrixError {}

/// A validated, immutable 2D grid of absorbance measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralMatrix {
    wavelengths: Vec<f64>,
    times: Vec<f64>,
    values: DMatrix<f64>,
}

impl SpectralMatrix {
    /// Build a matrix, enforcing the structural invariants:
    /// axes sorted ascending, >= 2 rows and columns, all values finite.
    pub fn new(
        wavelengths: Vec<f64>,
        times: Vec<f64>,
        values: DMatrix<f64>,
    ) -> Result<Self, MatrixError> {
        if values.nrows() != wavelengths.len() || values.ncols() != times.len() {
            return Err(MatrixError::ShapeMismatch {
                rows: values.nrows(),
                cols: values.ncols(),
                wavelengths: wavelengths.len(),
                times: times.len(),
            });
        }
        if wavelengths.len() < 2 || times.len() < 2 {
            return Err(MatrixError::TooSmall {
                rows: wavelengths.len(),
                cols: times.len(),
            });
        }
        check_axis("wavelength", &wavelengths)?;
        check_axis("time", &times)?;
        for (i, v) in values.iter().enumerate() {
            if !v.is_finite() {
                // Column-major iteration order; report the cell's row index.
                return Err(MatrixError::NonFinite {
                    axis: "absorbance",
                    index: i % values.nrows(),
                });
            }
        }
        Ok(Self {
            wavelengths,
            times,
            values,
        })
    }

    pub fn n_wavelengths(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn n_times(&self) -> usize {
        self.times.len()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn wavelength(&self, row: usize) -> f64 {
        self.wavelengths[row]
    }

    pub fn time(&self, col: usize) -> f64 {
        self.times[col]
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Full kinetic trace of one wavelength row.
    pub fn row_series(&self, row: usize) -> TimeSeries {
        self.tail_series(row, 0)
    }

    /// Kinetic trace of one wavelength row restricted to columns `start_col..`.
    pub fn tail_series(&self, row: usize, start_col: usize) -> TimeSeries {
        TimeSeries {
            times: self.times[start_col..].to_vec(),
            values: (start_col..self.n_times())
                .map(|c| self.values[(row, c)])
                .collect(),
        }
    }

    /// Spectrum slice of one delay-time column over a row range.
    pub fn column_spectrum(&self, col: usize, rows: std::ops::Range<usize>) -> Spectrum {
        Spectrum {
            wavelengths: self.wavelengths[rows.clone()].to_vec(),
            values: rows.map(|r| self.values[(r, col)]).collect(),
        }
    }
}

fn check_axis(axis: &'static str, values: &[f64]) -> Result<(), MatrixError> {
    for (i, v) in values.iter().enumerate() {
        if !v.is_finite() {
            return Err(MatrixError::NonFinite { axis, index: i });
        }
        if i > 0 && *v < values[i - 1] {
            return Err(MatrixError::AxisNotSorted { axis, index: i });
        }
    }
    Ok(())
}
