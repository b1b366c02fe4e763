//! Global extremum location over a wavelength band.
//!
//! The scan is exact (no sampling): every cell of the band-restricted
//! sub-matrix is visited. Rows are scanned in parallel; the reduction is
//! deterministic, resolving value ties to the first occurrence in
//! (row, column) order so repeated runs agree cell-for-cell.

use std::ops::Range;

use rayon::prelude::*;

use crate::domain::{Band, Extremum, ExtremumMode, SpectralMatrix};
use crate::scan::ScanError;

/// Resolve a wavelength band to a row range by linear scan.
///
/// The lower cutoff is exclusive: the range starts at the first row whose
/// wavelength strictly exceeds `band.lo`, and ends before the first row
/// strictly above `band.hi` (when set).
pub fn band_rows(matrix: &SpectralMatrix, band: &Band) -> Result<Range<usize>, ScanError> {
    let start = matrix
        .wavelengths()
        .iter()
        .position(|&w| w > band.lo)
        .ok_or(ScanError::EmptyBand { band: *band })?;

    let end = match band.hi {
        Some(hi) => matrix
            .wavelengths()
            .iter()
            .position(|&w| w > hi)
            .unwrap_or(matrix.n_wavelengths()),
        None => matrix.n_wavelengths(),
    };

    if start >= end {
        return Err(ScanError::EmptyBand { band: *band });
    }
    Ok(start..end)
}

/// Locate the global extremum of the matrix restricted to `rows`.
///
/// `display_scale` is the reporting multiplier (×1000 converts OD to mOD);
/// the raw value is kept alongside the scaled one.
pub fn locate_extremum(
    matrix: &SpectralMatrix,
    rows: Range<usize>,
    mode: ExtremumMode,
    display_scale: f64,
) -> Result<Extremum, ScanError> {
    if rows.is_empty() {
        return Err(ScanError::EmptyRange);
    }

    let (row, col, value) = rows
        .into_par_iter()
        .map(|r| {
            let mut best_col = 0;
            let mut best_val = matrix.value(r, 0);
            for c in 1..matrix.n_times() {
                let v = matrix.value(r, c);
                // Strict comparison keeps the earliest column on ties.
                if mode.improves(v, best_val) {
                    best_val = v;
                    best_col = c;
                }
            }
            (r, best_col, best_val)
        })
        .reduce_with(|a, b| {
            if mode.improves(b.2, a.2) {
                b
            } else if mode.improves(a.2, b.2) {
                a
            } else if (b.0, b.1) < (a.0, a.1) {
                b
            } else {
                a
            }
        })
        .ok_or(ScanError::EmptyRange)?;

    Ok(Extremum {
        wavelength_index: row,
        time_index: col,
        wavelength: matrix.wavelength(row),
        time: matrix.time(col),
        value,
        display_value: value * display_scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn matrix(values: &[f64], wavelengths: &[f64], times: &[f64]) -> SpectralMatrix {
        SpectralMatrix::new(
            wavelengths.to_vec(),
            times.to_vec(),
            DMatrix::from_row_slice(wavelengths.len(), times.len(), values),
        )
        .unwrap()
    }

    fn fixture() -> SpectralMatrix {
        matrix(
            &[
                0.5, 0.1, 0.2, //
                -0.3, 0.4, 0.0, //
                0.2, -0.9, 0.7, //
                0.6, 0.3, -0.1,
            ],
            &[390.0, 410.0, 450.0, 500.0],
            &[0.0, 1.0, 2.0],
        )
    }

    #[test]
    fn band_rows_are_strictly_above_cutoffs() {
        let m = fixture();
        assert_eq!(band_rows(&m, &Band::above(400.0)).unwrap(), 1..4);
        assert_eq!(band_rows(&m, &Band::between(400.0, 450.0)).unwrap(), 1..3);
        // A cutoff equal to an axis entry excludes that row.
        assert_eq!(band_rows(&m, &Band::above(450.0)).unwrap(), 3..4);
    }

    #[test]
    fn empty_band_is_an_error() {
        let m = fixture();
        assert_eq!(
            band_rows(&m, &Band::above(600.0)),
            Err(ScanError::EmptyBand {
                band: Band::above(600.0)
            })
        );
        assert!(matches!(
            band_rows(&m, &Band::between(410.0, 410.0)),
            Err(ScanError::EmptyBand { .. })
        ));
    }

    #[test]
    fn locates_min_and_max_exactly() {
        let m = fixture();

        let min = locate_extremum(&m, 0..4, ExtremumMode::Min, 1000.0).unwrap();
        assert_eq!((min.wavelength_index, min.time_index), (2, 1));
        assert_eq!(min.value, -0.9);
        assert_eq!(min.display_value, -900.0);
        assert_eq!(min.wavelength, 450.0);
        assert_eq!(min.time, 1.0);

        let max = locate_extremum(&m, 0..4, ExtremumMode::Max, 1000.0).unwrap();
        assert_eq!((max.wavelength_index, max.time_index), (2, 2));
        assert_eq!(max.value, 0.7);
    }

    #[test]
    fn restriction_changes_the_answer() {
        let m = fixture();
        // Excluding the row holding -0.9 moves the minimum.
        let min = locate_extremum(&m, 0..2, ExtremumMode::Min, 1.0).unwrap();
        assert_eq!((min.wavelength_index, min.time_index), (1, 0));
        assert_eq!(min.value, -0.3);
    }

    #[test]
    fn matches_exhaustive_scan() {
        // Pseudo-random-ish fixture; compare against a serial exhaustive scan.
        let values: Vec<f64> = (0..60)
            .map(|i| ((i * 37 + 11) % 23) as f64 - 11.0)
            .collect();
        let wavelengths: Vec<f64> = (0..6).map(|i| 400.0 + 10.0 * i as f64).collect();
        let times: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let m = matrix(&values, &wavelengths, &times);

        for mode in [ExtremumMode::Min, ExtremumMode::Max] {
            let found = locate_extremum(&m, 1..5, mode, 1.0).unwrap();
            let mut best: Option<(usize, usize, f64)> = None;
            for r in 1..5 {
                for c in 0..10 {
                    let v = m.value(r, c);
                    if best.is_none_or(|(_, _, bv)| mode.improves(v, bv)) {
                        best = Some((r, c, v));
                    }
                }
            }
            let (br, bc, bv) = best.unwrap();
            assert_eq!(
                (found.wavelength_index, found.time_index, found.value),
                (br, bc, bv)
            );
        }
    }

    #[test]
    fn ties_resolve_to_first_occurrence() {
        // The maximum value 1.0 appears four times; the scan must report the
        // occurrence with the smallest (row, column).
        let m = matrix(
            &[
                1.0, 0.0, 1.0, //
                0.0, 1.0, 0.0, //
                1.0, 0.0, 0.0,
            ],
            &[400.0, 410.0, 420.0],
            &[0.0, 1.0, 2.0],
        );
        let max = locate_extremum(&m, 0..3, ExtremumMode::Max, 1.0).unwrap();
        assert_eq!((max.wavelength_index, max.time_index), (0, 0));

        // Restricting to later rows shifts the winner accordingly.
        let max = locate_extremum(&m, 1..3, ExtremumMode::Max, 1.0).unwrap();
        assert_eq!((max.wavelength_index, max.time_index), (1, 1));
    }

    #[test]
    fn empty_row_range_is_an_error() {
        let m = fixture();
        assert_eq!(
            locate_extremum(&m, 2..2, ExtremumMode::Min, 1.0),
            Err(ScanError::EmptyRange)
        );
    }
}
