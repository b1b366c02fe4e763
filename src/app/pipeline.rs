//! Shared analysis pipelines behind the CLI subcommands.
//!
//! Keeping these in one place avoids duplicating the core workflow:
//! ingest -> band restriction -> extremum scan -> tail fit -> display slices
//!
//! The CLI layer then focuses on presentation (printing, plots, exports).
//! Display scaling and smoothing never feed back into the fit: the solver
//! always sees raw absorbance.

use crate::domain::{
    DecayConfig, Extremum, RasterConfig, Spectrum, SpectrumConfig, TimeSeries, TraceConfig,
};
use crate::error::AppError;
use crate::fit::DecayFit;
use crate::scan;
use crate::scan::ScanError;

/// All computed outputs of a single `tak decay` run.
#[derive(Debug, Clone)]
pub struct DecayRun {
    pub extremum: Extremum,
    /// Scan region label for reporting (band cutoffs or the designated row).
    pub scan_label: String,
    /// Full trace of the extremum's row, display-scaled and optionally smoothed.
    pub display_trace: TimeSeries,
    /// Raw tail the solver consumed (absorbance units, unsmoothed).
    pub tail: TimeSeries,
    pub fit: DecayFit,
    /// Fitted curve over the tail times, display-scaled for plotting/export.
    pub fitted_display: Vec<f64>,
}

/// Outputs of a single `tak spectrum` run.
#[derive(Debug, Clone)]
pub struct SpectrumRun {
    /// Delay time of the sliced column (µs).
    pub time: f64,
    /// The band extremum, when the slice time was derived from it.
    pub extremum: Option<Extremum>,
    /// Band-restricted slice, display-scaled and optionally smoothed.
    pub spectrum: Spectrum,
}

/// Outputs of a single `tak raster` run.
#[derive(Debug, Clone)]
pub struct RasterRun {
    /// Band-restricted wavelength axis (nm).
    pub wavelengths: Vec<f64>,
    /// Full delay-time axis (µs).
    pub times: Vec<f64>,
    /// Row-major display-scaled grid, one row per wavelength.
    pub values: Vec<Vec<f64>>,
}

/// Outputs of a single `tak trace` run.
#[derive(Debug, Clone)]
pub struct TraceRun {
    /// Actual wavelength of the designated row (nm).
    pub wavelength: f64,
    /// Full trace, display-scaled and optionally smoothed.
    pub series: TimeSeries,
}

/// Locate the extremum, fit the decay tail, and prepare display slices.
pub fn run_decay(config: &DecayConfig) -> Result<DecayRun, AppError> {
    let matrix = crate::io::load_matrix(&config.input, config.skip_rows)?;

    let (extremum, scan_label) = match config.wavelength {
        Some(nm) => {
            // Designated-wavelength mode: the extremum of that single row.
            let row = scan::wavelength_row(&matrix, nm).map_err(scan_err)?;
            let extremum =
                scan::locate_extremum(&matrix, row..row + 1, config.mode, config.display_scale)
                    .map_err(scan_err)?;
            (extremum, format!("{} nm row", matrix.wavelength(row)))
        }
        None => {
            let rows = scan::band_rows(&matrix, &config.band).map_err(scan_err)?;
            let extremum =
                scan::locate_extremum(&matrix, rows, config.mode, config.display_scale)
                    .map_err(scan_err)?;
            (extremum, config.band.display())
        }
    };

    let tail = scan::decay_tail(&matrix, &extremum);
    let fit = crate::fit::fit_decay(&tail).map_err(|e| AppError::fit(e.to_string()))?;

    let mut display_trace = matrix
        .row_series(extremum.wavelength_index)
        .scaled(config.display_scale);
    smooth_in_place(&mut display_trace.values, config.smooth_window)?;

    let fitted_display = fit.curve(&tail.times, config.display_scale);

    Ok(DecayRun {
        extremum,
        scan_label,
        display_trace,
        tail,
        fit,
        fitted_display,
    })
}

/// Slice a transient spectrum at a designated time or at the extremum's time.
pub fn run_spectrum(config: &SpectrumConfig) -> Result<SpectrumRun, AppError> {
    let matrix = crate::io::load_matrix(&config.input, config.skip_rows)?;
    let rows = scan::band_rows(&matrix, &config.band).map_err(scan_err)?;

    let (col, extremum) = match config.at_time {
        Some(us) => (scan::time_column(&matrix, us).map_err(scan_err)?, None),
        None => {
            let extremum =
                scan::locate_extremum(&matrix, rows.clone(), config.mode, config.display_scale)
                    .map_err(scan_err)?;
            (extremum.time_index, Some(extremum))
        }
    };

    let mut spectrum = matrix.column_spectrum(col, rows).scaled(config.display_scale);
    smooth_in_place(&mut spectrum.values, config.smooth_window)?;

    Ok(SpectrumRun {
        time: matrix.time(col),
        extremum,
        spectrum,
    })
}

/// Prepare the band-restricted grid for the heatmap view.
///
/// Smoothing runs as two separable Savitzky-Golay passes, first along each
/// wavelength row (time axis), then along each time column (wavelength
/// axis), so both the kinetic and the spectral structure are denoised.
pub fn run_raster(config: &RasterConfig) -> Result<RasterRun, AppError> {
    let matrix = crate::io::load_matrix(&config.input, config.skip_rows)?;
    let rows = scan::band_rows(&matrix, &config.band).map_err(scan_err)?;

    let wavelengths = matrix.wavelengths()[rows.clone()].to_vec();
    let times = matrix.times().to_vec();
    let mut values: Vec<Vec<f64>> = rows
        .map(|r| {
            (0..matrix.n_times())
                .map(|c| matrix.value(r, c) * config.display_scale)
                .collect()
        })
        .collect();

    if config.smooth_window.is_some() {
        for row in values.iter_mut() {
            smooth_in_place(row, config.smooth_window)?;
        }
        for c in 0..times.len() {
            let mut column: Vec<f64> = values.iter().map(|row| row[c]).collect();
            smooth_in_place(&mut column, config.smooth_window)?;
            for (r, v) in column.into_iter().enumerate() {
                values[r][c] = v;
            }
        }
    }

    Ok(RasterRun {
        wavelengths,
        times,
        values,
    })
}

/// Extract a designated-wavelength trace without fitting.
pub fn run_trace(config: &TraceConfig) -> Result<TraceRun, AppError> {
    let matrix = crate::io::load_matrix(&config.input, config.skip_rows)?;
    let (row, series) = scan::trace_at_wavelength(&matrix, config.wavelength).map_err(scan_err)?;

    let mut series = series.scaled(config.display_scale);
    smooth_in_place(&mut series.values, config.smooth_window)?;

    Ok(TraceRun {
        wavelength: matrix.wavelength(row),
        series,
    })
}

fn smooth_in_place(values: &mut Vec<f64>, window: Option<usize>) -> Result<(), AppError> {
    if let Some(w) = window {
        *values = scan::smoothed(values, w).ok_or_else(|| {
            AppError::usage(format!(
                "Invalid smoothing window {w}: must be odd, greater than 2, and no longer than the data."
            ))
        })?;
    }
    Ok(())
}

fn scan_err(e: ScanError) -> AppError {
    AppError::data(e.to_string())
}
