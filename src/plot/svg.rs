//! SVG rendering via `plotters`.
//!
//! The build uses `plotters` without its default features (no bitmap or font
//! rasterization), so the chart is series-only: observed data in black, the
//! fitted curve in red. Axis annotation lives in the terminal summary and the
//! CSV exports.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AppError;

const SVG_SIZE: (u32, u32) = (1280, 960);

/// Write an SVG with the observed series and an optional fitted curve.
pub fn write_svg_plot(
    path: &Path,
    xs: &[f64],
    ys: &[f64],
    fitted: Option<(&[f64], &[f64])>,
) -> Result<(), AppError> {
    let (x_min, x_max) = axis_range(xs, fitted.map(|(fx, _)| fx))
        .ok_or_else(|| AppError::data("Cannot plot: x axis has no finite span."))?;
    let (y_min, y_max) = axis_range(ys, fitted.map(|(_, fy)| fy))
        .ok_or_else(|| AppError::data("Cannot plot: y axis has no finite span."))?;
    let (y_min, y_max) = pad(y_min, y_max);

    let root = SVGBackend::new(path, SVG_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| draw_err(path, e))?;

    chart
        .draw_series(LineSeries::new(
            xs.iter().zip(ys.iter()).map(|(&x, &y)| (x, y)),
            &BLACK,
        ))
        .map_err(|e| draw_err(path, e))?;

    if let Some((fx, fy)) = fitted {
        chart
            .draw_series(LineSeries::new(
                fx.iter().zip(fy.iter()).map(|(&x, &y)| (x, y)),
                &RED,
            ))
            .map_err(|e| draw_err(path, e))?;
    }

    root.present().map_err(|e| draw_err(path, e))?;
    Ok(())
}

fn axis_range(primary: &[f64], overlay: Option<&[f64]>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in primary.iter().chain(overlay.into_iter().flatten()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad(min: f64, max: f64) -> (f64, f64) {
    let pad = ((max - min).abs() * 0.05).max(1e-12);
    (min - pad, max + pad)
}

fn draw_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::usage(format!("Failed to render '{}': {e}", path.display()))
}
