//! SVG heatmap of the band-restricted matrix.
//!
//! One filled rectangle per cell, colored on a diverging blue-white-red
//! ramp centered on the value range midpoint. Cell edges sit at the
//! midpoints between neighboring axis entries, so uneven axes render with
//! proportional cell sizes.

use std::path::Path;

use plotters::prelude::*;

use crate::error::AppError;

const SVG_SIZE: (u32, u32) = (1280, 960);

/// Write the matrix heatmap. `values` is row-major, one row per wavelength.
pub fn write_raster_svg(
    path: &Path,
    times: &[f64],
    wavelengths: &[f64],
    values: &[Vec<f64>],
) -> Result<(), AppError> {
    if wavelengths.len() < 2 || times.len() < 2 {
        return Err(AppError::data("Cannot raster: need at least a 2x2 grid."));
    }
    if values.len() != wavelengths.len() || values.iter().any(|row| row.len() != times.len()) {
        return Err(AppError::data(
            "Cannot raster: value grid does not match the axes.",
        ));
    }

    let mut v_min = f64::INFINITY;
    let mut v_max = f64::NEG_INFINITY;
    for row in values {
        for &v in row {
            v_min = v_min.min(v);
            v_max = v_max.max(v);
        }
    }
    if !(v_min.is_finite() && v_max.is_finite()) {
        return Err(AppError::data("Cannot raster: non-finite values."));
    }
    let span = v_max - v_min;

    let x_edges = cell_edges(times);
    let y_edges = cell_edges(wavelengths);

    let root = SVGBackend::new(path, SVG_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(x_edges[0]..x_edges[times.len()], y_edges[0]..y_edges[wavelengths.len()])
        .map_err(|e| draw_err(path, e))?;

    let mut cells = Vec::with_capacity(wavelengths.len() * times.len());
    for (r, row) in values.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            // A flat grid renders as the midpoint color.
            let u = if span > 0.0 { (v - v_min) / span } else { 0.5 };
            cells.push(Rectangle::new(
                [(x_edges[c], y_edges[r]), (x_edges[c + 1], y_edges[r + 1])],
                heat_color(u).filled(),
            ));
        }
    }
    chart.draw_series(cells).map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))?;
    Ok(())
}

/// Cell boundaries for an ascending axis: midpoints between neighbors, with
/// half-width cells at the ends.
fn cell_edges(axis: &[f64]) -> Vec<f64> {
    let n = axis.len();
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(axis[0]);
    for i in 1..n {
        edges.push(0.5 * (axis[i - 1] + axis[i]));
    }
    edges.push(axis[n - 1]);
    edges
}

/// Diverging ramp: 0 -> blue, 0.5 -> white, 1 -> red.
fn heat_color(u: f64) -> RGBColor {
    let u = u.clamp(0.0, 1.0);
    if u <= 0.5 {
        let t = u * 2.0;
        RGBColor(lerp(0, 255, t), lerp(0, 255, t), lerp(200, 255, t))
    } else {
        let t = (u - 0.5) * 2.0;
        RGBColor(lerp(255, 200, t), lerp(255, 0, t), lerp(255, 0, t))
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

fn draw_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::usage(format!("Failed to render '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_endpoints_and_midpoint() {
        assert_eq!(heat_color(0.0), RGBColor(0, 0, 200));
        assert_eq!(heat_color(0.5), RGBColor(255, 255, 255));
        assert_eq!(heat_color(1.0), RGBColor(200, 0, 0));
        // Out-of-range inputs clamp instead of wrapping.
        assert_eq!(heat_color(-1.0), heat_color(0.0));
        assert_eq!(heat_color(2.0), heat_color(1.0));
    }

    #[test]
    fn edges_are_neighbor_midpoints() {
        assert_eq!(cell_edges(&[0.0, 10.0, 30.0]), vec![0.0, 5.0, 20.0, 30.0]);
    }

    #[test]
    fn writes_an_svg_heatmap() {
        let dir = std::env::temp_dir().join("tak-raster-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("raster.svg");

        let times = [0.0, 10.0, 20.0];
        let wavelengths = [400.0, 410.0];
        let values = vec![vec![-1.0, 0.0, 1.0], vec![0.5, -0.5, 0.0]];
        write_raster_svg(&path, &times, &wavelengths, &values).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<svg"), "{text}");
        assert!(text.contains("<rect"), "{text}");
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let path = std::env::temp_dir().join("tak-raster-test-bad.svg");
        let err = write_raster_svg(
            &path,
            &[0.0, 10.0],
            &[400.0, 410.0],
            &[vec![1.0, 2.0], vec![3.0]],
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
