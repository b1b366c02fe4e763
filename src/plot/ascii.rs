//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted decay curve: `-` line

use crate::domain::{Spectrum, TimeSeries};

/// Render a kinetic trace, optionally overlaying a fitted decay curve.
///
/// `fitted` carries its own time axis; for a tail fit it starts at the
/// critical point rather than at t = 0.
pub fn render_trace_plot(
    series: &TimeSeries,
    fitted: Option<(&[f64], &[f64])>,
    width: usize,
    height: usize,
) -> String {
    render_xy_plot(&series.times, &series.values, fitted, width, height, "t", "µs")
}

/// Render a transient spectrum slice (no overlay curve).
pub fn render_spectrum_plot(spectrum: &Spectrum, width: usize, height: usize) -> String {
    render_xy_plot(
        &spectrum.wavelengths,
        &spectrum.values,
        None,
        width,
        height,
        "wavelength",
        "nm",
    )
}

fn render_xy_plot(
    xs: &[f64],
    ys: &[f64],
    fitted: Option<(&[f64], &[f64])>,
    width: usize,
    height: usize,
    x_name: &str,
    x_unit: &str,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(xs, fitted).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(ys, fitted).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the fitted curve first (so observed points can overlay).
    if let Some((fx, fy)) = fitted {
        draw_curve(&mut grid, fx, fy, x_min, x_max, y_min, y_max);
    }

    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {x_name}=[{x_min:.3}, {x_max:.3}] {x_unit} | dAbs=[{y_min:.2}, {y_max:.2}] mOD\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn x_range(xs: &[f64], fitted: Option<(&[f64], &[f64])>) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &x in xs {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if let Some((fx, _)) = fitted {
        for &x in fx {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
        }
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(ys: &[f64], fitted: Option<(&[f64], &[f64])>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &y in ys {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if let Some((_, fy)) = fitted {
        for &y in fy {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    grid: &mut [Vec<char>],
    fx: &[f64],
    fy: &[f64],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if fx.len() < 2 || fx.len() != fy.len() {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for (&x, &y) in fx.iter().zip(fy.iter()) {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let series = TimeSeries {
            times: vec![1.0, 10.0],
            values: vec![100.0, 110.0],
        };
        let fx = [1.0, 10.0];
        let fy = [100.0, 100.0];

        let txt = render_trace_plot(&series, Some((&fx, &fy)), 10, 5);
        let expected = concat!(
            "Plot: t=[1.000, 10.000] µs | dAbs=[99.50, 110.50] mOD\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o---------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn spectrum_plot_places_extremes_on_edge_rows() {
        let spectrum = Spectrum {
            wavelengths: vec![400.0, 450.0, 500.0],
            values: vec![0.0, -12.0, 0.0],
        };
        let txt = render_spectrum_plot(&spectrum, 11, 5);
        let lines: Vec<&str> = txt.lines().collect();
        assert!(lines[0].starts_with("Plot: wavelength=[400.000, 500.000] nm"));
        // minimum lands on the bottom row, edges on the top row
        assert_eq!(lines[5].chars().nth(5), Some('o'));
        assert_eq!(lines[1].chars().nth(0), Some('o'));
        assert_eq!(lines[1].chars().nth(10), Some('o'));
    }

    #[test]
    fn degenerate_ranges_fall_back_without_panicking() {
        let series = TimeSeries {
            times: vec![5.0],
            values: vec![1.0],
        };
        let txt = render_trace_plot(&series, None, 10, 5);
        assert!(txt.starts_with("Plot: t=[0.000, 1.000]"));
    }
}
