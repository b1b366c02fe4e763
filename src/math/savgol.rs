//! 1D Savitzky-Golay smoothing.
//!
//! Each output sample is the value of a least-squares polynomial fitted over
//! a sliding window. Interior samples use a precomputed convolution weight
//! vector (row 0 of the window pseudo-inverse); edge samples evaluate the
//! first/last window's polynomial at the corresponding offset, so edges are
//! interpolated rather than clipped.
//!
//! Applied to displayed traces/spectra only; the decay fit always consumes
//! raw values.

use nalgebra::{DMatrix, DVector};

/// Polynomial order used by the trace views.
pub const DEFAULT_SAVGOL_ORDER: usize = 2;

/// Smooth `values` with a Savitzky-Golay filter.
///
/// Returns `None` if the window is even, not larger than `poly_order`, or
/// longer than the series.
pub fn savgol_filter(values: &[f64], window: usize, poly_order: usize) -> Option<Vec<f64>> {
    if window % 2 == 0 || window <= poly_order || values.len() < window {
        return None;
    }
    let half = window / 2;
    let n = values.len();

    // Design matrix over centered offsets: A[i][j] = (i - half)^j.
    let mut design = DMatrix::<f64>::zeros(window, poly_order + 1);
    for i in 0..window {
        let x = i as f64 - half as f64;
        let mut pow = 1.0;
        for j in 0..=poly_order {
            design[(i, j)] = pow;
            pow *= x;
        }
    }
    let pinv = design.svd(true, true).pseudo_inverse(1e-12).ok()?;

    let window_coeffs = |start: usize| -> DVector<f64> {
        let seg = DVector::from_iterator(window, values[start..start + window].iter().copied());
        &pinv * seg
    };

    let eval = |coeffs: &DVector<f64>, x: f64| -> f64 {
        let mut acc = 0.0;
        let mut pow = 1.0;
        for j in 0..=poly_order {
            acc += coeffs[j] * pow;
            pow *= x;
        }
        acc
    };

    let mut out = vec![0.0; n];

    // Edges: evaluate the boundary windows' polynomials at their offsets.
    let first = window_coeffs(0);
    for i in 0..half {
        out[i] = eval(&first, i as f64 - half as f64);
    }
    let last = window_coeffs(n - window);
    for i in (n - half)..n {
        let center = n - 1 - half;
        out[i] = eval(&last, i as f64 - center as f64);
    }

    // Interior: the fitted polynomial's constant term is the smoothed value.
    for i in half..(n - half) {
        let coeffs = window_coeffs(i - half);
        out[i] = coeffs[0];
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadratic_is_a_fixed_point() {
        // A degree-2 filter reproduces any quadratic exactly, edges included.
        let values: Vec<f64> = (0..15).map(|i| {
            let x = i as f64;
            0.5 * x * x - 3.0 * x + 2.0
        }).collect();

        let smoothed = savgol_filter(&values, 5, 2).unwrap();
        for (a, b) in values.iter().zip(smoothed.iter()) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn flattens_alternating_noise() {
        let values: Vec<f64> = (0..20)
            .map(|i| 1.0 + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let smoothed = savgol_filter(&values, 9, 2).unwrap();
        // Interior samples should sit much closer to the mean than the input.
        for v in &smoothed[4..16] {
            assert!((v - 1.0).abs() < 0.05);
        }
    }

    #[test]
    fn rejects_bad_windows() {
        let values = vec![0.0; 10];
        assert!(savgol_filter(&values, 4, 2).is_none());
        assert!(savgol_filter(&values, 3, 3).is_none());
        assert!(savgol_filter(&values, 11, 2).is_none());
    }
}
