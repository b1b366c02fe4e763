//! Closed-form initial guess for the exponential decay fit.
//!
//! Three fixed samples — indices 5, 10, and the last — seed the solver.
//! Treating the last sample as a plateau proxy, the two-point ratio of
//! plateau-relative values gives τ₀ in closed form, and back-extrapolating
//! the first sample to `t = 0` gives a₀. The plateau itself is seeded at 0.
//!
//! With exactly 11 samples the last index coincides with index 10 and the
//! plateau proxy degenerates; the guess then collapses to the two-point
//! pure-exponential form around a zero plateau.

use crate::fit::FitError;

/// Minimum samples the heuristic needs (index 10 must exist).
pub const MIN_FIT_SAMPLES: usize = 11;

/// Compute `[a₀, τ₀, p₀]` from the series, or report why that is impossible.
pub fn three_point_seed(times: &[f64], values: &[f64]) -> Result<[f64; 3], FitError> {
    let n = times.len();
    debug_assert_eq!(n, values.len());
    if n < MIN_FIT_SAMPLES {
        return Err(FitError::TooFewSamples { n });
    }

    let (x1, y1) = (times[5], values[5]);
    let (x2, y2) = (times[10], values[10]);
    let (x3, y3) = (times[n - 1], values[n - 1]);

    let (tau0, a0) = if n - 1 == 10 {
        // Two-point collapse: y ≈ a·exp(-t/τ) around p = 0.
        let ratio = y1 / y2;
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(FitError::DegenerateSeed {
                detail: "sample ratio is not positive",
            });
        }
        if ratio == 1.0 {
            return Err(FitError::DegenerateSeed {
                detail: "samples 5 and 10 are equal",
            });
        }
        let tau0 = (x2 - x1) / ratio.ln();
        (tau0, y1 * (x1 / tau0).exp())
    } else {
        // Plateau-relative ratio: (y1-y3)/(y2-y3) = exp((x2-x1)/τ).
        let ratio = (y1 - y3) / (y2 - y3);
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(FitError::DegenerateSeed {
                detail: "plateau-relative sample ratio is not positive",
            });
        }
        if ratio == 1.0 {
            return Err(FitError::DegenerateSeed {
                detail: "samples 5 and 10 are equidistant from the plateau proxy",
            });
        }
        let tau0 = (x2 - x1) / ratio.ln();
        (tau0, y3 + (y1 - y3) * (x1 / tau0).exp())
    };

    if !tau0.is_finite() || tau0 == 0.0 || !a0.is_finite() {
        return Err(FitError::DegenerateSeed {
            detail: "closed-form solution is not finite",
        });
    }

    Ok([a0, tau0, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series(n: usize, a: f64, tau: f64, p: f64) -> (Vec<f64>, Vec<f64>) {
        let times: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let values = times.iter().map(|t| (a - p) * (-t / tau).exp() + p).collect();
        (times, values)
    }

    #[test]
    fn exact_on_pure_exponential_with_two_point_collapse() {
        // 11 samples: the collapse path, exact for p = 0.
        let (t, y) = sample_series(11, 1.0, 3.0, 0.0);
        let [a0, tau0, p0] = three_point_seed(&t, &y).unwrap();
        assert!((tau0 - 3.0).abs() < 1e-12);
        assert!((a0 - 1.0).abs() < 1e-12);
        assert_eq!(p0, 0.0);
    }

    #[test]
    fn three_point_seed_lands_near_truth() {
        let (t, y) = sample_series(40, 1.0, 3.0, 0.1);
        let [a0, tau0, _] = three_point_seed(&t, &y).unwrap();
        // The last sample is essentially the plateau here, so the ratio form
        // is nearly exact.
        assert!((tau0 - 3.0).abs() < 0.05, "tau0 = {tau0}");
        assert!((a0 - 1.0).abs() < 0.05, "a0 = {a0}");
    }

    #[test]
    fn too_few_samples() {
        let (t, y) = sample_series(10, 1.0, 3.0, 0.0);
        assert_eq!(
            three_point_seed(&t, &y),
            Err(FitError::TooFewSamples { n: 10 })
        );
    }

    #[test]
    fn constant_series_is_degenerate() {
        let t: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let y = vec![0.5; 12];
        assert!(matches!(
            three_point_seed(&t, &y),
            Err(FitError::DegenerateSeed { .. })
        ));
    }

    #[test]
    fn equal_samples_in_collapse_are_degenerate() {
        let t: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let y = vec![2.0; 11];
        assert_eq!(
            three_point_seed(&t, &y),
            Err(FitError::DegenerateSeed {
                detail: "samples 5 and 10 are equal"
            })
        );
    }
}
