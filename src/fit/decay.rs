//! One-phase exponential decay fitting.
//!
//! Model: `absorbance(t) = (a - p)·exp(-t/τ) + p`, relaxing from the initial
//! value `a` to the plateau `p` with time constant `τ`. The fit is a
//! three-parameter Levenberg-Marquardt solve seeded by the closed-form
//! heuristic in [`crate::fit::seed`].

use serde::{Deserialize, Serialize};

use crate::domain::TimeSeries;
use crate::fit::{three_point_seed, FitError};
use crate::math::{fit_least_squares, LmError, LmOptions};

/// Evaluate the one-phase decay model.
pub fn decay_model(t: f64, a: f64, tau: f64, p: f64) -> f64 {
    (a - p) * (-(t / tau)).exp() + p
}

/// A successful decay fit: parameters, uncertainties, and quality metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayFit {
    /// Initial value `a` (OD).
    pub amplitude: f64,
    /// Time constant `τ` (same unit as the input times).
    pub tau: f64,
    /// Plateau `p` (OD).
    pub plateau: f64,
    /// 3×3 parameter covariance in `(a, τ, p)` order.
    pub covariance: [[f64; 3]; 3],
    /// Standard errors `sqrt(diag(covariance))` in `(a, τ, p)` order.
    pub std_errors: [f64; 3],
    pub sse: f64,
    pub rmse: f64,
    /// Number of fitted samples.
    pub n: usize,
}

impl DecayFit {
    /// Time for the decay to cover half its amplitude change: `ln 2 · τ`.
    pub fn half_life(&self) -> f64 {
        std::f64::consts::LN_2 * self.tau
    }

    pub fn predict(&self, t: f64) -> f64 {
        decay_model(t, self.amplitude, self.tau, self.plateau)
    }

    /// Fitted curve over `times`, scaled for display. Pure projection.
    pub fn curve(&self, times: &[f64], scale: f64) -> Vec<f64> {
        times.iter().map(|&t| self.predict(t) * scale).collect()
    }
}

/// Fit the one-phase decay model to a kinetic trace.
///
/// The series must be time-ascending with at least 11 samples (seed
/// requirement). All failure modes are reported as [`FitError`]; partial or
/// garbage parameters are never returned.
pub fn fit_decay(series: &TimeSeries) -> Result<DecayFit, FitError> {
    let seed = three_point_seed(&series.times, &series.values)?;

    let lm = fit_least_squares(
        &series.times,
        &series.values,
        &seed,
        |t, p| decay_model(t, p[0], p[1], p[2]),
        |t, p, out| {
            let e = (-(t / p[1])).exp();
            out[0] = e;
            out[1] = (p[0] - p[2]) * e * t / (p[1] * p[1]);
            out[2] = 1.0 - e;
        },
        &LmOptions::default(),
    )
    .map_err(|e| match e {
        LmError::NonFinite => FitError::NonFinite,
        LmError::Singular => FitError::SingularCovariance,
        LmError::NoConvergence { iterations } => FitError::NoConvergence { iterations },
    })?;

    let mut covariance = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            covariance[i][j] = lm.covariance[(i, j)];
        }
    }

    let n = series.len();
    Ok(DecayFit {
        amplitude: lm.params[0],
        tau: lm.params[1],
        plateau: lm.params[2],
        covariance,
        std_errors: [lm.std_errors[0], lm.std_errors[1], lm.std_errors[2]],
        sse: lm.sse,
        rmse: (lm.sse / n as f64).sqrt(),
        n,
    })
}
