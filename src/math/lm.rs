//! Damped nonlinear least squares (Levenberg-Marquardt).
//!
//! In this project we fit a small parametric model to a 1D series:
//!
//! ```text
//! minimize Σ (y_i - f(x_i, p))^2
//! ```
//!
//! The model is nonlinear in `p`, so we iterate damped normal-equation steps:
//!
//! - build `JᵀJ` and `Jᵀr` from the analytic Jacobian
//! - solve `(JᵀJ + λ·diag(JᵀJ)) δ = Jᵀr` by Cholesky
//! - accept downhill steps (shrinking λ), reject uphill ones (growing λ)
//!
//! Implementation choices:
//! - Parameter dimension is tiny (3 here), so dense Cholesky per step is cheap.
//! - The parameter covariance is `s²·(JᵀJ)⁻¹` with `s² = SSE/(n-k)`; if `JᵀJ`
//!   cannot be inverted the fit is reported as singular rather than returning
//!   meaningless uncertainties.
//! - Everything is deterministic: same inputs and options, same outcome.

use nalgebra::{Cholesky, DMatrix, DVector};

/// Solver tolerances and iteration limits.
#[derive(Debug, Clone)]
pub struct LmOptions {
    /// Maximum outer iterations.
    pub max_iters: usize,
    /// Relative SSE improvement below which the fit is considered converged.
    pub rel_tol: f64,
    /// Initial damping factor λ.
    pub lambda_init: f64,
}

impl Default for LmOptions {
    fn default() -> Self {
        Self {
            max_iters: 200,
            rel_tol: 1e-12,
            lambda_init: 1e-3,
        }
    }
}

/// A converged least-squares solution.
#[derive(Debug, Clone)]
pub struct LmFit {
    pub params: DVector<f64>,
    /// Parameter covariance `s²·(JᵀJ)⁻¹`.
    pub covariance: DMatrix<f64>,
    /// `sqrt(diag(covariance))`, one entry per parameter.
    pub std_errors: Vec<f64>,
    pub sse: f64,
    pub iterations: usize,
}

/// Why a least-squares solve failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LmError {
    /// The model or Jacobian produced a non-finite value at the start point.
    NonFinite,
    /// `JᵀJ` is singular (or the system is underdetermined): no covariance.
    Singular,
    /// The iteration limit was reached without meeting the tolerance.
    NoConvergence { iterations: usize },
}

impl std::fmt::Display for LmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LmError::NonFinite => write!(f, "model evaluated to a non-finite value"),
            LmError::Singular => write!(f, "normal matrix is singular; covariance unavailable"),
            LmError::NoConvergence { iterations } => {
                write!(f, "no convergence after {iterations} iterations")
            }
        }
    }
}

impl std::error::Error for LmError {}

/// Fit `y ≈ f(x, p)` by Levenberg-Marquardt with an analytic Jacobian.
///
/// `jac` fills `out[j] = ∂f/∂p_j` evaluated at `(x, p)`; `out` has one slot
/// per parameter.
pub fn fit_least_squares<F, J>(
    xs: &[f64],
    ys: &[f64],
    p0: &[f64],
    f: F,
    jac: J,
    opts: &LmOptions,
) -> Result<LmFit, LmError>
where
    F: Fn(f64, &[f64]) -> f64,
    J: Fn(f64, &[f64], &mut [f64]),
{
    let n = xs.len();
    let k = p0.len();
    debug_assert_eq!(n, ys.len());
    if n <= k {
        return Err(LmError::Singular);
    }

    let mut p = DVector::from_column_slice(p0);
    let mut sse = sum_squared_error(xs, ys, &f, p.as_slice()).ok_or(LmError::NonFinite)?;
    let mut lambda = opts.lambda_init;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < opts.max_iters {
        iterations += 1;

        let (jtj, jtr) =
            normal_equations(xs, ys, &f, &jac, p.as_slice(), k).ok_or(LmError::NonFinite)?;

        // At a stationary point the gradient (∝ Jᵀr) vanishes.
        let grad_inf = jtr.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if grad_inf <= 1e-14 * sse.max(1.0) {
            converged = true;
            break;
        }

        let mut accepted = false;
        for _ in 0..16 {
            let mut damped = jtj.clone();
            for i in 0..k {
                let d = jtj[(i, i)].abs().max(1e-12);
                damped[(i, i)] += lambda * d;
            }
            let Some(chol) = Cholesky::new(damped) else {
                lambda *= 10.0;
                continue;
            };
            let step = chol.solve(&jtr);
            let trial = &p + &step;
            let Some(sse_trial) = sum_squared_error(xs, ys, &f, trial.as_slice()) else {
                lambda *= 10.0;
                continue;
            };
            if sse_trial <= sse {
                let improvement = sse - sse_trial;
                p = trial;
                let previous = sse;
                sse = sse_trial;
                lambda = (lambda * 0.1).max(1e-12);
                accepted = true;
                if improvement <= opts.rel_tol * previous.max(f64::MIN_POSITIVE) {
                    converged = true;
                }
                break;
            }
            lambda *= 10.0;
        }

        // No downhill step at any damping level: the gradient is effectively
        // zero at working precision.
        if !accepted {
            converged = true;
        }
        if converged {
            break;
        }
    }

    if !converged {
        return Err(LmError::NoConvergence { iterations });
    }

    let (jtj, _) =
        normal_equations(xs, ys, &f, &jac, p.as_slice(), k).ok_or(LmError::NonFinite)?;
    let s2 = sse / (n - k) as f64;
    let inv = Cholesky::new(jtj).ok_or(LmError::Singular)?.inverse();
    let covariance = inv * s2;
    if covariance.iter().any(|v| !v.is_finite()) {
        return Err(LmError::Singular);
    }
    let std_errors = (0..k).map(|i| covariance[(i, i)].max(0.0).sqrt()).collect();

    Ok(LmFit {
        params: p,
        covariance,
        std_errors,
        sse,
        iterations,
    })
}

fn sum_squared_error<F>(xs: &[f64], ys: &[f64], f: &F, p: &[f64]) -> Option<f64>
where
    F: Fn(f64, &[f64]) -> f64,
{
    let mut sse = 0.0;
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let r = y - f(x, p);
        if !r.is_finite() {
            return None;
        }
        sse += r * r;
    }
    sse.is_finite().then_some(sse)
}

fn normal_equations<F, J>(
    xs: &[f64],
    ys: &[f64],
    f: &F,
    jac: &J,
    p: &[f64],
    k: usize,
) -> Option<(DMatrix<f64>, DVector<f64>)>
where
    F: Fn(f64, &[f64]) -> f64,
    J: Fn(f64, &[f64], &mut [f64]),
{
    let mut jtj = DMatrix::<f64>::zeros(k, k);
    let mut jtr = DVector::<f64>::zeros(k);
    let mut row = vec![0.0; k];

    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let r = y - f(x, p);
        jac(x, p, &mut row);
        if !r.is_finite() || row.iter().any(|v| !v.is_finite()) {
            return None;
        }
        for i in 0..k {
            jtr[i] += row[i] * r;
            for j in i..k {
                jtj[(i, j)] += row[i] * row[j];
            }
        }
    }
    // Mirror the upper triangle.
    for i in 0..k {
        for j in 0..i {
            jtj[(i, j)] = jtj[(j, i)];
        }
    }
    Some((jtj, jtr))
}
