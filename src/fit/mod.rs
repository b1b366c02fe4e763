//! Single-exponential decay fitting.
//!
//! Responsibilities:
//!
//! - closed-form initial guess from three fixed sample points (`seed`)
//! - nonlinear least-squares fit of `(a-p)·exp(-t/τ)+p` (`decay`)
//! - derived quantities: half-life, standard errors, fitted-curve projection
//!
//! Failures are tagged, never swallowed: a fit either returns a full
//! `DecayFit` or a `FitError` naming what went wrong.

pub mod decay;
pub mod seed;

pub use decay::*;
pub use seed::*;

/// Why a decay fit could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    /// The tail has fewer samples than the seed heuristic requires.
    TooFewSamples { n: usize },
    /// The three-point initial guess hit a degenerate division or ratio.
    DegenerateSeed { detail: &'static str },
    /// The solver reached its iteration limit without converging.
    NoConvergence { iterations: usize },
    /// The solver converged but the parameter covariance is singular.
    SingularCovariance,
    /// The model evaluated to a non-finite value during the solve.
    NonFinite,
}

impl std::fmt::Display for FitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitError::TooFewSamples { n } => write!(
                f,
                "Decay tail has {n} samples; the initial-guess heuristic needs at least {}.",
                crate::fit::MIN_FIT_SAMPLES
            ),
            FitError::DegenerateSeed { detail } => {
                write!(f, "Initial-guess heuristic is degenerate: {detail}.")
            }
            FitError::NoConvergence { iterations } => {
                write!(f, "Fit did not converge after {iterations} iterations.")
            }
            FitError::SingularCovariance => {
                write!(f, "Fit covariance is singular; parameters are not trustworthy.")
            }
            FitError::NonFinite => write!(f, "Model evaluated to a non-finite value."),
        }
    }
}

impl std::error::Error for FitError {}
