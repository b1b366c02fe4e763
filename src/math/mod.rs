//! Mathematical utilities: damped nonlinear least squares and smoothing.

pub mod lm;
pub mod savgol;

pub use lm::*;
pub use savgol::*;
