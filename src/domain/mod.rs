//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration structs built from CLI flags (`DecayConfig`, ...)
//! - the loaded spectral matrix (`SpectralMatrix`) and its invariants
//! - slice/extremum outputs (`Extremum`, `TimeSeries`, `Spectrum`)

pub mod matrix;
pub mod types;

pub use matrix::*;
pub use types::*;
