//! Input/output helpers.
//!
//! - instrument CSV ingest + validation (`ingest`)
//! - time-axis correction rewrite (`correct`)
//! - trace/spectrum CSV and fit JSON exports (`export`)

pub mod correct;
pub mod export;
pub mod ingest;

pub use correct::*;
pub use export::*;
pub use ingest::*;
