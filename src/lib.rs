//! `ta-kinetics` library crate.
//!
//! The binary (`tak`) is a thin wrapper around this library so that:
//!
//! - core logic (extremum scan, decay fitting) is testable without spawning processes
//! - modules are reusable (e.g., batch pipelines, notebooks, future GUI)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod scan;
