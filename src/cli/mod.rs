//! Command-line parsing for the transient-absorption kinetics analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scanning/fitting code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{ExtremumMode, StatePreset};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tak", version, about = "Transient-Absorption Kinetics Analyzer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Locate the band extremum, fit a one-phase decay to its kinetic trace,
    /// and optionally plot/export.
    Decay(DecayArgs),
    /// Slice a transient spectrum at a delay time (default: the extremum's time).
    Spectrum(SpectrumArgs),
    /// Print a single-wavelength kinetic trace without fitting.
    Trace(TraceArgs),
    /// Render the band-restricted matrix as an SVG heatmap.
    Raster(RasterArgs),
    /// Rewrite the time axis of a matrix CSV from the acquisition settings.
    Correct(CorrectArgs),
    /// Generate a synthetic matrix CSV for demos and end-to-end checks.
    Sample(SampleArgs),
}

/// Band/mode selection shared by `decay` and `spectrum`.
#[derive(Debug, Parser, Clone)]
pub struct ScanArgs {
    /// Extremum to locate (min for bleaches, max for product bands).
    #[arg(long, value_enum, default_value_t = ExtremumMode::Min)]
    pub mode: ExtremumMode,

    /// Intermediate-state preset; overrides --mode and the band cutoffs.
    #[arg(long, value_enum)]
    pub state: Option<StatePreset>,

    /// Lower wavelength cutoff (nm, exclusive).
    #[arg(long, default_value_t = 400.0)]
    pub band_lo: f64,

    /// Optional upper wavelength cutoff (nm).
    #[arg(long)]
    pub band_hi: Option<f64>,
}

/// Display/export options shared by the slice subcommands.
#[derive(Debug, Parser, Clone)]
pub struct OutputArgs {
    /// Display multiplier applied to absorbance (OD -> mOD).
    #[arg(long, default_value_t = 1000.0)]
    pub scale: f64,

    /// Savitzky-Golay window (odd, > 2) for the displayed values.
    #[arg(long, num_args = 0..=1, default_missing_value = "9")]
    pub smooth: Option<usize>,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the displayed slice to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Render an SVG plot to this path.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Plot title (defaults to the input file stem).
    #[arg(long)]
    pub title: Option<String>,
}

/// Options for `tak decay`.
#[derive(Debug, Parser)]
pub struct DecayArgs {
    /// Input matrix CSV (wavelength rows x delay-time columns).
    pub input: PathBuf,

    /// Instrument preamble lines to skip before the matrix.
    #[arg(long, default_value_t = 5)]
    pub skip_rows: usize,

    #[command(flatten)]
    pub scan: ScanArgs,

    /// Fit the trace at this designated wavelength instead of the band extremum.
    #[arg(long)]
    pub wavelength: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Export the fit report (parameters, errors, covariance) to JSON.
    #[arg(long = "export-fit")]
    pub export_fit: Option<PathBuf>,
}

/// Options for `tak spectrum`.
#[derive(Debug, Parser)]
pub struct SpectrumArgs {
    /// Input matrix CSV.
    pub input: PathBuf,

    /// Instrument preamble lines to skip before the matrix.
    #[arg(long, default_value_t = 5)]
    pub skip_rows: usize,

    /// Slice at this delay time (µs) instead of the band extremum's time.
    #[arg(long)]
    pub at: Option<f64>,

    #[command(flatten)]
    pub scan: ScanArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `tak trace`.
#[derive(Debug, Parser)]
pub struct TraceArgs {
    /// Input matrix CSV.
    pub input: PathBuf,

    /// Designated wavelength (nm).
    #[arg(long)]
    pub wavelength: f64,

    /// Instrument preamble lines to skip before the matrix.
    #[arg(long, default_value_t = 5)]
    pub skip_rows: usize,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for `tak raster`.
#[derive(Debug, Parser)]
pub struct RasterArgs {
    /// Input matrix CSV.
    pub input: PathBuf,

    /// Instrument preamble lines to skip before the matrix.
    #[arg(long, default_value_t = 5)]
    pub skip_rows: usize,

    /// Lower wavelength cutoff (nm, exclusive).
    #[arg(long, default_value_t = 400.0)]
    pub band_lo: f64,

    /// Optional upper wavelength cutoff (nm).
    #[arg(long)]
    pub band_hi: Option<f64>,

    /// Display multiplier applied to absorbance (OD -> mOD).
    #[arg(long, default_value_t = 1000.0)]
    pub scale: f64,

    /// Savitzky-Golay window (odd, > 2) applied along both axes.
    #[arg(long, num_args = 0..=1, default_missing_value = "9")]
    pub smooth: Option<usize>,

    /// Output SVG path.
    #[arg(long, default_value = "raster.svg")]
    pub svg: PathBuf,
}

/// Options for `tak correct`.
#[derive(Debug, Parser)]
pub struct CorrectArgs {
    /// Input matrix CSV with a wrong or placeholder time axis.
    pub input: PathBuf,

    /// Number of measurements along the time axis.
    #[arg(long)]
    pub points: usize,

    /// Final integration delay (µs); the axis step is final_delay / points.
    #[arg(long)]
    pub final_delay: f64,

    /// Output path (defaults to `<stem>_corr.csv` next to the input).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Instrument preamble lines before the matrix.
    #[arg(long, default_value_t = 5)]
    pub skip_rows: usize,
}

/// Options for `tak sample`.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(default_value = "sample.csv")]
    pub output: PathBuf,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of wavelength rows.
    #[arg(long, default_value_t = 160)]
    pub rows: usize,

    /// Number of delay-time columns.
    #[arg(long, default_value_t = 200)]
    pub cols: usize,

    /// Time-axis spacing (µs).
    #[arg(long, default_value_t = 20.0)]
    pub period: f64,

    /// Center of the Gaussian spectral band (nm).
    #[arg(long, default_value_t = 450.0)]
    pub center: f64,

    /// Gaussian band width parameter (nm).
    #[arg(long, default_value_t = 35.0)]
    pub width: f64,

    /// Peak initial absorbance (OD); negative for a bleach.
    #[arg(long, default_value_t = -0.05)]
    pub amplitude: f64,

    /// Decay plateau at the band center (OD).
    #[arg(long, default_value_t = -0.002)]
    pub plateau: f64,

    /// Decay time constant (µs).
    #[arg(long, default_value_t = 600.0)]
    pub tau: f64,

    /// Noise standard deviation (OD).
    #[arg(long, default_value_t = 2e-4)]
    pub noise: f64,

    /// Instrument-style preamble lines to write before the matrix.
    #[arg(long, default_value_t = 5)]
    pub preamble_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn decay_defaults() {
        let cli = Cli::try_parse_from(["tak", "decay", "run.csv"]).unwrap();
        match cli.command {
            Command::Decay(args) => {
                assert_eq!(args.skip_rows, 5);
                assert_eq!(args.scan.band_lo, 400.0);
                assert_eq!(args.scan.mode, ExtremumMode::Min);
                assert_eq!(args.output.scale, 1000.0);
                assert!(args.output.plot);
                assert!(!args.output.no_plot);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn state_preset_parses() {
        let cli = Cli::try_parse_from(["tak", "decay", "run.csv", "--state", "m"]).unwrap();
        match cli.command {
            Command::Decay(args) => assert_eq!(args.scan.state, Some(StatePreset::M)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn correct_requires_acquisition_settings() {
        assert!(Cli::try_parse_from(["tak", "correct", "run.csv"]).is_err());
        let cli = Cli::try_parse_from([
            "tak",
            "correct",
            "run.csv",
            "--points",
            "200",
            "--final-delay",
            "4000",
        ])
        .unwrap();
        match cli.command {
            Command::Correct(args) => {
                assert_eq!(args.points, 200);
                assert_eq!(args.final_delay, 4000.0);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn raster_defaults() {
        let cli = Cli::try_parse_from(["tak", "raster", "run.csv"]).unwrap();
        match cli.command {
            Command::Raster(args) => {
                assert_eq!(args.band_lo, 400.0);
                assert_eq!(args.band_hi, None);
                assert_eq!(args.scale, 1000.0);
                assert_eq!(args.svg, PathBuf::from("raster.svg"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn smooth_flag_without_a_value_uses_the_default_window() {
        let cli =
            Cli::try_parse_from(["tak", "trace", "run.csv", "--wavelength", "450", "--smooth"])
                .unwrap();
        match cli.command {
            Command::Trace(args) => assert_eq!(args.output.smooth, Some(9)),
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from([
            "tak",
            "trace",
            "run.csv",
            "--wavelength",
            "450",
            "--smooth",
            "13",
        ])
        .unwrap();
        match cli.command {
            Command::Trace(args) => assert_eq!(args.output.smooth, Some(13)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn spectrum_at_time_parses() {
        let cli = Cli::try_parse_from(["tak", "spectrum", "run.csv", "--at", "60"]).unwrap();
        match cli.command {
            Command::Spectrum(args) => assert_eq!(args.at, Some(60.0)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
