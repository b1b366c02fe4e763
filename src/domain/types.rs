//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during scanning/fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which extremum to locate in the scanned band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumMode {
    /// Most negative absorbance (bleach / ground-state recovery).
    Min,
    /// Most positive absorbance (excited-state / product absorption).
    Max,
}

impl ExtremumMode {
    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ExtremumMode::Min => "min",
            ExtremumMode::Max => "max",
        }
    }

    /// `true` if `candidate` is strictly better than `incumbent` for this mode.
    pub fn improves(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            ExtremumMode::Min => candidate < incumbent,
            ExtremumMode::Max => candidate > incumbent,
        }
    }
}

/// Named intermediate-state presets.
///
/// Each preset bundles a wavelength band and an extremum mode that together
/// pick out one photochemical intermediate in the transient spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatePreset {
    /// Ground-state bleach: >500 nm, minimum.
    G,
    /// Late intermediate: 500-550 nm, maximum.
    L,
    /// Early intermediate: 400-500 nm, maximum.
    M,
    /// Long-wavelength product: >600 nm, maximum.
    O,
}

impl StatePreset {
    pub fn band(self) -> Band {
        match self {
            StatePreset::G => Band::above(500.0),
            StatePreset::L => Band::between(500.0, 550.0),
            StatePreset::M => Band::between(400.0, 500.0),
            StatePreset::O => Band::above(600.0),
        }
    }

    pub fn mode(self) -> ExtremumMode {
        match self {
            StatePreset::G => ExtremumMode::Min,
            StatePreset::L | StatePreset::M | StatePreset::O => ExtremumMode::Max,
        }
    }
}

/// A wavelength sub-range selected by cutoffs, not row indices.
///
/// A row belongs to the band when its wavelength is strictly greater than
/// `lo`. When `hi` is set, the band ends before the first row whose
/// wavelength is strictly greater than `hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Lower wavelength cutoff (nm), exclusive.
    pub lo: f64,
    /// Optional upper wavelength cutoff (nm).
    pub hi: Option<f64>,
}

impl Band {
    pub fn above(lo: f64) -> Self {
        Self { lo, hi: None }
    }

    pub fn between(lo: f64, hi: f64) -> Self {
        Self { lo, hi: Some(hi) }
    }

    /// Terminal-friendly label, e.g. `>400 nm` or `400-500 nm`.
    pub fn display(&self) -> String {
        match self.hi {
            Some(hi) => format!("{}-{} nm", self.lo, hi),
            None => format!(">{} nm", self.lo),
        }
    }
}

/// The located global extremum (critical point) of a band-restricted scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    /// Row index into the full matrix (not the band).
    pub wavelength_index: usize,
    /// Column index into the full matrix.
    pub time_index: usize,
    /// Wavelength axis value at the extremum row (nm).
    pub wavelength: f64,
    /// Delay-time axis value at the extremum column (µs).
    pub time: f64,
    /// Raw absorbance value (OD).
    pub value: f64,
    /// Value scaled by the display multiplier (mOD by default).
    pub display_value: f64,
}

/// An ordered kinetic trace: `(delay time, absorbance)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub times: Vec<f64>,
    pub values: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// A copy with values multiplied by `scale` (pure display projection).
    pub fn scaled(&self, scale: f64) -> TimeSeries {
        TimeSeries {
            times: self.times.clone(),
            values: self.values.iter().map(|v| v * scale).collect(),
        }
    }
}

/// An ordered spectrum slice: `(wavelength, absorbance)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub wavelengths: Vec<f64>,
    pub values: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn scaled(&self, scale: f64) -> Spectrum {
        Spectrum {
            wavelengths: self.wavelengths.clone(),
            values: self.values.iter().map(|v| v * scale).collect(),
        }
    }
}

/// Shared plotting/export knobs for the slice subcommands.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: Option<PathBuf>,
    pub svg: Option<PathBuf>,
    /// Plot title; defaults to the input file stem.
    pub title: Option<String>,
}

/// Configuration for `tak decay`.
#[derive(Debug, Clone)]
pub struct DecayConfig {
    pub input: PathBuf,
    /// Instrument preamble lines to skip before the matrix.
    pub skip_rows: usize,
    pub mode: ExtremumMode,
    pub band: Band,
    /// When set, scan a single designated-wavelength row instead of the band.
    pub wavelength: Option<f64>,
    /// Display multiplier applied to absorbance for reporting (OD -> mOD).
    pub display_scale: f64,
    /// Optional Savitzky-Golay window (odd) for the *displayed* trace.
    pub smooth_window: Option<usize>,
    pub export_fit: Option<PathBuf>,
    pub output: OutputOptions,
}

/// Configuration for `tak spectrum`.
#[derive(Debug, Clone)]
pub struct SpectrumConfig {
    pub input: PathBuf,
    pub skip_rows: usize,
    /// Designated delay time (µs). When `None`, slice at the band extremum's time.
    pub at_time: Option<f64>,
    pub mode: ExtremumMode,
    pub band: Band,
    pub display_scale: f64,
    pub smooth_window: Option<usize>,
    pub output: OutputOptions,
}

/// Configuration for `tak trace`.
#[derive(Debug, Clone)]
pub struct TraceConfig {
    pub input: PathBuf,
    pub skip_rows: usize,
    /// Designated wavelength (nm).
    pub wavelength: f64,
    pub display_scale: f64,
    pub smooth_window: Option<usize>,
    pub output: OutputOptions,
}

/// Configuration for `tak raster` (full-matrix heatmap).
#[derive(Debug, Clone)]
pub struct RasterConfig {
    pub input: PathBuf,
    pub skip_rows: usize,
    pub band: Band,
    pub display_scale: f64,
    /// Optional Savitzky-Golay window applied along both axes.
    pub smooth_window: Option<usize>,
    /// Output SVG path.
    pub svg: PathBuf,
}

/// Configuration for `tak correct` (time-axis rewrite).
#[derive(Debug, Clone)]
pub struct CorrectConfig {
    pub input: PathBuf,
    /// Output path; defaults to `<stem>_corr.csv` next to the input.
    pub output: Option<PathBuf>,
    /// Number of measurements along the time axis.
    pub points: usize,
    /// Final integration delay (µs).
    pub final_delay: f64,
    pub skip_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improves_follows_mode() {
        assert!(ExtremumMode::Min.improves(-1.0, 0.0));
        assert!(!ExtremumMode::Min.improves(0.0, 0.0));
        assert!(ExtremumMode::Max.improves(1.0, 0.0));
        assert!(!ExtremumMode::Max.improves(1.0, 1.0));
    }

    #[test]
    fn presets_match_script_cutoffs() {
        assert_eq!(StatePreset::G.band(), Band::above(500.0));
        assert_eq!(StatePreset::G.mode(), ExtremumMode::Min);
        assert_eq!(StatePreset::M.band(), Band::between(400.0, 500.0));
        assert_eq!(StatePreset::O.mode(), ExtremumMode::Max);
    }

    #[test]
    fn band_display() {
        assert_eq!(Band::above(400.0).display(), ">400 nm");
        assert_eq!(Band::between(500.0, 550.0).display(), "500-550 nm");
    }
}
