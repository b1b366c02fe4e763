//! Terminal summaries for the analysis subcommands.
//!
//! We keep formatting code in one place so:
//! - the scan/fit code stays clean and testable
//! - output changes are localized (important for golden tests)
//!
//! Every formatter takes its inputs explicitly; there is no process-wide
//! context.

use crate::domain::{Extremum, ExtremumMode};
use crate::fit::DecayFit;

/// Full summary for `tak decay`.
pub fn format_decay_summary(
    input: &str,
    band_label: &str,
    mode: ExtremumMode,
    extremum: &Extremum,
    fit: &DecayFit,
    display_scale: f64,
) -> String {
    let mut out = String::new();

    out.push_str("=== tak - decay kinetics ===\n");
    out.push_str(&format!("Input: {input}\n"));
    out.push_str(&format!(
        "Band: {band_label} | mode={}\n",
        mode.display_name()
    ));
    out.push_str(&format_critical_point(extremum));
    out.push_str(&format!(
        "Fitted: n={} samples at t >= {} µs\n",
        fit.n, extremum.time
    ));

    out.push_str("\nOne-phase fit ((a-p)*exp(-t/tau)+p):\n");
    out.push_str(&format!(
        "- a (initial):      {:.5} ± {:.5} OD\n",
        fit.amplitude, fit.std_errors[0]
    ));
    out.push_str(&format!(
        "- tau:              {:.3} ± {:.3} µs\n",
        fit.tau, fit.std_errors[1]
    ));
    out.push_str(&format!(
        "- p (plateau):      {:.5} ± {:.5} OD\n",
        fit.plateau, fit.std_errors[2]
    ));
    out.push_str(&format!("- half-life:        {:.3} µs\n", fit.half_life()));
    out.push_str(&format!(
        "- SSE={:.3e} | RMSE={:.3e} (OD) | scale=×{display_scale}\n",
        fit.sse, fit.rmse
    ));

    out
}

/// The critical-point line shared by decay and spectrum summaries.
pub fn format_critical_point(extremum: &Extremum) -> String {
    format!(
        "Critical point: {:.5} OD ({:.3} mOD) at {} nm, {} µs\n",
        extremum.value, extremum.display_value, extremum.wavelength, extremum.time
    )
}

/// Summary for `tak spectrum`.
pub fn format_spectrum_summary(
    input: &str,
    band_label: &str,
    time: f64,
    extremum: Option<&Extremum>,
    n: usize,
) -> String {
    let mut out = String::new();
    out.push_str("=== tak - transient spectrum ===\n");
    out.push_str(&format!("Input: {input}\n"));
    out.push_str(&format!("Band: {band_label}\n"));
    if let Some(e) = extremum {
        out.push_str(&format_critical_point(e));
    }
    out.push_str(&format!("Spectrum: {n} points at t = {time} µs\n"));
    out
}

/// Summary for `tak raster`.
pub fn format_raster_summary(
    input: &str,
    band_label: &str,
    n_wavelengths: usize,
    n_times: usize,
    svg: &std::path::Path,
) -> String {
    let mut out = String::new();
    out.push_str("=== tak - matrix raster ===\n");
    out.push_str(&format!("Input: {input}\n"));
    out.push_str(&format!("Band: {band_label}\n"));
    out.push_str(&format!(
        "Raster: {n_wavelengths} wavelengths x {n_times} delays -> '{}'\n",
        svg.display()
    ));
    out
}

/// Summary for `tak trace`.
pub fn format_trace_summary(input: &str, requested_nm: f64, actual_nm: f64, n: usize) -> String {
    let mut out = String::new();
    out.push_str("=== tak - kinetic trace ===\n");
    out.push_str(&format!("Input: {input}\n"));
    out.push_str(&format!(
        "Wavelength: requested >{requested_nm} nm, using {actual_nm} nm\n"
    ));
    out.push_str(&format!("Trace: {n} points\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extremum() -> Extremum {
        Extremum {
            wavelength_index: 12,
            time_index: 3,
            wavelength: 450.0,
            time: 60.0,
            value: -0.0123,
            display_value: -12.3,
        }
    }

    #[test]
    fn decay_summary_names_the_key_quantities() {
        let fit = DecayFit {
            amplitude: -0.012,
            tau: 602.5,
            plateau: -0.001,
            covariance: [[0.0; 3]; 3],
            std_errors: [0.0001, 8.4, 0.00005],
            sse: 1.2e-7,
            rmse: 2.5e-5,
            n: 180,
        };
        let text = format_decay_summary("run1.csv", ">400 nm", ExtremumMode::Min, &extremum(), &fit, 1000.0);
        assert!(text.contains("Critical point: -0.01230 OD (-12.300 mOD) at 450 nm, 60 µs"), "{text}");
        assert!(text.contains("tau:              602.500 ± 8.400 µs"), "{text}");
        assert!(text.contains("half-life:        417.621 µs"), "{text}");
        assert!(text.contains("mode=min"), "{text}");
    }

    #[test]
    fn raster_summary_names_grid_and_output() {
        let text = format_raster_summary(
            "run.csv",
            ">400 nm",
            134,
            200,
            std::path::Path::new("out/raster.svg"),
        );
        assert!(text.contains("134 wavelengths x 200 delays"), "{text}");
        assert!(text.contains("'out/raster.svg'"), "{text}");
    }

    #[test]
    fn spectrum_summary_with_and_without_extremum() {
        let with = format_spectrum_summary("r.csv", ">400 nm", 60.0, Some(&extremum()), 40);
        assert!(with.contains("Critical point"));
        let without = format_spectrum_summary("r.csv", ">400 nm", 60.0, None, 40);
        assert!(!without.contains("Critical point"));
        assert!(without.contains("40 points at t = 60 µs"));
    }
}
