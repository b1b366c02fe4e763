//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the absorbance matrix
//! - runs the scan/fit pipelines
//! - prints reports/plots
//! - writes optional exports

use std::path::Path;

use clap::Parser;

use crate::cli::{
    Command, CorrectArgs, DecayArgs, OutputArgs, RasterArgs, SampleArgs, ScanArgs, SpectrumArgs,
    TraceArgs,
};
use crate::domain::{
    Band, CorrectConfig, DecayConfig, ExtremumMode, OutputOptions, RasterConfig, SpectrumConfig,
    TraceConfig,
};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `tak` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Decay(args) => handle_decay(args),
        Command::Spectrum(args) => handle_spectrum(args),
        Command::Trace(args) => handle_trace(args),
        Command::Raster(args) => handle_raster(args),
        Command::Correct(args) => handle_correct(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_decay(args: DecayArgs) -> Result<(), AppError> {
    let config = decay_config_from_args(&args)?;
    let run = pipeline::run_decay(&config)?;

    println!(
        "{}",
        crate::report::format_decay_summary(
            &config.input.display().to_string(),
            &run.scan_label,
            config.mode,
            &run.extremum,
            &run.fit,
            config.display_scale,
        )
    );

    if config.output.plot {
        println!(
            "{}",
            plot_title(&config.output, &config.input, Some(run.extremum.wavelength))
        );
        let plot = crate::plot::render_trace_plot(
            &run.display_trace,
            Some((&run.tail.times, &run.fitted_display)),
            config.output.plot_width,
            config.output.plot_height,
        );
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.output.export {
        crate::io::export::write_trace_csv(path, &run.display_trace, Some(&run.fitted_display))?;
    }
    if let Some(path) = &config.export_fit {
        let report = crate::io::export::FitReport {
            input: config.input.display().to_string(),
            mode: config.mode,
            band: run.scan_label.clone(),
            display_scale: config.display_scale,
            extremum: run.extremum,
            fit: run.fit.clone(),
            half_life: run.fit.half_life(),
        };
        crate::io::export::write_fit_json(path, &report)?;
    }
    if let Some(path) = &config.output.svg {
        crate::plot::write_svg_plot(
            path,
            &run.display_trace.times,
            &run.display_trace.values,
            Some((&run.tail.times, &run.fitted_display)),
        )?;
    }

    Ok(())
}

fn handle_spectrum(args: SpectrumArgs) -> Result<(), AppError> {
    let config = spectrum_config_from_args(&args)?;
    let run = pipeline::run_spectrum(&config)?;

    println!(
        "{}",
        crate::report::format_spectrum_summary(
            &config.input.display().to_string(),
            &config.band.display(),
            run.time,
            run.extremum.as_ref(),
            run.spectrum.len(),
        )
    );

    if config.output.plot {
        println!("{}", plot_title(&config.output, &config.input, None));
        let plot = crate::plot::render_spectrum_plot(
            &run.spectrum,
            config.output.plot_width,
            config.output.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.output.export {
        crate::io::export::write_spectrum_csv(path, &run.spectrum)?;
    }
    if let Some(path) = &config.output.svg {
        crate::plot::write_svg_plot(
            path,
            &run.spectrum.wavelengths,
            &run.spectrum.values,
            None,
        )?;
    }

    Ok(())
}

fn handle_trace(args: TraceArgs) -> Result<(), AppError> {
    let config = trace_config_from_args(&args)?;
    let run = pipeline::run_trace(&config)?;

    println!(
        "{}",
        crate::report::format_trace_summary(
            &config.input.display().to_string(),
            config.wavelength,
            run.wavelength,
            run.series.len(),
        )
    );

    if config.output.plot {
        println!(
            "{}",
            plot_title(&config.output, &config.input, Some(run.wavelength))
        );
        let plot = crate::plot::render_trace_plot(
            &run.series,
            None,
            config.output.plot_width,
            config.output.plot_height,
        );
        println!("{plot}");
    }

    if let Some(path) = &config.output.export {
        crate::io::export::write_trace_csv(path, &run.series, None)?;
    }
    if let Some(path) = &config.output.svg {
        crate::plot::write_svg_plot(path, &run.series.times, &run.series.values, None)?;
    }

    Ok(())
}

fn handle_raster(args: RasterArgs) -> Result<(), AppError> {
    let config = raster_config_from_args(&args)?;
    let run = pipeline::run_raster(&config)?;
    crate::plot::write_raster_svg(&config.svg, &run.times, &run.wavelengths, &run.values)?;

    println!(
        "{}",
        crate::report::format_raster_summary(
            &config.input.display().to_string(),
            &config.band.display(),
            run.wavelengths.len(),
            run.times.len(),
            &config.svg,
        )
    );
    Ok(())
}

fn handle_correct(args: CorrectArgs) -> Result<(), AppError> {
    if args.points == 0 {
        return Err(AppError::usage("Time-axis correction needs --points > 0."));
    }
    if !(args.final_delay.is_finite() && args.final_delay > 0.0) {
        return Err(AppError::usage(
            "Time-axis correction needs a finite --final-delay > 0.",
        ));
    }

    let config = CorrectConfig {
        input: args.input,
        output: args.output,
        points: args.points,
        final_delay: args.final_delay,
        skip_rows: args.skip_rows,
    };
    let written = crate::io::correct::rewrite_time_axis(&config)?;
    println!(
        "Corrected time axis ({} points, {} µs final delay) written to '{}'.",
        config.points,
        config.final_delay,
        written.display()
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = crate::data::SampleConfig {
        output: args.output,
        n_wavelengths: args.rows,
        n_times: args.cols,
        sampling_period: args.period,
        center: args.center,
        width: args.width,
        amplitude: args.amplitude,
        plateau: args.plateau,
        tau: args.tau,
        noise: args.noise,
        seed: args.seed,
        preamble_rows: args.preamble_rows,
        ..crate::data::SampleConfig::default()
    };

    let matrix = crate::data::generate_sample(&config)?;
    crate::data::write_sample_csv(&config.output, &matrix, config.preamble_rows)?;
    println!(
        "Wrote {}x{} synthetic matrix (seed {}) to '{}'.",
        matrix.n_wavelengths(),
        matrix.n_times(),
        config.seed,
        config.output.display()
    );
    Ok(())
}

fn decay_config_from_args(args: &DecayArgs) -> Result<DecayConfig, AppError> {
    let (mode, band) = scan_selection(&args.scan);
    Ok(DecayConfig {
        input: args.input.clone(),
        skip_rows: args.skip_rows,
        mode,
        band,
        wavelength: args.wavelength,
        display_scale: display_scale(args.output.scale)?,
        smooth_window: args.output.smooth,
        export_fit: args.export_fit.clone(),
        output: output_options(&args.output),
    })
}

fn spectrum_config_from_args(args: &SpectrumArgs) -> Result<SpectrumConfig, AppError> {
    let (mode, band) = scan_selection(&args.scan);
    Ok(SpectrumConfig {
        input: args.input.clone(),
        skip_rows: args.skip_rows,
        at_time: args.at,
        mode,
        band,
        display_scale: display_scale(args.output.scale)?,
        smooth_window: args.output.smooth,
        output: output_options(&args.output),
    })
}

fn raster_config_from_args(args: &RasterArgs) -> Result<RasterConfig, AppError> {
    let band = match args.band_hi {
        Some(hi) => Band::between(args.band_lo, hi),
        None => Band::above(args.band_lo),
    };
    Ok(RasterConfig {
        input: args.input.clone(),
        skip_rows: args.skip_rows,
        band,
        display_scale: display_scale(args.scale)?,
        smooth_window: args.smooth,
        svg: args.svg.clone(),
    })
}

fn trace_config_from_args(args: &TraceArgs) -> Result<TraceConfig, AppError> {
    Ok(TraceConfig {
        input: args.input.clone(),
        skip_rows: args.skip_rows,
        wavelength: args.wavelength,
        display_scale: display_scale(args.output.scale)?,
        smooth_window: args.output.smooth,
        output: output_options(&args.output),
    })
}

/// A `--state` preset wins over the explicit mode/band flags.
fn scan_selection(scan: &ScanArgs) -> (ExtremumMode, Band) {
    match scan.state {
        Some(state) => (state.mode(), state.band()),
        None => {
            let band = match scan.band_hi {
                Some(hi) => Band::between(scan.band_lo, hi),
                None => Band::above(scan.band_lo),
            };
            (scan.mode, band)
        }
    }
}

fn output_options(args: &OutputArgs) -> OutputOptions {
    OutputOptions {
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export: args.export.clone(),
        svg: args.svg.clone(),
        title: args.title.clone(),
    }
}

fn display_scale(scale: f64) -> Result<f64, AppError> {
    if scale.is_finite() && scale != 0.0 {
        Ok(scale)
    } else {
        Err(AppError::usage("Display scale must be finite and nonzero."))
    }
}

fn plot_title(output: &OutputOptions, input: &Path, wavelength: Option<f64>) -> String {
    if let Some(title) = &output.title {
        return title.clone();
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    match wavelength {
        Some(nm) => format!("{stem}  {nm} nm"),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatePreset;
    use clap::Parser;

    fn decay_args(argv: &[&str]) -> DecayArgs {
        let cli = crate::cli::Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Decay(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn state_preset_overrides_mode_and_band() {
        let args = decay_args(&["tak", "decay", "run.csv", "--state", "g", "--mode", "max"]);
        let config = decay_config_from_args(&args).unwrap();
        assert_eq!(config.mode, ExtremumMode::Min);
        assert_eq!(config.band, StatePreset::G.band());
    }

    #[test]
    fn no_plot_wins_over_the_default() {
        let args = decay_args(&["tak", "decay", "run.csv", "--no-plot"]);
        let config = decay_config_from_args(&args).unwrap();
        assert!(!config.output.plot);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let args = decay_args(&["tak", "decay", "run.csv", "--scale", "0"]);
        let err = decay_config_from_args(&args).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn default_title_uses_the_file_stem() {
        let options = OutputOptions {
            plot: true,
            plot_width: 80,
            plot_height: 20,
            export: None,
            svg: None,
            title: None,
        };
        let title = plot_title(&options, Path::new("data/run7.csv"), Some(452.0));
        assert_eq!(title, "run7  452 nm");
    }
}
