//! Time-axis correction.
//!
//! Some acquisitions store bogus timestamps in the time-axis row. The fix is
//! a one-time rewrite: replace the axis with `sampling_period × index`, where
//! `sampling_period = final_delay / points`, and zero the corner cell. Every
//! other record is copied through field-for-field, and the result is written
//! next to the input as `<stem>_corr.csv`.

use std::path::{Path, PathBuf};

use crate::domain::CorrectConfig;
use crate::error::AppError;

/// Rewrite the time-axis row and write the corrected CSV.
///
/// Returns the output path actually written.
pub fn rewrite_time_axis(config: &CorrectConfig) -> Result<PathBuf, AppError> {
    if config.points == 0 {
        return Err(AppError::usage("Number of measurements must be > 0."));
    }
    if !(config.final_delay.is_finite() && config.final_delay > 0.0) {
        return Err(AppError::usage("Final integration delay must be finite and > 0."));
    }
    let sampling_period = config.final_delay / config.points as f64;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&config.input)
        .map_err(|e| {
            AppError::usage(format!(
                "Failed to open CSV '{}': {e}",
                config.input.display()
            ))
        })?;

    let out_path = config
        .output
        .clone()
        .unwrap_or_else(|| corrected_path(&config.input));
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&out_path)
        .map_err(|e| {
            AppError::usage(format!("Failed to create '{}': {e}", out_path.display()))
        })?;

    let mut axis_rewritten = false;
    for (idx, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| AppError::data(format!("CSV read error at record {}: {e}", idx + 1)))?;

        if idx == config.skip_rows {
            let mut fields: Vec<String> = Vec::with_capacity(record.len());
            fields.push("0".to_string());
            for col in 1..record.len() {
                fields.push(format_time(sampling_period * (col - 1) as f64));
            }
            writer
                .write_record(&fields)
                .map_err(|e| AppError::usage(format!("Failed to write record: {e}")))?;
            axis_rewritten = true;
        } else {
            writer
                .write_record(&record)
                .map_err(|e| AppError::usage(format!("Failed to write record: {e}")))?;
        }
    }

    if !axis_rewritten {
        return Err(AppError::data(format!(
            "Input ended before the time-axis row (record {}).",
            config.skip_rows + 1
        )));
    }

    writer
        .flush()
        .map_err(|e| AppError::usage(format!("Failed to flush '{}': {e}", out_path.display())))?;
    Ok(out_path)
}

/// `<stem>_corr.csv` next to the input.
pub fn corrected_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("corrected");
    input.with_file_name(format!("{stem}_corr.csv"))
}

fn format_time(t: f64) -> String {
    // Trim trailing noise while keeping sub-µs periods exact enough.
    let s = format!("{t:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrected_path_appends_suffix() {
        assert_eq!(
            corrected_path(Path::new("/data/run1.csv")),
            PathBuf::from("/data/run1_corr.csv")
        );
    }

    #[test]
    fn format_time_trims_zeros() {
        assert_eq!(format_time(0.0), "0");
        assert_eq!(format_time(12.5), "12.5");
        assert_eq!(format_time(100.0), "100");
        assert_eq!(format_time(0.125), "0.125");
    }

    #[test]
    fn rewrites_only_the_axis_row() {
        let dir = std::env::temp_dir().join("tak-correct-test");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("run.csv");
        let output = dir.join("run_corr.csv");
        std::fs::write(
            &input,
            "meta,junk\nmeta,junk\n999,5,17,88\n400,0.1,0.2,0.3\n",
        )
        .unwrap();

        let written = rewrite_time_axis(&CorrectConfig {
            input: input.clone(),
            output: Some(output.clone()),
            points: 4,
            final_delay: 40.0,
            skip_rows: 2,
        })
        .unwrap();
        assert_eq!(written, output);

        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "meta,junk");
        // Period = 40/4 = 10; corner zeroed, axis = 0, 10, 20.
        assert_eq!(lines[2], "0,0,10,20");
        assert_eq!(lines[3], "400,0.1,0.2,0.3");
    }

    #[test]
    fn missing_axis_row_is_an_error() {
        let dir = std::env::temp_dir().join("tak-correct-test");
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("short.csv");
        std::fs::write(&input, "meta,junk\n").unwrap();

        let err = rewrite_time_axis(&CorrectConfig {
            input,
            output: Some(dir.join("short_corr.csv")),
            points: 4,
            final_delay: 40.0,
            skip_rows: 5,
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
