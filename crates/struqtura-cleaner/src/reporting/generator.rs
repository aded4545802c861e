use crate::error::Result;
use crate::insights::{ColumnDescription, MissingMask};
use crate::types::CleaningReport;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Summary Report Types
// ============================================================================

/// Everything a host shows after one cleaning run.
///
/// Used for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Name of the uploaded file
    pub input_file: String,
    /// Format the upload was read as
    pub input_format: String,
    /// Path to the cleaned file (if written)
    pub output_file: Option<String>,

    // Shape
    /// (rows, columns) as loaded
    pub original_shape: (usize, usize),
    /// (rows, columns) after cleaning
    pub cleaned_shape: (usize, usize),

    // Missing values
    /// Missing cells in the loaded table
    pub missing_before: usize,
    /// Missing cells in the cleaned table
    pub missing_after: usize,
    /// Per-column missing counts in the loaded table
    pub missing_by_column: Vec<(String, usize)>,

    /// What the cleaner did
    pub cleaning: CleaningReport,

    /// Descriptive statistics of the cleaned table
    pub descriptions: Vec<ColumnDescription>,
}

/// Inputs for [`ReportGenerator::build_summary_report`].
pub struct ReportParams<'a> {
    pub input_file: &'a str,
    pub input_format: &'a str,
    pub output_file: Option<&'a str>,
    pub original_shape: (usize, usize),
    pub cleaned_shape: (usize, usize),
    pub original_mask: &'a MissingMask,
    pub missing_after: usize,
    pub report: &'a CleaningReport,
    pub descriptions: &'a [ColumnDescription],
}

/// Writes reports next to the cleaned output.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Assemble a summary report from the parts of a finished run.
    pub fn build_summary_report(params: ReportParams<'_>) -> SummaryReport {
        SummaryReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: params.input_file.to_string(),
            input_format: params.input_format.to_string(),
            output_file: params.output_file.map(String::from),
            original_shape: params.original_shape,
            cleaned_shape: params.cleaned_shape,
            missing_before: params.original_mask.total_missing(),
            missing_after: params.missing_after,
            missing_by_column: params.original_mask.column_counts(),
            cleaning: params.report.clone(),
            descriptions: params.descriptions.to_vec(),
        }
    }

    /// Write a summary report to `<base>_report.json`.
    pub fn write_report_to_file(&self, report: &SummaryReport, report_base_name: &str) -> Result<PathBuf> {
        let path = self.write_json(report, &format!("{}_report.json", report_base_name))?;
        info!("Report saved: {}", path.display());
        Ok(path)
    }

    /// Write the missing-value mask of the loaded table to
    /// `<base>_missing_mask.json`.
    pub fn write_mask_to_file(&self, mask: &MissingMask, base_name: &str) -> Result<PathBuf> {
        let path = self.write_json(mask, &format!("{}_missing_mask.json", base_name))?;
        info!("Missing mask saved: {}", path.display());
        Ok(path)
    }

    fn write_json<T: Serialize>(&self, value: &T, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join(file_name);
        let mut file = File::create(&path)?;
        file.write_all(serde_json::to_string_pretty(value)?.as_bytes())?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingValueStrategy;
    use crate::insights::missing_mask;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn sample_report() -> (MissingMask, CleaningReport) {
        let df = df![
            "age" => [Some(25i64), None, Some(35)],
            "city" => [Some("NY"), Some("LA"), None],
        ]
        .unwrap();
        let mut report = CleaningReport::new(MissingValueStrategy::Mean, true, 3);
        report.rows_after = 3;
        (missing_mask(&df), report)
    }

    #[test]
    fn test_build_summary_report() {
        let (mask, report) = sample_report();

        let summary = ReportGenerator::build_summary_report(ReportParams {
            input_file: "people.csv",
            input_format: "delimited text",
            output_file: Some("outputs/cleaned_data.csv"),
            original_shape: (3, 2),
            cleaned_shape: (3, 2),
            original_mask: &mask,
            missing_after: 0,
            report: &report,
            descriptions: &[],
        });

        assert_eq!(summary.missing_before, 2);
        assert_eq!(
            summary.missing_by_column,
            vec![("age".to_string(), 1), ("city".to_string(), 1)]
        );
        assert_eq!(summary.output_file.as_deref(), Some("outputs/cleaned_data.csv"));
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let (mask, report) = sample_report();
        let generator = ReportGenerator::new(dir.path().join("nested"));

        let summary = ReportGenerator::build_summary_report(ReportParams {
            input_file: "people.csv",
            input_format: "delimited text",
            output_file: None,
            original_shape: (3, 2),
            cleaned_shape: (3, 2),
            original_mask: &mask,
            missing_after: 0,
            report: &report,
            descriptions: &[],
        });

        let report_path = generator.write_report_to_file(&summary, "people").unwrap();
        let mask_path = generator.write_mask_to_file(&mask, "people").unwrap();

        assert!(report_path.ends_with("people_report.json"));
        assert!(mask_path.ends_with("people_missing_mask.json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(written["missing_before"], 2);
        assert_eq!(written["cleaning"]["strategy"], "mean");

        let written_mask: MissingMask =
            serde_json::from_str(&fs::read_to_string(mask_path).unwrap()).unwrap();
        assert_eq!(written_mask, mask);
    }
}
