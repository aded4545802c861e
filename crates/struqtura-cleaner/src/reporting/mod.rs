//! Report generation module.
//!
//! Collects the outcome of a cleaning run into a [`SummaryReport`] and writes
//! reports and missing-value masks as JSON next to the cleaned output.
//!
//! # Example
//!
//! ```rust,ignore
//! use struqtura_cleaner::reporting::{ReportGenerator, ReportParams};
//!
//! let summary = ReportGenerator::build_summary_report(params);
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&summary)?);
//!
//! // Or write to file
//! let generator = ReportGenerator::new("outputs");
//! generator.write_report_to_file(&summary, "people")?;
//! ```

mod generator;

pub use generator::{ReportGenerator, ReportParams, SummaryReport};
