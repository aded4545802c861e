//! Struqtura Data Cleaner Library
//!
//! Loads tabular uploads into Polars tables and cleans them: missing values
//! are imputed column by column and duplicate rows can be dropped.
//!
//! # Overview
//!
//! - **Loading**: delimited text, xlsx, JSON, Parquet, XML and SQLite uploads
//!   become a single in-memory [`Table`]
//! - **Classification**: every column is either numeric or categorical
//! - **Imputation**: numeric columns use mean, median or most-frequent;
//!   categorical columns always use their most frequent value
//! - **Deduplication**: optional, keeps the first occurrence of each row
//! - **Insights**: missing-value mask, descriptive statistics, previews
//! - **Export**: cleaned table as CSV
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use struqtura_cleaner::{Cleaner, CleaningConfig, MissingValueStrategy, loader};
//!
//! let table = loader::load_path("people.csv")?;
//!
//! let config = CleaningConfig::builder()
//!     .missing_value_strategy(MissingValueStrategy::Median)
//!     .remove_duplicates(true)
//!     .build()?;
//!
//! let (cleaned, report) = Cleaner::clean_with_report(&table, &config)?;
//! println!("{} -> {} rows", report.rows_before, report.rows_after);
//! ```
//!
//! # Whole requests
//!
//! [`CleaningWorkflow`] runs one upload end to end and returns the original
//! and cleaned tables, the report, the missing-value mask and the CSV bytes:
//!
//! ```rust,ignore
//! use struqtura_cleaner::{CleaningRequest, CleaningWorkflow};
//!
//! let bytes = std::fs::read("people.xlsx")?;
//! let outcome = CleaningWorkflow::run(CleaningRequest::new("people.xlsx", bytes))?;
//! std::fs::write("cleaned_data.csv", &outcome.csv)?;
//! ```
//!
//! # Configuration
//!
//! A strategy name that is not `mean`, `median` or `most_frequent` is a
//! [`CleanerError::Configuration`] and no table is touched:
//!
//! ```rust,ignore
//! let err = Cleaner::clean_raw(&table, "mode", true).unwrap_err();
//! assert!(err.is_configuration());
//! ```

pub mod classify;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod export;
pub mod imputers;
pub mod insights;
pub mod loader;
pub mod reporting;
pub mod types;
pub mod utils;
pub mod workflow;

// Re-exports for convenient access
pub use classify::{ColumnKind, ColumnPartition, classify_column, partition_columns};
pub use cleaner::Cleaner;
pub use config::{CleaningConfig, CleaningConfigBuilder, MissingValueStrategy};
pub use error::{CleanerError, Result as CleanerResult, ResultExt};
pub use export::{CLEANED_FILE_NAME, to_csv_bytes, write_csv};
pub use imputers::{Imputation, StatisticalImputer};
pub use insights::{ColumnDescription, MissingMask, describe, missing_mask, preview};
pub use loader::{MISSING_TOKENS, SQLITE_TABLE, TableFormat, load, load_named, load_path};
pub use reporting::{ReportGenerator, ReportParams, SummaryReport};
pub use types::{ActionType, CleaningAction, CleaningReport, ColumnReport, FillRule, Table};
pub use workflow::{CleaningOutcome, CleaningRequest, CleaningWorkflow};
