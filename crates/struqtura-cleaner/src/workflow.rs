//! One cleaning request from upload to download.
//!
//! `load -> clean -> insights -> export`. A request owns its bytes and its
//! configuration; the outcome owns every table it produced, so concurrent
//! requests never share state.

use crate::cleaner::Cleaner;
use crate::config::CleaningConfig;
use crate::error::{Result, ResultExt};
use crate::export::to_csv_bytes;
use crate::insights::{ColumnDescription, MissingMask, describe, missing_mask};
use crate::loader::{self, TableFormat};
use crate::types::{CleaningReport, Table};
use tracing::info;

/// An uploaded file and the options chosen for it.
#[derive(Debug, Clone)]
pub struct CleaningRequest {
    /// Name of the uploaded file; its extension picks the format unless
    /// `format` is set.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub format: Option<TableFormat>,
    pub config: CleaningConfig,
}

impl CleaningRequest {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            format: None,
            config: CleaningConfig::default(),
        }
    }

    pub fn with_format(mut self, format: TableFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_config(mut self, config: CleaningConfig) -> Self {
        self.config = config;
        self
    }

    /// The declared format, or the one implied by the file name.
    pub fn resolved_format(&self) -> Result<TableFormat> {
        match self.format {
            Some(format) => Ok(format),
            None => TableFormat::from_file_name(&self.file_name),
        }
    }
}

/// Everything one request produced.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub format: TableFormat,
    /// The table as loaded.
    pub original: Table,
    pub cleaned: Table,
    pub report: CleaningReport,
    /// Missing cells of the table as loaded.
    pub missing_mask: MissingMask,
    /// Descriptive statistics of the cleaned table.
    pub descriptions: Vec<ColumnDescription>,
    /// The cleaned table as CSV.
    pub csv: Vec<u8>,
}

pub struct CleaningWorkflow;

impl CleaningWorkflow {
    pub fn run(request: CleaningRequest) -> Result<CleaningOutcome> {
        let format = request.resolved_format()?;
        info!("Processing {} as {}", request.file_name, format);

        let original =
            loader::load(&request.bytes, format).context(format!("Loading {}", request.file_name))?;
        let mask = missing_mask(&original);

        let (cleaned, report) = Cleaner::clean_with_report(&original, &request.config)?;
        let descriptions = describe(&cleaned)?;
        let csv = to_csv_bytes(&cleaned)?;

        info!(
            "Finished {}: {:?} -> {:?}",
            request.file_name,
            original.shape(),
            cleaned.shape()
        );

        Ok(CleaningOutcome {
            format,
            original,
            cleaned,
            report,
            missing_mask: mask,
            descriptions,
            csv,
        })
    }
}
