//! Export of cleaned tables as delimited text.

use crate::error::{Result, ResultExt};
use crate::types::Table;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// File name offered for the cleaned download.
pub const CLEANED_FILE_NAME: &str = "cleaned_data.csv";

/// Serialize a table to CSV bytes: header row, comma separator, no index.
pub fn to_csv_bytes(df: &Table) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut df = df.clone();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context("Writing CSV")?;

    Ok(buffer)
}

/// Write a table as CSV into `output_dir`, returning the file path.
pub fn write_csv(df: &Table, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join(file_name);
    let mut file = File::create(&output_path)?;
    let mut df = df.clone();

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context(format!("Writing {}", output_path.display()))?;

    info!("Cleaned table saved: {}", output_path.display());
    Ok(output_path)
}
