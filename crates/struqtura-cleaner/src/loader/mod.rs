//! Table loading.
//!
//! Converts uploaded bytes in one of several formats into a single in-memory
//! [`Table`]. The cleaning engine never sees bytes or formats; it only ever
//! receives the table produced here.
//!
//! | Format           | Extensions                    |
//! |------------------|-------------------------------|
//! | Delimited text   | `csv`, `tsv`, `txt`           |
//! | Spreadsheet      | `xlsx`                        |
//! | JSON records     | `json`, `ndjson`, `jsonl`     |
//! | Parquet          | `parquet`                     |
//! | XML              | `xml`                         |
//! | SQLite database  | `db`, `sqlite`, `sqlite3`     |
//!
//! A SQLite upload is read from its conventionally named table,
//! [`SQLITE_TABLE`].
//!
//! Besides empty fields, the text tokens in [`MISSING_TOKENS`] (`NA`, `NaN`,
//! `null`, ...) load as missing values in delimited text, spreadsheets, XML
//! and SQLite text columns.
//!
//! Unknown formats fail with [`CleanerError::UnsupportedFormat`]; bytes that do
//! not parse as the declared format fail with [`CleanerError::Parse`]. A
//! failed load never yields a partial table.

mod columns;
mod delimited;
mod json;
mod parquet;
mod spreadsheet;
mod sqlite;
mod xml;

pub use sqlite::SQLITE_TABLE;

use crate::error::{CleanerError, Result};
use crate::types::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Text values that load as missing, matched against the whole field.
pub const MISSING_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a field's text stands for a missing value.
pub(crate) fn is_missing_token(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || MISSING_TOKENS.contains(&trimmed)
}

/// Upload formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    DelimitedText,
    Spreadsheet,
    Json,
    Parquet,
    Xml,
    Sqlite,
}

impl TableFormat {
    pub const ALL: [TableFormat; 6] = [
        TableFormat::DelimitedText,
        TableFormat::Spreadsheet,
        TableFormat::Json,
        TableFormat::Parquet,
        TableFormat::Xml,
        TableFormat::Sqlite,
    ];

    /// Short human-readable name, used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DelimitedText => "delimited text",
            Self::Spreadsheet => "spreadsheet",
            Self::Json => "json",
            Self::Parquet => "parquet",
            Self::Xml => "xml",
            Self::Sqlite => "sqlite",
        }
    }

    /// File extensions mapped to this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::DelimitedText => &["csv", "tsv", "txt"],
            Self::Spreadsheet => &["xlsx"],
            Self::Json => &["json", "ndjson", "jsonl"],
            Self::Parquet => &["parquet"],
            Self::Xml => &["xml"],
            Self::Sqlite => &["db", "sqlite", "sqlite3"],
        }
    }

    /// Infer the format from a file extension (without the dot).
    pub fn from_extension(extension: &str) -> Result<Self> {
        let lower = extension.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&lower.as_str()))
            .ok_or_else(|| CleanerError::UnsupportedFormat(format!(".{}", lower)))
    }

    /// Infer the format from a file name or path.
    pub fn from_file_name(file_name: impl AsRef<Path>) -> Result<Self> {
        let path = file_name.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                CleanerError::UnsupportedFormat(format!(
                    "'{}' has no file extension",
                    path.display()
                ))
            })?;
        Self::from_extension(extension)
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either a format name (`csv`, `spreadsheet`, `sqlite`, ...) or any
/// of the format's file extensions.
impl FromStr for TableFormat {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "delimited_text" | "delimited" => Ok(Self::DelimitedText),
            "spreadsheet" | "excel" => Ok(Self::Spreadsheet),
            "xml" => Ok(Self::Xml),
            "sqlite" | "database" => Ok(Self::Sqlite),
            other => Self::from_extension(other),
        }
    }
}

/// Load a table from bytes in a declared format.
pub fn load(bytes: &[u8], format: TableFormat) -> Result<Table> {
    debug!("Loading {} bytes as {}", bytes.len(), format);

    let df = match format {
        TableFormat::DelimitedText => delimited::read_delimited(bytes)?,
        TableFormat::Spreadsheet => spreadsheet::read_xlsx(bytes)?,
        TableFormat::Json => json::read_json(bytes)?,
        TableFormat::Parquet => parquet::read_parquet(bytes)?,
        TableFormat::Xml => xml::read_xml(bytes)?,
        TableFormat::Sqlite => sqlite::read_sqlite(bytes)?,
    };

    info!("Loaded {} table: {:?}", format, df.shape());
    Ok(df)
}

/// Load a table, inferring the format from the uploaded file's name.
pub fn load_named(file_name: &str, bytes: &[u8]) -> Result<Table> {
    let format = TableFormat::from_file_name(file_name)?;
    load(bytes, format)
}

/// Read a file from disk and load it, inferring the format from its extension.
pub fn load_path(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let format = TableFormat::from_file_name(path)?;
    let bytes = std::fs::read(path)?;
    load(&bytes, format)
}
