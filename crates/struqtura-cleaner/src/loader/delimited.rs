//! Delimited text (CSV and friends) via the Polars CSV reader.

use super::MISSING_TOKENS;
use crate::error::{CleanerError, Result};
use crate::types::Table;
use polars::prelude::*;
use std::io::Cursor;
use tracing::debug;

const FORMAT: &str = "delimited text";

/// Separators recognized when sniffing the header line.
const CANDIDATE_SEPARATORS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// Load delimited text with multiple fallback strategies.
pub(super) fn read_delimited(bytes: &[u8]) -> Result<Table> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(CleanerError::parse(FORMAT, "input is empty"));
    }

    let separator = sniff_separator(bytes);
    debug!("Using separator {:?}", separator as char);

    // Strategy 1: Standard loading, schema inferred from the first 100 rows
    match read_with(bytes.to_vec(), separator, Some(100)) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Standard loading failed: {}", e),
    }

    // Strategy 2: Infer the schema from every row
    match read_with(bytes.to_vec(), separator, None) {
        Ok(df) => return Ok(df),
        Err(e) => debug!("Full schema inference failed: {}", e),
    }

    // Strategy 3: Pre-clean content
    let cleaned = clean_csv_content(&String::from_utf8_lossy(bytes));
    read_with(cleaned.into_bytes(), separator, None).map_err(|e| CleanerError::parse(FORMAT, e))
}

fn read_with(bytes: Vec<u8>, separator: u8, infer_rows: Option<usize>) -> PolarsResult<Table> {
    CsvReadOptions::default()
        .with_infer_schema_length(infer_rows)
        .with_has_header(true)
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(separator)
                .with_quote_char(Some(b'"'))
                .with_null_values(Some(missing_values())),
        )
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
}

fn missing_values() -> NullValues {
    NullValues::AllColumns(MISSING_TOKENS.iter().map(|&token| PlSmallStr::from_static(token)).collect())
}

/// Pick the candidate separator that occurs most often (outside quotes) in
/// the header line. Falls back to a comma.
fn sniff_separator(bytes: &[u8]) -> u8 {
    let header = bytes.split(|&b| b == b'\n').next().unwrap_or_default();

    let mut counts = [0usize; CANDIDATE_SEPARATORS.len()];
    let mut in_quotes = false;
    for &byte in header {
        if byte == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes
            && let Some(idx) = CANDIDATE_SEPARATORS.iter().position(|&s| s == byte)
        {
            counts[idx] += 1;
        }
    }

    counts
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .max_by(|(ia, a), (ib, b)| a.cmp(b).then_with(|| ib.cmp(ia)))
        .map(|(idx, _)| CANDIDATE_SEPARATORS[idx])
        .unwrap_or(b',')
}

/// Clean CSV content
fn clean_csv_content(content: &str) -> String {
    content
        .replace("\"\"\"", "\"")
        .replace("\"\"", "\"")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_simple_csv() {
        let df = read_delimited(b"age,city\n25,NY\n,LA\n35,\n").unwrap();

        assert_eq!(df.shape(), (3, 2));
        assert!(df.column("age").unwrap().dtype().is_integer());
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("city").unwrap().null_count(), 1);
    }

    #[test]
    fn test_missing_tokens_load_as_null() {
        let df = read_delimited(b"age,city\n25,NY\nNA,LA\n35,NaN\n25,NY\n").unwrap();

        assert!(df.column("age").unwrap().dtype().is_integer());
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("city").unwrap().null_count(), 1);
    }

    #[test]
    fn test_nan_token_in_float_column_is_null() {
        let df = read_delimited(b"score\n1.5\nnan\nN/A\n2.5\n").unwrap();

        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("score").unwrap().null_count(), 2);
    }

    #[test]
    fn test_sniff_separator() {
        assert_eq!(sniff_separator(b"a;b;c\n1;2;3"), b';');
        assert_eq!(sniff_separator(b"a\tb\n1\t2"), b'\t');
        assert_eq!(sniff_separator(b"\"x;y\",b\n1,2"), b',');
        assert_eq!(sniff_separator(b"single\n1"), b',');
    }

    #[test]
    fn test_read_semicolon_csv() {
        let df = read_delimited(b"a;b\n1;x\n2;y\n").unwrap();
        assert_eq!(df.shape(), (2, 2));
    }

    #[test]
    fn test_late_text_value_falls_back_to_full_inference() {
        let mut content = String::from("code\n");
        for i in 0..150 {
            content.push_str(&format!("{}\n", i));
        }
        content.push_str("X-1\n");

        let df = read_delimited(content.as_bytes()).unwrap();
        assert_eq!(df.height(), 151);
        assert_eq!(df.column("code").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_empty_input_is_parse_error() {
        let err = read_delimited(b"  \n").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }

    #[test]
    fn test_clean_csv_content() {
        assert_eq!(clean_csv_content("a,b\n\n\"\"x\"\",1\n"), "a,b\n\"x\",1");
    }
}
