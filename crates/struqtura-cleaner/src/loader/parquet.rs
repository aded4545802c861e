//! Columnar binary (Parquet) via the Polars reader.

use crate::error::{CleanerError, Result};
use crate::types::Table;
use polars::prelude::*;
use std::io::Cursor;

const FORMAT: &str = "parquet";

pub(super) fn read_parquet(bytes: &[u8]) -> Result<Table> {
    ParquetReader::new(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| CleanerError::parse(FORMAT, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parquet_roundtrip_through_bytes() {
        let mut df = df![
            "age" => [Some(25i64), None],
            "city" => [Some("NY"), None],
        ]
        .unwrap();

        let mut buffer = Vec::new();
        ParquetWriter::new(&mut buffer).finish(&mut df).unwrap();

        let loaded = read_parquet(&buffer).unwrap();
        assert!(loaded.equals_missing(&df));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = read_parquet(b"not a parquet file").unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
    }
}
