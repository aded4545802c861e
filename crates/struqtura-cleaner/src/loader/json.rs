//! JSON records (an array of objects, or one object per line).
//!
//! Nested fields (arrays and objects) are kept as their compact JSON text so
//! every loaded column is a flat dtype.

use crate::error::{CleanerError, Result};
use crate::types::Table;
use polars::prelude::*;
use serde_json::Value;
use std::io::Cursor;
use tracing::debug;

const FORMAT: &str = "json";

pub(super) fn read_json(bytes: &[u8]) -> Result<Table> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());

    let format = match first {
        None => return Err(CleanerError::parse(FORMAT, "input is empty")),
        Some(b'[') => JsonFormat::Json,
        Some(_) => JsonFormat::JsonLines,
    };

    let df = JsonReader::new(Cursor::new(bytes.to_vec()))
        .with_json_format(format)
        .finish()
        .map_err(|e| CleanerError::parse(FORMAT, e))?;

    flatten_nested(df)
}

fn flatten_nested(df: Table) -> Result<Table> {
    if !df.get_columns().iter().any(|column| column.dtype().is_nested()) {
        return Ok(df);
    }

    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            if column.dtype().is_nested() {
                debug!("Keeping nested column '{}' as JSON text", column.name());
                nested_to_text(column)
            } else {
                Ok(column.clone())
            }
        })
        .collect::<Result<Vec<_>>>()?;

    DataFrame::new(columns).map_err(|e| CleanerError::parse(FORMAT, e))
}

/// Render each value of a nested column as compact JSON; nulls stay null.
fn nested_to_text(column: &Column) -> Result<Column> {
    let name = column.name().clone();

    let mut single = DataFrame::new(vec![column.clone()])?;
    let mut buffer = Vec::new();
    JsonWriter::new(&mut buffer)
        .with_json_format(JsonFormat::JsonLines)
        .finish(&mut single)?;

    let values = buffer
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            let record: Value = serde_json::from_slice(line)?;
            Ok(match record.get(name.as_str()) {
                None | Some(Value::Null) => None,
                Some(value) => Some(value.to_string()),
            })
        })
        .collect::<Result<Vec<Option<String>>>>()?;

    Ok(Column::new(name, values))
}
