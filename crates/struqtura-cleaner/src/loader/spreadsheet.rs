//! Spreadsheets (xlsx) via `calamine`.
//!
//! The first worksheet is read; its first row is the header.

use super::columns::{Cell, build_table, unique_headers};
use crate::error::{CleanerError, Result};
use crate::types::Table;
use calamine::{Data, DataType, Reader, Xlsx};
use chrono::NaiveTime;
use polars::prelude::DataFrame;
use std::io::Cursor;
use tracing::debug;

const FORMAT: &str = "spreadsheet";

/// Largest integral float that is converted back to an integer cell.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

pub(super) fn read_xlsx(bytes: &[u8]) -> Result<Table> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes.to_vec())).map_err(|e| CleanerError::parse(FORMAT, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| CleanerError::parse(FORMAT, "workbook has no worksheets"))?
        .map_err(|e| CleanerError::parse(FORMAT, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        debug!("First worksheet is empty");
        return Ok(DataFrame::empty());
    };

    let names = unique_headers(header.iter().map(header_text).collect());
    let mut columns: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];

    for row in rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(row.get(idx).map(cell_from_data).unwrap_or(Cell::Null));
        }
    }

    build_table(FORMAT, names, columns)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Spreadsheets store every number as a float; integral values come back as
/// integers so whole-number columns stay integer columns.
fn cell_from_data(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Int(v) => Cell::Int(*v),
        Data::Float(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT => Cell::Int(*v as i64),
        Data::Float(v) => Cell::Float(*v),
        Data::String(s) => Cell::text(s),
        Data::DateTime(_) | Data::DateTimeIso(_) => Cell::text(&date_text(cell)),
        other => Cell::text(&other.to_string()),
    }
}

/// Dates render as `YYYY-MM-DD`, with the time appended when it is not midnight.
fn date_text(cell: &Data) -> String {
    match cell.as_datetime() {
        Some(datetime) if datetime.time() == NaiveTime::MIN => datetime.format("%Y-%m-%d").to_string(),
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => cell.to_string(),
    }
}
