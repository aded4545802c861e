//! Column assembly for loaders that read cell by cell (spreadsheet, XML,
//! SQLite).
//!
//! Cells are collected per column and typed once the whole column is known:
//! all integers become `Int64`, all numbers `Float64`, anything else `String`.

use super::is_missing_token;
use crate::error::{CleanerError, Result};
use crate::types::Table;
use polars::prelude::*;
use std::collections::HashSet;

/// A single loaded cell before the column's dtype is decided.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Text cell; blank text and missing-value tokens are missing.
    pub(crate) fn text(s: &str) -> Cell {
        if is_missing_token(s) {
            Cell::Null
        } else {
            Cell::Text(s.to_string())
        }
    }

    /// Cell from untyped text, recognizing integers and finite floats.
    pub(crate) fn parse(s: &str) -> Cell {
        if is_missing_token(s) {
            return Cell::Null;
        }
        let trimmed = s.trim();
        if let Ok(int) = trimmed.parse::<i64>() {
            return Cell::Int(int);
        }
        match trimmed.parse::<f64>() {
            Ok(float) if float.is_finite() => Cell::Float(float),
            _ => Cell::Text(s.to_string()),
        }
    }

    fn render(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Int(v) => Some(v.to_string()),
            Cell::Float(v) => Some(v.to_string()),
            Cell::Text(v) => Some(v.clone()),
        }
    }
}

/// Make header names unique the way spreadsheet tools do: blanks become
/// `Unnamed: <index>`, repeats get a `.1`, `.2`, ... suffix.
pub(crate) fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name.trim().to_string()
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}

/// Build a typed Series from collected cells.
pub(crate) fn build_series(name: &str, cells: &[Cell]) -> Series {
    let present = cells.iter().filter(|c| !matches!(c, Cell::Null));
    let all_int = present.clone().all(|c| matches!(c, Cell::Int(_)));
    let all_numeric = present
        .clone()
        .all(|c| matches!(c, Cell::Int(_) | Cell::Float(_)));
    let any_present = present.count() > 0;

    if any_present && all_int {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Int(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else if any_present && all_numeric {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Cell::Int(v) => Some(*v as f64),
                Cell::Float(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells.iter().map(Cell::render).collect();
        Series::new(name.into(), values)
    }
}

/// Assemble a table from column names and their cells.
pub(crate) fn build_table(format: &str, names: Vec<String>, columns: Vec<Vec<Cell>>) -> Result<Table> {
    let series: Vec<Column> = names
        .iter()
        .zip(columns.iter())
        .map(|(name, cells)| Column::from(build_series(name, cells)))
        .collect();

    DataFrame::new(series).map_err(|e| CleanerError::parse(format, e))
}
