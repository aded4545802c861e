//! Shared utilities for the cleaner.
//!
//! Small helpers used by the imputers, the cleaner and the insights module.

use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Names of all columns in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

// =============================================================================
// Series Statistics Utilities
// =============================================================================

/// The most frequent non-null value of a Series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeValue {
    /// Row index of the first occurrence of the value.
    pub first_index: usize,
    /// Number of times the value occurs.
    pub count: usize,
    /// Text rendering of the value.
    pub rendered: String,
}

/// Calculate the mode (most frequent non-null value) of a Series.
///
/// Ties are broken by first occurrence: among equally frequent values the one
/// that appears earliest in the column wins. Returns `None` when the Series
/// has no non-null values.
pub fn series_mode(series: &Series) -> PolarsResult<Option<ModeValue>> {
    if series.null_count() == series.len() {
        return Ok(None);
    }

    let as_text = series.cast(&DataType::String)?;
    let as_text = as_text.str()?;

    // value -> (count, first index)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, value) in as_text.into_iter().enumerate() {
        if let Some(value) = value {
            counts.entry(value).or_insert((0, idx)).0 += 1;
        }
    }

    let best = counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map(|(value, (count, first_index))| ModeValue {
            first_index,
            count,
            rendered: value.to_string(),
        });

    Ok(best)
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series with a specific value.
///
/// The result is always `Float64`.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let as_float = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = as_float
        .f64()?
        .into_iter()
        .map(|value| value.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a Series with the value found at row `source_index`.
///
/// The dtype of the Series is preserved.
pub fn fill_nulls_from_row(series: &Series, source_index: usize) -> PolarsResult<Series> {
    let fill = series.new_from_index(source_index, series.len());
    let present = series.is_not_null();
    series.zip_with(&present, &fill)
}

// =============================================================================
// Tests
// =============================================================================
