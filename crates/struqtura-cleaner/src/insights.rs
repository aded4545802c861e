//! Dataset insights for display next to the cleaned table.
//!
//! These helpers operate on whatever table they are given and are
//! independent of the cleaning engine. The missing mask is meant to be
//! computed on the *original* table, before cleaning.

use crate::classify::{ColumnKind, classify_column};
use crate::error::Result;
use crate::types::Table;
use crate::utils::{column_names, series_mode};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of rows the original tool previewed.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

// =============================================================================
// Missing mask
// =============================================================================

/// Boolean grid with the table's shape; `true` where a cell is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingMask {
    pub columns: Vec<String>,
    /// Row-major cells: `cells[row][column]`.
    pub cells: Vec<Vec<bool>>,
}

impl MissingMask {
    /// `(rows, columns)`, matching the table's shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.cells.len(), self.columns.len())
    }

    pub fn is_missing(&self, row: usize, column: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(false)
    }

    /// Missing cell count per column, in table order.
    pub fn column_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let count = self.cells.iter().filter(|row| row[idx]).count();
                (name.clone(), count)
            })
            .collect()
    }

    pub fn total_missing(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&cell| cell).count())
            .sum()
    }

    /// Render the first `max_rows` rows as a text heatmap, one character per
    /// cell (`#` missing, `.` present).
    pub fn render_text(&self, max_rows: usize) -> String {
        let mut out = String::new();
        for row in self.cells.iter().take(max_rows) {
            out.extend(row.iter().map(|&missing| if missing { '#' } else { '.' }));
            out.push('\n');
        }
        if self.cells.len() > max_rows {
            out.push_str(&format!("... {} more rows\n", self.cells.len() - max_rows));
        }
        out
    }
}

/// Build the missing mask of a table.
pub fn missing_mask(df: &Table) -> MissingMask {
    let columns = column_names(df);

    let mut cells = vec![vec![false; columns.len()]; df.height()];
    for (col_idx, column) in df.get_columns().iter().enumerate() {
        if column.null_count() == 0 {
            continue;
        }
        let nulls = column.as_materialized_series().is_null();
        for (row_idx, is_null) in nulls.into_iter().enumerate() {
            if is_null.unwrap_or(false) {
                cells[row_idx][col_idx] = true;
            }
        }
    }

    MissingMask { columns, cells }
}

// =============================================================================
// Descriptive statistics
// =============================================================================

/// Summary statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnDescription {
    Numeric {
        name: String,
        count: usize,
        mean: Option<f64>,
        std: Option<f64>,
        min: Option<f64>,
        q25: Option<f64>,
        median: Option<f64>,
        q75: Option<f64>,
        max: Option<f64>,
    },
    Categorical {
        name: String,
        count: usize,
        unique: usize,
        top: Option<String>,
        freq: Option<usize>,
    },
}

impl ColumnDescription {
    pub fn name(&self) -> &str {
        match self {
            Self::Numeric { name, .. } | Self::Categorical { name, .. } => name,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Self::Numeric { count, .. } | Self::Categorical { count, .. } => *count,
        }
    }
}

/// Describe every column of a table.
///
/// Numeric columns get count, mean, sample standard deviation, min, the
/// quartiles (linear interpolation) and max. Categorical columns get count,
/// number of distinct values, the most frequent value and its frequency.
pub fn describe(df: &Table) -> Result<Vec<ColumnDescription>> {
    df.get_columns()
        .iter()
        .map(|column| {
            let series = column.as_materialized_series();
            match classify_column(column) {
                ColumnKind::Numeric => describe_numeric(series),
                ColumnKind::Categorical => describe_categorical(series),
            }
        })
        .collect()
}

fn describe_numeric(series: &Series) -> Result<ColumnDescription> {
    let as_float = series.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = as_float.f64()?.into_iter().flatten().collect();
    values.sort_by(|a, b| a.total_cmp(b));

    let count = values.len();
    let mean = (count > 0).then(|| values.iter().sum::<f64>() / count as f64);
    let std = match (mean, count) {
        (Some(mean), n) if n > 1 => {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            Some(var.sqrt())
        }
        _ => None,
    };

    Ok(ColumnDescription::Numeric {
        name: series.name().to_string(),
        count,
        mean,
        std,
        min: values.first().copied(),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied(),
    })
}

fn describe_categorical(series: &Series) -> Result<ColumnDescription> {
    let non_null = series.drop_nulls();
    let mode = series_mode(series)?;

    Ok(ColumnDescription::Categorical {
        name: series.name().to_string(),
        count: non_null.len(),
        unique: if non_null.is_empty() { 0 } else { non_null.n_unique()? },
        top: mode.as_ref().map(|m| m.rendered.clone()),
        freq: mode.map(|m| m.count),
    })
}

/// Quantile of sorted values with linear interpolation between ranks.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

// =============================================================================
// Preview
// =============================================================================

/// First `rows` rows of a table.
pub fn preview(df: &Table, rows: usize) -> Table {
    df.head(Some(rows))
}
