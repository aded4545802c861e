//! Exact duplicate row removal.

use crate::error::{Result, ResultExt};
use crate::types::Table;
use polars::prelude::*;

/// Remove rows that repeat an earlier row in every column.
///
/// Nulls compare equal to nulls. The first occurrence is kept and kept rows
/// retain their relative order. Returns the table and the number of rows
/// dropped.
pub(super) fn drop_duplicate_rows(df: Table) -> Result<(Table, usize)> {
    let before = df.height();
    if before < 2 || df.width() == 0 {
        return Ok((df, 0));
    }

    let deduped = df
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()
        .context("Removing duplicate rows")?;

    let removed = before - deduped.height();
    Ok((deduped, removed))
}
