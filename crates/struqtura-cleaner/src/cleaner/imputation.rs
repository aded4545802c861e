//! Column-by-column missing value handling.

use crate::classify::{ColumnKind, ColumnPartition};
use crate::config::MissingValueStrategy;
use crate::error::{CleanerError, Result, ResultExt};
use crate::imputers::{Imputation, StatisticalImputer};
use crate::types::{ActionType, CleaningAction, ColumnReport, FillRule, Table};
use crate::utils::column_names;
use polars::prelude::*;
use tracing::{debug, warn};

/// Fill the nulls of every classified column in place.
///
/// Numeric columns follow `strategy`; categorical columns always use the most
/// frequent value. Returns one report per column in table order.
pub(super) fn impute_all(
    df: &mut Table,
    partition: &ColumnPartition,
    strategy: MissingValueStrategy,
    actions: &mut Vec<CleaningAction>,
) -> Result<Vec<ColumnReport>> {
    let mut reports = Vec::with_capacity(partition.len());

    for name in &partition.numeric {
        reports.push(impute_column(df, name, ColumnKind::Numeric, strategy, actions)?);
    }
    for name in &partition.categorical {
        reports.push(impute_column(
            df,
            name,
            ColumnKind::Categorical,
            MissingValueStrategy::MostFrequent,
            actions,
        )?);
    }

    // Present per-column results in table order, not partition order
    let order = column_names(df);
    reports.sort_by_key(|report| order.iter().position(|n| *n == report.name));

    Ok(reports)
}

fn impute_column(
    df: &mut Table,
    name: &str,
    kind: ColumnKind,
    strategy: MissingValueStrategy,
    actions: &mut Vec<CleaningAction>,
) -> Result<ColumnReport> {
    let series = df
        .column(name)
        .map_err(|_| CleanerError::ColumnNotFound(name.to_string()))?
        .as_materialized_series()
        .clone();
    let missing_before = series.null_count();

    let mut report = ColumnReport {
        name: name.to_string(),
        kind,
        missing_before,
        missing_after: missing_before,
        filled: 0,
        rule: FillRule::Untouched,
        fill_value: None,
    };

    if missing_before == 0 {
        return Ok(report);
    }

    let (rule, imputation) = compute_fill(&series, strategy)
        .context(format!("Imputing column '{}'", name))?;

    let Some(Imputation {
        series: filled_series,
        fill_value,
        filled,
    }) = imputation
    else {
        warn!(
            "Column '{}' has no non-missing values; leaving it unchanged",
            name
        );
        report.rule = FillRule::SkippedAllMissing;
        actions.push(CleaningAction::new(
            ActionType::ColumnSkipped,
            name,
            format!("Left '{}' unchanged: every value is missing", name),
        ));
        return Ok(report);
    };

    df.replace(name, filled_series)
        .context(format!("Replacing column '{}'", name))?;

    debug!(
        "Filled {} missing values in '{}' with {}: {}",
        filled,
        name,
        rule.display_name(),
        fill_value
    );
    actions.push(CleaningAction::new(
        ActionType::ValueImputed,
        name,
        format!(
            "Filled {} missing values in '{}' with {}: {}",
            filled,
            name,
            rule.display_name(),
            fill_value
        ),
    ));

    report.missing_after = missing_before - filled;
    report.filled = filled;
    report.rule = rule;
    report.fill_value = Some(fill_value);
    Ok(report)
}

fn compute_fill(
    series: &Series,
    strategy: MissingValueStrategy,
) -> PolarsResult<(FillRule, Option<Imputation>)> {
    match strategy {
        MissingValueStrategy::Mean => Ok((FillRule::Mean, StatisticalImputer::mean_fill(series)?)),
        MissingValueStrategy::Median => {
            Ok((FillRule::Median, StatisticalImputer::median_fill(series)?))
        }
        MissingValueStrategy::MostFrequent => Ok((
            FillRule::MostFrequent,
            StatisticalImputer::mode_fill(series)?,
        )),
    }
}
