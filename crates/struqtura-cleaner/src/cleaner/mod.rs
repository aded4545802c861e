//! The cleaning engine.
//!
//! Given a table and a [`CleaningConfig`], the engine:
//! 1. Partitions columns into numeric and categorical
//! 2. Fills numeric gaps with the configured strategy (mean, median or most frequent)
//! 3. Fills categorical gaps with the most frequent value
//! 4. Optionally removes exact duplicate rows, keeping the first occurrence
//!
//! The engine is a pure transformation. [`Cleaner::clean`] borrows the input
//! and returns a new table, so the caller's table is never modified.
//! [`Cleaner::clean_owned`] consumes the table instead; use it when the caller
//! has no further use for the original.
//!
//! A column without a single non-missing value cannot be imputed. It is left
//! unchanged (still all missing) and reported as skipped; this is not an
//! error.

mod duplicates;
mod imputation;

use crate::classify::partition_columns;
use crate::config::CleaningConfig;
use crate::error::Result;
use crate::types::{ActionType, CleaningAction, CleaningReport, Table};
use tracing::{debug, info};

/// Stateless entry point of the cleaning engine.
pub struct Cleaner;

impl Cleaner {
    /// Clean a borrowed table, returning a new one.
    pub fn clean(table: &Table, config: &CleaningConfig) -> Result<Table> {
        Self::clean_with_report(table, config).map(|(cleaned, _)| cleaned)
    }

    /// Clean a table the caller hands over.
    pub fn clean_owned(table: Table, config: &CleaningConfig) -> Result<Table> {
        let mut report = CleaningReport::new(
            config.missing_value_strategy,
            config.remove_duplicates,
            table.height(),
        );
        Self::run(table, config, &mut report)
    }

    /// Clean a borrowed table and describe what was done.
    pub fn clean_with_report(
        table: &Table,
        config: &CleaningConfig,
    ) -> Result<(Table, CleaningReport)> {
        let mut report = CleaningReport::new(
            config.missing_value_strategy,
            config.remove_duplicates,
            table.height(),
        );
        let cleaned = Self::run(table.clone(), config, &mut report)?;
        Ok((cleaned, report))
    }

    /// Clean with an untyped strategy name.
    ///
    /// An unknown name fails with a configuration error before the table is
    /// looked at.
    pub fn clean_raw(table: &Table, strategy: &str, remove_duplicates: bool) -> Result<Table> {
        let config = CleaningConfig::parse(strategy, remove_duplicates)?;
        Self::clean(table, &config)
    }

    fn run(mut df: Table, config: &CleaningConfig, report: &mut CleaningReport) -> Result<Table> {
        info!(
            "Cleaning table: {} rows x {} columns (strategy: {}, remove duplicates: {})",
            df.height(),
            df.width(),
            config.missing_value_strategy,
            config.remove_duplicates
        );

        if df.height() == 0 || df.width() == 0 {
            debug!("Empty table; nothing to clean");
            return Ok(df);
        }

        // 1. Partition columns
        let partition = partition_columns(&df);
        debug!(
            "Classified {} numeric and {} categorical columns",
            partition.numeric.len(),
            partition.categorical.len()
        );
        report.add_action(CleaningAction::new(
            ActionType::ColumnsClassified,
            "table",
            format!(
                "{} numeric columns {:?}, {} categorical columns {:?}",
                partition.numeric.len(),
                partition.numeric,
                partition.categorical.len(),
                partition.categorical
            ),
        ));

        // 2 + 3. Impute numeric and categorical columns
        report.columns = imputation::impute_all(
            &mut df,
            &partition,
            config.missing_value_strategy,
            &mut report.actions,
        )?;

        // 4. Remove duplicate rows
        if config.remove_duplicates {
            let (deduped, removed) = duplicates::drop_duplicate_rows(df)?;
            df = deduped;
            report.duplicates_removed = removed;

            if removed > 0 {
                let pct = (removed as f64 / report.rows_before as f64) * 100.0;
                report.add_action(CleaningAction::new(
                    ActionType::DuplicatesRemoved,
                    "table",
                    format!("Removed {} duplicate rows ({:.1}%)", removed, pct),
                ));
                debug!("Removed {} duplicate rows", removed);
            } else {
                debug!("No duplicate rows found");
            }
        }

        report.rows_after = df.height();
        info!(
            "Cleaning complete: {} cells filled, {} rows -> {} rows",
            report.total_filled(),
            report.rows_before,
            report.rows_after
        );

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MissingValueStrategy;
    use crate::error::CleanerError;
    use crate::types::FillRule;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn config(strategy: MissingValueStrategy, remove_duplicates: bool) -> CleaningConfig {
        CleaningConfig::builder()
            .missing_value_strategy(strategy)
            .remove_duplicates(remove_duplicates)
            .build()
            .unwrap()
    }

    fn age_city() -> Table {
        df![
            "age" => [Some(25i64), None, Some(35), Some(25)],
            "city" => [Some("NY"), Some("LA"), None, Some("NY")],
        ]
        .unwrap()
    }

    #[test]
    fn test_age_city_scenario() {
        let cleaned = Cleaner::clean(&age_city(), &config(MissingValueStrategy::Mean, true)).unwrap();

        assert_eq!(cleaned.height(), 3);
        let age = cleaned.column("age").unwrap().f64().unwrap();
        assert_eq!(age.get(0), Some(25.0));
        assert!((age.get(1).unwrap() - 28.333_333).abs() < 1e-4);
        assert_eq!(age.get(2), Some(35.0));

        let city: Vec<Option<&str>> = cleaned.column("city").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(city, vec![Some("NY"), Some("LA"), Some("NY")]);
    }

    #[test]
    fn test_clean_does_not_mutate_input() {
        let original = age_city();
        let snapshot = original.clone();

        let _ = Cleaner::clean(&original, &CleaningConfig::default()).unwrap();

        assert!(original.equals_missing(&snapshot));
        assert_eq!(original.column("age").unwrap().null_count(), 1);
    }

    #[test]
    fn test_clean_owned_matches_clean() {
        let config = config(MissingValueStrategy::Median, true);
        let borrowed = Cleaner::clean(&age_city(), &config).unwrap();
        let owned = Cleaner::clean_owned(age_city(), &config).unwrap();
        assert!(borrowed.equals_missing(&owned));
    }

    #[test]
    fn test_keep_duplicates() {
        let cleaned = Cleaner::clean(&age_city(), &config(MissingValueStrategy::Mean, false)).unwrap();
        assert_eq!(cleaned.height(), 4);
    }

    #[test]
    fn test_median_strategy() {
        let df = df!["x" => [Some(1.0), Some(10.0), None, Some(2.0)]].unwrap();
        let cleaned = Cleaner::clean(&df, &config(MissingValueStrategy::Median, false)).unwrap();
        assert_eq!(cleaned.column("x").unwrap().f64().unwrap().get(2), Some(2.0));
    }

    #[test]
    fn test_most_frequent_strategy_on_numeric() {
        let df = df!["x" => [Some(4i64), Some(7), None, Some(7), Some(4)]].unwrap();
        let cleaned =
            Cleaner::clean(&df, &config(MissingValueStrategy::MostFrequent, false)).unwrap();
        // 4 and 7 tie; 4 occurs first
        assert_eq!(cleaned.column("x").unwrap().i64().unwrap().get(2), Some(4));
    }

    #[test]
    fn test_categorical_uses_mode_regardless_of_strategy() {
        let df = df!["c" => [Some("b"), Some("a"), Some("a"), None]].unwrap();
        for strategy in MissingValueStrategy::ALL {
            let cleaned = Cleaner::clean(&df, &config(strategy, false)).unwrap();
            assert_eq!(cleaned.column("c").unwrap().str().unwrap().get(3), Some("a"));
        }
    }

    #[test]
    fn test_all_missing_numeric_column_is_left_unchanged() {
        let df = df![
            "empty" => [Option::<f64>::None, None, None],
            "x" => [Some(1.0), None, Some(3.0)],
        ]
        .unwrap();

        let (cleaned, report) =
            Cleaner::clean_with_report(&df, &config(MissingValueStrategy::Mean, false)).unwrap();

        assert_eq!(cleaned.column("empty").unwrap().null_count(), 3);
        assert_eq!(cleaned.column("x").unwrap().null_count(), 0);
        assert_eq!(report.column("empty").unwrap().rule, FillRule::SkippedAllMissing);
        assert_eq!(report.skipped_columns().count(), 1);
    }

    #[test]
    fn test_unknown_strategy_is_configuration_error() {
        let df = age_city();
        let err = Cleaner::clean_raw(&df, "mode", true).unwrap_err();
        assert!(matches!(err, CleanerError::Configuration(_)));
        assert_eq!(df.column("age").unwrap().null_count(), 1);
    }

    #[test]
    fn test_empty_rows_table_is_unchanged() {
        let df = df![
            "a" => Vec::<i64>::new(),
            "b" => Vec::<String>::new(),
        ]
        .unwrap();

        let cleaned = Cleaner::clean(&df, &CleaningConfig::default()).unwrap();
        assert_eq!(cleaned.shape(), (0, 2));
        assert_eq!(cleaned.get_column_names(), df.get_column_names());
        assert_eq!(cleaned.dtypes(), df.dtypes());
    }

    #[test]
    fn test_zero_columns_is_noop() {
        let cleaned = Cleaner::clean(&DataFrame::empty(), &CleaningConfig::default()).unwrap();
        assert_eq!(cleaned.width(), 0);
    }

    #[test]
    fn test_report_contents() {
        let (_, report) =
            Cleaner::clean_with_report(&age_city(), &config(MissingValueStrategy::Mean, true)).unwrap();

        assert_eq!(report.rows_before, 4);
        assert_eq!(report.rows_after, 3);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.total_filled(), 2);

        let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["age", "city"]);
        assert_eq!(report.column("city").unwrap().fill_value.as_deref(), Some("NY"));
        assert_eq!(report.column("age").unwrap().rule, FillRule::Mean);
    }

    #[test]
    fn test_columns_without_gaps_keep_dtype() {
        let df = df![
            "id" => [1i32, 2, 3],
            "x" => [Some(1.0), None, Some(2.0)],
        ]
        .unwrap();

        let cleaned = Cleaner::clean(&df, &CleaningConfig::default()).unwrap();
        assert_eq!(cleaned.column("id").unwrap().dtype(), &DataType::Int32);
    }
}
