//! Statistical imputation methods.
//!
//! Provides mean, median and mode imputation for a single column.

use crate::utils::{fill_nulls_from_row, fill_numeric_nulls, series_mode};
use polars::prelude::*;

/// A filled column together with the value that was written into its gaps.
#[derive(Debug, Clone)]
pub struct Imputation {
    /// The column with every null replaced.
    pub series: Series,
    /// Text rendering of the fill value.
    pub fill_value: String,
    /// Number of cells that were filled.
    pub filled: usize,
}

/// Statistical imputation methods for filling missing values.
///
/// Each method returns `Ok(None)` when the statistic is undefined because the
/// column has no non-null values. That is a defined no-op, not an error.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric column with the mean of its non-null values.
    pub fn mean_fill(series: &Series) -> PolarsResult<Option<Imputation>> {
        match series.mean() {
            Some(mean_val) => Self::fill_with_value(series, mean_val).map(Some),
            None => Ok(None),
        }
    }

    /// Fill a numeric column with the median of its non-null values.
    pub fn median_fill(series: &Series) -> PolarsResult<Option<Imputation>> {
        match series.median() {
            Some(median_val) => Self::fill_with_value(series, median_val).map(Some),
            None => Ok(None),
        }
    }

    /// Fill a column of any dtype with its most frequent non-null value.
    ///
    /// Among equally frequent values the one that occurs first wins. The
    /// column keeps its dtype.
    pub fn mode_fill(series: &Series) -> PolarsResult<Option<Imputation>> {
        let Some(mode) = series_mode(series)? else {
            return Ok(None);
        };

        let filled = series.null_count();
        let series = fill_nulls_from_row(series, mode.first_index)?;

        Ok(Some(Imputation {
            series,
            fill_value: mode.rendered,
            filled,
        }))
    }

    /// Fill numeric column with a specific value.
    fn fill_with_value(series: &Series, fill_value: f64) -> PolarsResult<Imputation> {
        let filled = series.null_count();
        let series = fill_numeric_nulls(series, fill_value)?;

        Ok(Imputation {
            series,
            fill_value: format_fill(fill_value),
            filled,
        })
    }
}

fn format_fill(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_at(series: &Series, idx: usize) -> f64 {
        series.get(idx).unwrap().try_extract::<f64>().unwrap()
    }

    // ========================================================================
    // median_fill() tests
    // ========================================================================

    #[test]
    fn test_median_fill_basic() {
        let series = Series::new("values".into(), &[Some(1.0), None, Some(3.0), None, Some(5.0)]);

        let result = StatisticalImputer::median_fill(&series).unwrap().unwrap();

        assert_eq!(result.series.null_count(), 0);
        assert_eq!(result.filled, 2);
        // Median of [1, 3, 5] = 3
        assert_eq!(f64_at(&result.series, 1), 3.0);
        assert_eq!(f64_at(&result.series, 3), 3.0);
    }

    #[test]
    fn test_median_fill_even_count_uses_midpoint() {
        let series = Series::new("values".into(), &[Some(4.0), Some(1.0), None, Some(3.0), Some(2.0)]);

        let result = StatisticalImputer::median_fill(&series).unwrap().unwrap();

        // Median of [1, 2, 3, 4] = 2.5
        assert_eq!(f64_at(&result.series, 2), 2.5);
        assert_eq!(result.fill_value, "2.5");
    }

    #[test]
    fn test_median_fill_all_nulls() {
        let series = Series::new("values".into(), &[Option::<f64>::None, None, None]);

        // Should not panic, but no imputation happens since median is None
        assert!(StatisticalImputer::median_fill(&series).unwrap().is_none());
    }

    // ========================================================================
    // mean_fill() tests
    // ========================================================================

    #[test]
    fn test_mean_fill_basic() {
        let series = Series::new("values".into(), &[Some(1.0), None, Some(5.0)]);

        let result = StatisticalImputer::mean_fill(&series).unwrap().unwrap();

        // Mean of [1, 5] = 3
        assert_eq!(result.series.null_count(), 0);
        assert_eq!(f64_at(&result.series, 1), 3.0);
        assert_eq!(result.fill_value, "3.0");
    }

    #[test]
    fn test_mean_fill_preserves_original_values() {
        let series = Series::new("values".into(), &[Some(10i64), None, Some(20)]);

        let result = StatisticalImputer::mean_fill(&series).unwrap().unwrap();

        assert_eq!(f64_at(&result.series, 0), 10.0);
        assert_eq!(f64_at(&result.series, 2), 20.0);
        assert_eq!(f64_at(&result.series, 1), 15.0);
        // Integer input is widened to Float64
        assert!(matches!(result.series.dtype(), DataType::Float64));
    }

    #[test]
    fn test_mean_fill_all_nulls() {
        let series = Series::new("values".into(), &[Option::<f64>::None, None]);
        assert!(StatisticalImputer::mean_fill(&series).unwrap().is_none());
    }

    // ========================================================================
    // mode_fill() tests
    // ========================================================================

    #[test]
    fn test_mode_fill_basic() {
        let series = Series::new(
            "category".into(),
            &[Some("A"), Some("B"), Some("A"), None, Some("A")],
        );

        let result = StatisticalImputer::mode_fill(&series).unwrap().unwrap();

        assert_eq!(result.series.null_count(), 0);
        assert_eq!(result.series.get(3).unwrap(), AnyValue::String("A"));
        assert_eq!(result.fill_value, "A");
        assert_eq!(result.filled, 1);
    }

    #[test]
    fn test_mode_fill_tie_breaking() {
        let series = Series::new("category".into(), &[Some("B"), Some("A"), None, Some("A"), Some("B")]);

        let result = StatisticalImputer::mode_fill(&series).unwrap().unwrap();

        // "B" and "A" both appear twice; "B" occurs first
        assert_eq!(result.series.get(2).unwrap(), AnyValue::String("B"));
    }

    #[test]
    fn test_mode_fill_all_unique() {
        let series = Series::new("category".into(), &[None, Some("C"), Some("B"), Some("A")]);

        let result = StatisticalImputer::mode_fill(&series).unwrap().unwrap();

        // When all unique, the first non-null value wins
        assert_eq!(result.series.get(0).unwrap(), AnyValue::String("C"));
    }

    #[test]
    fn test_mode_fill_numeric_keeps_dtype() {
        let series = Series::new("score".into(), &[Some(2i64), Some(9), None, Some(9)]);

        let result = StatisticalImputer::mode_fill(&series).unwrap().unwrap();

        assert_eq!(result.series.dtype(), &DataType::Int64);
        assert_eq!(result.series.get(2).unwrap(), AnyValue::Int64(9));
    }

    #[test]
    fn test_mode_fill_all_nulls() {
        let series = Series::new("category".into(), &[Option::<&str>::None, None]);
        assert!(StatisticalImputer::mode_fill(&series).unwrap().is_none());
    }
}
