//! Column classification.
//!
//! Every column is either numeric or categorical, decided from its dtype at
//! the moment of cleaning. Integer and floating columns are numeric; anything
//! else (text, booleans, dates, columns the loader could only keep as text,
//! all-null columns without a numeric dtype) is categorical.

use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of a column for imputation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Columns of a table split by kind, each list in original column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPartition {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnPartition {
    /// Kind of the named column, if it is part of the partition.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        if self.numeric.iter().any(|c| c == name) {
            Some(ColumnKind::Numeric)
        } else if self.categorical.iter().any(|c| c == name) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    /// Total number of classified columns.
    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify a single column by its dtype.
pub fn classify_column(column: &Column) -> ColumnKind {
    if is_numeric_dtype(column.dtype()) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

/// Partition all columns of a table into numeric and categorical names.
pub fn partition_columns(df: &DataFrame) -> ColumnPartition {
    let mut partition = ColumnPartition::default();

    for column in df.get_columns() {
        let name = column.name().to_string();
        match classify_column(column) {
            ColumnKind::Numeric => partition.numeric.push(name),
            ColumnKind::Categorical => partition.categorical.push(name),
        }
    }

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partition_mixed_table() {
        let df = df![
            "age" => [Some(25i64), None, Some(35)],
            "city" => [Some("NY"), Some("LA"), None],
            "score" => [1.5, 2.5, 3.5],
            "active" => [true, false, true],
        ]
        .unwrap();

        let partition = partition_columns(&df);

        assert_eq!(partition.numeric, vec!["age".to_string(), "score".to_string()]);
        assert_eq!(
            partition.categorical,
            vec!["city".to_string(), "active".to_string()]
        );
        assert_eq!(partition.kind_of("score"), Some(ColumnKind::Numeric));
        assert_eq!(partition.kind_of("active"), Some(ColumnKind::Categorical));
        assert_eq!(partition.kind_of("missing"), None);
    }

    #[test]
    fn test_numeric_text_column_is_categorical() {
        // Mixed content that the loader kept as text stays categorical
        let df = df!["mixed" => ["1", "two", "3"]].unwrap();
        let partition = partition_columns(&df);
        assert!(partition.numeric.is_empty());
        assert_eq!(partition.categorical, vec!["mixed".to_string()]);
    }

    #[test]
    fn test_null_dtype_column_is_categorical() {
        let column = Column::full_null("empty".into(), 3, &DataType::Null);
        assert_eq!(classify_column(&column), ColumnKind::Categorical);
    }

    #[test]
    fn test_partition_empty_table() {
        let partition = partition_columns(&DataFrame::empty());
        assert!(partition.is_empty());
    }
}
