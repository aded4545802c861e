//! Imputation module for handling missing values.
//!
//! This module provides the statistical strategies (mean, median, mode) the
//! cleaning engine applies column by column.

mod statistical;

pub use statistical::{Imputation, StatisticalImputer};
