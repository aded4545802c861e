use crate::classify::ColumnKind;
use crate::config::MissingValueStrategy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-memory table handled by the loader, the engine and the consumers.
pub type Table = polars::prelude::DataFrame;

// ============================================================================
// Cleaning Report Types
// ============================================================================

/// Record of what one cleaning invocation did.
///
/// Built alongside the cleaned table so a host can show the user which
/// columns were filled, with what, and how many duplicate rows went away.
///
/// # Example
///
/// ```rust,ignore
/// use struqtura_cleaner::{Cleaner, CleaningConfig};
///
/// let (cleaned, report) = Cleaner::clean_with_report(&table, &CleaningConfig::default())?;
/// println!("{} -> {} rows", report.rows_before, report.rows_after);
/// for column in &report.columns {
///     println!("{}: filled {} cells", column.name, column.filled);
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Configuration the engine ran with.
    pub strategy: MissingValueStrategy,
    pub remove_duplicates: bool,

    /// Number of rows before cleaning.
    pub rows_before: usize,
    /// Number of rows after cleaning.
    pub rows_after: usize,
    /// Number of rows dropped as duplicates.
    pub duplicates_removed: usize,

    /// Per-column outcome, in table order.
    pub columns: Vec<ColumnReport>,

    /// Audit trail of actions, in the order they happened.
    pub actions: Vec<CleaningAction>,

    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
}

impl CleaningReport {
    /// Create an empty report for the given configuration and input size.
    pub fn new(strategy: MissingValueStrategy, remove_duplicates: bool, rows_before: usize) -> Self {
        Self {
            strategy,
            remove_duplicates,
            rows_before,
            rows_after: rows_before,
            duplicates_removed: 0,
            columns: Vec::new(),
            actions: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Add an action to the report.
    pub fn add_action(&mut self, action: CleaningAction) {
        self.actions.push(action);
    }

    /// Total number of cells filled across all columns.
    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.filled).sum()
    }

    /// Columns that still contain nulls because nothing could be computed.
    pub fn skipped_columns(&self) -> impl Iterator<Item = &ColumnReport> {
        self.columns
            .iter()
            .filter(|c| c.rule == FillRule::SkippedAllMissing)
    }

    /// Look up the report for a column.
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// What happened to one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnReport {
    pub name: String,
    pub kind: ColumnKind,
    /// Null count before imputation.
    pub missing_before: usize,
    /// Null count after imputation (before deduplication).
    pub missing_after: usize,
    /// Number of cells that were filled.
    pub filled: usize,
    /// Rule applied to the column.
    pub rule: FillRule,
    /// Text rendering of the fill value, if one was used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<String>,
}

/// Rule the engine applied to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    Mean,
    Median,
    MostFrequent,
    /// The column had no missing values.
    Untouched,
    /// The column had no non-missing values, so nothing could be computed.
    SkippedAllMissing,
}

impl FillRule {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::MostFrequent => "most frequent",
            Self::Untouched => "untouched",
            Self::SkippedAllMissing => "skipped (all missing)",
        }
    }
}

/// A single action taken during cleaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningAction {
    /// Type of action performed.
    pub action_type: ActionType,
    /// Target of the action (column name or "table").
    pub target: String,
    /// Human-readable description of the action.
    pub description: String,
}

impl CleaningAction {
    pub fn new(action_type: ActionType, target: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
        }
    }
}

/// Types of actions that can be taken during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Columns were split into numeric and categorical.
    ColumnsClassified,
    /// Missing values were imputed.
    ValueImputed,
    /// A column could not be imputed and was left as-is.
    ColumnSkipped,
    /// Duplicate rows were removed.
    DuplicatesRemoved,
}

impl ActionType {
    /// Get a human-readable display name for the action type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ColumnsClassified => "Columns Classified",
            Self::ValueImputed => "Value Imputed",
            Self::ColumnSkipped => "Column Skipped",
            Self::DuplicatesRemoved => "Duplicates Removed",
        }
    }
}

static_assertions::assert_impl_all!(CleaningReport: Send, Sync);
