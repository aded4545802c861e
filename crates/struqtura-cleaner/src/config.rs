//! Configuration types for the cleaning engine.
//!
//! A [`CleaningConfig`] is immutable per invocation. It can be built with the
//! builder, parsed from loose strings (as a form or a CLI would hand them
//! over), or deserialized from JSON. Every route validates the strategy name
//! and reports an unknown one as [`CleanerError::Configuration`].

use crate::error::{CleanerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for imputing missing values in numeric columns.
///
/// Categorical columns always use the most frequent value, whatever is
/// selected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueStrategy {
    /// Arithmetic mean of the non-null values
    #[default]
    Mean,
    /// Midpoint of the sorted non-null values
    Median,
    /// Most frequent non-null value (first occurrence wins ties)
    MostFrequent,
}

impl MissingValueStrategy {
    /// All recognized strategies, in the order a UI would list them.
    pub const ALL: [MissingValueStrategy; 3] = [
        MissingValueStrategy::Mean,
        MissingValueStrategy::Median,
        MissingValueStrategy::MostFrequent,
    ];

    /// Wire name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingValueStrategy::Mean => "mean",
            MissingValueStrategy::Median => "median",
            MissingValueStrategy::MostFrequent => "most_frequent",
        }
    }
}

impl fmt::Display for MissingValueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingValueStrategy {
    type Err = CleanerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "mean" => Ok(MissingValueStrategy::Mean),
            "median" => Ok(MissingValueStrategy::Median),
            "most_frequent" => Ok(MissingValueStrategy::MostFrequent),
            other => Err(CleanerError::Configuration(format!(
                "unknown missing value strategy '{}' (expected one of: mean, median, most_frequent)",
                other
            ))),
        }
    }
}

/// Configuration for one cleaning invocation.
///
/// Use [`CleaningConfig::builder()`] for a fluent setup.
///
/// # Example
///
/// ```rust,ignore
/// use struqtura_cleaner::config::{CleaningConfig, MissingValueStrategy};
///
/// let config = CleaningConfig::builder()
///     .missing_value_strategy(MissingValueStrategy::Median)
///     .remove_duplicates(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleaningConfig {
    /// Strategy for numeric columns.
    /// Default: Mean
    pub missing_value_strategy: MissingValueStrategy,

    /// Whether to drop rows that repeat an earlier row exactly.
    /// Default: true
    pub remove_duplicates: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            missing_value_strategy: MissingValueStrategy::default(),
            remove_duplicates: true,
        }
    }
}

/// Untyped form of [`CleaningConfig`] as it arrives from JSON.
///
/// The strategy stays a plain string here so an unknown name surfaces as a
/// configuration error rather than a generic deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCleaningConfig {
    #[serde(default = "default_strategy_name")]
    pub missing_value_strategy: String,
    #[serde(default = "default_remove_duplicates")]
    pub remove_duplicates: bool,
}

fn default_strategy_name() -> String {
    MissingValueStrategy::default().as_str().to_string()
}

fn default_remove_duplicates() -> bool {
    true
}

impl TryFrom<RawCleaningConfig> for CleaningConfig {
    type Error = CleanerError;

    fn try_from(raw: RawCleaningConfig) -> Result<Self> {
        CleaningConfig::parse(&raw.missing_value_strategy, raw.remove_duplicates)
    }
}

impl<'de> Deserialize<'de> for CleaningConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawCleaningConfig::deserialize(deserializer)?;
        CleaningConfig::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Build a configuration from a strategy name and the duplicate flag.
    pub fn parse(strategy: &str, remove_duplicates: bool) -> Result<Self> {
        Ok(Self {
            missing_value_strategy: strategy.parse()?,
            remove_duplicates,
        })
    }

    /// Parse a configuration from a JSON document.
    ///
    /// Missing fields take their defaults; an unknown strategy is a
    /// configuration error.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCleaningConfig = serde_json::from_str(json)?;
        CleaningConfig::try_from(raw)
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    missing_value_strategy: Option<MissingValueStrategy>,
    strategy_name: Option<String>,
    remove_duplicates: Option<bool>,
}

impl CleaningConfigBuilder {
    /// Set the numeric imputation strategy.
    pub fn missing_value_strategy(mut self, strategy: MissingValueStrategy) -> Self {
        self.missing_value_strategy = Some(strategy);
        self.strategy_name = None;
        self
    }

    /// Set the numeric imputation strategy by name.
    ///
    /// The name is validated in [`build`](Self::build).
    pub fn strategy_name(mut self, name: impl Into<String>) -> Self {
        self.strategy_name = Some(name.into());
        self.missing_value_strategy = None;
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<CleaningConfig> {
        let missing_value_strategy = match (self.missing_value_strategy, self.strategy_name) {
            (Some(strategy), _) => strategy,
            (None, Some(name)) => name.parse()?,
            (None, None) => MissingValueStrategy::default(),
        };

        Ok(CleaningConfig {
            missing_value_strategy,
            remove_duplicates: self.remove_duplicates.unwrap_or(true),
        })
    }
}

static_assertions::assert_impl_all!(CleaningConfig: Send, Sync);
