//! Custom error types for loading and cleaning tables.
//!
//! This module provides the crate-wide error hierarchy using `thiserror`.
//! Every failure a user can trigger (an unknown upload format, bytes that do
//! not parse, an unrecognized imputation strategy) has its own variant so the
//! host can show a precise message.
//!
//! Errors are serializable as `{code, message}` so they can be handed to a
//! frontend or printed as JSON by the CLI.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaner.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// The loader was asked for a format it does not know.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The bytes claim a format but could not be parsed as it.
    #[error("Failed to parse {format} input: {reason}")]
    Parse { format: String, reason: String },

    /// The cleaning configuration is invalid (e.g. an unknown strategy).
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleanerError>,
    },
}

impl CleanerError {
    /// Build a parse error for the given format.
    pub fn parse(format: impl Into<String>, reason: impl ToString) -> Self {
        CleanerError::Parse {
            format: format.into(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleanerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the user's input rather than a fault
    /// in the cleaner itself.
    pub fn is_user_error(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_) | Self::Parse { .. } | Self::Configuration(_) => true,
            Self::WithContext { source, .. } => source.is_user_error(),
            _ => false,
        }
    }

    /// Check if this error is a configuration error.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Configuration(_) => true,
            Self::WithContext { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleanerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleanerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaner operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleanerError::Polars(e).with_context(context))
    }
}

static_assertions::assert_impl_all!(CleanerError: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            CleanerError::UnsupportedFormat("pdf".to_string()).error_code(),
            "UNSUPPORTED_FORMAT"
        );
        assert_eq!(
            CleanerError::parse("csv", "bad quote").error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(
            CleanerError::Configuration("mode".to_string()).error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let error = CleanerError::parse("xml", "unexpected end of file");
        assert_eq!(
            error.to_string(),
            "Failed to parse xml input: unexpected end of file"
        );
    }

    #[test]
    fn test_is_user_error() {
        assert!(CleanerError::UnsupportedFormat("pdf".to_string()).is_user_error());
        assert!(CleanerError::Configuration("x".to_string()).is_user_error());
        assert!(!CleanerError::ColumnNotFound("x".to_string()).is_user_error());
        assert!(
            CleanerError::Configuration("x".to_string())
                .with_context("While cleaning")
                .is_user_error()
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = CleanerError::Configuration("unknown strategy 'mode'".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("CONFIGURATION_ERROR"));
        assert!(json.contains("mode"));
    }

    #[test]
    fn test_with_context() {
        let error =
            CleanerError::UnsupportedFormat("pdf".to_string()).with_context("Loading upload");
        assert!(error.to_string().contains("Loading upload"));
        assert_eq!(error.error_code(), "UNSUPPORTED_FORMAT"); // Preserves original code
    }
}
