//! Error types for loading test-result datasets.
//!
//! Loader errors are fatal to a report run: without a valid record set no
//! summary can be trusted, so callers abort before any artifact is written.
//!
//! Each error carries a stable numeric code and a category so the CLI can
//! map it onto an exit code and a machine-readable payload:
//! ```json
//! { "code": 11, "category": "input", "message": "input file not found: results.json" }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for AtlasView loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The input dataset is missing or unusable.
    Input,
    /// File I/O errors unrelated to the dataset shape.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the result loader.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not resolve to a file.
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The document could not be parsed, or has no usable `tests` list.
    #[error("malformed input {origin}: {reason}")]
    MalformedInput { origin: String, reason: String },

    /// Reading the input failed for a reason other than absence.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build a `MalformedInput` error.
    pub fn malformed(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedInput {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code.
    ///
    /// - 10-19: input errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::InputNotFound { .. } => 11,
            Error::MalformedInput { .. } => 12,
            Error::Io { .. } => 60,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InputNotFound { .. } | Error::MalformedInput { .. } => ErrorCategory::Input,
            Error::Io { .. } => ErrorCategory::Io,
        }
    }

    /// True when the operator can fix this by pointing at a different file.
    pub fn is_input_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::InputNotFound { .. } => {
                "Check the --input path, or set AV_INPUT to the results file"
            }
            Error::MalformedInput { .. } => {
                "The file must be JSON shaped like {\"tests\": [{\"name\": ..., \"status\": ...}]}"
            }
            Error::Io { .. } => "Check file permissions and retry",
        }
    }
}

/// Structured error payload for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub remediation: String,
}

impl From<&Error> for ErrorPayload {
    fn from(err: &Error) -> Self {
        ErrorPayload {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            remediation: err.remediation().to_string(),
        }
    }
}
