//! Error types for report rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while rendering one artifact.
///
/// These are local to a render branch: a failure here never invalidates the
/// summary or the other artifacts.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Template resolution or rendering error.
    #[error("template error: {0}")]
    TemplateError(String),

    /// Chart image could not be produced, encoded or read back.
    #[error("chart render failure for {}: {reason}", path.display())]
    RenderFailure { path: PathBuf, reason: String },

    /// The PDF could not be finalized or written.
    #[error("failed to write document {}: {reason}", path.display())]
    DocumentWriteFailure { path: PathBuf, reason: String },

    /// IO error.
    #[error("IO error writing {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReportError {
    /// Short machine-readable kind, used in run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::TemplateError(_) => "template_error",
            ReportError::RenderFailure { .. } => "render_failure",
            ReportError::DocumentWriteFailure { .. } => "document_write_failure",
            ReportError::IoError { .. } => "io_error",
            ReportError::InvalidConfig(_) => "invalid_config",
        }
    }

    pub(crate) fn render_failure(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ReportError::RenderFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn document_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ReportError::DocumentWriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<askama::Error> for ReportError {
    fn from(err: askama::Error) -> Self {
        ReportError::TemplateError(err.to_string())
    }
}
