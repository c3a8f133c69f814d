//! Exit codes for the av-core CLI.
//!
//! Exit codes communicate the run outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0-4: Run outcomes (some or all artifacts may have failed)
//! - 10-19: User/input errors (recoverable by user action)
//! - 20-29: Internal errors

use av_common::Error as CommonError;

/// Exit codes for av-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Run Outcomes (0-4)
    // ========================================================================
    /// Every requested artifact was written
    Clean = 0,

    /// Some artifacts were written, others failed or were skipped
    PartialFail = 3,

    /// No requested artifact was written
    AllFailed = 4,

    // ========================================================================
    // User / Input Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Configuration file missing or invalid
    ConfigError = 11,

    /// Input dataset not found
    InputNotFound = 12,

    /// Input dataset could not be parsed
    MalformedInput = 13,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Check if this exit code indicates full success.
    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Check if this exit code indicates any error requiring attention.
    pub fn is_error(self) -> bool {
        (self as i32) >= 10
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::PartialFail => "ERR_PARTIAL",
            ExitCode::AllFailed => "ERR_ALL_FAILED",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InputNotFound => "ERR_INPUT_NOT_FOUND",
            ExitCode::MalformedInput => "ERR_MALFORMED_INPUT",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Map a load failure to its exit code.
    pub fn for_load_error(err: &CommonError) -> Self {
        match err {
            CommonError::InputNotFound { .. } => ExitCode::InputNotFound,
            CommonError::MalformedInput { .. } => ExitCode::MalformedInput,
            CommonError::Io { .. } => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
