//! AtlasView common types, loader and errors.
//!
//! This crate provides the data side of report generation:
//! - Test-result records and their PASS/FAIL/other classification
//! - The result loader for `{ "tests": [...] }` JSON documents
//! - Summary aggregation (a pure fold, computed once per run)
//! - Error types and output format specifications shared with the CLI

pub mod error;
pub mod loader;
pub mod model;
pub mod output;
pub mod summary;

pub use error::{Error, ErrorCategory, ErrorPayload, Result};
pub use loader::{load_results, parse_results};
pub use model::{Outcome, ResultSet, TestResult};
pub use output::OutputFormat;
pub use summary::Summary;
