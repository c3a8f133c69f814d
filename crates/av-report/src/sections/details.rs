//! Per-test detail rows.

use super::summary::outcome_class;
use av_common::TestResult;
use serde::{Deserialize, Serialize};

/// One row of the detailed results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub name: String,
    /// Status text as it appeared in the input.
    pub status: String,
    pub duration: String,
    /// Error message, or the placeholder when the record has none.
    pub error: String,
    pub has_error: bool,
    /// CSS class derived from the classified outcome.
    pub css_class: String,
}

impl DetailRow {
    /// Build a row from a record.
    pub fn from_result(result: &TestResult, placeholder: &str) -> Self {
        Self {
            name: result.name.clone(),
            status: result.status.clone(),
            duration: result.duration.clone(),
            error: result.error_or(placeholder).to_string(),
            has_error: result.error.is_some(),
            css_class: outcome_class(result.outcome()).to_string(),
        }
    }
}

/// Build rows for all records, keeping input order.
pub fn detail_rows(results: &[TestResult], placeholder: &str) -> Vec<DetailRow> {
    results
        .iter()
        .map(|r| DetailRow::from_result(r, placeholder))
        .collect()
}
