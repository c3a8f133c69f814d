//! Template context shared by the markup templates.

use crate::config::ReportConfig;
use crate::sections::{detail_rows, DetailRow, SummarySection};
use av_common::{Summary, TestResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything a markup template may interpolate.
///
/// Built once per run from the summary the orchestrator computed, so the
/// counts shown here always match the ones in the PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderContext {
    /// Report title.
    pub title: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Generator version.
    pub generator_version: String,
    /// CSS class of the configured theme.
    pub theme_class: String,
    /// Aggregate counters.
    pub summary: SummarySection,
    /// One row per record in input order.
    pub tests: Vec<DetailRow>,
}

impl RenderContext {
    /// Build a context from records and their summary.
    pub fn new(results: &[TestResult], summary: &Summary, config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            generated_at: Utc::now(),
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
            theme_class: config.theme.css_class().to_string(),
            summary: SummarySection::from_summary(summary),
            tests: detail_rows(results, &config.placeholder),
        }
    }

    /// Pin the timestamp, for reproducible output.
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Timestamp formatted for the report header.
    pub fn generated_at_display(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_context_from_results() {
        let results = vec![
            TestResult::new("t1", "PASS", "10ms"),
            TestResult::new("t2", "FAIL", "5ms").with_error("boom"),
        ];
        let summary = Summary::from_results(&results);
        let ctx = RenderContext::new(&results, &summary, &ReportConfig::default());

        assert_eq!(ctx.title, "Test Report");
        assert_eq!(ctx.summary.total, 2);
        assert_eq!(ctx.tests.len(), 2);
        assert_eq!(ctx.tests[0].error, "N/A");
        assert_eq!(ctx.tests[1].error, "boom");
    }

    #[test]
    fn test_generated_at_display() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let ctx = RenderContext::new(&[], &Summary::default(), &ReportConfig::default())
            .with_generated_at(at);
        assert_eq!(ctx.generated_at_display(), "2024-03-01 12:30:00 UTC");
    }
}
