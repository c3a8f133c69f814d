//! Summary section data.

use av_common::{Outcome, Summary};
use serde::{Deserialize, Serialize};

/// One stat card in the summary section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCard {
    /// Card label, e.g. "Passed".
    pub label: String,
    /// Count rendered as text.
    pub value: String,
    /// Share of the total, e.g. "50.0%". Empty for the total card.
    pub share: String,
    /// CSS class selecting the card accent.
    pub css_class: String,
}

/// Summary section: the four counters, ready for interpolation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySection {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Cards in Total/Passed/Failed/Skipped order.
    pub cards: Vec<StatCard>,
}

impl SummarySection {
    /// Build the section from an already computed summary.
    pub fn from_summary(summary: &Summary) -> Self {
        let mut cards = Vec::with_capacity(4);
        cards.push(StatCard {
            label: "Total Tests".to_string(),
            value: summary.total.to_string(),
            share: String::new(),
            css_class: "total".to_string(),
        });
        for (outcome, count) in summary.counts() {
            let share = match outcome {
                Outcome::Passed => summary.pass_rate_pct(),
                Outcome::Failed => summary.fail_rate_pct(),
                Outcome::Skipped => summary.skip_rate_pct(),
            };
            cards.push(StatCard {
                label: outcome.label().to_string(),
                value: count.to_string(),
                share: format!("{share:.1}%"),
                css_class: outcome_class(outcome).to_string(),
            });
        }

        Self {
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            skipped: summary.skipped,
            cards,
        }
    }
}

/// CSS class for an outcome.
pub fn outcome_class(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Passed => "passed",
        Outcome::Failed => "failed",
        Outcome::Skipped => "skipped",
    }
}
