//! Summary aggregation.
//!
//! A [`Summary`] is derived from a record sequence in a single pass and never
//! read from input. `skipped` is the residual `total - passed - failed`, so
//! every status other than PASS/FAIL lands there.

use crate::model::{Outcome, TestResult};
use serde::{Deserialize, Serialize};

/// Aggregate counters over a result set.
///
/// Invariant: `total == passed + failed + skipped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    /// Fold a record sequence into a summary.
    ///
    /// Order-independent: any permutation of `results` yields the same value.
    pub fn from_results(results: &[TestResult]) -> Self {
        let (passed, failed) = results
            .iter()
            .fold((0usize, 0usize), |(passed, failed), record| match record.outcome() {
                Outcome::Passed => (passed + 1, failed),
                Outcome::Failed => (passed, failed + 1),
                Outcome::Skipped => (passed, failed),
            });
        let total = results.len();
        Summary {
            total,
            passed,
            failed,
            skipped: total - passed - failed,
        }
    }

    /// Count for one outcome bucket.
    pub fn count(&self, outcome: Outcome) -> usize {
        match outcome {
            Outcome::Passed => self.passed,
            Outcome::Failed => self.failed,
            Outcome::Skipped => self.skipped,
        }
    }

    /// Per-outcome counts in Passed/Failed/Skipped order.
    pub fn counts(&self) -> [(Outcome, usize); 3] {
        Outcome::ALL.map(|outcome| (outcome, self.count(outcome)))
    }

    /// Check the `total == passed + failed + skipped` invariant.
    pub fn is_consistent(&self) -> bool {
        self.passed + self.failed + self.skipped == self.total
    }

    /// No failed records.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    fn pct(&self, n: usize) -> f64 {
        if self.total > 0 {
            100.0 * n as f64 / self.total as f64
        } else {
            0.0
        }
    }

    /// Passed records as a percentage of the total (0 for an empty set).
    pub fn pass_rate_pct(&self) -> f64 {
        self.pct(self.passed)
    }

    pub fn fail_rate_pct(&self) -> f64 {
        self.pct(self.failed)
    }

    pub fn skip_rate_pct(&self) -> f64 {
        self.pct(self.skipped)
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "total={} passed={} failed={} skipped={}",
            self.total, self.passed, self.failed, self.skipped
        )
    }
}
