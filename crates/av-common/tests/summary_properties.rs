//! Property-based tests for summary aggregation invariants.

use av_common::{Outcome, Summary, TestResult};
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("PASS".to_string()),
        Just("pass".to_string()),
        Just("Pass".to_string()),
        Just("FAIL".to_string()),
        Just("fail".to_string()),
        Just("SKIP".to_string()),
        Just("SKIPPED".to_string()),
        Just(String::new()),
        "[a-zA-Z ]{0,8}",
    ]
}

fn record_strategy() -> impl Strategy<Value = TestResult> {
    (
        "[a-z0-9_]{1,12}",
        status_strategy(),
        "[0-9]{1,4}ms",
        prop::option::of(".{0,16}"),
    )
        .prop_map(|(name, status, duration, error)| TestResult {
            name,
            status,
            duration,
            error,
        })
}

/// A record list paired with a permutation of itself.
fn permuted_records() -> impl Strategy<Value = (Vec<TestResult>, Vec<TestResult>)> {
    prop::collection::vec(record_strategy(), 0..64)
        .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn totals_always_balance(records in prop::collection::vec(record_strategy(), 0..64)) {
        let summary = Summary::from_results(&records);
        prop_assert!(summary.is_consistent());
        prop_assert_eq!(summary.total, records.len());
        prop_assert_eq!(summary.passed + summary.failed + summary.skipped, records.len());
    }

    #[test]
    fn aggregation_is_order_independent((records, shuffled) in permuted_records()) {
        prop_assert_eq!(Summary::from_results(&records), Summary::from_results(&shuffled));

        let mut reversed = records.clone();
        reversed.reverse();
        prop_assert_eq!(Summary::from_results(&records), Summary::from_results(&reversed));
    }

    #[test]
    fn counts_match_per_record_classification(
        records in prop::collection::vec(record_strategy(), 0..64),
    ) {
        let summary = Summary::from_results(&records);
        for outcome in Outcome::ALL {
            let expected = records.iter().filter(|r| r.outcome() == outcome).count();
            prop_assert_eq!(summary.count(outcome), expected);
        }
    }

    #[test]
    fn only_exact_pass_or_fail_escape_skipped(status in "[a-zA-Z ]{0,10}") {
        let summary = Summary::from_results(&[TestResult::new("t", status.clone(), "1ms")]);
        let upper = status.to_ascii_uppercase();
        if upper == "PASS" {
            prop_assert_eq!(summary.passed, 1);
        } else if upper == "FAIL" {
            prop_assert_eq!(summary.failed, 1);
        } else {
            prop_assert_eq!(summary.skipped, 1);
        }
    }
}
