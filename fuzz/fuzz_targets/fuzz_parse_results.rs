//! Fuzz target for test-result JSON parsing.
//!
//! Parsing must never panic, and every accepted document must aggregate
//! into a summary whose counts add up.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(results) = av_common::parse_results(text, "fuzz") {
        let summary = results.summarize();
        assert_eq!(summary.total, results.len());
        assert!(summary.is_consistent());
    }
});
