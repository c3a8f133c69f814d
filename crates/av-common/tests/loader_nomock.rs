//! No-mock loader tests against real files on disk.

use av_common::{load_results, Error, Outcome, Summary};
use std::fs;
use tempfile::tempdir;

#[test]
fn loads_records_in_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test-results.json");
    fs::write(
        &path,
        r#"{"tests":[
            {"name":"zeta","status":"PASS","duration":"10ms"},
            {"name":"alpha","status":"FAIL","duration":"5ms","error":"boom"},
            {"name":"mid","status":"SKIP","duration":"0ms"}
        ]}"#,
    )
    .unwrap();

    let set = load_results(&path).unwrap();
    let names: Vec<&str> = set.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
    assert_eq!(set.tests[2].outcome(), Outcome::Skipped);
}

#[test]
fn missing_file_is_input_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");

    let err = load_results(&path).unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }), "got {err:?}");
    assert!(err.is_input_error());
}

#[test]
fn directory_path_is_not_a_valid_input() {
    let dir = tempdir().unwrap();
    let err = load_results(dir.path()).unwrap_err();
    assert!(!matches!(err, Error::InputNotFound { .. }), "got {err:?}");
}

#[test]
fn non_utf8_file_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binary.json");
    fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

    let err = load_results(&path).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }), "got {err:?}");
}

#[test]
fn truncated_json_is_malformed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truncated.json");
    fs::write(&path, r#"{"tests":[{"name":"a","status":"PA"#).unwrap();

    let err = load_results(&path).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }));
    assert!(err.to_string().contains("truncated.json"));
}

#[test]
fn empty_list_yields_zero_summary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.json");
    fs::write(&path, r#"{"tests":[]}"#).unwrap();

    let set = load_results(&path).unwrap();
    assert_eq!(set.summarize(), Summary::default());
}

#[test]
fn skip_status_is_counted_as_skipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("skip.json");
    fs::write(
        &path,
        r#"{"tests":[{"name":"s","status":"SKIP","duration":"0ms"},{"name":"p","status":"pass","duration":"1ms"}]}"#,
    )
    .unwrap();

    let summary = load_results(&path).unwrap().summarize();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.passed, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 1);
}
