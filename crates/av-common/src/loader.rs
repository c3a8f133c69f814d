//! Result loader.
//!
//! Reads a JSON document shaped like
//! `{ "tests": [ { "name", "status", "duration", "error"? }, ... ] }`
//! into a [`ResultSet`], preserving record order. Only presence checks are
//! made: a `tests` list must exist and every record must be an object with
//! a `name`.

use crate::error::{Error, Result};
use crate::model::{ResultSet, TestResult};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Top-level field holding the record list.
pub const TESTS_FIELD: &str = "tests";

/// Load a result set from a file.
pub fn load_results(path: &Path) -> Result<ResultSet> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::InputNotFound {
                path: path.to_path_buf(),
            }
        } else if source.kind() == std::io::ErrorKind::InvalidData {
            // Not UTF-8: cannot be a JSON document.
            Error::malformed(path.display().to_string(), source.to_string())
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let results = parse_results(&text, &path.display().to_string())?;
    debug!(
        path = %path.display(),
        records = results.len(),
        "Loaded test results"
    );
    Ok(results)
}

/// Parse a result set from in-memory JSON text.
///
/// `origin` names the source in error messages.
pub fn parse_results(text: &str, origin: &str) -> Result<ResultSet> {
    let root: Value = serde_json::from_str(text)
        .map_err(|e| Error::malformed(origin, format!("invalid JSON: {e}")))?;

    let Value::Object(mut root) = root else {
        return Err(Error::malformed(origin, "top-level value must be an object"));
    };

    let tests = match root.remove(TESTS_FIELD) {
        Some(Value::Array(tests)) => tests,
        Some(_) => {
            return Err(Error::malformed(
                origin,
                format!("`{TESTS_FIELD}` field must be a list"),
            ))
        }
        None => {
            return Err(Error::malformed(
                origin,
                format!("missing `{TESTS_FIELD}` field"),
            ))
        }
    };

    tests
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            if !value.is_object() {
                return Err(Error::malformed(
                    origin,
                    format!("record {index} is not an object"),
                ));
            }
            serde_json::from_value::<TestResult>(value)
                .map_err(|e| Error::malformed(origin, format!("record {index}: {e}")))
        })
        .collect::<Result<Vec<_>>>()
        .map(ResultSet::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Outcome;

    #[test]
    fn test_parse_scenario_one() {
        let json = r#"{"tests":[
            {"name":"t1","status":"PASS","duration":"10ms"},
            {"name":"t2","status":"FAIL","duration":"5ms","error":"boom"}
        ]}"#;
        let set = parse_results(json, "inline").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.tests[0].name, "t1");
        assert_eq!(set.tests[0].error, None);
        assert_eq!(set.tests[1].outcome(), Outcome::Failed);
        assert_eq!(set.tests[1].error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_parse_empty_list() {
        let set = parse_results(r#"{"tests":[]}"#, "inline").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let json = r#"{"suite":"x","tests":[{"name":"a","status":"PASS","duration":"1s","tags":["slow"]}]}"#;
        let set = parse_results(json, "inline").unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_missing_tests_field() {
        let err = parse_results(r#"{"results":[]}"#, "inline").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
        assert!(err.to_string().contains("missing `tests`"));
    }

    #[test]
    fn test_tests_not_a_list() {
        let err = parse_results(r#"{"tests":{"name":"a"}}"#, "inline").unwrap_err();
        assert!(err.to_string().contains("must be a list"));
    }

    #[test]
    fn test_invalid_json() {
        let err = parse_results("{not json", "inline").unwrap_err();
        assert!(matches!(err, Error::MalformedInput { .. }));
    }

    #[test]
    fn test_root_not_object() {
        let err = parse_results("[1,2,3]", "inline").unwrap_err();
        assert!(err.to_string().contains("top-level"));
    }

    #[test]
    fn test_record_not_object() {
        let err = parse_results(r#"{"tests":[{"name":"a"}, 42]}"#, "inline").unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_record_without_name() {
        let err = parse_results(r#"{"tests":[{"status":"PASS"}]}"#, "inline").unwrap_err();
        assert!(err.to_string().contains("record 0"));
    }

    #[test]
    fn test_missing_status_is_not_an_error() {
        let set = parse_results(r#"{"tests":[{"name":"a","duration":"1ms"}]}"#, "inline").unwrap();
        assert_eq!(set.tests[0].outcome(), Outcome::Skipped);
    }
}
