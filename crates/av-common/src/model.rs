//! Test-result records and their classification.

use crate::summary::Summary;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Outcome bucket a record is counted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed,
    /// Everything that is not an exact PASS or FAIL, including empty and
    /// malformed statuses.
    Skipped,
}

impl Outcome {
    /// All outcomes in report order.
    pub const ALL: [Outcome; 3] = [Outcome::Passed, Outcome::Failed, Outcome::Skipped];

    /// Display label used in charts and tables.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "Passed",
            Outcome::Failed => "Failed",
            Outcome::Skipped => "Skipped",
        }
    }

    /// Classify a raw status string.
    ///
    /// Only a case-insensitive exact match of `PASS` or `FAIL` is recognised.
    /// Whitespace is significant: `" PASS"` is skipped.
    pub fn classify(status: &str) -> Outcome {
        if status.eq_ignore_ascii_case("PASS") {
            Outcome::Passed
        } else if status.eq_ignore_ascii_case("FAIL") {
            Outcome::Failed
        } else {
            Outcome::Skipped
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One test case's reported outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    /// Test name.
    #[serde(deserialize_with = "scalar_text")]
    pub name: String,
    /// Raw status text as it appeared in the input (empty when absent).
    #[serde(default, deserialize_with = "scalar_text")]
    pub status: String,
    /// Duration as text. Never parsed; `"10ms"` and `10` are both kept verbatim.
    #[serde(default, deserialize_with = "scalar_text")]
    pub duration: String,
    /// Failure message, if the record carried one.
    #[serde(
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

impl TestResult {
    /// Create a record without an error message.
    pub fn new(
        name: impl Into<String>,
        status: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            duration: duration.into(),
            error: None,
        }
    }

    /// Attach an error message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Bucket this record is counted into.
    pub fn outcome(&self) -> Outcome {
        Outcome::classify(&self.status)
    }

    /// Error text, or `placeholder` when the record has none.
    pub fn error_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.error.as_deref().unwrap_or(placeholder)
    }

    /// True when the status is neither PASS, FAIL nor a conventional skip word.
    ///
    /// Such records still count as skipped; this only flags them for logging.
    pub fn has_unrecognized_status(&self) -> bool {
        let known_skip = ["SKIP", "SKIPPED"]
            .iter()
            .any(|word| self.status.eq_ignore_ascii_case(word));
        self.outcome() == Outcome::Skipped && !known_skip
    }
}

/// Ordered sequence of records, in input file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    pub tests: Vec<TestResult>,
}

impl ResultSet {
    pub fn new(tests: Vec<TestResult>) -> Self {
        Self { tests }
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestResult> {
        self.tests.iter()
    }

    pub fn as_slice(&self) -> &[TestResult] {
        &self.tests
    }

    /// Aggregate the records into a [`Summary`].
    pub fn summarize(&self) -> Summary {
        Summary::from_results(&self.tests)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a TestResult;
    type IntoIter = std::slice::Iter<'a, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.tests.iter()
    }
}

impl FromIterator<TestResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = TestResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Render a JSON scalar as text. `null` becomes the empty string.
fn value_to_text(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err("expected a scalar, found an array".to_string()),
        Value::Object(_) => Err("expected a scalar, found an object".to_string()),
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_text(value)
        .map(Option::unwrap_or_default)
        .map_err(serde::de::Error::custom)
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_text(value).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_case_insensitive() {
        for status in ["pass", "Pass", "PASS", "pAsS"] {
            assert_eq!(Outcome::classify(status), Outcome::Passed, "{status}");
        }
        for status in ["fail", "Fail", "FAIL"] {
            assert_eq!(Outcome::classify(status), Outcome::Failed, "{status}");
        }
    }

    #[test]
    fn test_classify_folds_everything_else_into_skipped() {
        for status in ["skip", "SKIPPED", "", " PASS", "PASSED", "failed", "error", "✓"] {
            assert_eq!(Outcome::classify(status), Outcome::Skipped, "{status:?}");
        }
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{"name":"t2","status":"FAIL","duration":"5ms","error":"boom"}"#;
        let record: TestResult = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "t2");
        assert_eq!(record.outcome(), Outcome::Failed);
        assert_eq!(record.duration, "5ms");
        assert_eq!(record.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_deserialize_missing_optional_fields() {
        let record: TestResult = serde_json::from_str(r#"{"name":"bare"}"#).unwrap();
        assert_eq!(record.status, "");
        assert_eq!(record.duration, "");
        assert_eq!(record.error, None);
        assert_eq!(record.outcome(), Outcome::Skipped);
    }

    #[test]
    fn test_deserialize_null_and_numeric_fields() {
        let json = r#"{"name":"n","status":null,"duration":12.5,"error":null}"#;
        let record: TestResult = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, "");
        assert_eq!(record.duration, "12.5");
        assert_eq!(record.error, None);
    }

    #[test]
    fn test_deserialize_rejects_structured_status() {
        let json = r#"{"name":"n","status":{"code":"PASS"}}"#;
        assert!(serde_json::from_str::<TestResult>(json).is_err());
    }

    #[test]
    fn test_deserialize_requires_name() {
        let err = serde_json::from_str::<TestResult>(r#"{"status":"PASS"}"#).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_error_placeholder() {
        let ok = TestResult::new("a", "PASS", "1ms");
        assert_eq!(ok.error_or("N/A"), "N/A");
        let bad = TestResult::new("b", "FAIL", "1ms").with_error("boom");
        assert_eq!(bad.error_or("N/A"), "boom");
    }

    #[test]
    fn test_unrecognized_status_flag() {
        assert!(!TestResult::new("a", "PASS", "").has_unrecognized_status());
        assert!(!TestResult::new("a", "skip", "").has_unrecognized_status());
        assert!(!TestResult::new("a", "SKIPPED", "").has_unrecognized_status());
        assert!(TestResult::new("a", "", "").has_unrecognized_status());
        assert!(TestResult::new("a", "flaky", "").has_unrecognized_status());
    }

    #[test]
    fn test_result_set_preserves_order() {
        let set: ResultSet = ["c", "a", "b"]
            .into_iter()
            .map(|n| TestResult::new(n, "PASS", "1ms"))
            .collect();
        let names: Vec<&str> = set.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
