//! Canonical per-test result model

use serde::{Deserialize, Serialize};

/// Largest count expanded into one placeholder result per test
pub const PLACEHOLDER_LIMIT: u64 = 1000;

/// Outcome of one test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    TimedOut,
    Interrupted,
    Unknown,
}

impl TestStatus {
    /// Map a runner's status word onto the canonical set
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "passed" | "pass" | "ok" | "success" | "expected" => TestStatus::Passed,
            "failed" | "fail" | "failure" | "error" | "broken" | "unexpected" => {
                TestStatus::Failed
            }
            "skipped" | "skip" | "pending" | "todo" | "disabled" => TestStatus::Skipped,
            "timedout" | "timeout" => TestStatus::TimedOut,
            "interrupted" => TestStatus::Interrupted,
            _ => TestStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::Skipped => "skipped",
            TestStatus::TimedOut => "timedOut",
            TestStatus::Interrupted => "interrupted",
            TestStatus::Unknown => "unknown",
        }
    }

    /// Statuses counted as failures in summaries
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            TestStatus::Failed | TestStatus::TimedOut | TestStatus::Interrupted
        )
    }
}

/// One normalized test outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    /// Full trace
    pub error: Option<String>,
    /// Human-readable headline
    pub error_summary: Option<String>,
}

impl TestResult {
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration_ms: 0,
            error: None,
            error_summary: None,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        error: Option<String>,
        error_summary: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration_ms: 0,
            error,
            error_summary,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Numbered placeholders `<prefix><first>..` for tests known only by count.
///
/// Counts above [`PLACEHOLDER_LIMIT`] collapse into a single entry whose
/// name carries the range and the count.
pub fn placeholders(
    prefix: &str,
    first: u64,
    count: u64,
    make: impl Fn(String) -> TestResult,
) -> Vec<TestResult> {
    if count == 0 {
        return Vec::new();
    }
    if count > PLACEHOLDER_LIMIT {
        let last = first.saturating_add(count - 1);
        return vec![make(format!(
            "{prefix}{first}..{prefix}{last} ({count} tests)"
        ))];
    }
    (first..first.saturating_add(count))
        .map(|i| make(format!("{prefix}{i}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_words() {
        assert_eq!(TestStatus::parse("PASSED"), TestStatus::Passed);
        assert_eq!(TestStatus::parse("error"), TestStatus::Failed);
        assert_eq!(TestStatus::parse("timedOut"), TestStatus::TimedOut);
        assert_eq!(TestStatus::parse("pending"), TestStatus::Skipped);
        assert_eq!(TestStatus::parse("flaky?"), TestStatus::Unknown);
    }

    #[test]
    fn test_status_serializes_camel_case() {
        assert_eq!(
            serde_json::to_value(TestStatus::TimedOut).unwrap(),
            serde_json::json!("timedOut")
        );
    }

    #[test]
    fn test_placeholders_collapse_huge_counts() {
        let few = placeholders("test_case_", 3, 2, |n| TestResult::passed(n));
        let names: Vec<&str> = few.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["test_case_3", "test_case_4"]);

        let huge = placeholders("Test_", 1, 100_000_000_000, |n| TestResult::passed(n));
        assert_eq!(huge.len(), 1);
        assert_eq!(huge[0].name, "Test_1..Test_100000000000 (100000000000 tests)");

        let edge = placeholders("t", u64::MAX, u64::MAX, |n| TestResult::passed(n));
        assert_eq!(edge.len(), 1);
        assert!(placeholders("t", 1, 0, |n| TestResult::passed(n)).is_empty());
    }

    #[test]
    fn test_failure_classes() {
        assert!(TestStatus::Interrupted.is_failure());
        assert!(!TestStatus::Skipped.is_failure());
        assert!(!TestStatus::Unknown.is_failure());
    }
}
