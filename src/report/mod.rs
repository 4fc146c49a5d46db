//! Report aggregation
//!
//! Folds normalized results into an [`ExecutionReport`] and wraps every
//! invocation outcome, successful or not, into one [`RunOutput`] object.

pub mod junit;

use serde::{Deserialize, Serialize};

use crate::common::Error;
use crate::normalize::{self, console, structured, RawOutput, TestResult, TestStatus, Tier};
use crate::scenario::Mode;

/// Counts over a result list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    /// Failed, timed out and interrupted tests
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
}

impl Summary {
    pub fn from_tests(tests: &[TestResult], duration_ms: u64) -> Self {
        Self {
            total: tests.len(),
            passed: count(tests, |s| s == TestStatus::Passed),
            failed: count(tests, |s| s.is_failure()),
            skipped: count(tests, |s| s == TestStatus::Skipped),
            duration_ms,
        }
    }
}

fn count(tests: &[TestResult], pred: impl Fn(TestStatus) -> bool) -> usize {
    tests.iter().filter(|t| pred(t.status)).count()
}

/// Canonical report for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    /// True whenever a report could be assembled, regardless of test outcomes
    pub ok: bool,
    pub summary: Summary,
    pub tests: Vec<TestResult>,
    /// Informational runner-level error, such as a test file that failed to load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner_error: Option<String>,
    pub tier: Tier,
}

impl ExecutionReport {
    /// Whether any test failed
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }
}

/// Normalize raw output and aggregate it into a report
pub fn aggregate(raw: &RawOutput) -> ExecutionReport {
    let normalized = normalize::normalize(raw);

    let duration_ms = raw
        .structured
        .as_ref()
        .and_then(structured::duration_ms)
        .or_else(|| console::text_duration_ms(&raw.combined_text()))
        .unwrap_or_else(|| normalized.tests.iter().map(|t| t.duration_ms).sum());

    let runner_error = raw.structured.as_ref().and_then(structured::runner_error);

    ExecutionReport {
        ok: true,
        summary: Summary::from_tests(&normalized.tests, duration_ms),
        tests: normalized.tests,
        runner_error,
        tier: normalized.tier,
    }
}

/// The single object printed per invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutput {
    pub ok: bool,
    pub mode: Mode,
    pub report: Option<ExecutionReport>,
    pub runner_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl RunOutput {
    pub fn from_result(mode: Mode, result: crate::common::Result<ExecutionReport>) -> Self {
        match result {
            Ok(report) => Self {
                ok: report.ok,
                mode,
                report: Some(report),
                runner_error: None,
                validation_error: None,
            },
            Err(e) => Self::from_error(mode, &e),
        }
    }

    pub fn from_error(mode: Mode, error: &Error) -> Self {
        let message = error.to_string();
        let (runner_error, validation_error) = if error.is_validation() {
            (None, Some(message))
        } else {
            (Some(message), None)
        };
        Self {
            ok: false,
            mode,
            report: None,
            runner_error,
            validation_error,
        }
    }

    /// Non-zero only when the harness left no readable report.
    ///
    /// Validation errors and failing tests are reported in the object and
    /// exit 0.
    pub fn exit_code(&self) -> i32 {
        if self.report.is_none() && self.validation_error.is_none() {
            1
        } else {
            0
        }
    }
}
