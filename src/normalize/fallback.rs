//! Exit-code tier, used when nothing else was recognized

use std::sync::LazyLock;

use regex::Regex;

use super::result::TestResult;
use super::RawOutput;

/// Exit code pytest uses for interrupted or broken collection
const COLLECTION_EXIT_CODE: i32 = 2;

static COLLECTION_ERROR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"collected\s+0\s+items\s*/\s*\d+\s+errors?").expect("valid regex")
});

fn output(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Tier 4: always exactly one result
pub fn exit_code_tests(raw: &RawOutput, text: &str) -> Vec<TestResult> {
    if COLLECTION_ERROR.is_match(text) || raw.exit_code == Some(COLLECTION_EXIT_CODE) {
        return vec![TestResult::failed(
            "collection_error",
            output(text),
            Some("Test collection failed".to_string()),
        )];
    }

    let result = match raw.exit_code {
        Some(0) => TestResult::passed("test_execution"),
        Some(code) => TestResult::failed(
            "test_execution",
            output(&raw.stderr).or_else(|| output(&raw.stdout)),
            Some(format!("Runner exited with code {}", code)),
        ),
        None => TestResult::failed(
            "test_execution",
            output(&raw.stderr).or_else(|| output(&raw.stdout)),
            Some("Runner exited without a status code".to_string()),
        ),
    };
    vec![result]
}
