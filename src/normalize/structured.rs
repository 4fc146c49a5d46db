//! Structured report tiers
//!
//! Rich reports carry per-test entries: a flat `tests` array, a Jest
//! `--json` report, a Mocha json reporter report or a Playwright json
//! reporter tree. Legacy reports only carry counts and a list of failure
//! messages.

use serde_json::Value;

use crate::common::first_line;

use super::result::{placeholders, TestResult, TestStatus};
use super::strip_ansi;

fn as_ms(value: &Value) -> Option<u64> {
    value.as_f64().filter(|v| *v >= 0.0).map(|v| v.round() as u64)
}

fn non_empty(text: &str) -> Option<String> {
    let text = strip_ansi(text);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Full error text and headline from a string, an `{message, stack}`
/// object or a list of messages
fn error_parts(value: Option<&Value>) -> (Option<String>, Option<String>) {
    let (trace, headline_source) = match value {
        Some(Value::String(s)) => {
            let trace = non_empty(s);
            (trace.clone(), trace)
        }
        Some(Value::Object(obj)) => {
            let message = obj.get("message").and_then(Value::as_str).and_then(non_empty);
            let stack = obj.get("stack").and_then(Value::as_str).and_then(non_empty);
            (stack.or_else(|| message.clone()), message)
        }
        Some(Value::Array(items)) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => non_empty(s),
                    Value::Object(obj) => obj.get("message").and_then(Value::as_str).and_then(non_empty),
                    _ => None,
                })
                .collect();
            let joined = (!messages.is_empty()).then(|| messages.join("\n"));
            (joined.clone(), joined)
        }
        _ => (None, None),
    };
    let headline = headline_source
        .as_deref()
        .or(trace.as_deref())
        .and_then(first_line)
        .map(str::to_string);
    (trace, headline)
}

/// Name keys of flat entries, in order of preference
const ENTRY_NAME_KEYS: [&str; 3] = ["name", "title", "fullName"];

/// Jest prefixes the describe path in `fullName`
const JEST_NAME_KEYS: [&str; 2] = ["fullName", "title"];

fn array<'a>(data: &'a Value, key: &str) -> &'a [Value] {
    data.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Tier 1: per-test entries
pub fn rich_tests(data: &Value) -> Option<Vec<TestResult>> {
    if let Some(tests) = jest_tests(data).or_else(|| mocha_tests(data)) {
        return Some(tests);
    }

    let entries = array(data, "tests");
    if !entries.is_empty() {
        return Some(
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| rich_entry(i, entry, &ENTRY_NAME_KEYS))
                .collect(),
        );
    }

    let suites = data.get("suites").and_then(Value::as_array)?;
    let mut out = Vec::new();
    for file in suites {
        walk_suite(file, &[], &mut out);
    }
    (!out.is_empty()).then_some(out)
}

fn rich_entry(index: usize, entry: &Value, name_keys: &[&str]) -> TestResult {
    let name = name_keys
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("test_{}", index + 1));

    let status = entry
        .get("status")
        .and_then(Value::as_str)
        .map(TestStatus::parse)
        .unwrap_or(TestStatus::Unknown);

    let duration_ms = entry
        .get("duration")
        .or_else(|| entry.get("durationMs"))
        .and_then(as_ms)
        .unwrap_or(0);

    let error_value = entry
        .get("error")
        .filter(|v| !v.is_null())
        .or_else(|| entry.get("failureMessages"));
    let (error, error_summary) = error_parts(error_value);

    TestResult {
        name,
        status,
        duration_ms,
        error,
        error_summary,
    }
}

/// Jest `--json`: `testResults[]` per file, each with its own `testResults[]`
fn jest_tests(data: &Value) -> Option<Vec<TestResult>> {
    let files = data.get("testResults").and_then(Value::as_array)?;
    let out: Vec<TestResult> = files
        .iter()
        .flat_map(|file| array(file, "testResults"))
        .enumerate()
        .map(|(i, entry)| rich_entry(i, entry, &JEST_NAME_KEYS))
        .collect();
    (!out.is_empty()).then_some(out)
}

/// Mocha json reporter: `passes`, `failures` and `pending` lists of test
/// objects, without a status field
fn mocha_tests(data: &Value) -> Option<Vec<TestResult>> {
    let passes = data.get("passes").and_then(Value::as_array)?;
    let failures = array(data, "failures");
    let pending = array(data, "pending");

    let mut out = Vec::with_capacity(passes.len() + failures.len() + pending.len());
    for (list, status) in [
        (passes.as_slice(), TestStatus::Passed),
        (failures, TestStatus::Failed),
        (pending, TestStatus::Skipped),
    ] {
        for entry in list {
            out.push(mocha_entry(out.len(), entry, status));
        }
    }
    (!out.is_empty()).then_some(out)
}

fn mocha_entry(index: usize, entry: &Value, status: TestStatus) -> TestResult {
    let name = ["fullTitle", "title"]
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("test_{}", index + 1));
    let duration_ms = entry.get("duration").and_then(as_ms).unwrap_or(0);

    let (error, error_summary) = if status.is_failure() {
        let (error, summary) = error_parts(entry.get("err"));
        (error, summary.or_else(|| Some("Test failed".to_string())))
    } else {
        (None, None)
    };

    TestResult {
        name,
        status,
        duration_ms,
        error,
        error_summary,
    }
}

/// Flatten a Playwright json reporter tree; the last retry's result wins.
///
/// Top-level suites stand for files. Names are the nested `describe` titles
/// plus the title of each test entry, joined with ` / `.
fn walk_suite(suite: &Value, path: &[&str], out: &mut Vec<TestResult>) {
    for spec in suite
        .get("specs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        let mut names = path.to_vec();
        names.push(spec.get("title").and_then(Value::as_str).unwrap_or("Test"));
        let title = names.join(" / ");
        let tests = spec
            .get("tests")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for test in tests {
            out.push(playwright_test(&title, test, tests.len() > 1));
        }
    }

    for child in suite
        .get("suites")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
    {
        let mut child_path = path.to_vec();
        if let Some(title) = child.get("title").and_then(Value::as_str).filter(|t| !t.is_empty()) {
            child_path.push(title);
        }
        walk_suite(child, &child_path, out);
    }
}

fn playwright_test(title: &str, test: &Value, qualify_project: bool) -> TestResult {
    let name = match test.get("projectName").and_then(Value::as_str) {
        Some(project) if qualify_project && !project.is_empty() => {
            format!("{} [{}]", title, project)
        }
        _ => title.to_string(),
    };

    let last = test
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.last());

    let status = last
        .and_then(|r| r.get("status"))
        .or_else(|| test.get("status"))
        .and_then(Value::as_str)
        .map(TestStatus::parse)
        .unwrap_or(TestStatus::Unknown);

    let duration_ms = last
        .and_then(|r| r.get("duration"))
        .and_then(as_ms)
        .unwrap_or(0);

    let error_value = last.and_then(|r| {
        r.get("error")
            .filter(|v| !v.is_null())
            .or_else(|| r.get("errors").filter(|e| e.as_array().is_some_and(|a| !a.is_empty())))
    });
    let (error, error_summary) = error_parts(error_value);

    TestResult {
        name,
        status,
        duration_ms,
        error,
        error_summary,
    }
}

/// One legacy failure: a `name: error` message or a `{name, error}` object
fn legacy_failure(index: usize, failure: &Value) -> Option<TestResult> {
    match failure {
        Value::String(message) => {
            let (name, error) = match message.split_once(':') {
                Some((name, rest)) if !rest.trim().is_empty() => (name.trim(), rest.trim()),
                Some((name, _)) => (name.trim(), "Unknown error"),
                None => (message.trim(), "Unknown error"),
            };
            Some(TestResult::failed(
                name,
                Some(error.to_string()),
                first_line(error).map(str::to_string),
            ))
        }
        Value::Object(obj) => {
            let name = ["name", "fullTitle", "title", "test"]
                .iter()
                .find_map(|key| obj.get(*key).and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| format!("Failure_{}", index + 1));
            let error_value = ["error", "err", "message"]
                .iter()
                .find_map(|key| obj.get(*key).filter(|v| !v.is_null()));
            let (error, summary) = error_parts(error_value);
            Some(TestResult::failed(
                name,
                error.or_else(|| Some("Unknown error".to_string())),
                summary.or_else(|| Some("Unknown error".to_string())),
            ))
        }
        _ => None,
    }
}

/// Tier 2: summary counts plus `failures` messages of the form `name: error`
pub fn legacy_tests(data: &Value) -> Option<Vec<TestResult>> {
    let passed = data.get("passed").and_then(Value::as_u64);
    let failed = data.get("failed").and_then(Value::as_u64);
    let failures = data.get("failures").and_then(Value::as_array);
    if passed.is_none() && failures.is_none() {
        return None;
    }

    let mut out: Vec<TestResult> = failures
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .enumerate()
        .filter_map(|(i, failure)| legacy_failure(i, failure))
        .collect();

    let listed = out.len() as u64;
    out.extend(placeholders(
        "Failure_",
        listed + 1,
        failed.unwrap_or(0).saturating_sub(listed),
        |name| {
            TestResult::failed(
                name,
                None,
                Some("Failure reported without details".to_string()),
            )
        },
    ));
    out.extend(placeholders("Test_", 1, passed.unwrap_or(0), |name| {
        TestResult::passed(name)
    }));

    (!out.is_empty()).then_some(out)
}

/// Total run duration recorded in a structured report
pub fn duration_ms(data: &Value) -> Option<u64> {
    data.get("stats")
        .and_then(|stats| stats.get("duration"))
        .or_else(|| data.get("durationMs"))
        .or_else(|| data.get("duration"))
        .and_then(as_ms)
}

/// Top-level runner errors, such as a test file that failed to load
pub fn runner_error(data: &Value) -> Option<String> {
    let errors = data.get("errors").and_then(Value::as_array)?;
    let messages: Vec<String> = errors
        .iter()
        .filter_map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .or_else(|| e.as_str())
                .and_then(non_empty)
        })
        .collect();
    (!messages.is_empty()).then(|| messages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_tests_array() {
        let data = json!({
            "tests": [
                {"name": "adds", "status": "passed", "duration": 12},
                {"title": "subtracts", "status": "failed", "error": "Expected 1\n  at calc.test.js:4"},
                {"fullName": "multiplies", "status": "skipped"}
            ]
        });
        let tests = rich_tests(&data).unwrap();
        assert_eq!(tests.len(), 3);
        assert_eq!(tests[0].duration_ms, 12);
        assert_eq!(tests[1].name, "subtracts");
        assert_eq!(tests[1].error_summary.as_deref(), Some("Expected 1"));
        assert_eq!(
            tests[1].error.as_deref(),
            Some("Expected 1\n  at calc.test.js:4")
        );
        assert_eq!(tests[2].status, TestStatus::Skipped);
        assert_eq!(tests[2].duration_ms, 0);
    }

    #[test]
    fn test_jest_failure_messages() {
        let data = json!({"tests": [{"name": "x", "status": "failed", "failureMessages": ["boom", "again"]}]});
        let tests = rich_tests(&data).unwrap();
        assert_eq!(tests[0].error.as_deref(), Some("boom\nagain"));
        assert_eq!(tests[0].error_summary.as_deref(), Some("boom"));
    }

    fn fixture(name: &str) -> Value {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name);
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_jest_report() {
        let tests = rich_tests(&fixture("jest-report.json")).unwrap();
        assert_eq!(tests.len(), 4);
        assert_eq!(tests[0].name, "Calculator adds numbers");
        assert_eq!(tests[0].duration_ms, 4);

        let failed = &tests[1];
        assert_eq!(failed.status, TestStatus::Failed);
        assert_eq!(
            failed.error_summary.as_deref(),
            Some("Error: expect(received).toThrow()")
        );
        assert!(failed.error.as_deref().unwrap().contains("calc.test.js:14:28"));

        assert_eq!(tests[2].status, TestStatus::Skipped);
        assert_eq!(tests[2].duration_ms, 0);
        assert_eq!(tests[3].name, "pads");
    }

    #[test]
    fn test_mocha_report() {
        let data = fixture("mocha-report.json");
        let tests = rich_tests(&data).unwrap();
        let names: Vec<&str> = tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["calc adds", "calc divides", "calc rounds"]);
        assert_eq!(tests[0].status, TestStatus::Passed);
        assert_eq!(tests[0].duration_ms, 2);

        assert_eq!(tests[1].status, TestStatus::Failed);
        assert_eq!(tests[1].error_summary.as_deref(), Some("expected 2 to equal 3"));
        assert!(tests[1].error.as_deref().unwrap().starts_with("AssertionError"));

        assert_eq!(tests[2].status, TestStatus::Skipped);
        assert_eq!(tests[2].error, None);
        assert_eq!(duration_ms(&data), Some(45));
    }

    #[test]
    fn test_mocha_failure_without_err() {
        let data = json!({"passes": [], "failures": [{"title": "boom", "err": {}}]});
        let tests = rich_tests(&data).unwrap();
        assert_eq!(tests[0].status, TestStatus::Failed);
        assert_eq!(tests[0].error_summary.as_deref(), Some("Test failed"));
    }

    #[test]
    fn test_playwright_tree() {
        let data = json!({
            "suites": [{
                "title": "scenarios.spec.mjs",
                "specs": [
                    {"title": "Login", "tests": [{
                        "projectName": "",
                        "results": [
                            {"status": "failed", "duration": 10},
                            {"status": "passed", "duration": 30}
                        ]
                    }]},
                    {"title": "Checkout", "tests": [{
                        "results": [{
                            "status": "timedOut",
                            "duration": 30000,
                            "error": {
                                "message": "\u{1b}[31mTest timeout of 30000ms exceeded.\u{1b}[39m",
                                "stack": "Error: Test timeout of 30000ms exceeded.\n    at scenarios.spec.mjs:9"
                            }
                        }]
                    }]}
                ],
                "suites": [{"title": "nested", "specs": [
                    {"title": "Nested", "tests": [{"status": "skipped", "results": []}]}
                ]}]
            }],
            "stats": {"duration": 1234.6}
        });
        let tests = rich_tests(&data).unwrap();
        assert_eq!(tests.len(), 3);
        assert_eq!(tests[0].name, "Login");
        assert_eq!(tests[0].status, TestStatus::Passed);
        assert_eq!(tests[0].duration_ms, 30);
        assert_eq!(tests[1].status, TestStatus::TimedOut);
        assert_eq!(
            tests[1].error_summary.as_deref(),
            Some("Test timeout of 30000ms exceeded.")
        );
        assert!(tests[1].error.as_deref().unwrap().contains("scenarios.spec.mjs:9"));
        assert_eq!(tests[2].name, "nested / Nested");
        assert_eq!(tests[2].status, TestStatus::Skipped);
        assert_eq!(duration_ms(&data), Some(1235));
    }

    #[test]
    fn test_empty_structures_fall_through() {
        assert!(rich_tests(&json!({"tests": []})).is_none());
        assert!(rich_tests(&json!({"suites": []})).is_none());
        assert!(legacy_tests(&json!({"tests": []})).is_none());
        assert!(legacy_tests(&json!({"passed": 0, "failures": []})).is_none());
    }

    #[test]
    fn test_legacy_summary() {
        let data = json!({
            "passed": 2,
            "failed": 3,
            "failures": ["testDivide: expected 2 but was 3\n\tat Calc.java:10", "testOverflow"]
        });
        let tests = legacy_tests(&data).unwrap();
        assert_eq!(tests.len(), 5);
        assert_eq!(tests[0].name, "testDivide");
        assert_eq!(tests[0].error_summary.as_deref(), Some("expected 2 but was 3"));
        assert_eq!(tests[1].name, "testOverflow");
        assert_eq!(tests[1].error.as_deref(), Some("Unknown error"));
        assert_eq!(tests[2].name, "Failure_3");
        assert_eq!(tests[3].status, TestStatus::Passed);
        assert_eq!(tests[4].name, "Test_2");
    }

    #[test]
    fn test_legacy_failure_objects() {
        let data = json!({
            "failed": 2,
            "failures": [{"name": "testA", "error": "boom\n  at A.java:3"}, "testB: nope", 7]
        });
        let tests = legacy_tests(&data).unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0].name, "testA");
        assert_eq!(tests[0].error.as_deref(), Some("boom\n  at A.java:3"));
        assert_eq!(tests[0].error_summary.as_deref(), Some("boom"));
        assert_eq!(tests[1].name, "testB");
    }

    #[test]
    fn test_legacy_huge_counts_stay_bounded() {
        let data = json!({"passed": 100_000_000_000u64, "failed": 100_000_000_000u64, "failures": []});
        let tests = legacy_tests(&data).unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0].status, TestStatus::Failed);
        assert_eq!(
            tests[0].name,
            "Failure_1..Failure_100000000000 (100000000000 tests)"
        );
        assert_eq!(tests[1].status, TestStatus::Passed);
    }

    #[test]
    fn test_runner_error_messages() {
        let data = json!({"errors": [{"message": "SyntaxError: Unexpected token"}], "suites": []});
        assert_eq!(
            runner_error(&data).as_deref(),
            Some("SyntaxError: Unexpected token")
        );
        assert!(runner_error(&json!({"errors": []})).is_none());
    }
}
