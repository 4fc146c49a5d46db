//! Console text tier
//!
//! Scans pytest-style verbose output line by line. Per-test status lines give
//! the result list; `_____ name _____` failure blocks give the detail for
//! failed entries. Checkmark reporters (Jest, Mocha, Jasmine) indent the
//! detail of a failed test under its `✗` line. Output without per-test lines
//! falls back to the final `N passed, M failed` summary line.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::common::first_line;

use super::result::{placeholders, TestResult, TestStatus};

/// Summary used when no failure detail could be attached
pub const GENERIC_SUMMARY: &str = "See output for details";

static QUALIFIED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\w./\\-]+\.py::(?:\w+::)?(\w+(?:\[[^\]]*\])?)\s+((?i:PASSED|FAILED|ERROR))\b")
        .expect("valid regex")
});

static LOOSE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(test_\w+)\s+((?i:PASSED|FAILED|ERROR))\b").expect("valid regex")
});

static CHECKMARK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([✓✔√✗✘×✕])\s+(.+?)(?:\s+\((\d+(?:\.\d+)?)\s*ms\))?\s*$")
        .expect("valid regex")
});

static BLOCK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_{5,}\s+(.+?)\s+_{5,}\s*$").expect("valid regex"));

static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^={5,}").expect("valid regex"));

static PASSED_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s+passed").expect("valid regex"));

static FAILED_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s+failed").expect("valid regex"));

static ELAPSED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bin\s+(\d+(?:\.\d+)?)\s*s\b").expect("valid regex"));

/// Detail collected from one failure block
#[derive(Debug, Clone, PartialEq)]
struct FailureDetail {
    summary: String,
    trace: String,
}

impl FailureDetail {
    fn from_block(lines: &[&str]) -> Self {
        let e_lines: Vec<&str> = lines
            .iter()
            .filter_map(|l| l.strip_prefix("E "))
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let summary = if e_lines.is_empty() {
            let non_empty: Vec<&str> = lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .collect();
            let start = non_empty.len().saturating_sub(2);
            non_empty[start..].join(" ")
        } else {
            e_lines.join("\n")
        };

        Self {
            summary,
            trace: lines.join("\n").trim().to_string(),
        }
    }
}

/// Where the lines of an open failure block belong
enum BlockTarget {
    /// A `_____ name _____` block, closed by a `=====` rule
    Header(String),
    /// Lines indented under the failed checkmark entry at `entry`
    Indented { entry: usize, indent: usize },
}

enum ScanState<'a> {
    Scanning,
    InFailureBlock {
        target: BlockTarget,
        lines: Vec<&'a str>,
    },
}

struct Entry {
    name: String,
    status: TestStatus,
    duration_ms: u64,
    /// Indented detail under a checkmark line
    detail: Option<String>,
}

#[derive(Default)]
struct Scan {
    entries: Vec<Entry>,
    blocks: HashMap<String, FailureDetail>,
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Whether `line` continues the detail of a checkmark entry indented by `indent`
fn is_detail_line(line: &str, indent: usize) -> bool {
    !line.trim().is_empty() && indent_of(line) > indent && !CHECKMARK_LINE.is_match(line)
}

impl Scan {
    fn close(&mut self, state: ScanState<'_>) {
        let ScanState::InFailureBlock { target, lines } = state else {
            return;
        };
        match target {
            BlockTarget::Header(name) => {
                self.blocks
                    .entry(name)
                    .or_insert_with(|| FailureDetail::from_block(&lines));
            }
            BlockTarget::Indented { entry, .. } => {
                let detail: Vec<&str> = lines.iter().map(|l| l.trim()).collect();
                if let Some(entry) = self.entries.get_mut(entry) {
                    entry.detail = (!detail.is_empty()).then(|| detail.join("\n"));
                }
            }
        }
    }

    /// Record a per-test line; a failed checkmark opens an indented block
    fn status_line<'a>(&mut self, line: &'a str) -> ScanState<'a> {
        let caps = QUALIFIED_LINE
            .captures(line)
            .or_else(|| LOOSE_LINE.captures(line));
        if let Some(caps) = caps {
            self.push(caps[1].to_string(), TestStatus::parse(&caps[2]), 0);
            return ScanState::Scanning;
        }

        let Some(caps) = CHECKMARK_LINE.captures(line) else {
            return ScanState::Scanning;
        };
        let status = match &caps[1] {
            "✓" | "✔" | "√" => TestStatus::Passed,
            _ => TestStatus::Failed,
        };
        let duration = caps
            .get(3)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .map(|ms| ms.round() as u64)
            .unwrap_or(0);
        self.push(caps[2].trim().to_string(), status, duration);

        if status.is_failure() {
            ScanState::InFailureBlock {
                target: BlockTarget::Indented {
                    entry: self.entries.len() - 1,
                    indent: indent_of(line),
                },
                lines: Vec::new(),
            }
        } else {
            ScanState::Scanning
        }
    }

    fn push(&mut self, name: String, status: TestStatus, duration_ms: u64) {
        self.entries.push(Entry {
            name,
            status,
            duration_ms,
            detail: None,
        });
    }

    /// Block for a test name: exact header, or a `Class.name` header
    fn detail_for(&self, name: &str) -> Option<&FailureDetail> {
        self.blocks.get(name).or_else(|| {
            let suffix = format!(".{}", name);
            self.blocks
                .iter()
                .find(|(header, _)| header.ends_with(&suffix))
                .map(|(_, detail)| detail)
        })
    }

    fn result(&self, entry: &Entry) -> TestResult {
        let result = if entry.status.is_failure() {
            match (&entry.detail, self.detail_for(&entry.name)) {
                (Some(detail), _) => TestResult::failed(
                    entry.name.as_str(),
                    Some(detail.clone()),
                    first_line(detail).map(str::to_string),
                ),
                (None, Some(block)) => TestResult::failed(
                    entry.name.as_str(),
                    (!block.trace.is_empty()).then(|| block.trace.clone()),
                    Some(block.summary.clone()),
                ),
                (None, None) => TestResult::failed(
                    entry.name.as_str(),
                    None,
                    Some(GENERIC_SUMMARY.to_string()),
                ),
            }
        } else {
            TestResult::passed(entry.name.as_str())
        };
        result.with_duration(entry.duration_ms)
    }
}

fn scan(text: &str) -> Scan {
    let mut out = Scan::default();
    let mut state = ScanState::Scanning;

    for line in text.lines() {
        if let Some(caps) = BLOCK_HEADER.captures(line) {
            let previous = std::mem::replace(
                &mut state,
                ScanState::InFailureBlock {
                    target: BlockTarget::Header(caps[1].to_string()),
                    lines: Vec::new(),
                },
            );
            out.close(previous);
            continue;
        }

        state = match state {
            ScanState::Scanning => out.status_line(line),
            ScanState::InFailureBlock {
                target: BlockTarget::Header(name),
                mut lines,
            } => {
                let target = BlockTarget::Header(name);
                if BLOCK_END.is_match(line) {
                    out.close(ScanState::InFailureBlock { target, lines });
                    ScanState::Scanning
                } else {
                    lines.push(line);
                    ScanState::InFailureBlock { target, lines }
                }
            }
            ScanState::InFailureBlock {
                target: BlockTarget::Indented { entry, indent },
                mut lines,
            } => {
                let target = BlockTarget::Indented { entry, indent };
                if is_detail_line(line, indent) {
                    lines.push(line);
                    ScanState::InFailureBlock { target, lines }
                } else {
                    out.close(ScanState::InFailureBlock { target, lines });
                    out.status_line(line)
                }
            }
        };
    }
    out.close(state);
    out
}

/// Tier 3: per-test lines with failure detail, else the aggregate summary
pub fn console_tests(text: &str) -> Option<Vec<TestResult>> {
    let scan = scan(text);
    if scan.entries.is_empty() {
        return aggregate_tests(text);
    }
    Some(scan.entries.iter().map(|entry| scan.result(entry)).collect())
}

/// Placeholder results from the last `N passed` / `M failed` summary line
fn aggregate_tests(text: &str) -> Option<Vec<TestResult>> {
    let line = text
        .lines()
        .rev()
        .find(|l| PASSED_COUNT.is_match(l) || FAILED_COUNT.is_match(l))?;

    fn count(re: &Regex, line: &str) -> u64 {
        re.captures(line)
            .and_then(|c| c[1].parse::<u64>().ok())
            .unwrap_or(0)
    }
    let passed = count(&PASSED_COUNT, line);
    let failed = count(&FAILED_COUNT, line);
    if passed == 0 && failed == 0 {
        return None;
    }

    let full_output = text.trim().to_string();
    let mut tests = placeholders("test_case_", 1, passed, |name| TestResult::passed(name));
    tests.extend(placeholders(
        "test_case_",
        passed.saturating_add(1),
        failed,
        |name| {
            TestResult::failed(
                name,
                Some(full_output.clone()),
                Some(GENERIC_SUMMARY.to_string()),
            )
        },
    ));
    Some(tests)
}

/// Run duration from the last `in <secs>s` pattern, in milliseconds
pub fn text_duration_ms(text: &str) -> Option<u64> {
    ELAPSED
        .captures_iter(text)
        .last()
        .and_then(|c| c[1].parse::<f64>().ok())
        .map(|secs| (secs * 1000.0).round() as u64)
}
