//! Result normalization
//!
//! Converts raw runner output into canonical [`TestResult`]s. Four tiers are
//! tried strictly in order and the first one that yields results wins:
//!
//! 1. structured report with per-test entries
//! 2. structured report with counts and failure messages only
//! 3. console text (pytest verbose lines, checkmarks, summary line)
//! 4. the exit code
//!
//! The last tier always produces exactly one result, so [`normalize`] never
//! returns an empty list.

pub mod console;
pub mod fallback;
pub mod result;
pub mod structured;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub use result::{TestResult, TestStatus};

static ANSI_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("valid regex"));

/// Remove terminal color and cursor sequences
pub fn strip_ansi(text: &str) -> String {
    ANSI_SEQUENCE.replace_all(text, "").into_owned()
}

/// What a runner left behind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<Value>,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub exit_code: Option<i32>,
}

impl RawOutput {
    /// stdout followed by stderr, without ANSI sequences
    pub fn combined_text(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => strip_ansi(&self.stdout),
            (true, false) => strip_ansi(&self.stderr),
            (false, false) => strip_ansi(&format!("{}\n{}", self.stdout, self.stderr)),
        }
    }
}

/// Which tier produced the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    StructuredRich,
    StructuredLegacy,
    ConsoleText,
    ExitCode,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::StructuredRich => "structured-rich",
            Tier::StructuredLegacy => "structured-legacy",
            Tier::ConsoleText => "console-text",
            Tier::ExitCode => "exit-code",
        };
        write!(f, "{}", name)
    }
}

/// Normalized results and the tier they came from
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub tier: Tier,
    pub tests: Vec<TestResult>,
}

/// Normalize raw output. Never fails and never returns an empty list.
pub fn normalize(raw: &RawOutput) -> Normalized {
    let (tier, tests) = pick_tier(raw);
    debug!(%tier, tests = tests.len(), "normalized runner output");
    Normalized { tier, tests }
}

fn pick_tier(raw: &RawOutput) -> (Tier, Vec<TestResult>) {
    if let Some(data) = raw.structured.as_ref() {
        if let Some(tests) = structured::rich_tests(data) {
            return (Tier::StructuredRich, tests);
        }
        if let Some(tests) = structured::legacy_tests(data) {
            return (Tier::StructuredLegacy, tests);
        }
    }

    let text = raw.combined_text();
    if let Some(tests) = console::console_tests(&text) {
        return (Tier::ConsoleText, tests);
    }

    (Tier::ExitCode, fallback::exit_code_tests(raw, &text))
}
