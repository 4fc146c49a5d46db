//! JUnit XML rendering for CI systems

use std::fmt::Write;

use crate::normalize::TestStatus;

use super::ExecutionReport;

/// Escape text for XML attributes and content, dropping characters XML 1.0
/// cannot represent
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

fn seconds(ms: u64) -> String {
    format!("{:.3}", ms as f64 / 1000.0)
}

/// Render a report as a single-suite JUnit document
pub fn render(report: &ExecutionReport, suite_name: &str) -> String {
    let errors = report
        .tests
        .iter()
        .filter(|t| matches!(t.status, TestStatus::TimedOut | TestStatus::Interrupted))
        .count();
    let failures = report
        .tests
        .iter()
        .filter(|t| t.status == TestStatus::Failed)
        .count();
    let name = escape(suite_name);
    let time = seconds(report.summary.duration_ms);

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    // Writing into a String cannot fail
    let _ = writeln!(
        xml,
        "<testsuites name=\"{name}\" tests=\"{}\" failures=\"{failures}\" errors=\"{errors}\" skipped=\"{}\" time=\"{time}\">",
        report.summary.total, report.summary.skipped
    );
    let _ = writeln!(
        xml,
        "  <testsuite name=\"{name}\" tests=\"{}\" failures=\"{failures}\" errors=\"{errors}\" skipped=\"{}\" time=\"{time}\">",
        report.summary.total, report.summary.skipped
    );

    if let Some(err) = &report.runner_error {
        let _ = writeln!(xml, "    <system-err>{}</system-err>", escape(err));
    }

    for test in &report.tests {
        let open = format!(
            "    <testcase name=\"{}\" classname=\"{}\" time=\"{}\"",
            escape(&test.name),
            name,
            seconds(test.duration_ms)
        );
        let message = escape(test.error_summary.as_deref().unwrap_or(""));
        let body = escape(test.error.as_deref().unwrap_or(""));

        match test.status {
            TestStatus::Passed | TestStatus::Unknown => {
                let _ = writeln!(xml, "{open}/>");
            }
            TestStatus::Skipped => {
                let _ = writeln!(xml, "{open}>\n      <skipped/>\n    </testcase>");
            }
            TestStatus::Failed => {
                let _ = writeln!(
                    xml,
                    "{open}>\n      <failure message=\"{message}\" type=\"failed\">{body}</failure>\n    </testcase>"
                );
            }
            TestStatus::TimedOut | TestStatus::Interrupted => {
                let kind = test.status.as_str();
                let _ = writeln!(
                    xml,
                    "{open}>\n      <error message=\"{message}\" type=\"{kind}\">{body}</error>\n    </testcase>"
                );
            }
        }
    }

    xml.push_str("  </testsuite>\n</testsuites>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{TestResult, Tier};
    use crate::report::Summary;

    fn report(tests: Vec<TestResult>) -> ExecutionReport {
        ExecutionReport {
            ok: true,
            summary: Summary::from_tests(&tests, 1500),
            tests,
            runner_error: None,
            tier: Tier::StructuredRich,
        }
    }

    #[test]
    fn test_escapes_special_characters() {
        let xml = render(
            &report(vec![TestResult::failed(
                "a < b & \"c\"",
                Some("expected <div> got 'span'\u{1b}[31m".into()),
                Some("x & y".into()),
            )]),
            "ui <suite>",
        );
        assert!(xml.contains("name=\"a &lt; b &amp; &quot;c&quot;\""));
        assert!(xml.contains("message=\"x &amp; y\""));
        assert!(xml.contains("expected &lt;div&gt; got &apos;span&apos;[31m</failure>"));
        assert!(xml.contains("<testsuites name=\"ui &lt;suite&gt;\""));
        assert!(!xml.contains('\u{1b}'));
    }

    #[test]
    fn test_counts_and_elements() {
        let mut timed_out = TestResult::failed("slow", None, Some("Test timeout".into()));
        timed_out.status = TestStatus::TimedOut;
        let mut skipped = TestResult::passed("later");
        skipped.status = TestStatus::Skipped;

        let xml = render(
            &report(vec![
                TestResult::passed("ok").with_duration(250),
                timed_out,
                skipped,
            ]),
            "api",
        );
        assert!(xml.contains("tests=\"3\" failures=\"0\" errors=\"1\" skipped=\"1\" time=\"1.500\""));
        assert!(xml.contains("<testcase name=\"ok\" classname=\"api\" time=\"0.250\"/>"));
        assert!(xml.contains("<error message=\"Test timeout\" type=\"timedOut\"></error>"));
        assert!(xml.contains("<skipped/>"));
        assert!(xml.ends_with("</testsuites>\n"));
    }
}
