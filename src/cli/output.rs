//! Result printing
//!
//! stdout carries exactly one result per invocation: a JSON document, or a
//! colored summary with `--format text`.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use crate::commands::OutputFormat;
use crate::common::Result;
use crate::normalize::TestStatus;
use crate::report::{junit, ExecutionReport, RunOutput};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_run_output(output: &RunOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Text => {
            if let Some(report) = &output.report {
                print_report_text(report);
            } else if let Some(err) = &output.validation_error {
                println!("{} {}", "Invalid scenario:".red().bold(), err);
            } else if let Some(err) = &output.runner_error {
                println!("{} {}", "Run failed:".red().bold(), err);
            }
            Ok(())
        }
    }
}

pub fn print_report(report: &ExecutionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            print_report_text(report);
            Ok(())
        }
    }
}

fn print_report_text(report: &ExecutionReport) {
    for test in &report.tests {
        let duration = format!("({} ms)", test.duration_ms).dimmed();
        match test.status {
            TestStatus::Passed => println!("  {} {} {}", "✓".green(), test.name, duration),
            TestStatus::Skipped => println!("  {} {} {}", "-".yellow(), test.name, "skipped".dimmed()),
            TestStatus::Unknown => println!("  {} {} {}", "?".yellow(), test.name, duration),
            status => {
                let label = if status == TestStatus::Failed {
                    String::new()
                } else {
                    format!(" [{}]", status.as_str())
                };
                println!("  {} {}{} {}", "✗".red(), test.name, label.red(), duration);
                if let Some(summary) = &test.error_summary {
                    for line in summary.lines() {
                        println!("      {}", line.dimmed());
                    }
                }
            }
        }
    }

    let s = &report.summary;
    let line = format!(
        "{} tests: {} passed, {} failed, {} skipped in {} ms",
        s.total, s.passed, s.failed, s.skipped, s.duration_ms
    );
    println!();
    if report.has_failures() {
        println!("{}", line.red().bold());
    } else {
        println!("{}", line.green().bold());
    }
    if let Some(err) = &report.runner_error {
        println!("{} {}", "Runner reported:".yellow(), err);
    }
}

/// Write a JUnit XML copy of `report`
pub fn write_junit(path: &Path, report: &ExecutionReport, suite_name: &str) -> Result<()> {
    std::fs::write(path, junit::render(report, suite_name))?;
    info!(path = %path.display(), "wrote JUnit report");
    Ok(())
}
