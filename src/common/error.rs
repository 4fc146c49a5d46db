//! Error types for the QA harness
//!
//! Errors are grouped by the stage that raises them. Validation errors stop
//! a run before anything executes. Harness errors leave a run without a
//! readable report. Failing tests are never errors.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Scenario Errors ===
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Compilation failed: {0}")]
    Compile(String),

    // === Session Errors ===
    #[error("Invalid session id '{0}'. Use letters, digits, '-', '_' or '.'")]
    InvalidSession(String),

    #[error("Session '{0}' already has a working directory. Session ids must be unique per run")]
    SessionExists(String),

    // === Runner Errors ===
    #[error("Test runner '{program}' not found. Install it or set [runner] program in {hint}")]
    RunnerNotFound { program: String, hint: String },

    #[error("Failed to start test runner: {0}")]
    RunnerSpawn(String),

    #[error("Test runner timed out after {0} seconds and was killed")]
    RunnerTimeout(u64),

    #[error("Run cancelled; the test runner was stopped")]
    Cancelled,

    #[error("Runner report at '{path}' is unreadable: {reason}")]
    ReportUnreadable { path: String, reason: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a runner-not-found error pointing at the config file
    pub fn runner_not_found(program: &str) -> Self {
        let hint = super::paths::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "config.toml".to_string());
        Self::RunnerNotFound {
            program: program.to_string(),
            hint,
        }
    }

    /// Create a report-unreadable error
    pub fn report_unreadable(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::ReportUnreadable {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: impl ToString) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Whether this error was raised before any execution started
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidSession(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classes() {
        assert!(Error::validation("bad").is_validation());
        assert!(Error::InvalidSession("..".into()).is_validation());
        assert!(!Error::RunnerTimeout(5).is_validation());
    }

    #[test]
    fn test_report_unreadable_message() {
        let e = Error::report_unreadable(std::path::Path::new("/tmp/s/report.json"), "missing");
        assert_eq!(
            e.to_string(),
            "Runner report at '/tmp/s/report.json' is unreadable: missing"
        );
    }
}
