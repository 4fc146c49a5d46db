//! Test runner process invocation

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::common::config::{Config, Defaults};
use crate::common::{Error, Result};
use crate::normalize::RawOutput;

use super::session::ExecutionSession;

/// Env var the Playwright json reporter reads its output path from
pub const REPORT_ENV: &str = "PLAYWRIGHT_JSON_OUTPUT_NAME";

/// Per-run runner options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub headed: bool,
    pub workers: u32,
    /// Per-test timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_defaults(&Defaults::default())
    }
}

impl RunOptions {
    pub fn from_defaults(defaults: &Defaults) -> Self {
        Self {
            headed: defaults.headed,
            workers: defaults.workers,
            timeout_ms: defaults.timeout_ms,
        }
    }

    /// Flags appended after the configured runner args
    pub fn runner_flags(&self, session: &ExecutionSession) -> Vec<String> {
        let mut flags = vec![
            format!("--config={}", session.config_file().display()),
            "--reporter=json".to_string(),
        ];
        if self.headed {
            flags.push("--headed".to_string());
        }
        flags.push(format!("--workers={}", self.workers.max(1)));
        if let Some(ms) = self.timeout_ms {
            flags.push(format!("--timeout={}", ms));
        }
        flags
    }
}

/// Resolve the runner program to an executable path.
///
/// Programs containing a path separator are used as given; bare names are
/// looked up on PATH.
pub fn resolve_program(program: &str) -> Result<PathBuf> {
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        let path = PathBuf::from(program);
        let path = if path.is_relative() {
            std::env::current_dir()?.join(path)
        } else {
            path
        };
        return if path.is_file() {
            Ok(path)
        } else {
            Err(Error::runner_not_found(program))
        };
    }
    which::which(program).map_err(|_| Error::runner_not_found(program))
}

fn read_report(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::report_unreadable(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::report_unreadable(path, e))
}

/// Run the compiled program of `session` and collect its output.
///
/// A non-zero exit is expected when tests fail and is not an error. The
/// report written by the json reporter must exist and parse.
pub async fn execute(
    session: &ExecutionSession,
    options: &RunOptions,
    config: &Config,
) -> Result<RawOutput> {
    let program = resolve_program(&config.runner.program)?;
    let work_dir = config
        .runner
        .working_dir
        .clone()
        .unwrap_or_else(|| session.work_dir().to_path_buf());

    let mut cmd = Command::new(&program);
    cmd.args(&config.runner.args)
        .args(options.runner_flags(session))
        .env(REPORT_ENV, session.report_path())
        .envs(&config.runner.env)
        .current_dir(&work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // The compiled file lives outside the runner's project; let its imports
    // resolve against the project's node_modules
    if let Some(dir) = &config.runner.working_dir {
        if !config.runner.env.contains_key("NODE_PATH") {
            cmd.env("NODE_PATH", dir.join("node_modules"));
        }
    }

    debug!(
        program = %program.display(),
        cwd = %work_dir.display(),
        session = %session.id(),
        "spawning test runner"
    );
    let child = cmd
        .spawn()
        .map_err(|e| Error::RunnerSpawn(format!("{}: {}", program.display(), e)))?;

    let limit = config.harness.process_timeout_secs;
    // Dropping the child on timeout kills it
    let output = match tokio::time::timeout(Duration::from_secs(limit), child.wait_with_output()).await {
        Ok(output) => output?,
        Err(_) => {
            warn!(session = %session.id(), limit, "test runner exceeded process timeout");
            return Err(Error::RunnerTimeout(limit));
        }
    };

    let exit_code = output.status.code();
    info!(session = %session.id(), ?exit_code, "test runner finished");

    let report = read_report(&session.report_path())?;
    Ok(RawOutput {
        structured: Some(report),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code,
    })
}
