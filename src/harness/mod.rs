//! Execution harness
//!
//! Compiles a scenario set into a fresh session directory, runs the test
//! runner there and turns what it left behind into a report. The session
//! directory lives exactly as long as the [`ExecutionSession`] value.

pub mod runner;
pub mod session;

pub use runner::{execute, resolve_program, RunOptions};
pub use session::ExecutionSession;

use tracing::info;

use crate::common::config::Config;
use crate::common::Result;
use crate::compile::{compile, CompileOptions};
use crate::report::{aggregate, ExecutionReport};
use crate::scenario::{validate_base_url, ScenarioSet};

/// Compile, execute and aggregate one scenario set.
///
/// Dropping the returned future kills the runner and removes the session.
pub async fn run_scenarios(
    set: &ScenarioSet,
    base_url: &str,
    session_id: &str,
    options: &RunOptions,
    config: &Config,
) -> Result<ExecutionReport> {
    let base_url = validate_base_url(base_url)?;
    let program = compile(
        set,
        &base_url,
        &CompileOptions {
            timeout_ms: options.timeout_ms,
        },
    )?;

    let session = ExecutionSession::create(
        &config.harness.sessions_root(),
        session_id,
        &program,
        config.harness.keep_sessions,
    )?;
    info!(
        session = %session.id(),
        mode = %set.mode(),
        units = session.units().len(),
        "running scenarios"
    );

    let raw = execute(&session, options, config).await?;
    let report = aggregate(&raw);
    info!(
        session = %session.id(),
        total = report.summary.total,
        passed = report.summary.passed,
        failed = report.summary.failed,
        "run complete"
    );
    Ok(report)
}
