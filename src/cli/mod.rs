//! CLI command handling
//!
//! Dispatches CLI commands and formats output. Every command returns the
//! process exit code on success; errors that escape are reported by `main`.

pub mod input;
mod output;

use tracing::warn;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::compile::{compile, render_config, CompileOptions};
use crate::harness::{self, RunOptions};
use crate::report::{aggregate, ExecutionReport, RunOutput};
use crate::scenario::{apply_type_change, ScenarioSet, StepDraft, StepType};

/// Run the harness, stopping the runner if the user interrupts
async fn run_cancellable(
    set: &ScenarioSet,
    base_url: &str,
    session: &str,
    options: &RunOptions,
    config: &Config,
) -> Result<ExecutionReport> {
    tokio::select! {
        result = harness::run_scenarios(set, base_url, session, options, config) => result,
        _ = tokio::signal::ctrl_c() => {
            warn!(session, "interrupted, stopping test runner");
            Err(Error::Cancelled)
        }
    }
}

/// Write the JUnit file; a failure is logged and the printed object stands
fn junit_side_file(path: &std::path::Path, report: &ExecutionReport, suite_name: &str) {
    if let Err(e) = output::write_junit(path, report, suite_name) {
        warn!(path = %path.display(), error = %e, "could not write JUnit report");
    }
}

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config: &Config) -> Result<i32> {
    match command {
        Commands::Run {
            scenario,
            session,
            headed,
            workers,
            timeout_ms,
            keep_session,
            format,
            junit,
        } => {
            let options = RunOptions {
                headed: headed || config.defaults.headed,
                workers: workers.unwrap_or(config.defaults.workers),
                timeout_ms: timeout_ms.or(config.defaults.timeout_ms),
            };
            let mut config = config.clone();
            config.harness.keep_sessions |= keep_session;

            let result = match input::load_scenarios(&scenario) {
                Ok((set, base_url)) => {
                    run_cancellable(&set, &base_url, &session, &options, &config).await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                warn!(session = %session, error = %e, "run did not produce a report");
            }

            let output = RunOutput::from_result(scenario.mode, result);
            output::print_run_output(&output, format)?;
            if let (Some(path), Some(report)) = (&junit, &output.report) {
                junit_side_file(path, report, &session);
            }
            Ok(output.exit_code())
        }

        Commands::Validate { scenario } => match input::load_scenarios(&scenario) {
            Ok((set, base_url)) => {
                output::print_json(&serde_json::json!({
                    "ok": true,
                    "mode": set.mode(),
                    "baseUrl": base_url,
                    "scenarios": set.to_json(),
                }))?;
                Ok(0)
            }
            Err(e) if e.is_validation() => {
                let failed = RunOutput::from_error(scenario.mode, &e);
                output::print_json(&failed)?;
                Ok(failed.exit_code())
            }
            Err(e) => Err(e),
        },

        Commands::Compile {
            scenario,
            timeout_ms,
            runner_config,
        } => {
            if runner_config {
                print!("{}", render_config());
                return Ok(0);
            }
            let (set, base_url) = input::load_scenarios(&scenario)?;
            let options = CompileOptions {
                timeout_ms: timeout_ms.or(config.defaults.timeout_ms),
            };
            let program = compile(&set, &base_url, &options)?;
            print!("{}", program.source);
            Ok(0)
        }

        Commands::Normalize {
            stdout,
            stderr,
            structured,
            exit_code,
            format,
            junit,
        } => {
            let raw = input::load_raw_output(
                stdout.as_deref(),
                stderr.as_deref(),
                structured.as_deref(),
                exit_code,
            )?;
            let report = aggregate(&raw);
            output::print_report(&report, format)?;
            if let Some(path) = &junit {
                junit_side_file(path, &report, "qa-harness");
            }
            Ok(0)
        }

        Commands::Retype { step, to } => {
            let draft: StepDraft = serde_json::from_str(&step)
                .map_err(|e| Error::validation(format!("step is not a valid step draft: {}", e)))?;
            let new_type: StepType = to
                .parse()
                .map_err(|_| Error::validation(format!("unsupported step type '{}'", to)))?;
            output::print_json(&apply_type_change(&draft, new_type))?;
            Ok(0)
        }
    }
}
