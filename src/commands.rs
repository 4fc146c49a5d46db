//! CLI command definitions
//!
//! Defines the clap commands for the qa-harness CLI.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::scenario::Mode;

/// How results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object on stdout
    #[default]
    Json,
    /// Colored human-readable summary
    Text,
}

/// Where a scenario set comes from
#[derive(Args, Debug, Clone)]
pub struct ScenarioArgs {
    /// Kind of check to run
    #[arg(long, value_enum)]
    pub mode: Mode,

    /// Base URL every path is resolved against
    #[arg(long, alias = "baseUrl")]
    pub base_url: String,

    /// API mode: JSON array of {method, path, body?} objects
    #[arg(long, conflicts_with = "endpoints")]
    pub requests: Option<String>,

    /// API mode: comma-separated list of paths checked with GET
    #[arg(long)]
    pub endpoints: Option<String>,

    /// API mode: JSON object of headers sent with every request
    #[arg(long)]
    pub headers: Option<String>,

    /// UI mode: JSON array of scenarios
    #[arg(long, alias = "uiSpec", conflicts_with = "ui_spec_file")]
    pub ui_spec: Option<String>,

    /// UI mode: scenario file (.json, .yaml or .yml)
    #[arg(long)]
    pub ui_spec_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate, compile and execute a scenario set
    Run {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Session id; names the working directory of this run
        #[arg(long)]
        session: String,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Parallel runner workers
        #[arg(long)]
        workers: Option<u32>,

        /// Per-test timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Keep the session directory after the run
        #[arg(long)]
        keep_session: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Also write a JUnit XML report to this path
        #[arg(long)]
        junit: Option<PathBuf>,
    },

    /// Validate a scenario set and print its normalized form
    Validate {
        #[command(flatten)]
        scenario: ScenarioArgs,
    },

    /// Print the compiled test program for a scenario set
    Compile {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Per-test timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print the runner config instead of the test program
        #[arg(long)]
        runner_config: bool,
    },

    /// Normalize output captured from any test runner
    Normalize {
        /// File with the runner's stdout
        #[arg(long)]
        stdout: Option<PathBuf>,

        /// File with the runner's stderr
        #[arg(long)]
        stderr: Option<PathBuf>,

        /// JSON report written by the runner
        #[arg(long)]
        structured: Option<PathBuf>,

        /// The runner's exit code
        #[arg(long, allow_hyphen_values = true)]
        exit_code: Option<i32>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Also write a JUnit XML report to this path
        #[arg(long)]
        junit: Option<PathBuf>,
    },

    /// Change the type of a UI step, keeping compatible fields
    Retype {
        /// Step as JSON, e.g. '{"type":"click","selector":"#go"}'
        step: String,

        /// New step type, e.g. fill or expectUrlContains
        #[arg(long)]
        to: String,
    },
}
