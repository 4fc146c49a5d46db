//! qa-harness - declarative API and UI checks compiled to Playwright
//!
//! Validates a scenario set, compiles it into a Playwright test program, runs
//! it in an isolated session directory and prints one normalized report.

use std::path::PathBuf;

use clap::Parser;
use qa_harness::common::config::Config;
use qa_harness::common::logging;
use qa_harness::{cli, commands::Commands};

#[derive(Parser)]
#[command(name = "qa-harness", about = "Declarative API/UI checks run through Playwright")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let log_guard = logging::init_cli(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    let result = match config {
        Ok(config) => cli::dispatch(cli.command, &config).await,
        Err(e) => Err(e),
    };
    let code = result.unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        1
    });

    // process::exit skips destructors; flush the log file first
    drop(log_guard);
    std::process::exit(code);
}
