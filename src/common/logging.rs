//! Logging and tracing configuration
//!
//! stdout is reserved for the JSON result, so console logs go to stderr.
//! When a log directory is available the same events are also written to a
//! file through a non-blocking appender.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::paths;

/// Log file name inside the log directory
const LOG_FILE: &str = "qa-harness.log";

/// Initialize tracing for the CLI
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate (DEBUG with `verbose`), WARN for
/// dependencies. The returned guard must be held until exit so buffered
/// file output is flushed.
pub fn init_cli(verbose: bool) -> Option<WorkerGuard> {
    let default_directive = if verbose {
        "qa_harness=debug,warn"
    } else {
        "qa_harness=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let file_writer = paths::log_dir().and_then(|dir| {
        std::fs::create_dir_all(&dir).ok()?;
        let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
        Some(tracing_appender::non_blocking(appender))
    });

    match file_writer {
        Some((writer, guard)) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}
