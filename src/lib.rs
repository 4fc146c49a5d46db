//! qa-harness - declarative API and UI checks compiled to Playwright
//!
//! This library validates declarative scenarios, compiles them into a
//! Playwright test program, runs that program in a session-scoped directory
//! and normalizes heterogeneous runner output into one report model.

pub mod cli;
pub mod commands;
pub mod common;
pub mod compile;
pub mod harness;
pub mod normalize;
pub mod report;
pub mod scenario;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use harness::{run_scenarios, ExecutionSession, RunOptions};
pub use normalize::{normalize, RawOutput, TestResult, TestStatus};
pub use report::{aggregate, ExecutionReport, RunOutput, Summary};
