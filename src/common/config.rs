//! Configuration file handling

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::paths::{config_path, default_sessions_dir};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// How the test runner process is launched
    #[serde(default)]
    pub runner: RunnerConfig,

    /// Session directory and process guard settings
    #[serde(default)]
    pub harness: HarnessConfig,

    /// Defaults for per-run flags
    #[serde(default)]
    pub defaults: Defaults,
}

/// Test runner invocation
#[derive(Debug, Deserialize, Clone)]
pub struct RunnerConfig {
    /// Program to execute, resolved on PATH unless it contains a separator
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the harness-supplied flags
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Directory the runner is started in (where `@playwright/test` resolves)
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Extra environment for the runner process
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            working_dir: None,
            env: HashMap::new(),
        }
    }
}

fn default_program() -> String {
    "npx".to_string()
}

fn default_args() -> Vec<String> {
    vec!["playwright".to_string(), "test".to_string()]
}

/// Harness settings
#[derive(Debug, Deserialize, Clone)]
pub struct HarnessConfig {
    /// Root for per-session working directories
    #[serde(default)]
    pub sessions_dir: Option<PathBuf>,

    /// Leave session directories on disk after the report is read
    #[serde(default)]
    pub keep_sessions: bool,

    /// Hard limit for the whole runner process, in seconds
    #[serde(default = "default_process_timeout")]
    pub process_timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            sessions_dir: None,
            keep_sessions: false,
            process_timeout_secs: default_process_timeout(),
        }
    }
}

fn default_process_timeout() -> u64 {
    240
}

impl HarnessConfig {
    /// Sessions root, falling back to the platform data dir
    pub fn sessions_root(&self) -> PathBuf {
        self.sessions_dir.clone().unwrap_or_else(default_sessions_dir)
    }
}

/// Default run flags
#[derive(Debug, Deserialize, Clone)]
pub struct Defaults {
    /// Parallel runner workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Per-test timeout passed to the runner, in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Show the browser window
    #[serde(default)]
    pub headed: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            timeout_ms: None,
            headed: false,
        }
    }
}

fn default_workers() -> u32 {
    1
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| super::Error::file_read(path, e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.runner.program.trim().is_empty() {
            return Err(super::Error::Config("runner.program must not be empty".into()));
        }
        if self.harness.process_timeout_secs == 0 {
            return Err(super::Error::Config(
                "harness.process_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
