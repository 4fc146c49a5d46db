//! Configuration, log and session directory locations
//!
//! Uses the directories crate for platform-appropriate locations:
//! - Linux: `~/.config/qa-harness/`, `~/.local/share/qa-harness/`
//! - macOS: `~/Library/Application Support/qa-harness/`
//! - Windows: `%APPDATA%\qa-harness\`

use std::io;
use std::path::PathBuf;

/// Application name used for every directory
const APP_NAME: &str = "qa-harness";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the path to the log directory
pub fn log_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().join("logs"))
}

/// Root under which per-session working directories are created
///
/// Falls back to the system temp dir when no data dir can be determined.
pub fn default_sessions_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("sessions"))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME).join("sessions"))
}

/// Ensure the sessions root exists
pub fn ensure_dir(dir: &std::path::Path) -> io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_dir_is_named_for_app() {
        let dir = default_sessions_dir();
        assert!(dir.ends_with("sessions"));
        assert!(dir.to_string_lossy().contains(APP_NAME));
    }

    #[test]
    fn test_config_path_is_toml() {
        if let Some(path) = config_path() {
            assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        }
    }
}
