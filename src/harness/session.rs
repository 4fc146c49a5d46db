//! Execution session directories
//!
//! One directory per session id under the sessions root. Creation is
//! exclusive so two concurrent runs can never share a working directory.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::common::paths::ensure_dir;
use crate::common::{Error, Result};
use crate::compile::{render_config, CompiledProgram, CONFIG_FILE, REPORT_FILE, TEST_FILE};
use crate::scenario::validate_session_id;

/// A session-scoped working directory holding one compiled program
#[derive(Debug)]
pub struct ExecutionSession {
    id: String,
    work_dir: PathBuf,
    units: Vec<String>,
    keep: bool,
}

impl ExecutionSession {
    /// Create `<root>/<id>` and write the test program and runner config.
    ///
    /// Fails with [`Error::SessionExists`] if the directory already exists.
    pub fn create(root: &Path, id: &str, program: &CompiledProgram, keep: bool) -> Result<Self> {
        validate_session_id(id)?;
        ensure_dir(root)?;

        let work_dir = root.join(id);
        std::fs::create_dir(&work_dir).map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::SessionExists(id.to_string()),
            _ => Error::Io(e),
        })?;

        // From here on the directory is owned; Drop cleans it up on failure
        let session = Self {
            id: id.to_string(),
            work_dir,
            units: program.units.clone(),
            keep,
        };

        std::fs::write(session.test_file(), &program.source)?;
        std::fs::write(session.config_file(), render_config())?;

        debug!(
            session = %session.id,
            dir = %session.work_dir.display(),
            units = session.units.len(),
            "created execution session"
        );
        Ok(session)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Titles of the compiled test units
    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn test_file(&self) -> PathBuf {
        self.work_dir.join(TEST_FILE)
    }

    pub fn config_file(&self) -> PathBuf {
        self.work_dir.join(CONFIG_FILE)
    }

    /// Where the json reporter is told to write
    pub fn report_path(&self) -> PathBuf {
        self.work_dir.join(REPORT_FILE)
    }
}

impl Drop for ExecutionSession {
    fn drop(&mut self) {
        if self.keep {
            debug!(session = %self.id, dir = %self.work_dir.display(), "keeping session directory");
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.work_dir) {
            warn!(session = %self.id, error = %e, "failed to remove session directory");
        }
    }
}
