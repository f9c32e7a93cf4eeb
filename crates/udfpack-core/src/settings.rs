//! Process-level settings for the UDF pipeline.
//!
//! Settings are passed explicitly into compilers; nothing reads them from
//! global state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding the work directory.
pub const WORK_DIR_ENV: &str = "UDFPACK_WORK_DIR";

/// Environment variable overriding the interpreter executable.
pub const PYTHON_HOME_ENV: &str = "UDFPACK_PYTHON_HOME";

/// Settings shared by every compile and package call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UdfSettings {
    /// Root of the staging and package directories.
    pub work_dir: PathBuf,

    /// Interpreter executable used for both client and server execution.
    pub python_home: PathBuf,
}

impl Default for UdfSettings {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("tmp"),
            python_home: PathBuf::from("python3"),
        }
    }
}

impl UdfSettings {
    /// Build settings from the environment.
    ///
    /// Falls back to the first `python3` (or `python`) on `PATH` when no
    /// interpreter is configured.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let work_dir = std::env::var_os(WORK_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or(defaults.work_dir);

        let python_home = std::env::var_os(PYTHON_HOME_ENV)
            .map(PathBuf::from)
            .or_else(Self::detect_python)
            .unwrap_or(defaults.python_home);

        Self {
            work_dir,
            python_home,
        }
    }

    /// Load settings from a JSON file.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Settings(format!("failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Override the work directory.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    /// Override the interpreter executable.
    pub fn with_python_home(mut self, python_home: impl Into<PathBuf>) -> Self {
        self.python_home = python_home.into();
        self
    }

    fn detect_python() -> Option<PathBuf> {
        which::which("python3")
            .or_else(|_| which::which("python"))
            .ok()
    }
}
