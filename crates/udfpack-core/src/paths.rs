//! UDF directory layout.
//!
//! Derives every staging and package location from the work directory,
//! ensuring the same paths are used by compile and package calls.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::udf::{FunctionLanguage, JobId};

/// Archive name for packaged Python functions.
pub const PYTHON_ARCHIVE_NAME: &str = "python-udf.zip";

/// Directory under `udf/` holding per-language compiler state.
pub const COMPILER_DIR: &str = "compiler";

/// Directory structure for UDF artifacts.
///
/// ```text
/// <work_dir>/
/// └── udf/
///     ├── compiler/
///     │   └── <language>/   # Staged sources and transient archives
///     └── <job_id>/
///         └── package/      # Persistent job archives
/// ```
///
/// Path derivation is pure; nothing here touches disk except
/// [`UdfPaths::clean_job`].
#[derive(Debug, Clone)]
pub struct UdfPaths {
    /// The `udf` directory under the work directory.
    udf_dir: PathBuf,
}

impl UdfPaths {
    /// Create the layout rooted at `work_dir`.
    ///
    /// Relative work directories are resolved against the current
    /// directory so every derived path is absolute.
    pub fn new(work_dir: &Path) -> Self {
        let work_dir = std::path::absolute(work_dir).unwrap_or_else(|_| work_dir.to_path_buf());
        Self {
            udf_dir: work_dir.join("udf"),
        }
    }

    /// Working directory for one language's compiler.
    pub fn compiler_dir(&self, language: FunctionLanguage) -> PathBuf {
        self.udf_dir.join(COMPILER_DIR).join(language.dir_name())
    }

    /// Location of a staged file for `language`.
    pub fn staging_path(&self, language: FunctionLanguage, file_name: &str) -> PathBuf {
        self.compiler_dir(language).join(file_name)
    }

    /// Package directory for one job.
    pub fn package_dir(&self, job_id: &JobId) -> PathBuf {
        self.udf_dir.join(job_id.as_str()).join("package")
    }

    /// Location of a job's package archive.
    pub fn package_path(&self, job_id: &JobId, archive_name: &str) -> PathBuf {
        self.package_dir(job_id).join(archive_name)
    }

    /// Remove everything packaged for a job.
    ///
    /// # Errors
    /// Refuses any id that does not name a single job directory directly
    /// under the udf directory.
    pub fn clean_job(&self, job_id: &JobId) -> Result<()> {
        let mut components = Path::new(job_id.as_str()).components();
        let is_job_dir = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(name)), None) if name != COMPILER_DIR
        );
        if !is_job_dir {
            return Err(Error::InvalidJobId(format!(
                "'{}' does not name a job directory",
                job_id
            )));
        }

        let job_dir = self.udf_dir.join(job_id.as_str());
        if job_dir.exists() {
            fs::remove_dir_all(&job_dir)?;
        }
        Ok(())
    }
}
