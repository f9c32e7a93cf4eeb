//! Staging of UDF source text to disk.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paths::UdfPaths;
use crate::udf::Udf;

/// Writes UDF sources into the language's compiler directory.
#[derive(Debug, Clone)]
pub struct StagingWriter {
    paths: UdfPaths,
}

impl StagingWriter {
    pub fn new(paths: UdfPaths) -> Self {
        Self { paths }
    }

    /// Write a UDF's source to `<compiler_dir>/<staged_stem>.<ext>`.
    ///
    /// The file is created or truncated and parent directories are created
    /// as needed. The returned guard deletes the file when dropped.
    ///
    /// # Errors
    /// Returns an error if the descriptor is invalid or the file cannot be
    /// written.
    pub fn stage(&self, udf: &Udf) -> Result<StagedFile> {
        udf.validate()?;

        let file_name = format!("{}.{}", udf.staged_stem(), udf.language.extension());
        let path = self.paths.staging_path(udf.language, &file_name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, udf.source.as_bytes())?;

        tracing::debug!(
            "Staged {} to {}",
            udf.qualified_name,
            path.display()
        );

        Ok(StagedFile { path })
    }
}

/// A staged source file, removed from disk on drop.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Take ownership of an intermediate file written elsewhere.
    pub(crate) fn adopt(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the staged file for reading.
    pub fn open(&self) -> Result<File> {
        Ok(File::open(&self.path)?)
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to remove {}: {}", self.path.display(), e),
        }
    }
}
