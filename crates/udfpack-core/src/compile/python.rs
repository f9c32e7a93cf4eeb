//! Python UDF compiler.
//!
//! Python functions are not compiled ahead of time. Validation packages the
//! source the same way a job would and asks the engine to load the symbol.

use std::fs::{self, File};
use std::path::PathBuf;

use crate::archive::{self, ZipBuilder};
use crate::engine::{
    EngineConfig, FunctionResolver, InterpreterResolver, PYTHON_CLIENT_EXECUTABLE,
    PYTHON_EXECUTABLE, PYTHON_FILES,
};
use crate::error::{Error, Result, root_cause_message};
use crate::paths::{PYTHON_ARCHIVE_NAME, UdfPaths};
use crate::settings::UdfSettings;
use crate::staging::{StagedFile, StagingWriter};
use crate::udf::{FunctionLanguage, JobId, Udf};

use super::{CompileOutcome, FunctionCompiler};

/// Validates and packages Python functions.
pub struct PythonCompiler<R = InterpreterResolver> {
    settings: UdfSettings,
    paths: UdfPaths,
    staging: StagingWriter,
    resolver: R,
}

impl PythonCompiler {
    /// Create a compiler that resolves functions with the configured interpreter.
    pub fn new(settings: UdfSettings) -> Self {
        Self::with_resolver(settings, InterpreterResolver::new())
    }
}

impl<R: FunctionResolver> PythonCompiler<R> {
    /// Create a compiler with a custom engine resolver.
    pub fn with_resolver(settings: UdfSettings, resolver: R) -> Self {
        let paths = UdfPaths::new(&settings.work_dir);
        Self {
            staging: StagingWriter::new(paths.clone()),
            paths,
            settings,
            resolver,
        }
    }

    /// Directory layout used by this compiler.
    pub fn paths(&self) -> &UdfPaths {
        &self.paths
    }

    /// Stage the source and wrap it in a transient single-entry archive.
    ///
    /// The staged source is removed as soon as the archive is written.
    fn build_transient_archive(&self, udf: &Udf) -> Result<StagedFile> {
        let staged = self.staging.stage(udf)?;
        let archive_path = staged.path().with_extension("zip");

        let archive = StagedFile::adopt(archive_path);
        archive::zip_single_file(staged.path(), &udf.archive_entry_name(), archive.path())?;

        Ok(archive)
    }

    /// Overlay the archive and interpreter options onto the caller's config.
    fn engine_config(&self, base: &EngineConfig, archive: &StagedFile) -> EngineConfig {
        let python_home = self.settings.python_home.to_string_lossy().into_owned();

        let mut config = base.overlay();
        config
            .set(PYTHON_FILES, archive.path().to_string_lossy())
            .set(PYTHON_CLIENT_EXECUTABLE, python_home.clone())
            .set(PYTHON_EXECUTABLE, python_home);
        config
    }

    /// Write `udfs` into the job archive, replacing any previous archive.
    fn write_package(&self, udfs: &[&Udf], job_id: &JobId) -> Result<PathBuf> {
        for udf in udfs {
            udf.validate()?;
        }

        let staged = udfs
            .iter()
            .map(|udf| self.staging.stage(udf))
            .collect::<Result<Vec<_>>>()?;

        let entries = udfs
            .iter()
            .zip(&staged)
            .map(|(udf, file)| -> Result<(String, File)> {
                Ok((udf.archive_entry_name(), file.open()?))
            })
            .collect::<Result<Vec<_>>>()?;

        let path = self.paths.package_path(job_id, PYTHON_ARCHIVE_NAME);
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Replacing existing package {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let mut builder = ZipBuilder::create(&path)?;
        let written = builder.add_all(entries)?;
        let path = builder.finish()?;

        tracing::info!(
            "Packaged {} python udf(s) for job {} into {}",
            written,
            job_id,
            path.display()
        );

        Ok(path)
    }
}

impl<R: FunctionResolver> FunctionCompiler for PythonCompiler<R> {
    fn language(&self) -> FunctionLanguage {
        FunctionLanguage::Python
    }

    fn compile(&self, udf: &Udf, config: &EngineConfig, job_id: &JobId) -> Result<CompileOutcome> {
        udf.validate()?;
        if udf.language != FunctionLanguage::Python {
            return Err(Error::InvalidUdf(format!(
                "{} is a {} function, not python",
                udf.qualified_name, udf.language
            )));
        }

        tracing::info!(
            "Compiling python udf {} for job {}",
            udf.qualified_name,
            job_id
        );

        let archive = match self.build_transient_archive(udf) {
            Ok(archive) => archive,
            Err(e) => {
                tracing::error!(
                    "Python udf staging failed; name: {}, reason: {}",
                    udf.qualified_name,
                    e
                );
                return Ok(CompileOutcome::IoFailure {
                    reason: e.to_string(),
                });
            }
        };

        let config = self.engine_config(config, &archive);

        // `archive` is removed on drop whichever way resolution goes.
        match self.resolver.resolve(&udf.qualified_name, &config) {
            Ok(()) => {
                tracing::info!(
                    "Python udf compiled successfully; name: {}",
                    udf.qualified_name
                );
                Ok(CompileOutcome::Success)
            }
            Err(e) => {
                let reason = root_cause_message(e.as_ref());
                tracing::error!(
                    "Python udf compilation failed; name: {}, reason: {}",
                    udf.qualified_name,
                    reason
                );
                Ok(CompileOutcome::RejectedByEngine { reason })
            }
        }
    }

    fn package(&self, udfs: &[Udf], job_id: &JobId) -> Result<Vec<PathBuf>> {
        let python: Vec<&Udf> = udfs
            .iter()
            .filter(|udf| udf.language == FunctionLanguage::Python)
            .collect();

        if python.is_empty() {
            tracing::debug!("No python udfs to package for job {}", job_id);
            return Ok(Vec::new());
        }

        Ok(vec![self.write_package(&python, job_id)?])
    }

    fn package_one(&self, udf: &mut Udf, job_id: &JobId) -> Result<PathBuf> {
        let path = self.write_package(&[&*udf], job_id)?;
        udf.package_path = Some(path.clone());
        Ok(path)
    }
}
