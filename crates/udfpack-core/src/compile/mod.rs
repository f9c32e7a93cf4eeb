//! Compiler family for user-defined functions.
//!
//! Every language implements [`FunctionCompiler`]:
//! - `compile` validates one function against the engine
//! - `package` bundles a job's functions into one archive
//!
//! # Pipeline
//!
//! ```text
//! Udf ──► StagingWriter ──► <compiler_dir>/<stem>.py ──► zip ──┬──► FunctionResolver (compile)
//!                                                             └──► <job>/package/python-udf.zip (package)
//! ```

mod python;
mod types;

pub use python::PythonCompiler;
pub use types::CompileOutcome;

use std::path::PathBuf;

use crate::engine::EngineConfig;
use crate::error::{Error, Result};
use crate::settings::UdfSettings;
use crate::udf::{FunctionLanguage, JobId, Udf};

/// Validates and packages functions written in one language.
pub trait FunctionCompiler {
    /// Language handled by this compiler.
    fn language(&self) -> FunctionLanguage;

    /// Check that the engine can load `udf`.
    ///
    /// Runtime failures are reported through [`CompileOutcome`].
    ///
    /// # Errors
    /// Returns an error only when `udf` fails its preconditions; nothing is
    /// written to disk in that case.
    fn compile(&self, udf: &Udf, config: &EngineConfig, job_id: &JobId) -> Result<CompileOutcome>;

    /// Package every function of this compiler's language into the job archive.
    ///
    /// Functions in other languages are ignored. Returns no paths when
    /// nothing matches.
    fn package(&self, udfs: &[Udf], job_id: &JobId) -> Result<Vec<PathBuf>>;

    /// Package a single function and record the archive on `udf.package_path`.
    fn package_one(&self, udf: &mut Udf, job_id: &JobId) -> Result<PathBuf>;
}

/// Compiler for `language`, configured from `settings`.
///
/// # Errors
/// Returns [`Error::UnsupportedLanguage`] for languages without a compiler in
/// this crate.
pub fn compiler_for(
    language: FunctionLanguage,
    settings: &UdfSettings,
) -> Result<Box<dyn FunctionCompiler>> {
    match language {
        FunctionLanguage::Python => Ok(Box::new(PythonCompiler::new(settings.clone()))),
        other => Err(Error::UnsupportedLanguage(other)),
    }
}
