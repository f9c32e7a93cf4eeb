//! Compile command implementation.
//!
//! Validates one function against the engine and reports the outcome.

use std::fs;
use std::path::Path;

use udfpack_core::{CompileOutcome, EngineConfig, FunctionLanguage, JobId, Udf, UdfSettings};

/// Execute the compile command.
pub fn execute(
    settings: &UdfSettings,
    name: &str,
    source_path: &Path,
    language: FunctionLanguage,
    job: &JobId,
) -> anyhow::Result<()> {
    let source = fs::read_to_string(source_path).map_err(|e| {
        anyhow::anyhow!("Failed to read {}: {}", source_path.display(), e)
    })?;

    let compiler = udfpack_core::compiler_for(language, settings)?;
    let udf = Udf::new(name, source, language);

    match compiler.compile(&udf, &EngineConfig::new(), job)? {
        CompileOutcome::Success => {
            println!("Compiled {}", name);
            Ok(())
        }
        CompileOutcome::RejectedByEngine { reason } | CompileOutcome::IoFailure { reason } => {
            anyhow::bail!("compilation failed: {}", reason)
        }
    }
}
