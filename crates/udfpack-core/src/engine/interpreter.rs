//! Function resolution through a Python interpreter subprocess.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use thiserror::Error;

use super::{EngineConfig, FunctionResolver, PYTHON_CLIENT_EXECUTABLE, PYTHON_FILES};
use crate::error::ResolveError;

/// Imports the module named by the first segment, then walks attributes.
const RESOLVE_SCRIPT: &str = "\
import importlib, sys
parts = sys.argv[1].split('.')
target = importlib.import_module(parts[0])
for attr in parts[1:]:
    target = getattr(target, attr)
if not callable(target):
    raise TypeError(sys.argv[1] + ' is not callable')
";

/// Failure modes of interpreter-backed resolution.
#[derive(Debug, Error)]
pub enum InterpreterError {
    /// A required option was not set on the engine configuration.
    #[error("engine option '{0}' is not set")]
    MissingOption(&'static str),

    /// The interpreter could not be started.
    #[error("failed to start interpreter {}", executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The interpreter ran but could not load the function.
    #[error("{message}")]
    Rejected { message: String },
}

/// Resolves functions by running the configured client interpreter.
///
/// Every comma-separated entry of [`PYTHON_FILES`] is placed on
/// `PYTHONPATH`, which lets the interpreter import straight from zip archives.
#[derive(Debug, Clone, Default)]
pub struct InterpreterResolver;

impl InterpreterResolver {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, qualified_name: &str, config: &EngineConfig) -> Result<(), InterpreterError> {
        let executable = config
            .get(PYTHON_CLIENT_EXECUTABLE)
            .map(PathBuf::from)
            .ok_or(InterpreterError::MissingOption(PYTHON_CLIENT_EXECUTABLE))?;
        let files = config
            .get(PYTHON_FILES)
            .ok_or(InterpreterError::MissingOption(PYTHON_FILES))?;

        let python_path = std::env::join_paths(files.split(',').map(str::trim))
            .map_err(|e| InterpreterError::Rejected {
                message: format!("invalid {}: {}", PYTHON_FILES, e),
            })?;

        tracing::debug!(
            "Resolving {} with {}",
            qualified_name,
            executable.display()
        );

        let output = Command::new(&executable)
            .arg("-c")
            .arg(RESOLVE_SCRIPT)
            .arg(qualified_name)
            .env("PYTHONPATH", python_path)
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .stdin(Stdio::null())
            .output()
            .map_err(|source| InterpreterError::Spawn {
                executable: executable.clone(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(InterpreterError::Rejected {
            message: last_error_line(&stderr)
                .map(str::to_string)
                .unwrap_or_else(|| format!("interpreter exited with {}", output.status)),
        })
    }
}

impl FunctionResolver for InterpreterResolver {
    fn resolve(&self, qualified_name: &str, config: &EngineConfig) -> Result<(), ResolveError> {
        self.run(qualified_name, config).map_err(ResolveError::from)
    }
}

/// Last non-empty line of a traceback, which carries the exception message.
fn last_error_line(stderr: &str) -> Option<&str> {
    stderr.lines().map(str::trim).rfind(|line| !line.is_empty())
}
