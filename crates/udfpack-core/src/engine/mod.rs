//! Boundary to the host data-processing engine.
//!
//! The engine is asked to resolve a qualified function name against a
//! configuration that points at the packaged sources. Resolution either
//! succeeds or fails with an error chain whose root cause is reported.

mod config;
mod interpreter;

pub use config::{EngineConfig, PYTHON_CLIENT_EXECUTABLE, PYTHON_EXECUTABLE, PYTHON_FILES};
pub use interpreter::InterpreterResolver;

use crate::error::ResolveError;

/// Resolves a function symbol the way the engine does at job start.
pub trait FunctionResolver {
    /// Load `qualified_name` using the sources and interpreters named in `config`.
    fn resolve(&self, qualified_name: &str, config: &EngineConfig) -> Result<(), ResolveError>;
}

impl<F> FunctionResolver for F
where
    F: Fn(&str, &EngineConfig) -> Result<(), ResolveError>,
{
    fn resolve(&self, qualified_name: &str, config: &EngineConfig) -> Result<(), ResolveError> {
        self(qualified_name, config)
    }
}
