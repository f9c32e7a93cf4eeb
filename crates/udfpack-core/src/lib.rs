//! Core pipeline for scripting-language user-defined functions.
//!
//! This crate provides:
//! - Path resolution for staging and per-job package directories
//! - Staging of function sources to disk
//! - Zip packaging of one or many functions per job
//! - Validation of a function against the host engine
//!
//! # Example
//!
//! ```no_run
//! use udfpack_core::{FunctionCompiler, JobId, PythonCompiler, Udf, UdfSettings};
//!
//! let compiler = PythonCompiler::new(UdfSettings::from_env());
//! let mut udf = Udf::python("a.b.Foo", "def foo(): pass");
//! let archive = compiler.package_one(&mut udf, &JobId::from(42))?;
//! assert_eq!(udf.package_path.as_deref(), Some(archive.as_path()));
//! # Ok::<(), udfpack_core::Error>(())
//! ```

pub mod archive;
pub mod compile;
pub mod engine;
pub mod error;
pub mod paths;
pub mod settings;
pub mod staging;
pub mod udf;

pub use compile::{CompileOutcome, FunctionCompiler, PythonCompiler, compiler_for};
pub use engine::{EngineConfig, FunctionResolver, InterpreterResolver};
pub use error::{Error, ResolveError, Result};
pub use paths::{PYTHON_ARCHIVE_NAME, UdfPaths};
pub use settings::UdfSettings;
pub use staging::{StagedFile, StagingWriter};
pub use udf::{FunctionLanguage, JobId, Udf};
