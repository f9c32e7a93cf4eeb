//! Error types for udfpack-core.

use thiserror::Error;

use crate::udf::FunctionLanguage;

/// Result type for udfpack-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in udfpack-core.
#[derive(Debug, Error)]
pub enum Error {
    /// A UDF descriptor failed a precondition check.
    #[error("invalid udf: {0}")]
    InvalidUdf(String),

    /// A job id cannot be used as a directory name.
    #[error("invalid job id {0}")]
    InvalidJobId(String),

    /// No compiler is available for the requested language.
    #[error("unsupported function language: {0}")]
    UnsupportedLanguage(FunctionLanguage),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write or read a zip archive.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Settings could not be resolved.
    #[error("settings error: {0}")]
    Settings(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error returned by an engine when a function symbol cannot be resolved.
pub type ResolveError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Message of the innermost error in a `source()` chain.
pub fn root_cause_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
