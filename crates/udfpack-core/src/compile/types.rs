//! Common types for the compiler family.

/// Result of validating a UDF against the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The engine resolved the function.
    Success,

    /// The engine could not load the function.
    RejectedByEngine { reason: String },

    /// Staging or archiving failed before the engine was consulted.
    IoFailure { reason: String },
}

impl CompileOutcome {
    /// Returns true if the engine resolved the function.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::RejectedByEngine { reason } | Self::IoFailure { reason } => Some(reason),
        }
    }
}
