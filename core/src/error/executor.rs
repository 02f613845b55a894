use thiserror::Error;

/// Stable error codes surfaced by the executor (also used as CLI exit hints).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    Success = 0,
    GeneralError = 1,
    ValidationError = 3,
    InvocationNotFound = 10,
    DependencyError = 11,
    CircularDependency = 12,
    ToolError = 50,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Executor-specific errors for dependency graph construction and batch execution.
///
/// Only structural problems and internal faults become an `ExecutorError`;
/// a failing tool is reported through `ToolResult::error` instead.
#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("Duplicate invocation ID: {0}")]
    DuplicateInvocationId(String),

    #[error("Dependency not found: invocation '{invocation_id}' depends on '{missing_dep}'")]
    DependencyNotFound {
        invocation_id: String,
        missing_dep: String,
    },

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Invocation not found in graph: {0}")]
    InvocationNotFound(String),

    #[error("Runner error: {0}")]
    Runner(String),
}

impl ExecutorError {
    /// Map executor error to a stable error code
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::DuplicateInvocationId(_) => ErrorCode::ValidationError,
            Self::DependencyNotFound { .. } => ErrorCode::DependencyError,
            Self::CircularDependency(_) => ErrorCode::CircularDependency,
            Self::InvocationNotFound(_) => ErrorCode::InvocationNotFound,
            Self::Runner(_) => ErrorCode::GeneralError,
        }
    }

    /// True for errors raised while validating the batch, before anything runs.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DuplicateInvocationId(_)
                | Self::DependencyNotFound { .. }
                | Self::CircularDependency(_)
        )
    }
}
