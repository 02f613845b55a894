//! Dependency-aware parallel tool invocation for LLM agents.

pub mod config;
pub mod error;
pub mod executor;
pub mod tools;

pub use error::{ErrorCode, ExecutorError};
pub use executor::{
    ExecutionPlan, ExecutionResult, ParallelToolExecutor, ToolError, ToolInvocation, ToolResult,
};
pub use tools::{Tool, ToolRegistry};
