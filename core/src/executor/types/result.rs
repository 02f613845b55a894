use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::invocation::ToolInvocation;

/// Outcome of executing a single invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Originating invocation identifier
    pub invocation_id: String,

    /// Tool that was invoked
    pub tool_name: String,

    /// True when the tool returned a value
    pub success: bool,

    /// Tool return value (None on failure)
    pub result: Option<Value>,

    /// Error description (None on success)
    pub error: Option<String>,

    /// Wall-clock duration of this invocation in milliseconds
    pub execution_time_ms: u64,
}

impl ToolResult {
    pub fn succeeded(invocation: &ToolInvocation, value: Value, execution_time_ms: u64) -> Self {
        Self {
            invocation_id: invocation.invocation_id.clone(),
            tool_name: invocation.tool_name.clone(),
            success: true,
            result: Some(value),
            error: None,
            execution_time_ms,
        }
    }

    pub fn failed(
        invocation: &ToolInvocation,
        error: impl Into<String>,
        execution_time_ms: u64,
    ) -> Self {
        Self {
            invocation_id: invocation.invocation_id.clone(),
            tool_name: invocation.tool_name.clone(),
            success: false,
            result: None,
            error: Some(error.into()),
            execution_time_ms,
        }
    }
}

/// Result of executing a whole batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Identifier used in emitted events
    pub run_id: String,

    /// Number of invocations submitted
    pub total_invocations: usize,

    /// Number of invocations that succeeded
    pub succeeded: usize,

    /// Number of invocations that failed
    pub failed: usize,

    /// Total execution duration in milliseconds
    pub duration_ms: u64,

    /// Invocation ids per level, in execution order
    pub levels: Vec<Vec<String>>,

    /// One result per invocation, level by level (input order inside a level)
    pub results: Vec<ToolResult>,
}

impl ExecutionResult {
    pub fn get(&self, invocation_id: &str) -> Option<&ToolResult> {
        self.results
            .iter()
            .find(|r| r.invocation_id == invocation_id)
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    pub fn into_results(self) -> Vec<ToolResult> {
        self.results
    }
}
