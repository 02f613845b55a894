use async_trait::async_trait;
use serde_json::Value;

use crate::executor::types::{ToolError, ToolInvocation};

/// Dispatches a single invocation to whatever actually runs the tool.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, invocation: &ToolInvocation) -> Result<Value, ToolError>;
}
