use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use toolflow_core::{Tool, ToolError};

const MAX_SLEEP_MS: u64 = 60_000;

/// Returns its arguments unchanged.
pub struct EchoTool;

/// Waits `ms` milliseconds, then reports how long it slept.
pub struct SleepTool;

/// Always fails with `message`.
pub struct FailTool;

/// Joins `parts` with an optional `separator`.
pub struct ConcatTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Return the arguments as the result"
    }

    async fn call(&self, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        Ok(Value::Object(arguments.clone()))
    }
}

#[async_trait]
impl Tool for SleepTool {
    fn name(&self) -> &str {
        "sleep"
    }

    fn description(&self) -> &str {
        "Sleep for `ms` milliseconds"
    }

    async fn call(&self, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        let ms = arguments
            .get("ms")
            .and_then(Value::as_u64)
            .ok_or_else(|| ToolError::InvalidArguments("'ms' must be a non-negative integer".into()))?;
        if ms > MAX_SLEEP_MS {
            return Err(ToolError::InvalidArguments(format!(
                "'ms' must not exceed {MAX_SLEEP_MS}"
            )));
        }

        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(json!({ "slept_ms": ms }))
    }
}

#[async_trait]
impl Tool for FailTool {
    fn name(&self) -> &str {
        "fail"
    }

    fn description(&self) -> &str {
        "Fail with the given `message`"
    }

    async fn call(&self, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        let message = arguments
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("requested failure");
        Err(ToolError::execution(message))
    }
}

#[async_trait]
impl Tool for ConcatTool {
    fn name(&self) -> &str {
        "concat"
    }

    fn description(&self) -> &str {
        "Join `parts` into one string"
    }

    async fn call(&self, arguments: &Map<String, Value>) -> Result<Value, ToolError> {
        let parts = arguments
            .get("parts")
            .and_then(Value::as_array)
            .ok_or_else(|| ToolError::InvalidArguments("'parts' must be an array".into()))?;
        let separator = arguments
            .get("separator")
            .and_then(Value::as_str)
            .unwrap_or("");

        let joined = parts
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(separator);

        Ok(Value::String(joined))
    }
}
