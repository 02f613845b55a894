use std::path::Path;

use serde_json::Value;
use toolflow_core::error::CliError;
use toolflow_core::ToolInvocation;

/// Read a batch file, or stdin when `path` is `-`.
pub fn load_batch(path: &Path) -> Result<Vec<ToolInvocation>, CliError> {
    let raw = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        std::fs::read_to_string(path)?
    };
    parse_batch(&raw)
}

/// Accepts a JSON array of invocations or `{ "invocations": [...] }`.
pub fn parse_batch(raw: &str) -> Result<Vec<ToolInvocation>, CliError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| CliError::Batch(format!("not valid JSON: {e}")))?;

    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map.remove("invocations").ok_or_else(|| {
            CliError::Batch("object batch must have an 'invocations' array".to_string())
        })?,
        _ => {
            return Err(CliError::Batch(
                "expected an array of invocations or an object with 'invocations'".to_string(),
            ))
        }
    };

    serde_json::from_value(list).map_err(|e| CliError::Batch(e.to_string()))
}
