//! Built-in tools shipped with the `toolflow` binary.

mod basic;
mod http;

use std::sync::Arc;

use toolflow_core::ToolRegistry;

pub use basic::{ConcatTool, EchoTool, FailTool, SleepTool};
pub use http::HttpGetTool;

/// Registry with every built-in tool.
pub fn builtin_registry(http_timeout_ms: u64) -> anyhow::Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry
        .register(Arc::new(EchoTool))
        .register(Arc::new(SleepTool))
        .register(Arc::new(FailTool))
        .register(Arc::new(ConcatTool))
        .register(Arc::new(HttpGetTool::new(http_timeout_ms)?));
    Ok(registry)
}
