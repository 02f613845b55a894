use crate::executor::types::{ExecutionResult, ToolResult};

/// Output renderer plugin (controls how run events are presented)
pub trait OutputRendererPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self) -> &str;
    fn supports_streaming(&self) -> bool {
        false
    }
    fn render(&self, event: &RenderEvent);
}

/// Events emitted while a batch runs
#[derive(Debug, Clone)]
pub enum RenderEvent {
    RunStart {
        run_id: String,
        total_invocations: usize,
        total_levels: usize,
    },
    Plan {
        run_id: String,
        levels: Vec<Vec<String>>,
    },
    LevelStart {
        run_id: String,
        level: usize,
        invocation_ids: Vec<String>,
        parallelism: usize,
    },
    InvocationStart {
        run_id: String,
        invocation_id: String,
        tool_name: String,
        level: usize,
    },
    InvocationComplete {
        run_id: String,
        level: usize,
        result: ToolResult,
    },
    LevelEnd {
        run_id: String,
        level: usize,
        succeeded: usize,
        failed: usize,
    },
    RunEnd {
        run_id: String,
        result: ExecutionResult,
    },
}
