use toolflow_core::executor::traits::{OutputRendererPlugin, RenderEvent};

pub struct TextRendererPlugin {
    ascii_only: bool,
}

impl TextRendererPlugin {
    pub fn new(ascii_only: bool) -> Self {
        Self { ascii_only }
    }

    fn status(&self, success: bool) -> &'static str {
        match (success, self.ascii_only) {
            (true, true) => "OK",
            (true, false) => "✓",
            (false, true) => "FAIL",
            (false, false) => "✗",
        }
    }

    fn format_event(&self, event: &RenderEvent) -> String {
        match event {
            RenderEvent::RunStart {
                run_id,
                total_invocations,
                total_levels,
            } => format!(
                "RUN START {} (invocations: {}, levels: {})",
                run_id, total_invocations, total_levels
            ),
            RenderEvent::Plan { run_id, levels } => {
                let mut out = format!("PLAN {}:", run_id);
                for (idx, level) in levels.iter().enumerate() {
                    out.push_str(&format!("\n  level {}: {}", idx, level.join(", ")));
                }
                out
            }
            RenderEvent::LevelStart {
                run_id,
                level,
                invocation_ids,
                parallelism,
            } => format!(
                "LEVEL START {} (level {}, invocations: {}, parallelism: {})",
                run_id,
                level,
                invocation_ids.len(),
                parallelism
            ),
            RenderEvent::InvocationStart {
                run_id,
                invocation_id,
                tool_name,
                level,
            } => format!(
                "INVOCATION START {} (level {}, {} -> {})",
                run_id, level, invocation_id, tool_name
            ),
            RenderEvent::InvocationComplete {
                run_id,
                level,
                result,
            } => {
                let mut line = format!(
                    "INVOCATION END {} (level {}, {} {}, {}ms)",
                    run_id,
                    level,
                    self.status(result.success),
                    result.invocation_id,
                    result.execution_time_ms
                );
                if let Some(err) = &result.error {
                    line.push_str(&format!(": {}", err));
                }
                line
            }
            RenderEvent::LevelEnd {
                run_id,
                level,
                succeeded,
                failed,
            } => format!(
                "LEVEL END {} (level {}, succeeded {}, failed {})",
                run_id, level, succeeded, failed
            ),
            RenderEvent::RunEnd { run_id, result } => format!(
                "RUN END {} (succeeded {}, failed {}, duration {}ms)",
                run_id, result.succeeded, result.failed, result.duration_ms
            ),
        }
    }
}

impl OutputRendererPlugin for TextRendererPlugin {
    fn name(&self) -> &str {
        "text-renderer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn render(&self, event: &RenderEvent) {
        println!("{}", self.format_event(event));
    }
}
