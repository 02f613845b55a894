use chrono::Local;
use serde_json::{json, Value};
use toolflow_core::executor::traits::{OutputRendererPlugin, RenderEvent};

const SCHEMA_VERSION: u32 = 1;

/// One JSON object per event on stdout.
///
/// Every line carries `v`, `event_type`, `ts` and `run_id`; invocation
/// events add `invocation_id`, everything else sits under `metadata`.
pub struct JsonlRendererPlugin {
    pretty_print: bool,
}

impl JsonlRendererPlugin {
    pub fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    fn event_to_json(&self, event: &RenderEvent) -> Value {
        match event {
            RenderEvent::RunStart {
                run_id,
                total_invocations,
                total_levels,
            } => envelope(
                "run.start",
                run_id,
                json!({ "total_invocations": total_invocations, "total_levels": total_levels }),
            ),
            RenderEvent::Plan { run_id, levels } => {
                let total: usize = levels.iter().map(Vec::len).sum();
                envelope(
                    "executor.plan",
                    run_id,
                    json!({ "levels": levels, "total_invocations": total }),
                )
            }
            RenderEvent::LevelStart {
                run_id,
                level,
                invocation_ids,
                parallelism,
            } => envelope(
                "level.start",
                run_id,
                json!({ "level": level, "invocations": invocation_ids, "parallelism": parallelism }),
            ),
            RenderEvent::InvocationStart {
                run_id,
                invocation_id,
                tool_name,
                level,
            } => with_fields(
                envelope(
                    "invocation.start",
                    run_id,
                    json!({ "tool_name": tool_name, "level": level }),
                ),
                [("invocation_id", json!(invocation_id))],
            ),
            RenderEvent::InvocationComplete {
                run_id,
                level,
                result,
            } => with_fields(
                envelope(
                    "invocation.end",
                    run_id,
                    json!({
                        "tool_name": result.tool_name,
                        "level": level,
                        "execution_time_ms": result.execution_time_ms,
                    }),
                ),
                [
                    ("invocation_id", json!(result.invocation_id)),
                    ("success", json!(result.success)),
                    ("result", json!(result.result)),
                    ("error", json!(result.error)),
                ],
            ),
            RenderEvent::LevelEnd {
                run_id,
                level,
                succeeded,
                failed,
            } => envelope(
                "level.end",
                run_id,
                json!({ "level": level, "succeeded": succeeded, "failed": failed }),
            ),
            RenderEvent::RunEnd { run_id, result } => envelope(
                "run.end",
                run_id,
                json!({
                    "total_invocations": result.total_invocations,
                    "succeeded": result.succeeded,
                    "failed": result.failed,
                    "duration_ms": result.duration_ms,
                }),
            ),
        }
    }
}

fn envelope(event_type: &str, run_id: &str, metadata: Value) -> Value {
    json!({
        "v": SCHEMA_VERSION,
        "event_type": event_type,
        "ts": Local::now().to_rfc3339(),
        "run_id": run_id,
        "metadata": metadata,
    })
}

fn with_fields<const N: usize>(mut line: Value, fields: [(&str, Value); N]) -> Value {
    if let Value::Object(map) = &mut line {
        map.extend(fields.into_iter().map(|(k, v)| (k.to_string(), v)));
    }
    line
}

impl OutputRendererPlugin for JsonlRendererPlugin {
    fn name(&self) -> &str {
        "jsonl-renderer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    fn render(&self, event: &RenderEvent) {
        let value = self.event_to_json(event);
        let line = if self.pretty_print {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        match line {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "failed to serialize event"),
        }
    }
}
