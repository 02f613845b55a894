use super::traits::RenderEvent;

/// Default sink for run events when no renderer is installed.
pub fn trace_event(event: &RenderEvent) {
    match event {
        RenderEvent::RunStart {
            run_id,
            total_invocations,
            total_levels,
        } => {
            tracing::info!(run_id = %run_id, total_invocations, total_levels, "run started");
        }
        RenderEvent::Plan { run_id, levels } => {
            for (idx, level) in levels.iter().enumerate() {
                tracing::debug!(run_id = %run_id, level = idx, invocations = %level.join(", "), "planned level");
            }
        }
        RenderEvent::LevelStart {
            run_id,
            level,
            invocation_ids,
            parallelism,
        } => {
            tracing::debug!(
                run_id = %run_id,
                level,
                width = invocation_ids.len(),
                parallelism,
                "level started"
            );
        }
        RenderEvent::InvocationStart {
            run_id,
            invocation_id,
            tool_name,
            level,
        } => {
            tracing::trace!(
                run_id = %run_id,
                invocation_id = %invocation_id,
                tool = %tool_name,
                level,
                "invocation started"
            );
        }
        // Outcome is already logged where the invocation finishes.
        RenderEvent::InvocationComplete { .. } => {}
        RenderEvent::LevelEnd {
            run_id,
            level,
            succeeded,
            failed,
        } => {
            tracing::debug!(run_id = %run_id, level, succeeded, failed, "level finished");
        }
        RenderEvent::RunEnd { run_id, result } => {
            tracing::info!(
                run_id = %run_id,
                succeeded = result.succeeded,
                failed = result.failed,
                duration_ms = result.duration_ms,
                "run finished"
            );
        }
    }
}
