use std::path::Path;
use std::sync::Arc;

use toolflow_core::error::CliError;
use toolflow_core::executor::types::ExecutorConfig;
use toolflow_core::{ExecutionResult, ToolResult};
use toolflow_plugins::factory::build_executor;
use toolflow_plugins::tools::builtin_registry;

use crate::batch::load_batch;
use crate::commands::cli::RunArgs;

/// Execute a batch. Returns 0 when every invocation succeeded, 1 otherwise.
pub async fn run_cmd(args: RunArgs, mut cfg: ExecutorConfig) -> Result<i32, CliError> {
    apply_run_args(&mut cfg, &args);

    let invocations = load_batch(&args.batch)?;
    let executor = build_executor(&cfg).map_err(|e| CliError::Config(format!("{e:#}")))?;
    let registry = builtin_registry(args.http_timeout_ms)?;

    tracing::info!(
        invocations = invocations.len(),
        max_parallelism = executor.max_parallelism(),
        format = %cfg.output.format,
        "running batch"
    );

    let result = executor
        .execute_with(&invocations, Arc::new(registry))
        .await?;

    if let Some(path) = &args.output {
        write_result(path, &result)?;
    }
    if cfg.output.format == "text" {
        print!("{}", format_results(&result, cfg.output.ascii_only));
    }

    Ok(if result.all_succeeded() { 0 } else { 1 })
}

/// Command-line flags take precedence over the config file.
pub fn apply_run_args(cfg: &mut ExecutorConfig, args: &RunArgs) {
    if let Some(n) = args.max_parallelism {
        cfg.max_parallelism = n;
    }
    if let Some(format) = args.format {
        cfg.output.format = format.as_str().to_string();
    }
    if args.progress {
        cfg.progress_bar = true;
    }
    if args.resolve {
        cfg.resolve_placeholders = true;
    }
}

fn write_result(path: &Path, result: &ExecutionResult) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(result).map_err(|e| CliError::Anyhow(e.into()))?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), "run result written");
    Ok(())
}

pub fn format_results(result: &ExecutionResult, ascii_only: bool) -> String {
    let mut out = String::from("\nRESULTS\n");
    for r in &result.results {
        out.push_str(&format_result_line(r, ascii_only));
        out.push('\n');
    }
    out.push_str(&format!(
        "{} succeeded, {} failed in {}ms\n",
        result.succeeded, result.failed, result.duration_ms
    ));
    out
}

fn format_result_line(r: &ToolResult, ascii_only: bool) -> String {
    let mark = match (r.success, ascii_only) {
        (true, true) => "[ok]  ",
        (true, false) => "✓ ",
        (false, true) => "[fail]",
        (false, false) => "✗ ",
    };
    let detail = match (&r.result, &r.error) {
        (_, Some(err)) => format!("error: {err}"),
        (Some(value), None) => value.to_string(),
        (None, None) => String::new(),
    };
    format!(
        "{mark} {} ({}, {}ms) {detail}",
        r.invocation_id, r.tool_name, r.execution_time_ms
    )
}
