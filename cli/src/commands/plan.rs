use toolflow_core::error::CliError;
use toolflow_core::ExecutionPlan;

use crate::batch::load_batch;
use crate::commands::cli::{PlanArgs, PlanFormat};

pub fn plan_cmd(args: PlanArgs) -> Result<i32, CliError> {
    let invocations = load_batch(&args.batch)?;
    let plan = ExecutionPlan::build(&invocations)?;

    match args.format {
        PlanFormat::Text => print!("{}", render_plan_text(&plan)),
        PlanFormat::Json => {
            let json =
                serde_json::to_string_pretty(&plan).map_err(|e| CliError::Anyhow(e.into()))?;
            println!("{json}");
        }
    }
    Ok(0)
}

pub fn render_plan_text(plan: &ExecutionPlan) -> String {
    let mut out = format!(
        "{} invocations in {} levels (widest level: {})\n",
        plan.total_invocations(),
        plan.depth(),
        plan.max_width()
    );
    for (idx, level) in plan.levels.iter().enumerate() {
        let entries: Vec<String> = level
            .iter()
            .map(|inv| format!("{} ({})", inv.invocation_id, inv.tool_name))
            .collect();
        out.push_str(&format!("  level {idx}: {}\n", entries.join(", ")));
    }
    out
}
