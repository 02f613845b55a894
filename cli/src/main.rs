use clap::Parser;
use toolflow_cli::commands::{cli, plan, run};
use toolflow_cli::logging::init_tracing;
use toolflow_core::config::{self, AppConfig};
use toolflow_core::error::CliError;

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            if let CliError::Executor(err) = &e {
                tracing::error!(code = err.error_code().as_u16(), "batch rejected: {err}");
            }
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = load_config(&args).map_err(|e| CliError::Config(format!("{e:#}")))?;
    init_tracing(&cfg.logging).map_err(CliError::Config)?;

    match args.command {
        cli::Commands::Run(run_args) => run::run_cmd(run_args, cfg.executor).await,
        cli::Commands::Plan(plan_args) => plan::plan_cmd(plan_args),
    }
}

fn load_config(args: &cli::Args) -> anyhow::Result<AppConfig> {
    match &args.config {
        Some(path) => {
            let mut cfg = config::load_from_path(path)?;
            config::apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
            Ok(cfg)
        }
        None => config::load_default(),
    }
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: every invocation succeeded
    // 1: some invocations failed (returned as a normal exit code, not as an error)
    // 11: config error
    // 12: invalid batch (malformed, duplicate id, missing dependency, cycle)
    // 20: IO error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Batch(_) => 12,
        CliError::Executor(err) if err.is_structural() => 12,
        CliError::Executor(_) => 50,
        CliError::Io(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}
