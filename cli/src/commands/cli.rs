use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Jsonl,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Jsonl => "jsonl",
        }
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "toolflow", version, about = "Run tool invocation batches in dependency order")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file; defaults to $TOOLFLOW_HOME/config.toml, then ./toolflow.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// JSON batch file (`-` reads stdin)
    #[arg(long)]
    pub batch: PathBuf,

    #[arg(long)]
    pub max_parallelism: Option<usize>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Show progress bars (ignored for jsonl output)
    #[arg(long)]
    pub progress: bool,

    /// Substitute `$<id>.result` placeholders from earlier levels
    #[arg(long)]
    pub resolve: bool,

    /// Write the full run result as JSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = 30_000)]
    pub http_timeout_ms: u64,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PlanArgs {
    /// JSON batch file (`-` reads stdin)
    #[arg(long)]
    pub batch: PathBuf,

    #[arg(long, value_enum, default_value_t = PlanFormat::Text)]
    pub format: PlanFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a batch with the built-in tools
    Run(RunArgs),
    /// Validate a batch and print its levels without running it
    Plan(PlanArgs),
}
