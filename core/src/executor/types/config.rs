use serde::{Deserialize, Serialize};

/// `[executor]` table. Omitted keys keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Ceiling on simultaneously running invocations
    pub max_parallelism: usize,
    /// Draw progress bars (ignored for jsonl output)
    pub progress_bar: bool,
    /// Substitute `$<id>.result` placeholders before dispatch
    pub resolve_placeholders: bool,
    pub output: OutputConfig,
    pub concurrency: ConcurrencyConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_parallelism: 5,
            progress_bar: false,
            resolve_placeholders: false,
            output: OutputConfig::default(),
            concurrency: ConcurrencyConfig::default(),
        }
    }
}

/// `[executor.output]`: `format` is `text` or `jsonl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: String,
    pub pretty_print: bool,
    pub ascii_only: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty_print: false,
            ascii_only: false,
        }
    }
}

/// `[executor.concurrency]`: per-level limit computed by a strategy, always
/// clamped to `max_parallelism` by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// `fixed` or `adaptive`
    pub strategy: String,
    pub min_concurrency: usize,
    pub max_concurrency: usize,
    /// Starting point for the strategy; 0 follows `max_parallelism`
    pub base_concurrency: usize,
    /// CPU percentage below which the adaptive strategy doubles its limit
    pub cpu_threshold_low: f32,
    /// CPU percentage above which the adaptive strategy halves its limit
    pub cpu_threshold_high: f32,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            strategy: "fixed".to_string(),
            min_concurrency: 1,
            max_concurrency: 32,
            base_concurrency: 0,
            cpu_threshold_low: 50.0,
            cpu_threshold_high: 80.0,
        }
    }
}
