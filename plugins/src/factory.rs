use std::sync::Arc;

use anyhow::{bail, Result};

use toolflow_core::executor::traits::{ConcurrencyStrategyPlugin, OutputRendererPlugin};
use toolflow_core::executor::types::{ConcurrencyConfig, ExecutorConfig, OutputConfig};
use toolflow_core::executor::PlaceholderResolver;
use toolflow_core::ParallelToolExecutor;

use crate::executor::{
    AdaptiveConcurrencyPlugin, FixedConcurrencyPlugin, JsonlRendererPlugin, TextRendererPlugin,
};

pub fn build_renderer(output: &OutputConfig) -> Result<Arc<dyn OutputRendererPlugin>> {
    match output.format.as_str() {
        "text" => Ok(Arc::new(TextRendererPlugin::new(output.ascii_only))),
        "jsonl" => Ok(Arc::new(JsonlRendererPlugin::new(output.pretty_print))),
        other => bail!("unknown output format '{other}' (expected text or jsonl)"),
    }
}

/// `None` means the executor uses its ceiling for every level.
pub fn build_concurrency_strategy(
    cfg: &ConcurrencyConfig,
) -> Result<Option<Arc<dyn ConcurrencyStrategyPlugin>>> {
    match cfg.strategy.as_str() {
        "fixed" if cfg.base_concurrency == 0 => Ok(None),
        "fixed" => Ok(Some(Arc::new(FixedConcurrencyPlugin::new(cfg.base_concurrency)))),
        "adaptive" => Ok(Some(Arc::new(AdaptiveConcurrencyPlugin::new(cfg.clone())))),
        other => bail!("unknown concurrency strategy '{other}' (expected fixed or adaptive)"),
    }
}

pub fn build_executor(cfg: &ExecutorConfig) -> Result<ParallelToolExecutor> {
    // Bars and streamed JSON lines would interleave on the terminal.
    let progress_bar = cfg.progress_bar && cfg.output.format != "jsonl";

    let mut builder = ParallelToolExecutor::builder(cfg.max_parallelism)
        .renderer(build_renderer(&cfg.output)?)
        .progress_bar(progress_bar);

    if let Some(strategy) = build_concurrency_strategy(&cfg.concurrency)? {
        builder = builder.concurrency_strategy(strategy);
    }
    if cfg.resolve_placeholders {
        builder = builder.resolver(Arc::new(PlaceholderResolver::new()));
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_renderer_by_format() {
        let mut output = OutputConfig::default();
        assert_eq!(build_renderer(&output).unwrap().format(), "text");

        output.format = "jsonl".to_string();
        let renderer = build_renderer(&output).unwrap();
        assert_eq!(renderer.format(), "jsonl");
        assert!(renderer.supports_streaming());

        output.format = "yaml".to_string();
        assert!(build_renderer(&output).is_err());
    }

    #[test]
    fn test_build_concurrency_strategy() {
        let mut cfg = ConcurrencyConfig::default();
        assert!(build_concurrency_strategy(&cfg).unwrap().is_none());

        cfg.base_concurrency = 2;
        let strategy = build_concurrency_strategy(&cfg).unwrap().unwrap();
        assert_eq!(strategy.name(), "fixed");

        cfg.strategy = "adaptive".to_string();
        let strategy = build_concurrency_strategy(&cfg).unwrap().unwrap();
        assert_eq!(strategy.name(), "adaptive");

        cfg.strategy = "greedy".to_string();
        assert!(build_concurrency_strategy(&cfg).is_err());
    }

    #[test]
    fn test_build_executor_uses_ceiling() {
        let cfg = ExecutorConfig {
            max_parallelism: 7,
            ..ExecutorConfig::default()
        };
        assert_eq!(build_executor(&cfg).unwrap().max_parallelism(), 7);

        let mut bad = ExecutorConfig::default();
        bad.output.format = "xml".to_string();
        assert!(build_executor(&bad).is_err());
    }
}
