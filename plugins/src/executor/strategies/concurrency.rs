use toolflow_core::executor::traits::{ConcurrencyContext, ConcurrencyStrategyPlugin};
use toolflow_core::executor::types::ConcurrencyConfig;

const MEMORY_PRESSURE_PERCENT: f32 = 90.0;

pub struct AdaptiveConcurrencyPlugin {
    config: ConcurrencyConfig,
}

pub struct FixedConcurrencyPlugin {
    fixed: usize,
}

impl AdaptiveConcurrencyPlugin {
    pub fn new(config: ConcurrencyConfig) -> Self {
        Self { config }
    }

    /// Configured bounds, repaired so that `1 <= min <= max`.
    fn bounds(&self) -> (usize, usize) {
        let min = self.config.min_concurrency.max(1);
        let max = self.config.max_concurrency.max(min);
        (min, max)
    }
}

impl FixedConcurrencyPlugin {
    pub fn new(fixed: usize) -> Self {
        Self { fixed }
    }
}

impl ConcurrencyStrategyPlugin for AdaptiveConcurrencyPlugin {
    fn name(&self) -> &str {
        "adaptive"
    }

    fn calculate_concurrency(&self, context: &ConcurrencyContext) -> usize {
        let (min, max) = self.bounds();
        let mut desired = match self.config.base_concurrency {
            0 => context.base_concurrency,
            base => base,
        };

        if context.cpu_usage >= self.config.cpu_threshold_high
            || context.memory_usage >= MEMORY_PRESSURE_PERCENT
        {
            desired = desired.saturating_div(2);
        } else if context.cpu_usage <= self.config.cpu_threshold_low {
            desired = desired.saturating_mul(2);
        }

        // More permits than invocations in the level buys nothing.
        desired.clamp(min, max).min(context.level_width.max(1))
    }
}

impl ConcurrencyStrategyPlugin for FixedConcurrencyPlugin {
    fn name(&self) -> &str {
        "fixed"
    }

    fn calculate_concurrency(&self, _context: &ConcurrencyContext) -> usize {
        self.fixed.max(1)
    }
}
