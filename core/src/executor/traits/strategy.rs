/// Concurrency strategy plugin
///
/// The engine clamps whatever this returns to `[1, max_parallelism]`.
pub trait ConcurrencyStrategyPlugin: Send + Sync {
    fn name(&self) -> &str;
    fn calculate_concurrency(&self, context: &ConcurrencyContext) -> usize;
}

#[derive(Debug, Clone)]
pub struct ConcurrencyContext {
    pub cpu_usage: f32,
    pub available_cpus: usize,
    pub memory_usage: f32,
    /// Number of invocations in the level about to run
    pub level_width: usize,
    pub base_concurrency: usize,
}
