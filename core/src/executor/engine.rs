use std::any::Any;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use futures::FutureExt;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ExecutorError;

use super::output::trace_event;
use super::plan::ExecutionPlan;
use super::progress::ProgressMonitor;
use super::resolve::ArgumentResolver;
use super::scheduler::execute_level_parallel;
use super::traits::{
    ConcurrencyContext, ConcurrencyStrategyPlugin, OutputRendererPlugin, RenderEvent,
    ToolExecutor,
};
use super::types::{ExecutionResult, ToolInvocation, ToolResult};

struct SystemInfoCache {
    sys: sysinfo::System,
    cpu_count: usize,
    last_refresh: Instant,
    cached_cpu_usage: f32,
    cached_memory_usage: f32,
}

impl SystemInfoCache {
    fn new() -> Self {
        let mut sys = sysinfo::System::new();
        sys.refresh_cpu();
        sys.refresh_memory();
        let cpu_count = sys.cpus().len().max(1);
        let mut cache = Self {
            sys,
            cpu_count,
            last_refresh: Instant::now(),
            cached_cpu_usage: 0.0,
            cached_memory_usage: 0.0,
        };
        cache.sample();
        cache
    }

    fn sample(&mut self) {
        self.cached_cpu_usage = self
            .sys
            .cpus()
            .iter()
            .map(|c| c.cpu_usage())
            .sum::<f32>()
            / self.cpu_count as f32;
        let total_memory = self.sys.total_memory().max(1);
        self.cached_memory_usage = (self.sys.used_memory() as f32 / total_memory as f32) * 100.0;
    }

    fn get(&mut self) -> (usize, f32, f32) {
        if self.last_refresh.elapsed() > Duration::from_secs(1) {
            self.sys.refresh_cpu();
            self.sys.refresh_memory();
            self.sample();
            self.last_refresh = Instant::now();
        }
        (
            self.cpu_count,
            self.cached_cpu_usage,
            self.cached_memory_usage,
        )
    }
}

/// Dependency-aware parallel tool executor
///
/// One call runs one batch: the invocations are planned into levels
/// ([`ExecutionPlan`]), then each level runs concurrently under
/// `max_parallelism` and fully drains before the next one starts. A failing
/// or panicking tool only fails its own [`ToolResult`].
pub struct ParallelToolExecutor {
    max_parallelism: usize,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
    concurrency_strategy: Option<Arc<dyn ConcurrencyStrategyPlugin>>,
    resolver: Option<Arc<dyn ArgumentResolver>>,
    progress_bar: bool,
    sys_cache: Mutex<Option<SystemInfoCache>>,
}

pub struct ParallelToolExecutorBuilder {
    max_parallelism: usize,
    renderer: Option<Arc<dyn OutputRendererPlugin>>,
    concurrency_strategy: Option<Arc<dyn ConcurrencyStrategyPlugin>>,
    resolver: Option<Arc<dyn ArgumentResolver>>,
    progress_bar: bool,
}

impl ParallelToolExecutor {
    /// A zero ceiling would never admit any invocation; it is raised to 1.
    pub fn new(max_parallelism: usize) -> Self {
        Self::builder(max_parallelism).build()
    }

    pub fn builder(max_parallelism: usize) -> ParallelToolExecutorBuilder {
        ParallelToolExecutorBuilder::new(max_parallelism)
    }

    pub fn max_parallelism(&self) -> usize {
        self.max_parallelism
    }

    /// Plan a batch without running it.
    pub fn plan(&self, invocations: &[ToolInvocation]) -> Result<ExecutionPlan, ExecutorError> {
        ExecutionPlan::build(invocations)
    }

    /// Execute a batch and return one result per invocation.
    ///
    /// Results are ordered level by level; within a level they follow the
    /// submission order. Only structural problems (duplicate id, missing
    /// dependency, cycle) are returned as errors, and those are detected
    /// before any invocation starts.
    pub async fn execute_parallel<F, Fut, E>(
        &self,
        invocations: &[ToolInvocation],
        executor: F,
    ) -> Result<Vec<ToolResult>, ExecutorError>
    where
        F: Fn(ToolInvocation) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Value, E>> + Send,
        E: Display + Send,
    {
        self.execute_batch(invocations, executor)
            .await
            .map(ExecutionResult::into_results)
    }

    /// Execute a batch through a [`ToolExecutor`] such as a `ToolRegistry`.
    pub async fn execute_with(
        &self,
        invocations: &[ToolInvocation],
        executor: Arc<dyn ToolExecutor>,
    ) -> Result<ExecutionResult, ExecutorError> {
        self.execute_batch(invocations, move |invocation| {
            let executor = executor.clone();
            async move { executor.execute(&invocation).await }
        })
        .await
    }

    /// Execute a batch and return the detailed run summary.
    pub async fn execute_batch<F, Fut, E>(
        &self,
        invocations: &[ToolInvocation],
        executor: F,
    ) -> Result<ExecutionResult, ExecutorError>
    where
        F: Fn(ToolInvocation) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Value, E>> + Send,
        E: Display + Send,
    {
        let plan = self.plan(invocations)?;
        let run_id = Uuid::new_v4().to_string();
        let levels = plan.level_ids();

        self.emit(&RenderEvent::RunStart {
            run_id: run_id.clone(),
            total_invocations: plan.total_invocations(),
            total_levels: plan.depth(),
        });
        self.emit(&RenderEvent::Plan {
            run_id: run_id.clone(),
            levels: levels.clone(),
        });

        let start = Instant::now();
        let progress = Mutex::new(ProgressMonitor::new(
            plan.total_invocations(),
            self.progress_bar,
        ));
        let mut completed: HashMap<String, ToolResult> = HashMap::new();
        let mut results = Vec::with_capacity(plan.total_invocations());

        for (level, level_invocations) in plan.levels.iter().enumerate() {
            let parallelism = self.level_parallelism(level_invocations.len());

            self.emit(&RenderEvent::LevelStart {
                run_id: run_id.clone(),
                level,
                invocation_ids: levels[level].clone(),
                parallelism,
            });
            if let Ok(mut monitor) = progress.lock() {
                monitor.update_level(level, plan.depth());
                for invocation in level_invocations {
                    monitor.add_invocation(&invocation.invocation_id);
                }
            }

            let level_results = {
                let run_id = run_id.as_str();
                let completed = &completed;
                let executor = &executor;
                let progress = &progress;
                execute_level_parallel(level_invocations, parallelism, move |invocation| {
                    self.run_invocation(invocation, level, run_id, completed, executor, progress)
                })
                .await?
            };

            let failed = level_results.iter().filter(|r| !r.success).count();
            self.emit(&RenderEvent::LevelEnd {
                run_id: run_id.clone(),
                level,
                succeeded: level_results.len() - failed,
                failed,
            });

            if self.resolver.is_some() {
                for result in &level_results {
                    completed.insert(result.invocation_id.clone(), result.clone());
                }
            }
            results.extend(level_results);
        }

        let failed = results.iter().filter(|r| !r.success).count();
        if let Ok(monitor) = progress.lock() {
            monitor.finish(failed == 0);
        }

        let result = ExecutionResult {
            run_id: run_id.clone(),
            total_invocations: results.len(),
            succeeded: results.len() - failed,
            failed,
            duration_ms: start.elapsed().as_millis() as u64,
            levels,
            results,
        };

        self.emit(&RenderEvent::RunEnd {
            run_id,
            result: result.clone(),
        });

        Ok(result)
    }

    /// Run one invocation to a terminal state. Never fails: tool errors,
    /// unresolved arguments and panics all become a failed `ToolResult`.
    async fn run_invocation<F, Fut, E>(
        &self,
        invocation: ToolInvocation,
        level: usize,
        run_id: &str,
        completed: &HashMap<String, ToolResult>,
        executor: &F,
        progress: &Mutex<ProgressMonitor>,
    ) -> ToolResult
    where
        F: Fn(ToolInvocation) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Value, E>> + Send,
        E: Display + Send,
    {
        self.emit(&RenderEvent::InvocationStart {
            run_id: run_id.to_string(),
            invocation_id: invocation.invocation_id.clone(),
            tool_name: invocation.tool_name.clone(),
            level,
        });

        let start = Instant::now();
        let resolved = match &self.resolver {
            Some(resolver) => resolver.resolve(&invocation, completed),
            None => Ok(invocation.clone()),
        };

        let result = match resolved {
            Err(e) => ToolResult::failed(&invocation, e.to_string(), elapsed_ms(start)),
            // A panic in the callable before it returns a future is caught too
            Ok(resolved) => match AssertUnwindSafe(async { executor(resolved).await })
                .catch_unwind()
                .await
            {
                Ok(Ok(value)) => ToolResult::succeeded(&invocation, value, elapsed_ms(start)),
                Ok(Err(e)) => ToolResult::failed(&invocation, e.to_string(), elapsed_ms(start)),
                Err(panic) => ToolResult::failed(
                    &invocation,
                    format!("tool panicked: {}", panic_message(panic.as_ref())),
                    elapsed_ms(start),
                ),
            },
        };

        if result.success {
            tracing::debug!(
                run_id,
                invocation_id = %result.invocation_id,
                tool = %result.tool_name,
                elapsed_ms = result.execution_time_ms,
                "invocation succeeded"
            );
        } else {
            tracing::warn!(
                run_id,
                invocation_id = %result.invocation_id,
                tool = %result.tool_name,
                error = result.error.as_deref().unwrap_or_default(),
                "invocation failed"
            );
        }

        if let Ok(mut monitor) = progress.lock() {
            monitor.complete_invocation(
                &result.invocation_id,
                result.success,
                result.execution_time_ms,
            );
        }

        self.emit(&RenderEvent::InvocationComplete {
            run_id: run_id.to_string(),
            level,
            result: result.clone(),
        });

        result
    }

    fn level_parallelism(&self, level_width: usize) -> usize {
        let Some(strategy) = &self.concurrency_strategy else {
            return self.max_parallelism;
        };

        let context = self.concurrency_context(level_width);
        let desired = strategy.calculate_concurrency(&context);
        tracing::debug!(
            strategy = strategy.name(),
            desired,
            ceiling = self.max_parallelism,
            "level concurrency computed"
        );
        desired.clamp(1, self.max_parallelism)
    }

    fn concurrency_context(&self, level_width: usize) -> ConcurrencyContext {
        let mut cache = match self.sys_cache.lock() {
            Ok(cache) => cache,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (cpu_count, cpu_usage, memory_usage) =
            cache.get_or_insert_with(SystemInfoCache::new).get();

        ConcurrencyContext {
            cpu_usage,
            available_cpus: cpu_count,
            memory_usage,
            level_width,
            base_concurrency: self.max_parallelism,
        }
    }

    fn emit(&self, event: &RenderEvent) {
        match &self.renderer {
            Some(renderer) => renderer.render(event),
            None => trace_event(event),
        }
    }
}

impl ParallelToolExecutorBuilder {
    pub fn new(max_parallelism: usize) -> Self {
        Self {
            max_parallelism,
            renderer: None,
            concurrency_strategy: None,
            resolver: None,
            progress_bar: false,
        }
    }

    pub fn renderer(mut self, renderer: Arc<dyn OutputRendererPlugin>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn concurrency_strategy(mut self, strategy: Arc<dyn ConcurrencyStrategyPlugin>) -> Self {
        self.concurrency_strategy = Some(strategy);
        self
    }

    pub fn resolver(mut self, resolver: Arc<dyn ArgumentResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.progress_bar = enabled;
        self
    }

    pub fn build(self) -> ParallelToolExecutor {
        if self.max_parallelism == 0 {
            tracing::warn!("max_parallelism must be positive, using 1");
        }

        ParallelToolExecutor {
            max_parallelism: self.max_parallelism.max(1),
            renderer: self.renderer,
            concurrency_strategy: self.concurrency_strategy,
            resolver: self.resolver,
            progress_bar: self.progress_bar,
            sys_cache: Mutex::new(None),
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Halving;

    impl ConcurrencyStrategyPlugin for Halving {
        fn name(&self) -> &str {
            "halving"
        }

        fn calculate_concurrency(&self, context: &ConcurrencyContext) -> usize {
            context.level_width / 2
        }
    }

    struct Greedy;

    impl ConcurrencyStrategyPlugin for Greedy {
        fn name(&self) -> &str {
            "greedy"
        }

        fn calculate_concurrency(&self, _context: &ConcurrencyContext) -> usize {
            1000
        }
    }

    #[test]
    fn test_zero_parallelism_is_raised_to_one() {
        assert_eq!(ParallelToolExecutor::new(0).max_parallelism(), 1);
    }

    #[test]
    fn test_strategy_is_clamped_to_ceiling() {
        let executor = ParallelToolExecutor::builder(4)
            .concurrency_strategy(Arc::new(Greedy))
            .build();
        assert_eq!(executor.level_parallelism(10), 4);

        let executor = ParallelToolExecutor::builder(4)
            .concurrency_strategy(Arc::new(Halving))
            .build();
        assert_eq!(executor.level_parallelism(6), 3);
        assert_eq!(executor.level_parallelism(1), 1);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(payload.as_ref()), "kaboom");
    }
}
