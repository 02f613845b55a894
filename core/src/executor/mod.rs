//! Dependency-aware parallel execution of tool invocations
//!
//! A batch of [`ToolInvocation`]s is planned and executed in four steps:
//! - dependency graph construction and validation
//! - topological sorting with circular dependency detection
//! - grouping into levels of mutually independent invocations
//! - level-by-level execution with bounded concurrency
//!
//! # Architecture
//!
//! ```text
//! Vec<ToolInvocation>
//!   ↓
//! DependencyGraph::from_invocations()
//!   ↓
//! DependencyGraph::validate() → check_dependencies(), detect_cycle()
//!   ↓
//! DependencyGraph::topological_order() → Vec<String>
//!   ↓
//! group_levels() → Vec<Vec<ToolInvocation>>
//!   ↓
//! ParallelToolExecutor::execute_batch() → ExecutionResult
//! ```

mod engine;
mod graph;
mod levels;
mod output;
mod plan;
mod progress;
pub mod resolve;
mod scheduler;
pub mod traits;
pub mod types;

pub use engine::{ParallelToolExecutor, ParallelToolExecutorBuilder};
pub use graph::DependencyGraph;
pub use levels::group_levels;
pub use plan::ExecutionPlan;
pub use progress::ProgressMonitor;
pub use resolve::{ArgumentResolver, PlaceholderResolver, ResolveError};
pub use scheduler::execute_level_parallel;
pub use traits::{
    ConcurrencyContext, ConcurrencyStrategyPlugin, OutputRendererPlugin, RenderEvent,
    ToolExecutor,
};
pub use types::{ExecutionResult, ExecutorConfig, ToolError, ToolInvocation, ToolResult};
