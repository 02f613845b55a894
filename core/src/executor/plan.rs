use serde::Serialize;

use crate::error::ExecutorError;

use super::graph::DependencyGraph;
use super::levels::group_levels;
use super::types::ToolInvocation;

/// Validated execution plan for one batch: the topological order and its levels.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPlan {
    /// Every invocation id, each after all of its dependencies
    pub order: Vec<String>,

    /// Levels of mutually independent invocations, in execution order
    pub levels: Vec<Vec<ToolInvocation>>,
}

impl ExecutionPlan {
    /// Build → validate → sort → group. Fails before anything runs on a
    /// duplicate id, a missing dependency or a cycle.
    pub fn build(invocations: &[ToolInvocation]) -> Result<Self, ExecutorError> {
        let graph = DependencyGraph::from_invocations(invocations)?;
        graph.validate()?;
        let order = graph.topological_order()?;
        let levels = group_levels(&order, &graph)?;

        Ok(Self { order, levels })
    }

    pub fn level_ids(&self) -> Vec<Vec<String>> {
        self.levels
            .iter()
            .map(|level| level.iter().map(|i| i.invocation_id.clone()).collect())
            .collect()
    }

    pub fn total_invocations(&self) -> usize {
        self.order.len()
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Size of the widest level
    pub fn max_width(&self) -> usize {
        self.levels.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_plan_shape() {
        let plan = ExecutionPlan::build(&[
            ToolInvocation::new("search_a", "search"),
            ToolInvocation::new("search_b", "search"),
            ToolInvocation::new("merge", "concat").depends_on(["search_a", "search_b"]),
        ])
        .unwrap();

        assert_eq!(plan.total_invocations(), 3);
        assert_eq!(plan.depth(), 2);
        assert_eq!(plan.max_width(), 2);
        assert_eq!(
            plan.level_ids(),
            vec![vec!["search_a".to_string(), "search_b".to_string()], vec!["merge".to_string()]]
        );
    }

    #[test]
    fn test_build_rejects_cycle() {
        let err = ExecutionPlan::build(&[
            ToolInvocation::new("a", "echo").depends_on(["b"]),
            ToolInvocation::new("b", "echo").depends_on(["a"]),
        ])
        .unwrap_err();
        assert!(err.to_string().starts_with("Circular dependency detected"));
    }

    #[test]
    fn test_empty_plan() {
        let plan = ExecutionPlan::build(&[]).unwrap();
        assert_eq!(plan.depth(), 0);
        assert_eq!(plan.max_width(), 0);
    }
}
