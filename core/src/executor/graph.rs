use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::error::ExecutorError;
use crate::executor::types::InvocationLike;

/// Invocation dependency graph (DAG)
#[derive(Debug, Clone)]
pub struct DependencyGraph<T: InvocationLike> {
    /// Invocation nodes: invocation_id -> invocation
    pub nodes: HashMap<String, T>,

    /// Dependency edges: invocation_id -> list of direct dependencies
    pub edges: HashMap<String, Vec<String>>,

    /// Reverse edges: invocation_id -> list of invocations that depend on it
    pub reverse_edges: HashMap<String, Vec<String>>,

    /// Original insertion order (for stable sorting)
    insertion_order: Vec<String>,

    /// invocation_id -> position in `insertion_order`
    positions: HashMap<String, usize>,
}

impl<T: InvocationLike> DependencyGraph<T> {
    /// Construct the dependency graph from a batch of invocations.
    ///
    /// Dependencies are copied as declared; they are not checked here, see
    /// [`DependencyGraph::validate`].
    pub fn from_invocations(invocations: &[T]) -> Result<Self, ExecutorError> {
        let mut nodes = HashMap::with_capacity(invocations.len());
        let mut edges = HashMap::with_capacity(invocations.len());
        let mut reverse_edges: HashMap<String, Vec<String>> = HashMap::new();
        let mut insertion_order = Vec::with_capacity(invocations.len());
        let mut positions = HashMap::with_capacity(invocations.len());

        for invocation in invocations {
            if nodes.contains_key(invocation.id()) {
                return Err(ExecutorError::DuplicateInvocationId(
                    invocation.id().to_string(),
                ));
            }

            let invocation_id = invocation.id().to_string();
            let dependencies = invocation.dependencies().to_vec();

            for dep in &dependencies {
                reverse_edges
                    .entry(dep.clone())
                    .or_default()
                    .push(invocation_id.clone());
            }

            positions.insert(invocation_id.clone(), insertion_order.len());
            insertion_order.push(invocation_id.clone());
            edges.insert(invocation_id.clone(), dependencies);
            nodes.insert(invocation_id, invocation.clone());
        }

        Ok(Self {
            nodes,
            edges,
            reverse_edges,
            insertion_order,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, invocation_id: &str) -> Option<&T> {
        self.nodes.get(invocation_id)
    }

    /// Direct dependencies of an invocation (empty for unknown ids)
    pub fn dependencies_of(&self, invocation_id: &str) -> &[String] {
        self.edges
            .get(invocation_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Position of an invocation in the submitted batch
    pub fn position(&self, invocation_id: &str) -> Option<usize> {
        self.positions.get(invocation_id).copied()
    }

    /// Invocation ids in submission order
    pub fn ids(&self) -> &[String] {
        &self.insertion_order
    }

    /// Validate dependency relationships
    pub fn validate(&self) -> Result<(), ExecutorError> {
        self.check_dependencies()?;

        if let Some(cycle) = self.detect_cycle() {
            return Err(ExecutorError::CircularDependency(cycle));
        }

        Ok(())
    }

    /// Check every declared dependency names an invocation in the batch
    fn check_dependencies(&self) -> Result<(), ExecutorError> {
        for invocation_id in &self.insertion_order {
            for dep in self.dependencies_of(invocation_id) {
                if !self.nodes.contains_key(dep) {
                    return Err(ExecutorError::DependencyNotFound {
                        invocation_id: invocation_id.clone(),
                        missing_dep: dep.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Topological sort using Kahn's algorithm
    ///
    /// Returns every invocation id exactly once, each after all of its
    /// dependencies. When several invocations are ready at the same time the
    /// one submitted first comes first.
    ///
    /// # Time Complexity
    ///
    /// O((V + E) log V) where V = number of invocations, E = number of dependencies
    pub fn topological_order(&self) -> Result<Vec<String>, ExecutorError> {
        self.check_dependencies()?;

        // edges[A] = [B, C] means A depends on B and C, so A's in-degree = 2.
        // Duplicate entries in a dependency list count once.
        let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(self.nodes.len());
        for (invocation_id, dependencies) in &self.edges {
            let distinct: HashSet<&String> = dependencies.iter().collect();
            in_degree.insert(invocation_id.as_str(), distinct.len());
        }

        let mut ready: BinaryHeap<Reverse<usize>> = self
            .insertion_order
            .iter()
            .enumerate()
            .filter(|(_, id)| in_degree.get(id.as_str()) == Some(&0))
            .map(|(pos, _)| Reverse(pos))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        let mut released: HashSet<(&str, &str)> = HashSet::new();

        while let Some(Reverse(pos)) = ready.pop() {
            let invocation_id = &self.insertion_order[pos];
            order.push(invocation_id.clone());

            let Some(dependents) = self.reverse_edges.get(invocation_id) else {
                continue;
            };

            for dependent in dependents {
                if !released.insert((invocation_id.as_str(), dependent.as_str())) {
                    continue;
                }
                let Some(degree) = in_degree.get_mut(dependent.as_str()) else {
                    continue;
                };
                *degree -= 1;
                if *degree == 0 {
                    if let Some(dep_pos) = self.position(dependent) {
                        ready.push(Reverse(dep_pos));
                    }
                }
            }
        }

        // Verify all nodes processed (no cycles)
        if order.len() != self.nodes.len() {
            let cycle = self.detect_cycle().unwrap_or_else(|| {
                "Unable to complete topological sort (cycle detected)".to_string()
            });
            return Err(ExecutorError::CircularDependency(cycle));
        }

        Ok(order)
    }

    /// Detect circular dependencies using an iterative DFS
    ///
    /// # Time Complexity
    ///
    /// O(V + E) where V = number of invocations, E = number of dependencies
    fn detect_cycle(&self) -> Option<String> {
        let mut visited: HashSet<&str> = HashSet::with_capacity(self.nodes.len());

        for invocation_id in &self.insertion_order {
            if visited.contains(invocation_id.as_str()) {
                continue;
            }
            if let Some(cycle) = self.cycle_from(invocation_id, &mut visited) {
                return Some(cycle);
            }
        }

        None
    }

    fn cycle_from<'a>(&'a self, root: &'a str, visited: &mut HashSet<&'a str>) -> Option<String> {
        // (invocation id, index of the next dependency to follow)
        let mut path: Vec<(&'a str, usize)> = vec![(root, 0)];
        // invocation id -> index in `path`
        let mut on_path: HashMap<&'a str, usize> = HashMap::from([(root, 0)]);
        visited.insert(root);

        while let Some(frame) = path.last_mut() {
            let (node, next) = *frame;
            frame.1 += 1;

            let Some(dep) = self.dependencies_of(node).get(next) else {
                on_path.remove(node);
                path.pop();
                continue;
            };
            let dep = dep.as_str();

            // Dependency already on the current path: cycle
            if let Some(&start) = on_path.get(dep) {
                let mut cycle: Vec<&str> = path[start..].iter().map(|(id, _)| *id).collect();
                cycle.push(dep);
                return Some(cycle.join(" -> "));
            }

            if self.nodes.contains_key(dep) && visited.insert(dep) {
                on_path.insert(dep, path.len());
                path.push((dep, 0));
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::types::ToolInvocation;
    use pretty_assertions::assert_eq;

    fn inv(id: &str, deps: &[&str]) -> ToolInvocation {
        ToolInvocation::new(id, "echo").depends_on(deps.iter().copied())
    }

    #[test]
    fn test_from_invocations_builds_edges() {
        let graph =
            DependencyGraph::from_invocations(&[inv("a", &[]), inv("b", &["a"]), inv("c", &["a", "b"])])
                .unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.dependencies_of("c"), ["a".to_string(), "b".to_string()]);
        assert_eq!(
            graph.reverse_edges.get("a").cloned().unwrap_or_default(),
            vec!["b".to_string(), "c".to_string()]
        );
        assert_eq!(graph.position("c"), Some(2));
    }

    #[test]
    fn test_duplicate_invocation_id() {
        let err = DependencyGraph::from_invocations(&[inv("a", &[]), inv("a", &[])]).unwrap_err();
        assert!(matches!(err, ExecutorError::DuplicateInvocationId(id) if id == "a"));
    }

    #[test]
    fn test_missing_dependency_is_rejected() {
        let graph = DependencyGraph::from_invocations(&[inv("a", &["ghost"])]).unwrap();

        let err = graph.validate().unwrap_err();
        assert!(matches!(
            err,
            ExecutorError::DependencyNotFound { ref invocation_id, ref missing_dep }
                if invocation_id == "a" && missing_dep == "ghost"
        ));
        assert!(graph.topological_order().is_err());
    }

    #[test]
    fn test_cycle_reports_path() {
        let graph =
            DependencyGraph::from_invocations(&[inv("a", &["b"]), inv("b", &["c"]), inv("c", &["a"])])
                .unwrap();

        let err = graph.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Circular dependency detected: a -> b -> c -> a"
        );

        let err = graph.topological_order().unwrap_err();
        assert!(err.to_string().contains("Circular dependency"));
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let graph = DependencyGraph::from_invocations(&[inv("a", &["a"])]).unwrap();
        assert!(matches!(
            graph.validate(),
            Err(ExecutorError::CircularDependency(path)) if path == "a -> a"
        ));
    }

    #[test]
    fn test_topological_order_prefers_input_order() {
        let graph = DependencyGraph::from_invocations(&[
            inv("d", &["b", "c"]),
            inv("c", &["a"]),
            inv("b", &["a"]),
            inv("a", &[]),
            inv("e", &[]),
        ])
        .unwrap();

        assert_eq!(graph.topological_order().unwrap(), vec!["a", "c", "b", "d", "e"]);
    }

    #[test]
    fn test_repeated_dependency_counts_once() {
        let graph = DependencyGraph::from_invocations(&[inv("a", &[]), inv("b", &["a", "a"])]).unwrap();
        assert_eq!(graph.topological_order().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_deep_chain_submitted_dependents_first() {
        let depth = 100_000;
        let chain: Vec<ToolInvocation> = (0..depth)
            .rev()
            .map(|i| {
                let node = ToolInvocation::new(format!("n{i}"), "echo");
                if i == 0 {
                    node
                } else {
                    node.depends_on([format!("n{}", i - 1)])
                }
            })
            .collect();

        let graph = DependencyGraph::from_invocations(&chain).unwrap();
        assert!(graph.validate().is_ok());

        let order = graph.topological_order().unwrap();
        assert_eq!(order.len(), depth);
        assert_eq!(order[0], "n0");
        assert_eq!(order[depth - 1], format!("n{}", depth - 1));
    }

    #[test]
    fn test_cycle_behind_long_prefix_reports_only_the_loop() {
        let graph = DependencyGraph::from_invocations(&[
            inv("start", &["mid"]),
            inv("mid", &["x"]),
            inv("x", &["y"]),
            inv("y", &["x"]),
        ])
        .unwrap();

        assert!(matches!(
            graph.validate(),
            Err(ExecutorError::CircularDependency(path)) if path == "x -> y -> x"
        ));
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::<ToolInvocation>::from_invocations(&[]).unwrap();
        assert!(graph.is_empty());
        assert!(graph.topological_order().unwrap().is_empty());
    }
}
