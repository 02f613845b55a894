use std::collections::HashMap;

use crate::error::ExecutorError;

use super::graph::DependencyGraph;
use super::types::InvocationLike;

/// Group a topological order into levels of mutually independent invocations.
///
/// An invocation without dependencies sits on level 0; any other invocation
/// sits one level above its deepest dependency. Invocations within a level
/// keep their submission order.
pub fn group_levels<T: InvocationLike>(
    order: &[String],
    graph: &DependencyGraph<T>,
) -> Result<Vec<Vec<T>>, ExecutorError> {
    let mut level_of: HashMap<&str, usize> = HashMap::with_capacity(order.len());
    let mut buckets: Vec<Vec<(usize, &str)>> = Vec::new();

    for invocation_id in order {
        let mut level = 0;
        for dep in graph.dependencies_of(invocation_id) {
            let dep_level = level_of.get(dep.as_str()).copied().ok_or_else(|| {
                ExecutorError::Runner(format!(
                    "dependency '{}' of '{}' is not ordered before it",
                    dep, invocation_id
                ))
            })?;
            level = level.max(dep_level + 1);
        }

        level_of.insert(invocation_id.as_str(), level);
        if buckets.len() <= level {
            buckets.resize_with(level + 1, Vec::new);
        }
        let position = graph.position(invocation_id).unwrap_or(usize::MAX);
        buckets[level].push((position, invocation_id.as_str()));
    }

    buckets
        .into_iter()
        .map(|mut bucket| {
            bucket.sort_by_key(|(position, _)| *position);
            bucket
                .into_iter()
                .map(|(_, id)| {
                    graph
                        .get(id)
                        .cloned()
                        .ok_or_else(|| ExecutorError::InvocationNotFound(id.to_string()))
                })
                .collect::<Result<Vec<T>, ExecutorError>>()
        })
        .collect()
}
