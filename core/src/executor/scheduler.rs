use std::future::Future;
use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;

use crate::error::ExecutorError;

use super::types::{ToolInvocation, ToolResult};

/// Execute a single level of invocations in parallel
///
/// Every invocation acquires a permit before `executor_fn` runs and drops it
/// when its future finishes, so at most `max_parallelism` run at once. Returns
/// only after all invocations of the level reached a terminal state.
///
/// # Arguments
///
/// * `level` - Invocations with no dependency relationship among them
/// * `max_parallelism` - Maximum number of concurrent invocations
/// * `executor_fn` - Async function producing the result of a single invocation
///
/// # Returns
///
/// One `ToolResult` per invocation, in the order of `level`
pub async fn execute_level_parallel<F, Fut>(
    level: &[ToolInvocation],
    max_parallelism: usize,
    executor_fn: F,
) -> Result<Vec<ToolResult>, ExecutorError>
where
    F: Fn(ToolInvocation) -> Fut,
    Fut: Future<Output = ToolResult> + Send,
{
    let sem = Arc::new(Semaphore::new(max_parallelism.max(1)));
    let mut futs: FuturesUnordered<_> = FuturesUnordered::new();

    for (slot, invocation) in level.iter().enumerate() {
        let sem = sem.clone();
        let run = executor_fn(invocation.clone());

        futs.push(async move {
            let _permit = sem
                .acquire_owned()
                .await
                .map_err(|_| ExecutorError::Runner("semaphore closed unexpectedly".into()))?;

            Ok::<_, ExecutorError>((slot, run.await))
        });
    }

    let mut slots: Vec<Option<ToolResult>> = vec![None; level.len()];

    while let Some(res) = futs.next().await {
        let (slot, result) = res?;
        slots[slot] = Some(result);
    }

    slots
        .into_iter()
        .zip(level)
        .map(|(result, invocation)| {
            result.ok_or_else(|| {
                ExecutorError::Runner(format!(
                    "no result recorded for invocation '{}'",
                    invocation.invocation_id
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_follow_level_order() {
        let level: Vec<_> = (0..4)
            .map(|i| ToolInvocation::new(format!("inv_{i}"), "sleep"))
            .collect();

        // Later invocations finish first.
        let results = execute_level_parallel(&level, 4, |invocation| async move {
            let idx: u64 = invocation.invocation_id[4..].parse().unwrap();
            tokio::time::sleep(Duration::from_millis(40 - idx * 10)).await;
            ToolResult::succeeded(&invocation, json!(idx), 0)
        })
        .await
        .unwrap();

        let ids: Vec<_> = results.iter().map(|r| r.invocation_id.as_str()).collect();
        assert_eq!(ids, vec!["inv_0", "inv_1", "inv_2", "inv_3"]);
    }

    #[tokio::test]
    async fn test_permits_bound_concurrency() {
        let level: Vec<_> = (0..8)
            .map(|i| ToolInvocation::new(format!("inv_{i}"), "sleep"))
            .collect();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let results = execute_level_parallel(&level, 2, |invocation| {
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                ToolResult::succeeded(&invocation, json!(null), 10)
            }
        })
        .await
        .unwrap();

        assert_eq!(results.len(), 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_empty_level() {
        let results = execute_level_parallel(&[], 3, |invocation| async move {
            ToolResult::succeeded(&invocation, json!(null), 0)
        })
        .await
        .unwrap();
        assert!(results.is_empty());
    }
}
