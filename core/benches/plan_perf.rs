//! Planning benchmarks
//!
//! Measures graph validation, topological sorting and level grouping on
//! layered batches of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use toolflow_core::{ExecutionPlan, ToolInvocation};

/// `layers` levels of `width` invocations; every invocation depends on two
/// invocations of the previous layer.
fn layered_batch(layers: usize, width: usize) -> Vec<ToolInvocation> {
    let mut batch = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for i in 0..width {
            let mut inv = ToolInvocation::new(format!("inv_{layer}_{i}"), "echo");
            if layer > 0 {
                inv = inv.depends_on([
                    format!("inv_{}_{}", layer - 1, i),
                    format!("inv_{}_{}", layer - 1, (i + 1) % width),
                ]);
            }
            batch.push(inv);
        }
    }
    batch
}

fn bench_plan_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_build");

    for (layers, width) in [(10, 10), (20, 50), (50, 100)] {
        let batch = layered_batch(layers, width);
        group.bench_with_input(
            BenchmarkId::from_parameter(batch.len()),
            &batch,
            |b, batch| {
                b.iter(|| ExecutionPlan::build(black_box(batch)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_wide_single_level(c: &mut Criterion) {
    let batch: Vec<_> = (0..2_000)
        .map(|i| ToolInvocation::new(format!("inv_{i}"), "echo"))
        .collect();

    c.bench_function("plan_wide_2000", |b| {
        b.iter(|| ExecutionPlan::build(black_box(&batch)).unwrap())
    });
}

criterion_group!(benches, bench_plan_build, bench_wide_single_level);
criterion_main!(benches);
