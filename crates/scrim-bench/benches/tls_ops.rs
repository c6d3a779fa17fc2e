//! Criterion micro-benchmarks for thread-local registry access.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use scrim_bench::{reference_sizes, run_staging_cycle};
use scrim_stack::with_stack;

/// Benchmark: bare registry access, the cost added to every staged call.
fn bench_with_stack_access(c: &mut Criterion) {
    c.bench_function("with_stack_access", |b| {
        b.iter(|| with_stack(|stack| black_box(stack.pointer())));
    });
}

/// Benchmark: a full staging cycle through the registry.
fn bench_with_stack_staging(c: &mut Criterion) {
    let sizes = reference_sizes();
    c.bench_function("with_stack_staging", |b| {
        b.iter(|| with_stack(|stack| black_box(run_staging_cycle(stack, &sizes))));
    });
}

criterion_group!(benches, bench_with_stack_access, bench_with_stack_staging);
criterion_main!(benches);
