//! Overhead benchmarks for the execution drivers
//!
//! Run with: cargo bench --bench execute_overhead

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::io;
use std::time::Duration;
use turboretry::prelude::*;

fn instant_policy(retry_count: u32) -> RetryPolicy {
    RetryPolicy::new(
        FixedInterval::builder()
            .retry_count(retry_count)
            .retry_interval(Duration::ZERO)
            .build(),
        AlwaysTransient,
    )
}

fn bench_blocking_success(c: &mut Criterion) {
    let policy = instant_policy(3);

    c.bench_function("execute_first_attempt_success", |b| {
        b.iter(|| {
            let result: Result<u64, io::Error> = policy.execute(|| Ok(black_box(42)));
            result
        });
    });
}

fn bench_blocking_retries(c: &mut Criterion) {
    let mut group = c.benchmark_group("execute_retries");

    for failures in [1u32, 10, 100] {
        let policy = instant_policy(failures);
        group.bench_with_input(BenchmarkId::from_parameter(failures), &failures, |b, &n| {
            b.iter(|| {
                let mut attempts = 0;
                let result: Result<u32, io::Error> = policy.execute(|| {
                    attempts += 1;
                    if attempts <= n {
                        return Err(io::Error::other("flaky").into());
                    }
                    Ok(attempts)
                });
                result
            });
        });
    }

    group.finish();
}

fn bench_async_success(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let policy = instant_policy(3);

    c.bench_function("execute_async_first_attempt_success", |b| {
        b.iter(|| {
            runtime.block_on(policy.execute_async(
                || async { Ok::<_, AttemptError<io::Error>>(black_box(42u64)) },
                None,
            ))
        });
    });
}

fn bench_exponential_delay(c: &mut Criterion) {
    let strategy = ExponentialBackoff::builder()
        .retry_count(u32::MAX)
        .min_backoff(Duration::from_millis(100))
        .max_backoff(Duration::from_secs(60))
        .delta_backoff(Duration::from_millis(500))
        .build()
        .unwrap();
    let err = io::Error::other("x");

    c.bench_function("exponential_decide", |b| {
        b.iter(|| strategy.decide(black_box(12), &err));
    });
}

criterion_group!(
    benches,
    bench_blocking_success,
    bench_blocking_retries,
    bench_async_success,
    bench_exponential_delay
);
criterion_main!(benches);
