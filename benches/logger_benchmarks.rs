//! Criterion benchmarks for context_logger

use context_logger::core::{bound, redact};
use context_logger::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use std::sync::Arc;

fn logger(policy: RedactionPolicy, min_level: LogLevel) -> ContextLogger {
    let dispatcher = Dispatcher::builder()
        .min_level(min_level)
        .appender(MemoryAppender::new())
        .build();
    ContextLogger::new(
        Arc::new(dispatcher),
        Arc::new(policy),
        LogContext::new()
            .with_field("service", "bench")
            .with_field("region", "eu-west-1"),
    )
}

fn sample_payload() -> Value {
    json!({
        "user": {"id": 42, "name": "ann", "password": "hunter2"},
        "request": {"path": "/api/orders", "headers": {"authorization": "Bearer x", "accept": "json"}},
        "items": [1, 2, 3],
        "secret_token": "abc",
    })
}

// ============================================================================
// Data Preparation Benchmarks
// ============================================================================

fn bench_prepare_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare_data");
    group.throughput(Throughput::Elements(1));

    let plain = logger(RedactionPolicy::empty(), LogLevel::Trace);
    let masked = logger(
        RedactionPolicy::new(["password", "authorization"], ["^secret_"]).unwrap(),
        LogLevel::Trace,
    );
    let payload = sample_payload();

    group.bench_function("no_policy", |b| {
        b.iter(|| black_box(plain.prepare_data(Some(payload.clone()), &[]).unwrap()));
    });

    group.bench_function("keys_and_patterns", |b| {
        b.iter(|| black_box(masked.prepare_data(Some(payload.clone()), &[]).unwrap()));
    });

    group.finish();
}

fn bench_redact(c: &mut Criterion) {
    let mut group = c.benchmark_group("redact");
    let policy = RedactionPolicy::new(["password"], ["token$", "^auth"]).unwrap();
    let payload = sample_payload();

    group.bench_function("nested_tree", |b| {
        b.iter(|| black_box(redact(black_box(&payload), &policy)));
    });

    group.finish();
}

fn bench_bound(c: &mut Criterion) {
    let mut group = c.benchmark_group("bound");
    let payload = sample_payload();

    for depth in [0usize, 1, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| black_box(bound(black_box(&payload), depth)));
        });
    }

    group.finish();
}

// ============================================================================
// End-to-end Logging Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = logger(RedactionPolicy::new(["password"], Vec::<String>::new()).unwrap(), LogLevel::Debug);
    let payload = sample_payload();

    group.bench_function("info_message_only", |b| {
        b.iter(|| logger.info(black_box("Info message")).unwrap());
    });

    group.bench_function("info_with_data", |b| {
        b.iter(|| logger.info_with(black_box("Info message"), &payload).unwrap());
    });

    // Filtered calls only serialize and shape-check the data
    group.bench_function("filtered_trace_with_data", |b| {
        b.iter(|| logger.trace_with(black_box("Trace message"), &payload).unwrap());
    });

    group.bench_function("derive_child", |b| {
        b.iter(|| black_box(logger.get_logger_with_context(LogContext::new().with_field("req", 1))));
    });

    group.finish();
}

criterion_group!(benches, bench_prepare_data, bench_redact, bench_bound, bench_logging);

criterion_main!(benches);
