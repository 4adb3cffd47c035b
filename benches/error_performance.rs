// benches/error_performance.rs
//! Benchmarks for kcl_errors hot paths.
//!
//! Error creation is on every failure path of a record processor, so it should
//! cost one small struct copy until a call site adds detail.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kcl_errors::{ClientLibraryError, ErrorCode, ErrorRecord, REGISTRY, new_error, lib_err};
use std::fmt::Write;
use std::io;

// ============================================================================
// Creation
// ============================================================================

fn bench_error_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("creation");

    group.bench_function("new_error", |b| {
        b.iter(|| new_error(black_box(ErrorCode::ThrottlingError)))
    });

    group.bench_function("lib_err_formatted", |b| {
        b.iter(|| lib_err!(black_box(ErrorCode::ThrottlingError), "retry after {}ms", black_box(200)))
    });

    group.bench_function("registry_lookup_hit", |b| b.iter(|| REGISTRY.lookup(black_box(41203))));

    group.bench_function("registry_lookup_miss", |b| b.iter(|| REGISTRY.lookup(black_box(41250))));

    group.finish();
}

// ============================================================================
// Enrichment
// ============================================================================

fn bench_enrichment(c: &mut Criterion) {
    let mut group = c.benchmark_group("enrichment");

    for depth in [1usize, 4, 16] {
        group.bench_with_input(BenchmarkId::new("with_detail_chain", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut err = new_error(ErrorCode::LeasingDependencyError);
                for i in 0..depth {
                    err = err.with_detail(format_args!("frame {}", i));
                }
                err
            })
        });
    }

    let cause = io::Error::new(io::ErrorKind::TimedOut, "timeout");
    group.bench_function("with_cause", |b| {
        b.iter(|| new_error(ErrorCode::KinesisClientLibIOError).with_cause(black_box(&cause)))
    });

    group.bench_function("with_source", |b| {
        b.iter(|| new_error(ErrorCode::KinesisClientLibIOError).with_source(io::Error::other("pipe closed")))
    });

    group.finish();
}

// ============================================================================
// Formatting
// ============================================================================

fn sample_error() -> ClientLibraryError {
    new_error(ErrorCode::ThrottlingError)
        .with_detail("table=orders-app")
        .with_detail("operation=PutItem")
}

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    let err = sample_error();

    group.bench_function("display", |b| b.iter(|| black_box(&err).to_string()));

    group.bench_function("log_record_write_to", |b| {
        let mut buffer = String::with_capacity(512);
        b.iter(|| {
            buffer.clear();
            black_box(&err).log_record().write_to(&mut buffer).unwrap();
            black_box(buffer.len())
        })
    });

    let oversized = new_error(ErrorCode::KinesisClientLibIOError).with_detail("x".repeat(8192));
    group.bench_function("log_record_truncated", |b| {
        let mut buffer = String::with_capacity(2048);
        b.iter(|| {
            buffer.clear();
            write!(buffer, "{}", black_box(&oversized).log_record()).unwrap();
            black_box(buffer.len())
        })
    });

    group.finish();
}

// ============================================================================
// Wire Record
// ============================================================================

fn bench_wire(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire");
    let err = sample_error();
    let json = serde_json::to_string(&err).unwrap();

    group.bench_function("serialize", |b| b.iter(|| serde_json::to_string(black_box(&err)).unwrap()));

    group.bench_function("decode", |b| {
        b.iter(|| {
            let record: ErrorRecord = serde_json::from_str(black_box(&json)).unwrap();
            ClientLibraryError::try_from(record).unwrap()
        })
    });

    group.finish();
}

criterion_group!(creation_benches, bench_error_creation, bench_enrichment);
criterion_group!(output_benches, bench_formatting, bench_wire);
criterion_main!(creation_benches, output_benches);
