// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dispatch Benchmark
//!
//! Measures the loosely-typed hot paths management tooling drives:
//! - attribute read and write through the registry
//! - overloaded operation lookup and invocation
//! - record projection of a native item
//!
//! Notification delivery uses the inline executor so only dispatch cost is
//! measured.

#![allow(clippy::uninlined_format_args)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dynbean::notification::InlineExecutor;
use dynbean::open_type::OpenValue;
use dynbean::writer::RecordWriter;
use dynbean::ManagementRegistry;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

struct Sample {
    id: u64,
    name: String,
    load: f64,
}

fn registry() -> ManagementRegistry {
    let counter = Arc::new(AtomicI64::new(0));
    let (r, w) = (counter.clone(), counter);
    ManagementRegistry::builder()
        .class_name("Bench")
        .executor(Arc::new(InlineExecutor))
        .attribute(
            "counter",
            "Counter",
            move || r.load(Ordering::Relaxed),
            move |v: i64| w.store(v, Ordering::Relaxed),
        )
        .operation("concat", "Join", &["a", "b"], |a: String, b: String| {
            format!("{}{}", a, b)
        })
        .operation("add", "Add", &["a", "b"], |a: i64, b: i64| a + b)
        .operation("add", "Add", &["a", "b"], |a: f64, b: f64| a + b)
        .build()
        .expect("bench registry")
}

fn bench_attributes(c: &mut Criterion) {
    let registry = registry();
    c.bench_function("get_value", |b| {
        b.iter(|| black_box(registry.get_value(black_box("counter")).expect("get")));
    });

    let mut n = 0_i64;
    c.bench_function("set_value", |b| {
        b.iter(|| {
            n += 1;
            registry
                .set_value(black_box("counter"), OpenValue::I64(n))
                .expect("set");
        });
    });
}

fn bench_operations(c: &mut Criterion) {
    let registry = registry();
    let strings = [OpenValue::from("left"), OpenValue::from("right")];
    c.bench_function("invoke_concat", |b| {
        b.iter(|| {
            black_box(
                registry
                    .invoke_operation("concat", black_box(&strings), &["string", "string"])
                    .expect("invoke"),
            )
        });
    });

    let floats = [OpenValue::F64(1.5), OpenValue::F64(2.5)];
    c.bench_function("invoke_overload", |b| {
        b.iter(|| {
            black_box(
                registry
                    .invoke_operation("add", black_box(&floats), &["f64", "f64"])
                    .expect("invoke"),
            )
        });
    });
}

fn bench_record_writer(c: &mut Criterion) {
    let writer = RecordWriter::builder("Sample")
        .field("id", |s: &Sample| s.id)
        .field("name", |s: &Sample| s.name.clone())
        .field("load", |s: &Sample| s.load)
        .build()
        .expect("writer");
    let sample = Sample {
        id: 7,
        name: "worker-7".to_string(),
        load: 0.42,
    };
    c.bench_function("record_apply", |b| {
        b.iter(|| black_box(writer.apply(black_box(&sample)).expect("apply")));
    });
}

criterion_group!(
    benches,
    bench_attributes,
    bench_operations,
    bench_record_writer
);
criterion_main!(benches);
