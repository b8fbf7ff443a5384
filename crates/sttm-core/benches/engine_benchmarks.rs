//! Benchmarks for path resolution and record transformation
//!
//! Copyright (c) 2025 STTM Engine Authors
//! Licensed under the Apache-2.0 license

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use sttm_core::{
    BatchRunner, FailurePolicy, FieldPath, MappingCatalog, TransformRegistry,
    TransformationEngine,
};

fn loan_engine() -> TransformationEngine {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/loan_catalog.json");
    let catalog = MappingCatalog::from_path(path).expect("Failed to load loan catalog");
    TransformationEngine::new(catalog, TransformRegistry::builtin()).expect("Invalid catalog")
}

fn loan_record(i: usize) -> Value {
    json!({
        "Gender": if i % 2 == 0 { " male " } else { "FEMALE" },
        "Married": "yes",
        "Age": format!("{}", 20 + i % 50),
        "Dependents": "1",
        "Education": "not graduate",
        "Self_Employed": "no",
        "Applicant_Income": format!("{}", 3000 + i),
        "Coapplicant_Income": "0",
        "Load_Date": "2021-03-01",
        "Loan_Amount": "128",
        "Term": "360",
        "Credit_History": "1",
        "Area": "semiurban"
    })
}

fn bench_path_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("path_parsing");

    for expr in ["$.Gender", "$.applicant.address.city", "$['odd key'][3].name"] {
        group.bench_with_input(BenchmarkId::new("parse", expr), expr, |b, expr| {
            b.iter(|| FieldPath::parse(black_box(expr)))
        });
    }

    group.finish();
}

fn bench_path_resolution(c: &mut Criterion) {
    let record = json!({"applicant": {"address": {"city": "Pune"}, "phones": ["1", "2", "3"]}});
    let mut group = c.benchmark_group("path_resolution");

    for expr in ["$.applicant.address.city", "$.applicant.phones[2]", "$.missing.field"] {
        let path = FieldPath::parse(expr).unwrap();
        group.bench_with_input(BenchmarkId::new("resolve", expr), &path, |b, path| {
            b.iter(|| path.resolve(black_box(&record)))
        });
    }

    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let engine = loan_engine();
    let record = loan_record(0);

    c.bench_function("transform_loan_record", |b| {
        b.iter(|| engine.transform(black_box(&record)))
    });
}

fn bench_batches(c: &mut Criterion) {
    let engine = loan_engine();
    let mut group = c.benchmark_group("batch");

    for size in [10usize, 100, 1000] {
        let records: Vec<Value> = (0..size).map(loan_record).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("run_all", size), &records, |b, records| {
            let runner = BatchRunner::new(&engine, FailurePolicy::CollectErrors);
            b.iter(|| runner.run_all(black_box(records)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_path_parsing,
    bench_path_resolution,
    bench_transform,
    bench_batches
);
criterion_main!(benches);
