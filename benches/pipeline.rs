//! Criterion benchmarks for the dataset pipeline.
//!
//! Datasets in practice hold tens to a few thousand rows; these benchmarks track the
//! single-pass ingestion, aggregation and table projection costs across that range.
//!
//! Run with: cargo bench --bench pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use equipment_dashboard::projection::{
    category_profiles, NormalizationDivisors, SortDirection, SortField,
};
use equipment_dashboard::{aggregate, ingest_csv, query, to_csv, Record, TableQuery};

fn synthetic_records(n: usize) -> Vec<Record> {
    let categories = ["Pump", "Reactor", "Heat Exchanger", "Column", "Compressor", "Tank"];
    (0..n)
        .map(|i| {
            Record::new(
                &format!("Unit {i}"),
                categories[i % categories.len()],
                (i % 500) as f64 + 0.5,
                (i % 40) as f64 * 0.75,
                (i % 220) as f64,
            )
            .unwrap()
        })
        .collect()
}

const SIZES: [usize; 3] = [50, 500, 5000];

fn ingest_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    for size in SIZES {
        let csv = to_csv(&synthetic_records(size)).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("ingest_csv", size), &csv, |b, csv| {
            b.iter(|| ingest_csv(black_box(csv)).unwrap());
        });
    }
    group.finish();
}

fn aggregate_and_profiles(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    let divisors = NormalizationDivisors::default();
    for size in SIZES {
        let records = synthetic_records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("aggregate", size), &records, |b, records| {
            b.iter(|| aggregate(black_box(records)));
        });
        group.bench_with_input(
            BenchmarkId::new("category_profiles", size),
            &records,
            |b, records| {
                b.iter(|| category_profiles(black_box(records), &divisors));
            },
        );
    }
    group.finish();
}

fn table_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection");
    let q = TableQuery::new()
        .search("unit 1")
        .sort(SortField::Name, SortDirection::Desc)
        .page(2);
    for size in SIZES {
        let records = synthetic_records(size);
        group.bench_with_input(BenchmarkId::new("query", size), &records, |b, records| {
            b.iter(|| query(black_box(records), &q).total_matches);
        });
    }
    group.finish();
}

criterion_group!(benches, ingest_throughput, aggregate_and_profiles, table_query);
criterion_main!(benches);
