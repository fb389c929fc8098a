//! End-to-end tests of the ingestion → aggregation → projection → report pipeline.
//!
//! These exercise the public API only, the same way the CLI and any dashboard frontend
//! consume it.

use chrono::{TimeZone, Utc};
use equipment_dashboard::config::ReportConfig;
use equipment_dashboard::projection::{self, SortDirection, SortField};
use equipment_dashboard::{
    aggregate, compose, ingest_csv, query, sample, to_csv, AppConfig, DashboardError,
    DatasetSummary, ErrorKind, NumericField, Record, TableQuery,
};
use std::fs;
use tempfile::TempDir;

const HEADER: &str = "Equipment Name,Type,Flowrate,Pressure,Temperature";

// =============================================================================
// Test Helper Functions
// =============================================================================

fn record(name: &str, category: &str, f: f64, p: f64, t: f64) -> Record {
    Record::new(name, category, f, p, t).unwrap()
}

/// Deterministic pseudo-random collection with repeated keys.
fn mixed_records(n: usize) -> Vec<Record> {
    let categories = ["Pump", "Reactor", "Heat Exchanger", "Tank"];
    (0..n)
        .map(|i| {
            record(
                &format!("Unit {}", (i * 7) % 13),
                categories[(i * 5) % categories.len()],
                ((i * 37) % 11) as f64 * 12.5,
                ((i * 17) % 5) as f64 + 0.5,
                ((i * 23) % 7) as f64 * 10.0 - 20.0,
            )
        })
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn two_pumps_end_to_end() {
    let text = format!("{HEADER}\nPump A,Pump,100,5,40\nPump B,Pump,200,7,50");
    let records = ingest_csv(&text).unwrap();
    assert_eq!(records.len(), 2);

    let stats = aggregate(&records);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.averages.flowrate, 150.0);
    assert_eq!(stats.averages.pressure, 6.0);
    assert_eq!(stats.averages.temperature, 45.0);
    assert_eq!(stats.category_distribution.len(), 1);
    assert_eq!(stats.category_distribution["Pump"], 2);
}

#[test]
fn empty_name_on_second_row_rejects_batch() {
    let text = format!("{HEADER}\nPump A,Pump,100,5,40\n,Pump,200,7,50\nPump C,Pump,1,1,1");
    let err = ingest_csv(&text).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingField);
    match err {
        DashboardError::Validation { row_index, field } => {
            assert_eq!(row_index, 2);
            assert_eq!(field, "name");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(DatasetSummary::ingest("bad.csv", &text).is_err());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn distribution_sums_to_count() {
    for n in [1, 2, 7, 40] {
        let stats = aggregate(&mixed_records(n));
        assert_eq!(stats.count, n);
        assert_eq!(stats.category_distribution.values().sum::<usize>(), n);
    }
}

#[test]
fn empty_aggregate_is_zero() {
    let stats = aggregate(&[]);
    assert_eq!(stats.count, 0);
    for field in NumericField::ALL {
        assert_eq!(stats.average(field), 0.0);
        assert_eq!(stats.range(field).min, 0.0);
        assert_eq!(stats.range(field).max, 0.0);
    }
}

#[test]
fn csv_round_trip_preserves_fields() {
    let mut records = mixed_records(25);
    records.push(record("Shell, Tube \"HE\"", "Heat Exchanger", 0.1, -3.25, 1e-3));
    let back = ingest_csv(&to_csv(&records).unwrap()).unwrap();
    assert_eq!(back.len(), records.len());
    for (a, b) in back.iter().zip(&records) {
        assert!(a.same_reading(b), "{a:?} != {b:?}");
        assert_ne!(a.id(), b.id());
    }
}

#[test]
fn projection_is_idempotent() {
    let records = mixed_records(30);
    let q = TableQuery::new()
        .search("unit 1")
        .sort(SortField::Flowrate, SortDirection::Desc)
        .page_size(4)
        .page(2);
    let first = query(&records, &q);
    let second = query(&records, &q);
    assert_eq!(first, second);
}

#[test]
fn stable_sort_in_both_directions() {
    let records = mixed_records(40);
    for direction in [SortDirection::Asc, SortDirection::Desc] {
        let q = TableQuery::new()
            .sort(SortField::Category, direction)
            .page_size(records.len());
        let page = query(&records, &q);
        assert_eq!(page.rows.len(), records.len());

        // Within each category the rows must appear in input order.
        for category in ["Pump", "Reactor", "Heat Exchanger", "Tank"] {
            let sorted: Vec<_> = page
                .rows
                .iter()
                .filter(|r| r.category() == category)
                .map(|r| r.id())
                .collect();
            let original: Vec<_> = records
                .iter()
                .filter(|r| r.category() == category)
                .map(|r| r.id())
                .collect();
            assert_eq!(sorted, original);
        }
    }
}

#[test]
fn report_percentages_on_three_records() {
    let records = vec![
        record("Pump A", "Pump", 100.0, 5.0, 40.0),
        record("Pump B", "Pump", 200.0, 7.0, 50.0),
        record("Reactor R1", "Reactor", 75.0, 25.0, 180.0),
    ];
    let generated_at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
    let report = compose(&records, generated_at, &ReportConfig::default()).unwrap();
    let sum: f64 = report.categories.iter().map(|c| c.percentage).sum();
    assert!((sum - 100.0).abs() <= 0.1, "sum was {sum}");
    assert_eq!(report.data.len(), 3);
}

#[test]
fn report_refuses_empty_dataset() {
    let err = compose(&[], Utc::now(), &ReportConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyReport);
}

#[test]
fn sample_dataset_flows_through_pipeline() {
    let csv = sample::sample_csv().unwrap();
    let summary = DatasetSummary::ingest(sample::SAMPLE_FILE_NAME, &csv).unwrap();
    assert_eq!(summary.record_count(), 20);

    let pumps = query(
        summary.records(),
        &TableQuery::new()
            .category("Pump".parse().unwrap())
            .sort(SortField::Flowrate, SortDirection::Desc),
    );
    assert_eq!(pumps.total_matches, 4);
    assert_eq!(pumps.rows[0].name(), "Booster Pump BP-03");

    let report = compose(summary.records(), Utc::now(), &ReportConfig::default()).unwrap();
    assert_eq!(report.pages(10).len(), 2);
}

#[test]
fn configured_top_n_sizes_the_comparison_chart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dashboard.toml");
    fs::write(&path, "[projection]\ntop_n = 3\n").unwrap();
    let config = AppConfig::load_validated(&path).unwrap();

    let csv = sample::sample_csv().unwrap();
    let summary = DatasetSummary::ingest(sample::SAMPLE_FILE_NAME, &csv).unwrap();
    let charts = projection::chart_series(summary.records(), &config.projection);
    assert_eq!(charts.comparison.len(), 3);
    assert_eq!(charts.trend.len(), 20);
    assert_eq!(charts.categories.len(), 6);
}

#[test]
fn huge_readings_survive_the_pipeline() {
    let text = format!("{HEADER}\nTurbine A,Turbine,1e308,1,20\nTurbine B,Turbine,1e308,3,30");
    let summary = DatasetSummary::ingest("turbines.csv", &text).unwrap();
    assert_eq!(summary.averages().flowrate, 1e308);
    let report = compose(summary.records(), Utc::now(), &ReportConfig::default()).unwrap();
    assert!(report.summary.iter().all(|row| !row.value.contains("inf")));
}
