//! # Equipment Dashboard Core Library
//!
//! This crate holds the data pipeline behind the chemical equipment parameter dashboard:
//! it ingests equipment sensor readings from CSV, computes summary statistics, derives the
//! table and chart views a dashboard shows, keeps a bounded history of uploaded datasets
//! and composes structured reports for external renderers. The `equipment-dashboard`
//! binary (`main.rs`) is a thin command-line frontend over the same API.
//!
//! ## Crate Structure
//!
//! - **`record`**: The canonical [`Record`] shape of one equipment reading.
//! - **`ingest`**: CSV parsing and validation into records, and the canonical CSV writer.
//! - **`aggregate`**: Single-pass count, averages, ranges and category distribution.
//! - **`dataset`**: [`DatasetSummary`], one ingested batch with its derived statistics.
//! - **`projection`**: Search/filter/sort/paginate, top-N slices, per-category profiles
//!   and chart series.
//! - **`history`**: The bounded, most-recent-first [`HistoryStore`] and its JSON
//!   persistence adapter.
//! - **`report`**: Structured, renderer-agnostic report documents.
//! - **`sample`**: The built-in sample dataset.
//! - **`config`**: Figment-based configuration loading and validation.
//! - **`telemetry`**: `tracing` subscriber setup for binaries.
//! - **`error`**: The crate-wide [`DashboardError`] type.
//!
//! ## Example
//!
//! ```
//! use equipment_dashboard::{DatasetSummary, HistoryStore};
//!
//! let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\n\
//!            Pump A,Pump,100,5,40\n\
//!            Pump B,Pump,200,7,50";
//! let summary = DatasetSummary::ingest("pumps.csv", csv)?;
//! assert_eq!(summary.averages().flowrate, 150.0);
//!
//! let mut history = HistoryStore::default();
//! history.add(summary);
//! assert_eq!(history.len(), 1);
//! # Ok::<(), equipment_dashboard::DashboardError>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod history;
pub mod ingest;
pub mod projection;
pub mod record;
pub mod report;
pub mod sample;
pub mod telemetry;

pub use aggregate::{aggregate, AggregateSummary, Range};
pub use config::AppConfig;
pub use dataset::{DatasetId, DatasetSummary};
pub use error::{AppResult, DashboardError, ErrorKind};
pub use history::{HistoryStore, SharedHistory};
pub use ingest::{ingest_csv, to_csv};
pub use projection::{query, TablePage, TableQuery};
pub use record::{Averages, NumericField, Record};
pub use report::{compose, Report};
