//! One ingested batch of records together with its derived statistics.

use crate::aggregate::{aggregate, AggregateSummary};
use crate::error::AppResult;
use crate::ingest::ingest_csv;
use crate::record::{Averages, Record};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier of a dataset.
pub type DatasetId = Uuid;

/// An ingested batch: records plus metadata and derived aggregates.
///
/// Built in one step by [`DatasetSummary::from_records`] or [`DatasetSummary::ingest`];
/// the derived fields are computed from `records` at that moment and the value is
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    id: DatasetId,
    source_name: String,
    ingested_at: DateTime<Utc>,
    record_count: usize,
    averages: Averages,
    category_distribution: BTreeMap<String, usize>,
    records: Vec<Record>,
}

impl DatasetSummary {
    /// Summarise `records` under a fresh id, stamped with the current time.
    pub fn from_records(source_name: impl Into<String>, records: Vec<Record>) -> Self {
        Self::restore(Uuid::new_v4(), source_name, Utc::now(), records)
    }

    /// Summarise `records` under an existing id and timestamp.
    pub fn restore(
        id: DatasetId,
        source_name: impl Into<String>,
        ingested_at: DateTime<Utc>,
        records: Vec<Record>,
    ) -> Self {
        let AggregateSummary {
            count,
            averages,
            category_distribution,
            ..
        } = aggregate(&records);
        Self {
            id,
            source_name: source_name.into(),
            ingested_at,
            record_count: count,
            averages,
            category_distribution,
            records,
        }
    }

    /// Ingest CSV text and summarise it. Fails without producing a summary if any row is
    /// rejected.
    pub fn ingest(source_name: impl Into<String>, csv_text: &str) -> AppResult<Self> {
        let records = ingest_csv(csv_text)?;
        Ok(Self::from_records(source_name, records))
    }

    /// Dataset id.
    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Provenance label, typically the uploaded file name.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Ingestion timestamp.
    pub fn ingested_at(&self) -> DateTime<Utc> {
        self.ingested_at
    }

    /// Number of records; always `records().len()`.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Per-field means.
    pub fn averages(&self) -> Averages {
        self.averages
    }

    /// Records per category.
    pub fn category_distribution(&self) -> &BTreeMap<String, usize> {
        &self.category_distribution
    }

    /// Records in ingestion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Full aggregate (including ranges) of this dataset's records.
    pub fn aggregate(&self) -> AggregateSummary {
        aggregate(&self.records)
    }
}
