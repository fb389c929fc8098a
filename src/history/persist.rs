//! Loading and saving dataset history.
//!
//! [`PersistedDataset`] is the loosely-typed wire shape exchanged with whatever stores
//! history (a backend, a JSON file). Every optional key has a documented default, and
//! [`PersistedDataset::into_summary`] is the one total mapping from that shape into a
//! [`DatasetSummary`]. Persisted aggregates are never trusted: they are recomputed from
//! the records on the way in.

use crate::dataset::{DatasetId, DatasetSummary};
use crate::error::{AppResult, DashboardError};
use crate::record::{Averages, Record};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// One record as persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    /// Record id; a fresh one is assigned when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Equipment name.
    #[serde(default, alias = "equipmentName")]
    pub name: String,
    /// Equipment type.
    #[serde(default, alias = "type")]
    pub category: String,
    /// Flowrate; `0` when absent.
    #[serde(default)]
    pub flowrate: Option<f64>,
    /// Pressure; `0` when absent.
    #[serde(default)]
    pub pressure: Option<f64>,
    /// Temperature; `0` when absent.
    #[serde(default)]
    pub temperature: Option<f64>,
}

/// One dataset summary as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDataset {
    /// Dataset id.
    pub id: DatasetId,
    /// Provenance label.
    pub source_name: String,
    /// Ingestion timestamp.
    pub ingested_at: DateTime<Utc>,
    /// Stored record count; informational only.
    #[serde(default)]
    pub record_count: usize,
    /// Stored averages; informational only.
    #[serde(default)]
    pub averages: Averages,
    /// Stored distribution; informational only.
    #[serde(default)]
    pub category_distribution: BTreeMap<String, usize>,
    /// Records in ingestion order.
    #[serde(default)]
    pub records: Vec<PersistedRecord>,
}

impl PersistedDataset {
    /// Map into a [`DatasetSummary`], re-validating records and recomputing every derived
    /// field.
    ///
    /// A record with an empty name or type fails with [`DashboardError::Validation`]
    /// carrying its 1-based position.
    pub fn into_summary(self) -> AppResult<DatasetSummary> {
        let records = self
            .records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Record::with_id(
                    record.id.unwrap_or_else(Uuid::new_v4),
                    &record.name,
                    &record.category,
                    record.flowrate.unwrap_or_default(),
                    record.pressure.unwrap_or_default(),
                    record.temperature.unwrap_or_default(),
                )
                .map_err(|field| DashboardError::Validation {
                    row_index: index + 1,
                    field,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(DatasetSummary::restore(
            self.id,
            self.source_name,
            self.ingested_at,
            records,
        ))
    }
}

impl From<&Record> for PersistedRecord {
    fn from(record: &Record) -> Self {
        Self {
            id: Some(record.id()),
            name: record.name().to_string(),
            category: record.category().to_string(),
            flowrate: Some(record.flowrate()),
            pressure: Some(record.pressure()),
            temperature: Some(record.temperature()),
        }
    }
}

impl DatasetSummary {
    /// Wire shape of this summary.
    pub fn to_persisted(&self) -> PersistedDataset {
        PersistedDataset {
            id: self.id(),
            source_name: self.source_name().to_string(),
            ingested_at: self.ingested_at(),
            record_count: self.record_count(),
            averages: self.averages(),
            category_distribution: self.category_distribution().clone(),
            records: self.records().iter().map(PersistedRecord::from).collect(),
        }
    }
}

/// Source and sink of persisted history.
pub trait HistoryRepository {
    /// Load summaries, newest first.
    fn load(&self) -> AppResult<Vec<DatasetSummary>>;

    /// Replace the stored history with `summaries` (newest first).
    fn save(&self, summaries: &[DatasetSummary]) -> AppResult<()>;
}

/// History stored as a pretty-printed JSON array in one file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    /// Repository backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryRepository for JsonFileRepository {
    fn load(&self) -> AppResult<Vec<DatasetSummary>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No history file, starting empty");
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        let persisted: Vec<PersistedDataset> = serde_json::from_str(&json)?;
        let summaries = persisted
            .into_iter()
            .map(PersistedDataset::into_summary)
            .collect::<AppResult<Vec<_>>>()?;
        info!(
            path = %self.path.display(),
            datasets = summaries.len(),
            "Loaded dataset history"
        );
        Ok(summaries)
    }

    fn save(&self, summaries: &[DatasetSummary]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let persisted: Vec<PersistedDataset> =
            summaries.iter().map(DatasetSummary::to_persisted).collect();
        let json = serde_json::to_string_pretty(&persisted)?;
        fs::write(&self.path, json)?;
        info!(
            path = %self.path.display(),
            datasets = summaries.len(),
            "Saved dataset history"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn missing_optional_keys_use_defaults() {
        let value = json!({
            "id": "6f1c2a8e-8a44-4a4e-9d55-1d2a3b4c5d6e",
            "sourceName": "legacy.csv",
            "ingestedAt": "2024-03-01T10:00:00Z"
        });
        let persisted: PersistedDataset = serde_json::from_value(value).unwrap();
        assert_eq!(persisted.record_count, 0);
        assert_eq!(persisted.averages, Averages::default());
        assert!(persisted.category_distribution.is_empty());

        let summary = persisted.into_summary().unwrap();
        assert_eq!(summary.record_count(), 0);
        assert_eq!(summary.source_name(), "legacy.csv");
    }

    #[test]
    fn stale_aggregates_are_recomputed() {
        let value = json!({
            "id": "6f1c2a8e-8a44-4a4e-9d55-1d2a3b4c5d6e",
            "sourceName": "backend.csv",
            "ingestedAt": "2024-03-01T10:00:00Z",
            "recordCount": 99,
            "averages": { "flowrate": 1.0 },
            "categoryDistribution": { "Valve": 42 },
            "records": [
                { "equipmentName": "Pump A", "type": "Pump", "flowrate": 100.0, "pressure": 5.0, "temperature": 40.0 },
                { "name": "Pump B", "category": "Pump", "flowrate": 200.0, "pressure": null }
            ]
        });
        let persisted: PersistedDataset = serde_json::from_value(value).unwrap();
        let summary = persisted.into_summary().unwrap();
        assert_eq!(summary.record_count(), 2);
        assert_eq!(summary.averages().flowrate, 150.0);
        assert_eq!(summary.averages().pressure, 2.5);
        assert_eq!(summary.averages().temperature, 20.0);
        assert_eq!(summary.category_distribution().len(), 1);
        assert_eq!(summary.category_distribution()["Pump"], 2);
    }

    #[test]
    fn invalid_record_is_rejected_with_position() {
        let value = json!({
            "id": "6f1c2a8e-8a44-4a4e-9d55-1d2a3b4c5d6e",
            "sourceName": "bad.csv",
            "ingestedAt": "2024-03-01T10:00:00Z",
            "records": [
                { "name": "Pump A", "category": "Pump" },
                { "name": "Pump B", "category": "" }
            ]
        });
        let persisted: PersistedDataset = serde_json::from_value(value).unwrap();
        let err = persisted.into_summary().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(err.row_index(), Some(2));
    }

    #[test]
    fn to_persisted_round_trips() {
        let record = Record::new("Reactor", "Reactor", 75.2, 25.0, 180.5).unwrap();
        let summary = DatasetSummary::from_records("reactor.csv", vec![record]);
        let back = summary.to_persisted().into_summary().unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn file_repository_saves_and_loads() {
        let dir = tempdir().unwrap();
        let repository = JsonFileRepository::new(dir.path().join("nested").join("history.json"));
        assert!(repository.load().unwrap().is_empty());

        let a = DatasetSummary::ingest(
            "a.csv",
            "Equipment Name,Type,Flowrate,Pressure,Temperature\nPump A,Pump,100,5,40",
        )
        .unwrap();
        let b = DatasetSummary::from_records("b.csv", Vec::new());
        repository.save(&[b.clone(), a.clone()]).unwrap();

        let loaded = repository.load().unwrap();
        assert_eq!(loaded, vec![b, a]);
    }

    #[test]
    fn json_text_keeps_readings_bit_exact() {
        let readings = [0.1 + 0.2, f64::MIN_POSITIVE, 1e308, 0.1 * 3.0, 1.0 / 3.0];
        let records = readings
            .iter()
            .map(|&value| Record::new("Meter", "Sensor", value, -value, value / 3.0).unwrap())
            .collect();
        let summary = DatasetSummary::from_records("meters.csv", records);

        let text = serde_json::to_string(&summary.to_persisted()).unwrap();
        let back: PersistedDataset = serde_json::from_str(&text).unwrap();
        let back = back.into_summary().unwrap();
        for (a, b) in back.records().iter().zip(summary.records()) {
            assert_eq!(a.flowrate().to_bits(), b.flowrate().to_bits());
            assert_eq!(a.pressure().to_bits(), b.pressure().to_bits());
            assert_eq!(a.temperature().to_bits(), b.temperature().to_bits());
        }
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonFileRepository::new(&path).load().unwrap_err();
        assert!(matches!(err, DashboardError::Serialization(_)));
    }
}
