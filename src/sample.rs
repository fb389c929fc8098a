//! Built-in sample dataset.

use crate::error::{AppResult, DashboardError};
use crate::ingest::to_csv;
use crate::record::Record;

/// Suggested file name for the exported sample.
pub const SAMPLE_FILE_NAME: &str = "sample_equipment_data.csv";

/// (name, type, flowrate, pressure, temperature)
const SAMPLE_ROWS: [(&str, &str, f64, f64, f64); 20] = [
    ("Centrifugal Pump A1", "Pump", 150.5, 8.2, 45.0),
    ("Heat Exchanger HE-101", "Heat Exchanger", 280.0, 12.5, 120.0),
    ("Reactor Vessel RV-01", "Reactor", 75.2, 25.0, 180.5),
    ("Distillation Column DC-1", "Column", 450.0, 5.5, 105.0),
    ("Compressor CP-201", "Compressor", 520.8, 35.0, 65.0),
    ("Storage Tank ST-A1", "Tank", 0.0, 1.0, 25.0),
    ("Centrifugal Pump B2", "Pump", 185.3, 9.8, 42.0),
    ("Shell & Tube HE-102", "Heat Exchanger", 310.5, 15.0, 135.0),
    ("CSTR Reactor RV-02", "Reactor", 95.0, 30.0, 200.0),
    ("Absorption Column AC-1", "Column", 380.0, 4.2, 85.0),
    ("Reciprocating Pump RP-01", "Pump", 120.0, 15.5, 38.0),
    ("Plate Heat Exchanger PHE-01", "Heat Exchanger", 220.0, 10.0, 95.0),
    ("Batch Reactor BR-01", "Reactor", 50.0, 20.0, 150.0),
    ("Fractionation Column FC-1", "Column", 550.0, 6.8, 115.0),
    ("Screw Compressor SC-01", "Compressor", 480.0, 28.0, 72.0),
    ("Process Tank PT-B2", "Tank", 10.5, 1.5, 30.0),
    ("Booster Pump BP-03", "Pump", 200.0, 12.0, 50.0),
    ("Air Cooled HE-103", "Heat Exchanger", 180.0, 8.0, 80.0),
    ("PFR Reactor PFR-01", "Reactor", 110.0, 35.0, 220.0),
    ("Stripping Column SC-2", "Column", 420.0, 5.0, 100.0),
];

/// The twenty sample readings, each with a fresh id.
///
/// Built through the same validation as ingested rows, so a bad row surfaces as
/// [`DashboardError::Validation`] rather than shrinking the sample.
pub fn sample_records() -> AppResult<Vec<Record>> {
    SAMPLE_ROWS
        .iter()
        .enumerate()
        .map(|(index, &(name, category, f, p, t))| {
            Record::new(name, category, f, p, t).map_err(|field| DashboardError::Validation {
                row_index: index + 1,
                field,
            })
        })
        .collect()
}

/// Canonical CSV text of [`sample_records`].
pub fn sample_csv() -> AppResult<String> {
    to_csv(&sample_records()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::ingest::ingest_csv;

    #[test]
    fn sample_has_twenty_rows_in_six_categories() {
        let records = sample_records().unwrap();
        assert_eq!(records.len(), SAMPLE_ROWS.len());
        assert_eq!(records.len(), 20);
        let stats = aggregate(&records);
        assert_eq!(stats.category_distribution.len(), 6);
        assert_eq!(stats.category_distribution["Pump"], 4);
        assert_eq!(stats.flowrate.max, 550.0);
        assert_eq!(stats.temperature.min, 25.0);
    }

    #[test]
    fn every_sample_row_becomes_a_record_in_order() {
        let records = sample_records().unwrap();
        let names: Vec<&str> = records.iter().map(Record::name).collect();
        let expected: Vec<&str> = SAMPLE_ROWS.iter().map(|row| row.0).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn sample_csv_reingests() {
        let csv = sample_csv().unwrap();
        assert!(csv.starts_with("Equipment Name,Type,Flowrate,Pressure,Temperature\n"));
        assert!(csv.contains("\nStorage Tank ST-A1,Tank,0,1,25\n"));
        let back = ingest_csv(&csv).unwrap();
        assert_eq!(back.len(), SAMPLE_ROWS.len());
        assert!(back
            .iter()
            .zip(sample_records().unwrap().iter())
            .all(|(a, b)| a.same_reading(b)));
    }
}
