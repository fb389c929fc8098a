//! Canonical shape of one equipment reading.
//!
//! A [`Record`] is immutable once constructed: fields are private and the only way to
//! build one is [`Record::new`], which enforces that `name` and `category` are non-empty
//! and that every numeric reading is finite.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the three numeric readings carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericField {
    /// Volumetric flow, L/min.
    Flowrate,
    /// Pressure, bar.
    Pressure,
    /// Temperature, °C.
    Temperature,
}

impl NumericField {
    /// All numeric fields in column order.
    pub const ALL: [NumericField; 3] = [
        NumericField::Flowrate,
        NumericField::Pressure,
        NumericField::Temperature,
    ];

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            NumericField::Flowrate => "Flowrate",
            NumericField::Pressure => "Pressure",
            NumericField::Temperature => "Temperature",
        }
    }

    /// Display unit.
    pub fn unit(self) -> &'static str {
        match self {
            NumericField::Flowrate => "L/min",
            NumericField::Pressure => "bar",
            NumericField::Temperature => "°C",
        }
    }
}

/// Mean value of each numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Averages {
    /// Mean flowrate.
    #[serde(default)]
    pub flowrate: f64,
    /// Mean pressure.
    #[serde(default)]
    pub pressure: f64,
    /// Mean temperature.
    #[serde(default)]
    pub temperature: f64,
}

impl Averages {
    /// Value for `field`.
    pub fn get(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Flowrate => self.flowrate,
            NumericField::Pressure => self.pressure,
            NumericField::Temperature => self.temperature,
        }
    }
}

/// Replace NaN and ±∞ with `0.0`.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// One validated equipment measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: Uuid,
    name: String,
    category: String,
    flowrate: f64,
    pressure: f64,
    temperature: f64,
}

impl Record {
    /// Build a record with a freshly assigned id.
    ///
    /// Text fields are trimmed. Returns the name of the offending field
    /// (`"name"` or `"category"`) when a required text field is empty.
    /// Non-finite readings are stored as `0.0`.
    pub fn new(
        name: &str,
        category: &str,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Result<Self, &'static str> {
        Self::with_id(Uuid::new_v4(), name, category, flowrate, pressure, temperature)
    }

    /// Build a record that keeps an existing id (used when restoring persisted history).
    pub fn with_id(
        id: Uuid,
        name: &str,
        category: &str,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Result<Self, &'static str> {
        let name = name.trim();
        if name.is_empty() {
            return Err("name");
        }
        let category = category.trim();
        if category.is_empty() {
            return Err("category");
        }
        Ok(Self {
            id,
            name: name.to_string(),
            category: category.to_string(),
            flowrate: finite_or_zero(flowrate),
            pressure: finite_or_zero(pressure),
            temperature: finite_or_zero(temperature),
        })
    }

    /// Opaque identifier assigned at ingestion.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Equipment name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Equipment type.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Flowrate reading.
    pub fn flowrate(&self) -> f64 {
        self.flowrate
    }

    /// Pressure reading.
    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    /// Temperature reading.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Reading for `field`.
    pub fn value(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Flowrate => self.flowrate,
            NumericField::Pressure => self.pressure,
            NumericField::Temperature => self.temperature,
        }
    }

    /// True when every field except the id matches `other`.
    pub fn same_reading(&self, other: &Record) -> bool {
        self.name == other.name
            && self.category == other.category
            && self.flowrate == other.flowrate
            && self.pressure == other.pressure
            && self.temperature == other.temperature
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_text_fields() {
        assert_eq!(Record::new("", "Pump", 1.0, 1.0, 1.0), Err("name"));
        assert_eq!(Record::new("   ", "Pump", 1.0, 1.0, 1.0), Err("name"));
        assert_eq!(Record::new("Pump A", "", 1.0, 1.0, 1.0), Err("category"));
    }

    #[test]
    fn non_finite_readings_become_zero() {
        let record = Record::new("Pump A", "Pump", f64::NAN, f64::INFINITY, f64::NEG_INFINITY)
            .unwrap();
        assert_eq!(record.flowrate(), 0.0);
        assert_eq!(record.pressure(), 0.0);
        assert_eq!(record.temperature(), 0.0);
    }

    #[test]
    fn ids_are_unique() {
        let a = Record::new("Pump A", "Pump", 1.0, 2.0, 3.0).unwrap();
        let b = Record::new("Pump A", "Pump", 1.0, 2.0, 3.0).unwrap();
        assert_ne!(a.id(), b.id());
        assert!(a.same_reading(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn value_matches_named_getters() {
        let record = Record::new("Reactor", "Reactor", 75.2, 25.0, 180.5).unwrap();
        assert_eq!(record.value(NumericField::Flowrate), 75.2);
        assert_eq!(record.value(NumericField::Pressure), 25.0);
        assert_eq!(record.value(NumericField::Temperature), 180.5);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let record = Record::new("Pump A", "Pump", 100.0, 5.0, 40.0).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Pump A");
        assert_eq!(json["category"], "Pump");
        assert_eq!(json["flowrate"], 100.0);
        assert!(json["id"].is_string());
    }
}
