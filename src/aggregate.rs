//! Scalar summary statistics over a record collection.
//!
//! [`aggregate`] is a pure function computed in a single pass. For an empty collection all
//! averages and ranges are `0.0`; no NaN or infinity ever escapes.

use crate::record::{finite_or_zero, Averages, NumericField, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive minimum and maximum of one numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Smallest observed value.
    pub min: f64,
    /// Largest observed value.
    pub max: f64,
}

/// Aggregate statistics of a record collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    /// Number of records.
    pub count: usize,
    /// Arithmetic mean per numeric field.
    pub averages: Averages,
    /// Flowrate range.
    pub flowrate: Range,
    /// Pressure range.
    pub pressure: Range,
    /// Temperature range.
    pub temperature: Range,
    /// Records per category; counts sum to `count`.
    pub category_distribution: BTreeMap<String, usize>,
}

impl AggregateSummary {
    /// Range of `field`.
    pub fn range(&self, field: NumericField) -> Range {
        match field {
            NumericField::Flowrate => self.flowrate,
            NumericField::Pressure => self.pressure,
            NumericField::Temperature => self.temperature,
        }
    }

    /// Mean of `field`.
    pub fn average(&self, field: NumericField) -> f64 {
        self.averages.get(field)
    }
}

#[derive(Debug, Default)]
struct FieldAccumulator {
    count: usize,
    sum: f64,
    running_mean: f64,
    bounds: Option<Range>,
}

impl FieldAccumulator {
    fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        // Scaled before subtracting so neither term can leave the f64 range.
        let n = self.count as f64;
        self.running_mean += value / n - self.running_mean / n;
        self.bounds = Some(match self.bounds {
            None => Range {
                min: value,
                max: value,
            },
            Some(Range { min, max }) => Range {
                min: min.min(value),
                max: max.max(value),
            },
        });
    }

    /// Exact `sum / count` while the sum is finite, the running mean once it overflows.
    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else if self.sum.is_finite() {
            self.sum / self.count as f64
        } else {
            finite_or_zero(self.running_mean)
        }
    }

    fn range(&self) -> Range {
        self.bounds.unwrap_or_default()
    }
}

/// Per-field means and ranges folded over records one at a time.
#[derive(Debug, Default)]
pub(crate) struct ReadingAccumulator {
    flowrate: FieldAccumulator,
    pressure: FieldAccumulator,
    temperature: FieldAccumulator,
}

impl ReadingAccumulator {
    pub(crate) fn push(&mut self, record: &Record) {
        self.flowrate.push(record.flowrate());
        self.pressure.push(record.pressure());
        self.temperature.push(record.temperature());
    }

    pub(crate) fn averages(&self) -> Averages {
        Averages {
            flowrate: self.flowrate.mean(),
            pressure: self.pressure.mean(),
            temperature: self.temperature.mean(),
        }
    }
}

/// Compute aggregate statistics for `records`.
pub fn aggregate(records: &[Record]) -> AggregateSummary {
    let mut readings = ReadingAccumulator::default();
    let mut category_distribution = BTreeMap::new();

    for record in records {
        readings.push(record);
        *category_distribution
            .entry(record.category().to_string())
            .or_insert(0) += 1;
    }

    AggregateSummary {
        count: records.len(),
        averages: readings.averages(),
        flowrate: readings.flowrate.range(),
        pressure: readings.pressure.range(),
        temperature: readings.temperature.range(),
        category_distribution,
    }
}
