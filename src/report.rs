//! Structured report documents.
//!
//! [`compose`] turns a record collection into a [`Report`]: a title, a summary table of
//! aggregate metrics, a category distribution table and the full data table. All cell
//! values are pre-formatted strings so renderers (PDF, HTML, terminal, JSON) only lay
//! them out.
//!
//! The data table is stored as one ordered sequence; [`Report::pages`] splits it into
//! fixed-size chunks for renderers that paginate.

use crate::aggregate::{aggregate, AggregateSummary};
use crate::config::ReportConfig;
use crate::error::{AppResult, DashboardError};
use crate::record::{NumericField, Record};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Heading of the summary section.
pub const SUMMARY_SECTION: &str = "Summary Statistics";
/// Heading of the category section.
pub const CATEGORY_SECTION: &str = "Equipment Type Distribution";
/// Heading of the data section.
pub const DATA_SECTION: &str = "Equipment Data";

/// Column headers of the summary table.
pub const SUMMARY_HEADERS: [&str; 2] = ["Metric", "Value"];
/// Column headers of the category table.
pub const CATEGORY_HEADERS: [&str; 3] = ["Type", "Count", "Percentage"];
/// Column headers of the data table.
pub const DATA_HEADERS: [&str; 5] = [
    "Equipment Name",
    "Type",
    "Flowrate (L/min)",
    "Pressure (bar)",
    "Temp (°C)",
];

/// One metric of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// Fixed metric label.
    pub label: String,
    /// Formatted value with unit.
    pub value: String,
}

/// One row of the category distribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRow {
    /// Category name.
    pub category: String,
    /// Records in the category.
    pub count: usize,
    /// Share of all records in percent, rounded to one decimal.
    pub percentage: f64,
}

impl CategoryRow {
    /// Percentage formatted for display, e.g. `66.7%`.
    pub fn percentage_label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

/// One row of the data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRow {
    /// Equipment name.
    pub name: String,
    /// Equipment type.
    pub category: String,
    /// Flowrate, two decimals.
    pub flowrate: String,
    /// Pressure, two decimals.
    pub pressure: String,
    /// Temperature, two decimals.
    pub temperature: String,
}

impl DataRow {
    /// Cells in [`DATA_HEADERS`] order.
    pub fn cells(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.category.as_str(),
            self.flowrate.as_str(),
            self.pressure.as_str(),
            self.temperature.as_str(),
        ]
    }
}

impl From<&Record> for DataRow {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name().to_string(),
            category: record.category().to_string(),
            flowrate: format!("{:.2}", record.flowrate()),
            pressure: format!("{:.2}", record.pressure()),
            temperature: format!("{:.2}", record.temperature()),
        }
    }
}

/// A composed report, ready for an external renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Document title.
    pub title: String,
    /// Product name shown in page footers.
    pub product: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Summary metrics.
    pub summary: Vec<SummaryRow>,
    /// Category distribution, sorted by category.
    pub categories: Vec<CategoryRow>,
    /// Every record, in collection order.
    pub data: Vec<DataRow>,
}

impl Report {
    /// Split the data table into chunks of `rows_per_page` rows. `0` keeps everything on
    /// one page. An empty data table still yields one (empty) page.
    pub fn pages(&self, rows_per_page: usize) -> Vec<&[DataRow]> {
        if rows_per_page == 0 || self.data.is_empty() {
            return vec![self.data.as_slice()];
        }
        self.data.chunks(rows_per_page).collect()
    }

    /// Number of pages [`pages`](Self::pages) yields.
    pub fn page_count(&self, rows_per_page: usize) -> usize {
        if rows_per_page == 0 {
            1
        } else {
            self.data.len().div_ceil(rows_per_page).max(1)
        }
    }

    /// Footer for 1-based `page` of `pages`.
    pub fn footer(&self, page: usize, pages: usize) -> String {
        format!("{} - Page {} of {}", self.product, page, pages)
    }

    /// Suggested output file name without extension.
    pub fn file_stem(&self) -> String {
        format!("equipment_report_{}", self.generated_at.format("%Y-%m-%d"))
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn summary_rows(stats: &AggregateSummary) -> Vec<SummaryRow> {
    let row = |label: &str, value: String| SummaryRow {
        label: label.to_string(),
        value,
    };

    let mut rows = vec![row("Total Equipment", stats.count.to_string())];
    for field in NumericField::ALL {
        rows.push(row(
            &format!("Average {}", field.label()),
            format!("{:.2} {}", stats.average(field), field.unit()),
        ));
    }
    for field in NumericField::ALL {
        let range = stats.range(field);
        rows.push(row(
            &format!("{} Range", field.label()),
            format!("{:.2} - {:.2} {}", range.min, range.max, field.unit()),
        ));
    }
    rows
}

/// Compose a report for `records`.
///
/// Fails with [`DashboardError::EmptyReport`] when `records` is empty.
pub fn compose(
    records: &[Record],
    generated_at: DateTime<Utc>,
    config: &ReportConfig,
) -> AppResult<Report> {
    if records.is_empty() {
        return Err(DashboardError::EmptyReport);
    }

    let stats = aggregate(records);
    let total = stats.count as f64;
    let categories = stats
        .category_distribution
        .iter()
        .map(|(category, &count)| CategoryRow {
            category: category.clone(),
            count,
            percentage: round1(count as f64 / total * 100.0),
        })
        .collect();

    Ok(Report {
        title: config.title.clone(),
        product: config.product.clone(),
        generated_at,
        summary: summary_rows(&stats),
        categories,
        data: records.iter().map(DataRow::from).collect(),
    })
}
