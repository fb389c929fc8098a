//! Read-only presentation views over a record collection.
//!
//! Every function here borrows the records and derives a fresh view on each call. Nothing
//! is cached and the source slice is never reordered, so repeated calls with the same
//! arguments return identical results.
//!
//! - [`query`]: search, category filter, stable sort and 1-based pagination for the data
//!   table.
//! - [`top_n`] / [`parameter_comparison`]: the leading slice used for parameter
//!   comparison charts.
//! - [`category_profiles`]: per-category means scaled by [`NormalizationDivisors`] so
//!   quantities with different units share one axis.
//! - [`flowrate_trend`] and [`categories`]: small helpers for trend charts and filter
//!   choices.
//! - [`chart_series`]: all of the chart views at once, sized by [`ProjectionConfig`].

use crate::aggregate::ReadingAccumulator;
use crate::config::ProjectionConfig;
use crate::record::{finite_or_zero, Averages, NumericField, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

/// Default number of rows per table page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default length of the top-N slice.
pub const DEFAULT_TOP_N: usize = 10;

/// Column used to order table rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    /// Equipment name.
    #[default]
    Name,
    /// Equipment type.
    Category,
    /// Flowrate reading.
    Flowrate,
    /// Pressure reading.
    Pressure,
    /// Temperature reading.
    Temperature,
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "equipmentname" => Ok(SortField::Name),
            "category" | "type" => Ok(SortField::Category),
            "flowrate" => Ok(SortField::Flowrate),
            "pressure" => Ok(SortField::Pressure),
            "temperature" => Ok(SortField::Temperature),
            other => Err(format!(
                "Invalid sort field '{}'. Must be one of: name, category, flowrate, pressure, temperature",
                other
            )),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// The opposite direction (clicking an already active column header).
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("Invalid sort direction '{}'. Must be asc or desc", other)),
        }
    }
}

/// Category filter of the data table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Pass every record through.
    #[default]
    All,
    /// Keep records whose category equals this value exactly.
    Only(String),
}

impl CategoryFilter {
    fn accepts(&self, record: &Record) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => record.category() == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(s.to_string()))
        }
    }
}

/// Parameters of one data-table view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    /// Case-insensitive substring matched against name or category.
    pub search: String,
    /// Category filter.
    pub category: CategoryFilter,
    /// Sort column.
    pub sort_field: SortField,
    /// Sort direction.
    pub direction: SortDirection,
    /// Rows per page; `0` is treated as `1`.
    pub page_size: usize,
    /// 1-based page number.
    pub page: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            sort_field: SortField::Name,
            direction: SortDirection::Asc,
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl TableQuery {
    /// Default query: first page of everything sorted by name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = text.into();
        self
    }

    /// Set the category filter.
    pub fn category(mut self, filter: CategoryFilter) -> Self {
        self.category = filter;
        self
    }

    /// Set the sort column and direction.
    pub fn sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.direction = direction;
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the 1-based page number.
    pub fn page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    fn matches(&self, record: &Record, needle: &str) -> bool {
        let found = needle.is_empty()
            || record.name().to_lowercase().contains(needle)
            || record.category().to_lowercase().contains(needle);
        found && self.category.accepts(record)
    }
}

/// One page of the data table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    /// Records on this page, in sorted order.
    pub rows: Vec<&'a Record>,
    /// Records matching search and filter across all pages.
    pub total_matches: usize,
    /// `ceil(total_matches / page_size)`.
    pub total_pages: usize,
    /// Requested page number.
    pub page: usize,
    /// Effective page size.
    pub page_size: usize,
}

impl TablePage<'_> {
    /// 1-based positions of the first and last row on this page within all matches, for
    /// captions like "Showing 11 to 20 of 42 results".
    pub fn showing_range(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.rows.len() - 1))
    }
}

/// String ordering for table sorts: case-insensitive natural order, then byte order.
fn text_cmp(a: &str, b: &str) -> Ordering {
    natord::compare_ignore_case(a, b).then_with(|| a.cmp(b))
}

fn compare(a: &Record, b: &Record, field: SortField) -> Ordering {
    let numeric = |field: NumericField| {
        a.value(field)
            .partial_cmp(&b.value(field))
            .unwrap_or(Ordering::Equal)
    };
    match field {
        SortField::Name => text_cmp(a.name(), b.name()),
        SortField::Category => text_cmp(a.category(), b.category()),
        SortField::Flowrate => numeric(NumericField::Flowrate),
        SortField::Pressure => numeric(NumericField::Pressure),
        SortField::Temperature => numeric(NumericField::Temperature),
    }
}

/// Filter, sort and paginate `records`.
pub fn query<'a>(records: &'a [Record], query: &TableQuery) -> TablePage<'a> {
    let needle = query.search.to_lowercase();
    let mut matches: Vec<&Record> = records
        .iter()
        .filter(|record| query.matches(record, &needle))
        .collect();

    // slice::sort_by is stable; reversing the comparator keeps equal keys in input order.
    match query.direction {
        SortDirection::Asc => matches.sort_by(|a, b| compare(a, b, query.sort_field)),
        SortDirection::Desc => matches.sort_by(|a, b| compare(b, a, query.sort_field)),
    }

    let page_size = query.page_size.max(1);
    let total_matches = matches.len();
    let total_pages = total_matches.div_ceil(page_size);
    let rows = match query.page.checked_sub(1) {
        Some(index) => {
            let offset = index.saturating_mul(page_size);
            matches.into_iter().skip(offset).take(page_size).collect()
        }
        None => Vec::new(),
    };

    TablePage {
        rows,
        total_matches,
        total_pages,
        page: query.page,
        page_size,
    }
}

/// First `n` records in their current order.
pub fn top_n(records: &[Record], n: usize) -> &[Record] {
    &records[..n.min(records.len())]
}

/// Distinct categories in order of first appearance.
pub fn categories(records: &[Record]) -> Vec<&str> {
    let mut seen = Vec::new();
    for record in records {
        if !seen.contains(&record.category()) {
            seen.push(record.category());
        }
    }
    seen
}

/// Divisors applied to per-category means so unlike units share one scale.
///
/// These are presentation policy, not physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationDivisors {
    /// Divisor for flowrate.
    #[serde(default = "default_flowrate_divisor")]
    pub flowrate: f64,
    /// Divisor for pressure.
    #[serde(default = "default_pressure_divisor")]
    pub pressure: f64,
    /// Divisor for temperature.
    #[serde(default = "default_temperature_divisor")]
    pub temperature: f64,
}

fn default_flowrate_divisor() -> f64 {
    10.0
}

fn default_pressure_divisor() -> f64 {
    1.0
}

fn default_temperature_divisor() -> f64 {
    5.0
}

impl Default for NormalizationDivisors {
    fn default() -> Self {
        Self {
            flowrate: default_flowrate_divisor(),
            pressure: default_pressure_divisor(),
            temperature: default_temperature_divisor(),
        }
    }
}

impl NormalizationDivisors {
    /// Divisor for `field`.
    pub fn get(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Flowrate => self.flowrate,
            NumericField::Pressure => self.pressure,
            NumericField::Temperature => self.temperature,
        }
    }

    /// Scale `averages`. A zero divisor yields `0.0`.
    pub fn normalize(&self, averages: Averages) -> Averages {
        let scale = |field: NumericField| {
            let divisor = self.get(field);
            if divisor == 0.0 {
                0.0
            } else {
                finite_or_zero(averages.get(field) / divisor)
            }
        };
        Averages {
            flowrate: scale(NumericField::Flowrate),
            pressure: scale(NumericField::Pressure),
            temperature: scale(NumericField::Temperature),
        }
    }
}

/// Mean readings of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryProfile {
    /// Category name.
    pub category: String,
    /// Records in the category.
    pub count: usize,
    /// Raw means.
    pub averages: Averages,
    /// Means after applying the normalization divisors.
    pub normalized: Averages,
}

/// Group `records` by category (first-appearance order) and compute per-group means.
pub fn category_profiles(
    records: &[Record],
    divisors: &NormalizationDivisors,
) -> Vec<CategoryProfile> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, usize, ReadingAccumulator)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.category()).or_insert_with(|| {
            groups.push((record.category(), 0, ReadingAccumulator::default()));
            groups.len() - 1
        });
        let (_, count, readings) = &mut groups[slot];
        *count += 1;
        readings.push(record);
    }

    groups
        .into_iter()
        .map(|(category, count, readings)| {
            let averages = readings.averages();
            CategoryProfile {
                category: category.to_string(),
                count,
                averages,
                normalized: divisors.normalize(averages),
            }
        })
        .collect()
}

/// Bar group of the parameter comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonBar {
    /// Shortened equipment name.
    pub label: String,
    /// Flowrate reading.
    pub flowrate: f64,
    /// Pressure reading.
    pub pressure: f64,
    /// Temperature reading.
    pub temperature: f64,
}

/// First two whitespace-separated words of `name`.
pub fn short_label(name: &str) -> String {
    name.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}

/// Raw readings of the top-`n` records with short labels.
pub fn parameter_comparison(records: &[Record], n: usize) -> Vec<ComparisonBar> {
    top_n(records, n)
        .iter()
        .map(|record| ComparisonBar {
            label: short_label(record.name()),
            flowrate: record.flowrate(),
            pressure: record.pressure(),
            temperature: record.temperature(),
        })
        .collect()
}

/// One point of the flowrate trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Position label, `#1` for the first record.
    pub label: String,
    /// Flowrate reading.
    pub value: f64,
}

/// Flowrate of every record in order.
pub fn flowrate_trend(records: &[Record]) -> Vec<TrendPoint> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| TrendPoint {
            label: format!("#{}", index + 1),
            value: record.flowrate(),
        })
        .collect()
}

/// Every chart series of the dashboard, sized and scaled by [`ProjectionConfig`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries<'a> {
    /// Filter choices in first-appearance order.
    pub categories: Vec<&'a str>,
    /// Readings of the first `top_n` records.
    pub comparison: Vec<ComparisonBar>,
    /// Flowrate of every record.
    pub trend: Vec<TrendPoint>,
    /// Per-category means and their normalized values.
    pub profiles: Vec<CategoryProfile>,
}

/// Derive all chart series for `records`.
pub fn chart_series<'a>(records: &'a [Record], config: &ProjectionConfig) -> ChartSeries<'a> {
    ChartSeries {
        categories: categories(records),
        comparison: parameter_comparison(records, config.top_n),
        trend: flowrate_trend(records),
        profiles: category_profiles(records, &config.divisors),
    }
}
