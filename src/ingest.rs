//! CSV ingestion and row validation.
//!
//! Ingestion runs in two steps:
//!
//! 1. [`parse_rows`] turns raw CSV text into [`RawRow`]s using the `csv` crate. Structural
//!    problems (a row whose column count differs from the header, broken quoting) become
//!    [`DashboardError::Parse`].
//! 2. [`validate_rows`] turns raw rows into [`Record`]s. A row without an equipment name or
//!    type becomes [`DashboardError::Validation`]. Numeric cells that are absent or do not
//!    parse to a finite number are coerced to `0`.
//!
//! Both steps abort on the first failing row, so callers either get every record or none.
//! Row indices in errors are 1-based and count data rows only (the header is row 0).
//!
//! [`to_csv`] writes the canonical text form back out; `ingest_csv(&to_csv(r)?)` yields
//! records equal to `r` field for field (with fresh ids).

use crate::error::{AppResult, DashboardError};
use crate::record::Record;
use std::collections::BTreeMap;
use std::io;

/// Recognised input columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    /// `Equipment Name` (maps to [`Record::name`]).
    EquipmentName,
    /// `Type` (maps to [`Record::category`]).
    Type,
    /// `Flowrate`.
    Flowrate,
    /// `Pressure`.
    Pressure,
    /// `Temperature`.
    Temperature,
}

impl Column {
    /// Columns in canonical order.
    pub const ALL: [Column; 5] = [
        Column::EquipmentName,
        Column::Type,
        Column::Flowrate,
        Column::Pressure,
        Column::Temperature,
    ];

    /// Canonical header label.
    pub fn header(self) -> &'static str {
        match self {
            Column::EquipmentName => "Equipment Name",
            Column::Type => "Type",
            Column::Flowrate => "Flowrate",
            Column::Pressure => "Pressure",
            Column::Temperature => "Temperature",
        }
    }

    /// Resolve a header label. Surrounding whitespace and ASCII case are ignored, and
    /// `EquipmentName` is accepted for `Equipment Name`.
    pub fn from_header(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("equipmentname") {
            return Some(Column::EquipmentName);
        }
        Column::ALL
            .into_iter()
            .find(|column| column.header().eq_ignore_ascii_case(label))
    }
}

/// One unvalidated input row: recognised column → raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: BTreeMap<Column, String>,
}

impl RawRow {
    /// Empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(header label, value)` pairs. Unrecognised labels are ignored;
    /// when a label repeats, the first occurrence wins.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut row = Self::new();
        for (label, value) in pairs {
            if let Some(column) = Column::from_header(label) {
                row.cells
                    .entry(column)
                    .or_insert_with(|| value.to_string());
            }
        }
        row
    }

    /// Set a cell, replacing any previous value.
    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.cells.insert(column, value.into());
        self
    }

    /// Raw cell text, if the column was present.
    pub fn get(&self, column: Column) -> Option<&str> {
        self.cells.get(&column).map(String::as_str)
    }

    fn number(&self, column: Column) -> f64 {
        self.get(column)
            .and_then(|cell| cell.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}

/// Parse CSV text with a header row into raw rows.
///
/// Blank lines are skipped. Extra columns are ignored. Empty text yields no rows.
pub fn parse_rows(text: &str) -> AppResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let columns: Vec<Option<Column>> = reader
        .headers()
        .map_err(|e| DashboardError::Parse {
            row_index: 0,
            message: e.to_string(),
        })?
        .iter()
        .map(Column::from_header)
        .collect();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DashboardError::Parse {
            row_index: index + 1,
            message: e.to_string(),
        })?;
        let pairs = columns
            .iter()
            .zip(record.iter())
            .filter_map(|(column, cell)| column.map(|column| (column, cell)));

        let mut row = RawRow::new();
        for (column, cell) in pairs {
            row.cells.entry(column).or_insert_with(|| cell.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Validate raw rows into records, preserving order.
pub fn validate_rows(rows: &[RawRow]) -> AppResult<Vec<Record>> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            Record::new(
                row.get(Column::EquipmentName).unwrap_or_default(),
                row.get(Column::Type).unwrap_or_default(),
                row.number(Column::Flowrate),
                row.number(Column::Pressure),
                row.number(Column::Temperature),
            )
            .map_err(|field| DashboardError::Validation {
                row_index: index + 1,
                field,
            })
        })
        .collect()
}

/// Parse and validate CSV text in one step.
pub fn ingest_csv(text: &str) -> AppResult<Vec<Record>> {
    let rows = parse_rows(text)?;
    validate_rows(&rows)
}

/// Write the canonical CSV form of `records` to `writer`.
///
/// Rows are separated by `\n` and the last row has no terminator.
pub fn write_csv<W: io::Write>(records: &[Record], mut writer: W) -> AppResult<()> {
    let mut buf = Vec::new();
    {
        let mut csv_writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);
        csv_writer
            .write_record(Column::ALL.map(Column::header))
            .map_err(io::Error::from)?;
        for record in records {
            csv_writer
                .write_record([
                    record.name().to_string(),
                    record.category().to_string(),
                    record.flowrate().to_string(),
                    record.pressure().to_string(),
                    record.temperature().to_string(),
                ])
                .map_err(io::Error::from)?;
        }
        csv_writer.flush()?;
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    writer.write_all(&buf)?;
    Ok(())
}

/// Canonical CSV text of `records`.
pub fn to_csv(records: &[Record]) -> AppResult<String> {
    let mut buf = Vec::new();
    write_csv(records, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
