//! CLI entry point for equipment-dashboard
//!
//! Provides a command-line frontend over the dashboard core:
//! - Summarising a CSV dataset (aggregate statistics, category profiles and chart series)
//! - Browsing one page of the filtered, sorted data table
//! - Composing the parameter report
//! - Exporting the sample dataset
//! - Managing the persisted dataset history
//!
//! # Usage
//!
//! ```bash
//! equipment-dashboard summary data.csv
//! equipment-dashboard table data.csv --search pump --sort flowrate --desc
//! equipment-dashboard report data.csv --json
//! equipment-dashboard history add data.csv
//! ```
//!
//! Command output goes to stdout; logs go to stderr.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use equipment_dashboard::config::{AppConfig, DEFAULT_CONFIG_PATH};
use equipment_dashboard::history::persist::{HistoryRepository, JsonFileRepository};
use equipment_dashboard::projection::{
    self, CategoryFilter, SortDirection, SortField, TableQuery,
};
use equipment_dashboard::report::{
    self, CATEGORY_HEADERS, CATEGORY_SECTION, DATA_HEADERS, DATA_SECTION, SUMMARY_HEADERS,
    SUMMARY_SECTION,
};
use equipment_dashboard::telemetry::{self, OutputFormat, TracingConfig};
use equipment_dashboard::{sample, DatasetId, DatasetSummary, HistoryStore, NumericField};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "equipment-dashboard")]
#[command(about = "Chemical equipment parameter analysis from CSV data", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true, default_value = "compact")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print aggregate statistics and per-type profiles of a CSV file
    Summary {
        /// CSV file with Equipment Name, Type, Flowrate, Pressure, Temperature columns
        csv: PathBuf,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Print one page of the data table
    Table {
        /// CSV file
        csv: PathBuf,

        /// Case-insensitive text matched against name or type
        #[arg(long, default_value = "")]
        search: String,

        /// Exact equipment type, or "all"
        #[arg(long, default_value = "all")]
        category: CategoryFilter,

        /// Sort column (name, type, flowrate, pressure, temperature)
        #[arg(long, default_value = "name")]
        sort: SortField,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (defaults to projection.page_size)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Compose the parameter report for a CSV file
    Report {
        /// CSV file
        csv: PathBuf,

        /// Print the report document as JSON
        #[arg(long)]
        json: bool,

        /// Data rows per page (defaults to report.rows_per_page)
        #[arg(long)]
        rows_per_page: Option<usize>,
    },

    /// Write the sample dataset as CSV
    Sample {
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Manage the persisted dataset history
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Ingest a CSV file and add it to the history
    Add {
        /// CSV file
        csv: PathBuf,
    },
    /// List stored datasets, most recent first
    List,
    /// Remove a stored dataset
    Remove {
        /// Dataset id
        id: DatasetId,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_validated(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let tracing_config = TracingConfig::from_app_config(&config)
        .map_err(anyhow::Error::msg)?
        .with_format(cli.format);
    telemetry::init(tracing_config).map_err(anyhow::Error::msg)?;
    debug!(config = %cli.config.display(), "Configuration loaded");

    match cli.command {
        Commands::Summary { csv, json } => run_summary(&config, &csv, json),
        Commands::Table {
            csv,
            search,
            category,
            sort,
            desc,
            page,
            page_size,
        } => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let query = TableQuery::new()
                .search(search)
                .category(category)
                .sort(sort, direction)
                .page_size(page_size.unwrap_or(config.projection.page_size))
                .page(page);
            run_table(&csv, &query)
        }
        Commands::Report {
            csv,
            json,
            rows_per_page,
        } => run_report(
            &config,
            &csv,
            json,
            rows_per_page.unwrap_or(config.report.rows_per_page),
        ),
        Commands::Sample { output } => run_sample(output.as_deref()),
        Commands::History { action } => run_history(&config, action),
    }
}

fn load_dataset(path: &Path) -> Result<DatasetSummary> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let source_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let summary = DatasetSummary::ingest(source_name, &text)
        .with_context(|| format!("Failed to ingest {}", path.display()))?;
    info!(
        source = summary.source_name(),
        records = summary.record_count(),
        "Dataset ingested"
    );
    Ok(summary)
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.to_vec());
    table
}

fn numeric(value: impl ToString) -> Cell {
    Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
}

#[derive(Serialize)]
struct SummaryOutput<'a> {
    source: &'a str,
    aggregate: equipment_dashboard::AggregateSummary,
    charts: projection::ChartSeries<'a>,
}

fn run_summary(config: &AppConfig, csv: &Path, json: bool) -> Result<()> {
    let dataset = load_dataset(csv)?;
    let stats = dataset.aggregate();
    let charts = projection::chart_series(dataset.records(), &config.projection);

    if json {
        let output = SummaryOutput {
            source: dataset.source_name(),
            aggregate: stats,
            charts,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let mut table = new_table(&["Parameter", "Average", "Min", "Max", "Unit"]);
    for field in NumericField::ALL {
        let range = stats.range(field);
        table.add_row(vec![
            Cell::new(field.label()),
            numeric(format!("{:.2}", stats.average(field))),
            numeric(format!("{:.2}", range.min)),
            numeric(format!("{:.2}", range.max)),
            Cell::new(field.unit()),
        ]);
    }
    println!("{} ({} records)", dataset.source_name(), stats.count);
    println!("{table}");

    let mut table = new_table(&[
        "Type",
        "Count",
        "Avg Flowrate",
        "Avg Pressure",
        "Avg Temperature",
        "Normalized (F / P / T)",
    ]);
    for profile in &charts.profiles {
        table.add_row(vec![
            Cell::new(&profile.category),
            numeric(profile.count),
            numeric(format!("{:.2}", profile.averages.flowrate)),
            numeric(format!("{:.2}", profile.averages.pressure)),
            numeric(format!("{:.2}", profile.averages.temperature)),
            Cell::new(format!(
                "{:.2} / {:.2} / {:.2}",
                profile.normalized.flowrate, profile.normalized.pressure, profile.normalized.temperature
            )),
        ]);
    }
    println!("{table}");

    let mut table = new_table(&["Equipment", "Flowrate", "Pressure", "Temperature"]);
    for bar in &charts.comparison {
        table.add_row(vec![
            Cell::new(&bar.label),
            numeric(format!("{:.2}", bar.flowrate)),
            numeric(format!("{:.2}", bar.pressure)),
            numeric(format!("{:.2}", bar.temperature)),
        ]);
    }
    println!("First {} of {} records", charts.comparison.len(), stats.count);
    println!("{table}");

    let trend: Vec<String> = charts
        .trend
        .iter()
        .map(|point| format!("{} {:.1}", point.label, point.value))
        .collect();
    println!("Flowrate trend: {}", trend.join(", "));
    Ok(())
}

fn run_table(csv: &Path, query: &TableQuery) -> Result<()> {
    let dataset = load_dataset(csv)?;
    let page = projection::query(dataset.records(), query);

    let mut table = new_table(&DATA_HEADERS);
    for record in &page.rows {
        table.add_row(vec![
            Cell::new(record.name()),
            Cell::new(record.category()),
            numeric(format!("{:.2}", record.flowrate())),
            numeric(format!("{:.2}", record.pressure())),
            numeric(format!("{:.2}", record.temperature())),
        ]);
    }
    println!("{table}");

    match page.showing_range() {
        Some((first, last)) => println!(
            "Showing {} to {} of {} results (page {} of {})",
            first, last, page.total_matches, page.page, page.total_pages
        ),
        None => {
            if page.total_matches > 0 {
                warn!(
                    page = page.page,
                    total_pages = page.total_pages,
                    "Requested page is out of range"
                );
            }
            println!("No equipment found ({} matches)", page.total_matches);
        }
    }
    Ok(())
}

fn run_report(config: &AppConfig, csv: &Path, json: bool, rows_per_page: usize) -> Result<()> {
    let dataset = load_dataset(csv)?;
    let report = report::compose(dataset.records(), Utc::now(), &config.report)?;
    info!(file = %report.file_stem(), rows = report.data.len(), "Report composed");

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.title);
    println!("Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();

    println!("{SUMMARY_SECTION}");
    let mut table = new_table(&SUMMARY_HEADERS);
    for row in &report.summary {
        table.add_row(vec![Cell::new(&row.label), Cell::new(&row.value)]);
    }
    println!("{table}");
    println!();

    println!("{CATEGORY_SECTION}");
    let mut table = new_table(&CATEGORY_HEADERS);
    for row in &report.categories {
        table.add_row(vec![
            Cell::new(&row.category),
            numeric(row.count),
            numeric(row.percentage_label()),
        ]);
    }
    println!("{table}");

    let pages = report.pages(rows_per_page);
    let page_count = pages.len();
    for (index, rows) in pages.into_iter().enumerate() {
        println!();
        println!("{DATA_SECTION}");
        let mut table = new_table(&DATA_HEADERS);
        for row in rows {
            let [name, category, flowrate, pressure, temperature] = row.cells();
            table.add_row(vec![
                Cell::new(name),
                Cell::new(category),
                numeric(flowrate),
                numeric(pressure),
                numeric(temperature),
            ]);
        }
        println!("{table}");
        println!("{}", report.footer(index + 1, page_count));
    }
    Ok(())
}

fn run_sample(output: Option<&Path>) -> Result<()> {
    let csv = sample::sample_csv()?;
    match output {
        Some(path) => {
            fs::write(path, &csv).with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Sample dataset written");
        }
        None => println!("{csv}"),
    }
    Ok(())
}

fn run_history(config: &AppConfig, action: HistoryCommand) -> Result<()> {
    let repository = JsonFileRepository::new(&config.history.path);
    let mut store = HistoryStore::new(config.history.capacity);
    store.seed(
        repository
            .load()
            .with_context(|| format!("Failed to load history from {}", repository.path().display()))?,
    );

    match action {
        HistoryCommand::Add { csv } => {
            let dataset = load_dataset(&csv)?;
            let id = dataset.id();
            store.add(dataset);
            repository.save(&store.to_vec())?;
            println!("Added dataset {id}");
        }
        HistoryCommand::List => {
            let current = store.current().map(DatasetSummary::id);
            let mut table = new_table(&["", "Id", "Source", "Ingested", "Records", "Types"]);
            for summary in store.list() {
                let marker = if Some(summary.id()) == current { "*" } else { "" };
                table.add_row(vec![
                    Cell::new(marker),
                    Cell::new(summary.id()),
                    Cell::new(summary.source_name()),
                    Cell::new(summary.ingested_at().format("%Y-%m-%d %H:%M:%S")),
                    numeric(summary.record_count()),
                    numeric(summary.category_distribution().len()),
                ]);
            }
            println!("{table}");
            println!("{} of {} datasets retained", store.len(), store.capacity());
        }
        HistoryCommand::Remove { id } => {
            if store.remove(id) {
                repository.save(&store.to_vec())?;
                println!("Removed dataset {id}");
            } else {
                warn!(%id, "Dataset not in history, nothing removed");
                println!("Dataset {id} not found");
            }
        }
    }
    Ok(())
}
