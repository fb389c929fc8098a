//! Configuration loading using Figment.
//!
//! Configuration is loaded from:
//! 1. `config/dashboard.toml` (base configuration, optional)
//! 2. Environment variables prefixed with `EQUIPMENT_DASHBOARD_`, nested keys separated
//!    by `__` (e.g. `EQUIPMENT_DASHBOARD_HISTORY__CAPACITY=8`)
//!
//! Every section has defaults, so a missing file yields a usable configuration.
//!
//! # Example
//! ```no_run
//! use equipment_dashboard::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! println!("Application: {}", config.application.name);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::error::{AppResult, DashboardError};
use crate::history::DEFAULT_CAPACITY;
use crate::projection::{NormalizationDivisors, DEFAULT_PAGE_SIZE, DEFAULT_TOP_N};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "EQUIPMENT_DASHBOARD_";

const PRODUCT_NAME: &str = "Chemical Equipment Parameter Visualizer";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application settings
    pub application: ApplicationConfig,
    /// Dataset history settings
    pub history: HistoryConfig,
    /// Table and chart projection settings
    pub projection: ProjectionConfig,
    /// Report settings
    pub report: ReportConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_app_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Dataset history configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Number of datasets retained
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// JSON file holding persisted history
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
}

/// Projection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Data table rows per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Length of the top-N comparison slice
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Per-category normalization divisors
    #[serde(default)]
    pub divisors: NormalizationDivisors,
}

/// Report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Document title
    #[serde(default = "default_report_title")]
    pub title: String,
    /// Product name used in page footers
    #[serde(default = "default_product")]
    pub product: String,
    /// Data rows per rendered page
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
}

// Default value functions
fn default_app_name() -> String {
    PRODUCT_NAME.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_history_path() -> PathBuf {
    PathBuf::from("data/history.json")
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_report_title() -> String {
    "Chemical Equipment Parameter Report".to_string()
}

fn default_product() -> String {
    PRODUCT_NAME.to_string()
}

fn default_rows_per_page() -> usize {
    30
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            path: default_history_path(),
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            top_n: default_top_n(),
            divisors: NormalizationDivisors::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_report_title(),
            product: default_product(),
            rows_per_page: default_rows_per_page(),
        }
    }
}

/// Log levels accepted by `application.log_level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl AppConfig {
    /// Load configuration from `config/dashboard.toml` and environment variables
    ///
    /// Example override: `EQUIPMENT_DASHBOARD_APPLICATION__LOG_LEVEL=debug`
    pub fn load() -> AppResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        Self::figment(path.as_ref()).extract().map_err(Into::into)
    }

    /// Provider chain used by [`load_from`](Self::load_from)
    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        let level = self.application.log_level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        if self.history.capacity == 0 {
            return Err("Invalid history.capacity 0. Must be at least 1".to_string());
        }

        if self.projection.page_size == 0 {
            return Err("Invalid projection.page_size 0. Must be at least 1".to_string());
        }

        if self.projection.top_n == 0 {
            return Err("Invalid projection.top_n 0. Must be at least 1".to_string());
        }

        let divisors = &self.projection.divisors;
        for (name, value) in [
            ("flowrate", divisors.flowrate),
            ("pressure", divisors.pressure),
            ("temperature", divisors.temperature),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!(
                    "Invalid projection.divisors.{} {}. Must be a positive number",
                    name, value
                ));
            }
        }

        Ok(())
    }

    /// Load from `path` and validate in one step.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let config = Self::load_from(path)?;
        config.validate().map_err(DashboardError::Configuration)?;
        Ok(config)
    }
}
