//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/clinicflow/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/clinicflow/` (~/.config/clinicflow/)
//! - Data: `$XDG_DATA_HOME/clinicflow/` (~/.local/share/clinicflow/)
//! - State/Logs: `$XDG_STATE_HOME/clinicflow/` (~/.local/state/clinicflow/)

use crate::error::{Error, Result};
use crate::metrics::{ClinicianSort, Granularity, ReportOptions, TrendInclusion};
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Record store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Report configuration
    #[serde(default)]
    pub report: ReportConfig,

    /// Clinic-local time configuration
    #[serde(default)]
    pub clinic: ClinicConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record store configuration
#[derive(Debug, Deserialize, Default)]
pub struct StoreConfig {
    /// Path to the visit CSV file; defaults to the XDG data directory
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// The configured store path, or the default location.
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(Config::default_store_path)
    }
}

/// Dashboard report configuration
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Trend bucketing period ("week" or "month")
    #[serde(default)]
    pub granularity: Granularity,

    /// Trend category inclusion policy ("union" or "both")
    #[serde(default)]
    pub trend_inclusion: TrendInclusion,

    /// Clinician table sort key ("visit_count" or "doctor_time")
    #[serde(default)]
    pub clinician_sort: ClinicianSort,

    /// Row cap for the top-categories table
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            trend_inclusion: TrendInclusion::default(),
            clinician_sort: ClinicianSort::default(),
            top_categories: default_top_categories(),
        }
    }
}

impl ReportConfig {
    /// Engine options for this configuration.
    pub fn options(&self) -> ReportOptions {
        ReportOptions {
            granularity: self.granularity,
            trend_inclusion: self.trend_inclusion,
            clinician_sort: self.clinician_sort,
            top_categories: self.top_categories,
        }
    }
}

fn default_top_categories() -> usize {
    5
}

/// Clinic-local time configuration
///
/// "Today" metrics follow the clinic's wall clock, not the machine's.
#[derive(Debug, Deserialize)]
pub struct ClinicConfig {
    /// UTC offset of the clinic in hours (default: Mountain Time, UTC-7)
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

impl ClinicConfig {
    /// Today's date on the clinic's wall clock.
    pub fn today(&self) -> NaiveDate {
        let offset = FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        Utc::now().with_timezone(&offset).date_naive()
    }
}

fn default_utc_offset_hours() -> i32 {
    -7
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/clinicflow/config.toml` (~/.config/clinicflow/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("clinicflow").join("config.toml")
    }

    /// Returns the data directory path (for the visit CSV store)
    ///
    /// `$XDG_DATA_HOME/clinicflow/` (~/.local/share/clinicflow/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("clinicflow")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/clinicflow/` (~/.local/state/clinicflow/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("clinicflow")
    }

    /// Returns the default visit store path
    ///
    /// `$XDG_DATA_HOME/clinicflow/visits.csv`
    pub fn default_store_path() -> PathBuf {
        Self::data_dir().join("visits.csv")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/clinicflow/clinicflow.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("clinicflow.log")
    }
}
