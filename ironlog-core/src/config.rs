//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/ironlog/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/ironlog/` (~/.config/ironlog/)
//! - State/Logs: `$XDG_STATE_HOME/ironlog/` (~/.local/state/ironlog/)
//!
//! ```toml
//! [insights]
//! profile = "aggressive"
//! max_warnings = 2
//!
//! [athlete]
//! weekly_goal = 4
//! age_band = "masters"
//! weight_unit = "kg"
//!
//! [metrics]
//! weeks_back = 16
//! ```

use crate::analytics::metrics::{
    AgeBand, MetricsOptions, DEFAULT_WEEKS_BACK, DEFAULT_WEIGHT_WINDOW_DAYS,
};
use crate::analytics::profile::{InsightProfile, ProfileName};
use crate::error::{Error, Result};
use crate::format::WeightUnit;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

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

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Insight profile selection and cap overrides
    #[serde(default)]
    pub insights: InsightsConfig,

    /// Athlete preferences
    #[serde(default)]
    pub athlete: AthleteConfig,

    /// Metric window sizes
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Insight profile configuration
#[derive(Debug, Deserialize, Default)]
pub struct InsightsConfig {
    /// Named profile ("strict" or "aggressive")
    #[serde(default)]
    pub profile: ProfileName,

    /// Override the profile's total insight cap
    pub max_insights: Option<usize>,

    /// Override the profile's warning cap
    pub max_warnings: Option<usize>,
}

/// Athlete preferences
#[derive(Debug, Deserialize, Default)]
pub struct AthleteConfig {
    /// Target workouts per week
    pub weekly_goal: Option<u32>,

    #[serde(default)]
    pub age_band: AgeBand,

    /// Display unit for weights; stored values are never converted
    #[serde(default)]
    pub weight_unit: WeightUnit,
}

/// Metric window configuration
#[derive(Debug, Deserialize)]
pub struct MetricsConfig {
    /// Weeks in the trailing weekly series
    #[serde(default = "default_weeks_back")]
    pub weeks_back: usize,

    /// Days in the body-weight trend window
    #[serde(default = "default_weight_window_days")]
    pub weight_window_days: i64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            weeks_back: default_weeks_back(),
            weight_window_days: default_weight_window_days(),
        }
    }
}

fn default_weeks_back() -> usize {
    DEFAULT_WEEKS_BACK
}

fn default_weight_window_days() -> i64 {
    DEFAULT_WEIGHT_WINDOW_DAYS
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
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Resolve the named profile with any cap overrides applied
    pub fn insight_profile(&self) -> InsightProfile {
        InsightProfile::named(self.insights.profile)
            .with_caps(self.insights.max_insights, self.insights.max_warnings)
    }

    /// Build engine options for a given "today"
    pub fn metrics_options(&self, as_of: NaiveDate) -> MetricsOptions {
        MetricsOptions::new(as_of)
            .with_weekly_goal(self.athlete.weekly_goal)
            .with_weeks_back(self.metrics.weeks_back)
            .with_weight_window_days(self.metrics.weight_window_days)
            .with_age_band(self.athlete.age_band)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/ironlog/config.toml` (~/.config/ironlog/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("ironlog").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/ironlog/` (~/.local/state/ironlog/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("ironlog")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/ironlog/ironlog.log` (~/.local/state/ironlog/ironlog.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("ironlog.log")
    }
}
