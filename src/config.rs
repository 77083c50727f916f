/// Dashboard configuration loader - parses dashboard.toml
///
/// Separates analysis settings from code, making it easy to change the
/// significance level, the reported return periods, or the severity
/// limits without recompiling the service.
///
/// ```toml
/// [analysis]
/// significance_level = 0.05
/// min_trend_points = 4
/// return_periods = [2, 5, 10, 25, 50, 100]
///
/// [severity]
/// high_damage_usd = 10000000.0
///
/// [endpoint]
/// bind_address = "0.0.0.0"
/// port = 8080
/// ```
///
/// Every key is optional; missing keys take the defaults shown.

use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analysis::return_period::DEFAULT_RETURN_PERIODS;
use crate::analysis::severity::SeverityThresholds;
use crate::analysis::trend::{DEFAULT_ALPHA, MIN_TREND_POINTS};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

/// Environment variable that overrides `DEFAULT_CONFIG_PATH`.
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub analysis: AnalysisConfig,
    pub severity: SeverityThresholds,
    pub endpoint: EndpointConfig,
}

/// Statistical test settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Two-sided significance level for the Mann-Kendall test.
    pub significance_level: f64,
    /// Shortest series the trend test is run on.
    pub min_trend_points: usize,
    /// Return periods (years) evaluated on the fitted distribution.
    pub return_periods: Vec<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_level: DEFAULT_ALPHA,
            min_trend_points: MIN_TREND_POINTS,
            return_periods: DEFAULT_RETURN_PERIODS.to_vec(),
        }
    }
}

/// HTTP endpoint settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl DashboardConfig {
    /// Parses configuration text. `origin` is used in error messages.
    pub fn from_toml_str(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig =
            toml::from_str(contents).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.analysis.significance_level;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "significance_level must be in (0, 1), got {}",
                alpha
            )));
        }
        if self.analysis.return_periods.iter().any(|&t| t < 2) {
            return Err(ConfigError::Invalid(
                "return_periods must all be at least 2 years".to_string(),
            ));
        }
        let s = &self.severity;
        if s.medium_damage_usd > s.high_damage_usd {
            return Err(ConfigError::Invalid(format!(
                "medium_damage_usd ({}) exceeds high_damage_usd ({})",
                s.medium_damage_usd, s.high_damage_usd
            )));
        }
        Ok(())
    }
}

/// Resolves the configuration path from `DASHBOARD_CONFIG`, falling back
/// to `dashboard.toml`.
pub fn config_path() -> PathBuf {
    env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads configuration from `path`.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    DashboardConfig::from_toml_str(&contents, &path.display().to_string())
}

/// Loads configuration from `path`, using defaults when the file does not
/// exist. A file that exists but is malformed is still an error.
pub fn load_config_or_default(path: &Path) -> Result<DashboardConfig, ConfigError> {
    match load_config(path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            log::info!("{} not found, using default configuration", path.display());
            Ok(DashboardConfig::default())
        }
        other => other,
    }
}
