//! Configuration management for `skypane`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::{DisplayUnit, SkypaneError};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Open-Meteo geocoding endpoint
pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
/// Open-Meteo forecast endpoint
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkypaneConfig {
    /// Weather service settings
    #[serde(default)]
    pub service: ServiceConfig,
    /// Display preferences
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Geocoding search endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Display preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Unit selected at startup
    #[serde(default)]
    pub unit: DisplayUnit,
    /// Disable colors in the terminal view
    #[serde(default)]
    pub mono: bool,
    /// Disable the animated backdrop
    #[serde(default = "default_animations")]
    pub animations: bool,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log file used while the terminal view owns the screen
    #[serde(default = "default_log_file_path")]
    pub file_path: String,
}

// Default value functions
fn default_geocoding_url() -> String {
    GEOCODING_URL.to_string()
}

fn default_forecast_url() -> String {
    FORECAST_URL.to_string()
}

fn default_timeout() -> u32 {
    15
}

fn default_user_agent() -> String {
    format!("skypane/{}", crate::VERSION)
}

fn default_animations() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_log_file_path() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("skypane").join("skypane.log"))
        .unwrap_or_else(|| PathBuf::from("skypane.log"))
        .to_string_lossy()
        .into_owned()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unit: DisplayUnit::default(),
            mono: false,
            animations: default_animations(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file_path: default_log_file_path(),
        }
    }
}

impl Default for SkypaneConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            display: DisplayConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SkypaneConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SKYPANE__SERVICE__TIMEOUT_SECONDS=30 style overrides
        builder = builder.add_source(
            Environment::with_prefix("SKYPANE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkypaneConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skypane").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.service.geocoding_url.is_empty() {
            self.service.geocoding_url = default_geocoding_url();
        }
        if self.service.forecast_url.is_empty() {
            self.service.forecast_url = default_forecast_url();
        }
        if self.service.timeout_seconds == 0 {
            self.service.timeout_seconds = default_timeout();
        }
        if self.service.user_agent.trim().is_empty() {
            self.service.user_agent = default_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.logging.file_path.is_empty() {
            self.logging.file_path = default_log_file_path();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.service.timeout_seconds > 120 {
            return Err(
                SkypaneError::config("Service timeout cannot exceed 120 seconds").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkypaneError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkypaneError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (field, url) in [
            ("geocoding_url", &self.service.geocoding_url),
            ("forecast_url", &self.service.forecast_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkypaneError::config(format!(
                    "Service {field} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
