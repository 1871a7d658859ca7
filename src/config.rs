//! Configuration management for `BelWeather`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::BelWeatherError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Weatherbit API key
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Root configuration structure for the `BelWeather` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BelWeatherConfig {
    /// Weather API configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weatherbit API key, required
    pub api_key: Option<String>,
    /// Base URL for weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Language of the weather description
    #[serde(default = "default_weather_language")]
    pub language: String,
    /// Unit system flag understood by the provider (`M` = metric)
    #[serde(default = "default_weather_units")]
    pub units: String,
    /// Request timeout in seconds, per attempt
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Total attempts for one request, including the first
    #[serde(default = "default_weather_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for every further retry
    #[serde(default = "default_weather_backoff_base")]
    pub backoff_base_ms: u64,
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
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.weatherbit.io/v2.0".to_string()
}

fn default_weather_language() -> String {
    "ru".to_string()
}

fn default_weather_units() -> String {
    "M".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_weather_max_attempts() -> u32 {
    3
}

fn default_weather_backoff_base() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8000
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            language: default_weather_language(),
            units: default_weather_units(),
            timeout_seconds: default_weather_timeout(),
            max_attempts: default_weather_max_attempts(),
            backoff_base_ms: default_weather_backoff_base(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl BelWeatherConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // BELWEATHER_WEATHER__TIMEOUT_SECONDS=5 style overrides
        builder = builder.add_source(
            Environment::with_prefix("BELWEATHER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: BelWeatherConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if let Ok(api_key) = std::env::var(API_KEY_ENV) {
            config.weather.api_key = Some(api_key);
        }

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("belweather").join("config.toml"))
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.language.is_empty() {
            self.weather.language = default_weather_language();
        }
        if self.weather.units.is_empty() {
            self.weather.units = default_weather_units();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.max_attempts == 0 {
            self.weather.max_attempts = default_weather_max_attempts();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.weather.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                BelWeatherError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.max_attempts > 10 {
            return Err(BelWeatherError::config("Weather API max attempts cannot exceed 10").into());
        }

        if self.weather.backoff_base_ms > 60_000 {
            return Err(BelWeatherError::config(
                "Weather API backoff base cannot exceed 60000 ms",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(BelWeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(BelWeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(BelWeatherError::config(
                "Weather API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}

impl WeatherConfig {
    /// The configured API key, or a configuration error naming the variable
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            BelWeatherError::config(format!(
                "Weather API key is missing. Set {API_KEY_ENV} or weather.api_key in the config file."
            ))
            .into()
        })
    }

    /// Validate API keys and credentials
    pub fn validate_api_key(&self) -> Result<()> {
        let api_key = self.api_key()?;

        if api_key.trim().is_empty() {
            return Err(BelWeatherError::config(format!(
                "Weather API key cannot be empty. Set {API_KEY_ENV} to a valid key."
            ))
            .into());
        }

        if api_key.len() < 8 {
            return Err(BelWeatherError::config(
                "Weather API key appears to be invalid (too short). Please check your API key.",
            )
            .into());
        }

        if api_key.len() > 100 {
            return Err(BelWeatherError::config(
                "Weather API key appears to be invalid (too long). Please check your API key.",
            )
            .into());
        }

        Ok(())
    }
}
