//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; the provider API key can be
//! overridden from the `ALPHAVANTAGE_API_KEY` environment variable so it
//! never has to live in the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{ConfigError, Result};

/// Environment variable consulted for the provider credential.
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Market-data provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub api_url: String,
    /// Static credential; prefer the env override to the file.
    #[serde(default)]
    pub api_key: String,
    /// Transport timeout per request. No retry on top of it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// SQLite database location.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

/// Destination for the single-record JSON export side effect.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Config {
    /// Load configuration from a TOML file, apply the env credential
    /// override, and validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.provider.api_key = key;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a runnable configuration must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.provider.api_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "provider.api_url",
            }
            .into());
        }
        if self.provider.api_key.is_empty() {
            return Err(ConfigError::MissingField {
                field: "provider.api_key",
            }
            .into());
        }
        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "provider.timeout_ms",
                reason: "must be greater than zero".into(),
            }
            .into());
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.path",
            }
            .into());
        }
        Ok(())
    }

    /// Initialize the tracing subscriber from the logging section.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Render a TOML template with the default settings filled in.
    #[must_use]
    pub fn template() -> String {
        let defaults = Self::default();
        format!(
            "[provider]\n\
             api_url = \"{}\"\n\
             # Prefer the {} environment variable for the key.\n\
             api_key = \"\"\n\
             timeout_ms = {}\n\
             \n\
             [database]\n\
             path = \"{}\"\n\
             \n\
             [export]\n\
             dir = \"{}\"\n\
             \n\
             [logging]\n\
             level = \"{}\"\n\
             format = \"{}\"\n",
            defaults.provider.api_url,
            API_KEY_ENV,
            defaults.provider.timeout_ms,
            defaults.database.path.display(),
            defaults.export.dir.display(),
            defaults.logging.level,
            defaults.logging.format,
        )
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: "https://www.alphavantage.co/query".into(),
            api_key: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stockledger.db"),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber with this logging configuration.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}
