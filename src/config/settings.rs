//! Application settings and configuration management

use crate::error::{AppError, Result};
use crate::generation::RetryPolicy;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variables consulted for the upstream key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Upper bound on `generation.max_retries`
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Upper bound on `generation.base_delay_ms`
pub const MAX_BASE_DELAY_MS: u64 = 60_000;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Upstream image generation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Falls back to `GEMINI_API_KEY` / `API_KEY` when unset
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "imagen-4.0-generate-001".to_string()
}

fn default_timeout() -> u64 {
    60000
}

fn default_max_retries() -> u32 {
    2
}

fn default_base_delay() -> u64 {
    1000
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_ms: default_timeout(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay(),
        }
    }
}

impl GenerationConfig {
    /// Configured key, else the first non-empty key environment variable
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Same as `resolve_api_key`, reading variables through `lookup`
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .filter_map(|name| lookup(name))
                    .find(|key| !key.trim().is_empty())
            })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.base_delay_ms))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
}

fn default_storage_path() -> String {
    "./data/cover_art_state.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("generation.max_retries", default_max_retries() as i64)?
            .set_default("generation.base_delay_ms", default_base_delay() as i64)?
            .add_source(
                File::with_name(path.as_ref().to_str().unwrap_or("config/default"))
                    .required(false),
            )
            // Override with environment variables (prefixed with COVER_ART__)
            .add_source(
                Environment::with_prefix("COVER_ART")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.generation.model.trim().is_empty() {
            return Err(invalid("Generation model cannot be empty"));
        }

        if reqwest::Url::parse(&self.generation.endpoint).is_err() {
            return Err(invalid(&format!(
                "Generation endpoint '{}' is not a valid URL",
                self.generation.endpoint
            )));
        }

        if self.generation.max_retries > MAX_RETRIES_LIMIT {
            return Err(invalid(&format!(
                "Generation max_retries {} exceeds the limit of {}",
                self.generation.max_retries, MAX_RETRIES_LIMIT
            )));
        }

        if self.generation.base_delay_ms > MAX_BASE_DELAY_MS {
            return Err(invalid(&format!(
                "Generation base_delay_ms {} exceeds the limit of {}",
                self.generation.base_delay_ms, MAX_BASE_DELAY_MS
            )));
        }

        if self.generation.timeout_ms == 0 {
            return Err(invalid("Generation timeout_ms cannot be 0"));
        }

        if self.storage.path.trim().is_empty() {
            return Err(invalid("Storage path cannot be empty"));
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(invalid(&format!(
                "Logging format '{}' must be 'json' or 'pretty'",
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> AppError {
    AppError::Config(config::ConfigError::Message(message.to_string()))
}
