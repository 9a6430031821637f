//! Configuration loading from file and environment variables.

use crate::settings::AgentSettings;
use carevoice_search::SearchConfig;
use carevoice_voice::LiveKitConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// LiveKit server and signing credentials.
    #[serde(default)]
    pub livekit: LiveKitConfig,

    /// Asset index connection and ranking.
    #[serde(default)]
    pub search: SearchConfig,

    /// Voice pipeline assembly.
    #[serde(default)]
    pub agent: AgentSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "carevoice_agent=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies overrides from the process environment.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %p.display(), "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables.
///
/// - `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET` override `livekit.*`
/// - `CAREVOICE_SEARCH_URL` overrides `search.url`
/// - `CAREVOICE_SEARCH_PORT` overrides `search.port`
/// - `CAREVOICE_SEARCH_SCHEMA` overrides `search.schema`
/// - `CAREVOICE_LOG_LEVEL` overrides `logging.level`
/// - `CAREVOICE_LOG_JSON` overrides `logging.json` (set to "true" to enable)
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Some(key) = lookup("LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Some(secret) = lookup("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }
    if let Some(url) = lookup("CAREVOICE_SEARCH_URL") {
        config.search.url = url;
    }
    if let Some(port) = lookup("CAREVOICE_SEARCH_PORT") {
        match port.parse() {
            Ok(parsed) => config.search.port = parsed,
            Err(_) => tracing::warn!(value = %port, "ignoring invalid CAREVOICE_SEARCH_PORT"),
        }
    }
    if let Some(schema) = lookup("CAREVOICE_SEARCH_SCHEMA") {
        config.search.schema = schema;
    }
    if let Some(level) = lookup("CAREVOICE_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("CAREVOICE_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
}
