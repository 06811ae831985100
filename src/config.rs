//! Process configuration from environment variables

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TAVILY_API_URL: &str = "https://api.tavily.com";
pub const DEFAULT_SCRYFALL_API_URL: &str = "https://api.scryfall.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { name: &'static str, value: String },
    #[error("{name} must be 'json' or 'text', got '{value}'")]
    InvalidLogFormat { name: &'static str, value: String },
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for the assistant and its collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Web search API key; web search is disabled without it
    pub tavily_api_key: Option<String>,
    pub tavily_api_url: String,
    pub scryfall_api_url: String,
    pub http_timeout: Duration,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: None,
            tavily_api_url: DEFAULT_TAVILY_API_URL.to_string(),
            scryfall_api_url: DEFAULT_SCRYFALL_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let http_timeout = match var("HTTP_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout {
                    name: "HTTP_TIMEOUT_SECS",
                    value,
                })?,
            None => defaults.http_timeout,
        };

        let log_format = match var("LOG_FORMAT") {
            Some(value) => match value.trim().to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "text" | "pretty" => LogFormat::Text,
                _ => {
                    return Err(ConfigError::InvalidLogFormat {
                        name: "LOG_FORMAT",
                        value,
                    })
                }
            },
            None => defaults.log_format,
        };

        Ok(Self {
            tavily_api_key: var("TAVILY_API_KEY"),
            tavily_api_url: var("TAVILY_API_URL").unwrap_or(defaults.tavily_api_url),
            scryfall_api_url: var("SCRYFALL_API_URL").unwrap_or(defaults.scryfall_api_url),
            http_timeout,
            log_format,
        })
    }

    /// Shared HTTP client for the network-backed tools
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}
