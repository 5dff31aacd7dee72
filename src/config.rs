use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_SYMBOL: &str = "RELIANCE";
const DEFAULT_CHART_PATH: &str = "dashboard_chart.png";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors, raised at start-up before any request is made
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set in environment or .env file")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Process-wide settings, loaded once in `main`
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub symbol: String,
    pub chart_path: PathBuf,
    pub timeout: Duration,
}

impl Config {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// Only `API_BASE_URL` is required. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let raw_base = get("API_BASE_URL").ok_or(ConfigError::Missing("API_BASE_URL"))?;
        let api_base_url = validate_base_url(&raw_base)?;

        let timeout_secs = match get("DASHBOARD_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "DASHBOARD_TIMEOUT_SECS",
                    reason: format!("'{}' is not a positive number of seconds", raw),
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_base_url,
            symbol: get("DASHBOARD_SYMBOL")
                .map(|s| s.to_uppercase())
                .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            chart_path: get("DASHBOARD_CHART_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_PATH)),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Paths are appended verbatim, so the trailing slash is dropped here
fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = reqwest::Url::parse(raw).map_err(|e| ConfigError::Invalid {
        key: "API_BASE_URL",
        reason: format!("'{}' is not a URL: {}", raw, e),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid {
            key: "API_BASE_URL",
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(raw.trim_end_matches('/').to_string())
}
