use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A price as the backend sends it.
///
/// Decimal columns are serialized as JSON strings by the API, but numbers
/// are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    /// Numeric value for charting. Empty or non-numeric text counts as zero.
    pub fn to_number(&self) -> f64 {
        match self {
            PriceValue::Number(n) => *n,
            PriceValue::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return 0.0;
                }
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => n,
                    _ => {
                        warn!("Price '{}' is not numeric, using 0", text);
                        0.0
                    }
                }
            }
        }
    }

    /// Text shown on a stat card
    pub fn to_display(&self) -> String {
        match self {
            PriceValue::Number(n) => n.to_string(),
            PriceValue::Text(text) => text.clone(),
        }
    }
}

impl From<f64> for PriceValue {
    fn from(value: f64) -> Self {
        PriceValue::Number(value)
    }
}

impl From<&str> for PriceValue {
    fn from(value: &str) -> Self {
        PriceValue::Text(value.to_string())
    }
}

/// Missing or null prices chart as zero
pub fn number_or_zero(value: &Option<PriceValue>) -> f64 {
    value.as_ref().map(PriceValue::to_number).unwrap_or(0.0)
}

/// Missing or null prices display as `n/a`
pub fn display_or_na(value: &Option<PriceValue>) -> String {
    value
        .as_ref()
        .map(PriceValue::to_display)
        .unwrap_or_else(|| "n/a".to_string())
}

fn default_exchange() -> String {
    "NSE".to_string()
}

/// Cached price record for one security, from `/prices/{symbol}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub symbol: String,
    #[serde(default = "default_exchange")]
    pub exchange: String,
    #[serde(default)]
    pub live_price: Option<PriceValue>,
    #[serde(default)]
    pub yesterday_price: Option<PriceValue>,
    #[serde(default)]
    pub price_30d_ago: Option<PriceValue>,
    #[serde(default)]
    pub price_1y_ago: Option<PriceValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Errors from the MyFinStocks API client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network/transport failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-success status; the message is the raw response body
    #[error("{body}")]
    Status { status: u16, body: String },
    /// Body was not the JSON the caller expected
    #[error("Failed to parse response: {0}")]
    Deserialization(#[from] serde_json::Error),
    /// Base address and path did not make a usable URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Request(e) => e.status().map(|s| s.as_u16()),
            ApiError::Deserialization(_) | ApiError::InvalidUrl(_) => None,
        }
    }
}
