//! Chart series models

use serde::{Deserialize, Serialize};

/// A single point on the trend line: a time label and its price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub label: String,
    pub value: f64,
}

impl PricePoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}
