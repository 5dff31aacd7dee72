//! Dashboard page models

use crate::api::myfinstocks::Summary;
use super::chart::PricePoint;

/// Everything a loaded page shows
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub summary: Summary,
    pub series: Vec<PricePoint>,
}

/// Page state. `Loaded` and `Error` are terminal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashboardState {
    #[default]
    Loading,
    Loaded(DashboardData),
    Error(String),
}

impl DashboardState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DashboardState::Loading)
    }
}

/// One labelled figure in the card row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

impl StatCard {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Change of the latest price relative to an earlier point
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub label: String,
    pub reference: f64,
    /// `None` when the reference price is zero
    pub change_pct: Option<f64>,
}
