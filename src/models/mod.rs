//! Data models for the dashboard page and its services

pub mod chart;
pub mod dashboard;

pub use chart::PricePoint;
pub use dashboard::{DashboardData, DashboardState, StatCard, TrendRow};
