pub mod chart_service;
pub mod dashboard_service;
pub mod series_service;
