use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;
mod utils;

use api::myfinstocks::MyFinStocksClient;
use config::Config;
use models::DashboardState;
use services::chart_service::{self, ChartError, CHART_HEIGHT, CHART_WIDTH};
use services::dashboard_service::DashboardPage;
use utils::Page;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Logs go to stderr, stdout carries the rendered page
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("finstocks_dash=debug,reqwest=warn")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("📊 Starting MyFinStocks dashboard...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("API base URL: {} | symbol: {}", config.api_base_url, config.symbol);

    let client = match MyFinStocksClient::new(config.api_base_url.clone(), config.timeout) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut page = DashboardPage::new();
    page.mount(client, config.symbol.clone());

    tokio::select! {
        _ = page.wait() => {}
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, unmounting dashboard");
        }
    }
    page.unmount();

    let state = page.state().await;
    let view = Page::from_state(&state);
    println!("{}", view.render_text());

    match write_chart(&view, &config.symbol, &config.chart_path) {
        Some(Ok(())) => {
            info!("🎨 Chart written to {}", config.chart_path.display());
            println!("\nChart: {}", config.chart_path.display());
        }
        Some(Err(e)) => warn!("Chart skipped: {}", e),
        None => {}
    }

    match state {
        DashboardState::Loaded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

/// Chart the series of a loaded page. Any other state draws nothing.
fn write_chart(view: &Page, symbol: &str, path: &Path) -> Option<Result<(), ChartError>> {
    let points = view.chart.as_ref()?;
    let title = format!("{} Close Price", symbol);
    Some(chart_service::render_chart(path, &title, points, CHART_WIDTH, CHART_HEIGHT))
}
