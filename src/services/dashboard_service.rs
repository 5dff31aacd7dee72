use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::api::myfinstocks::{ApiError, MyFinStocksClient};
use crate::models::{DashboardData, DashboardState};
use crate::services::series_service;
use crate::utils::page_error_message;

/// Fetch everything the page needs for `symbol`.
///
/// One request: the cached price record. The trend is derived from it.
pub async fn load(client: &MyFinStocksClient, symbol: &str) -> Result<DashboardData, ApiError> {
    let summary = client.get_cached_price(symbol).await?;
    let series = series_service::series_from_summary(&summary);
    debug!("Derived {} trend points for {}", series.len(), summary.symbol);

    Ok(DashboardData { summary, series })
}

/// Dashboard page controller.
///
/// Starts in `Loading`, moves once to `Loaded` or `Error`. After
/// [`unmount`](Self::unmount) no load result is committed.
pub struct DashboardPage {
    state: Arc<RwLock<DashboardState>>,
    mounted: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl DashboardPage {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(DashboardState::Loading)),
            mounted: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// Start loading in the background. Mounting twice is a no-op.
    pub fn mount(&mut self, client: Arc<MyFinStocksClient>, symbol: String) {
        if self.task.is_some() || self.mounted.swap(true, Ordering::SeqCst) {
            debug!("Dashboard already mounted");
            return;
        }

        info!("📈 Loading {}", symbol);

        let state = self.state.clone();
        let mounted = self.mounted.clone();
        self.task = Some(tokio::spawn(async move {
            let result = load(&client, &symbol).await;
            commit(&state, &mounted, result).await;
        }));
    }

    /// Wait for the in-flight load, if any
    pub async fn wait(&mut self) {
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Dashboard load task failed: {}", e);
                }
            }
            self.task = None;
        }
    }

    /// Tear the page down. Any in-flight load is aborted and its result dropped.
    pub fn unmount(&mut self) {
        self.mounted.store(false, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            debug!("Aborting in-flight dashboard load");
            task.abort();
        }
    }

    #[cfg(test)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Snapshot of the current state
    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }
}

impl Default for DashboardPage {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DashboardPage {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Apply a load result, unless the page was unmounted meanwhile
async fn commit(
    state: &RwLock<DashboardState>,
    mounted: &AtomicBool,
    result: Result<DashboardData, ApiError>,
) {
    if !mounted.load(Ordering::SeqCst) {
        debug!("Page unmounted before load finished, dropping result");
        return;
    }

    let next = match result {
        Ok(data) => {
            info!("✅ Dashboard loaded for {}", data.summary.symbol);
            DashboardState::Loaded(data)
        }
        Err(e) => {
            match e.status() {
                Some(status) => error!("❌ Dashboard load failed with HTTP {}: {}", status, e),
                None => error!("❌ Dashboard load failed: {}", e),
            }
            DashboardState::Error(page_error_message(&e))
        }
    };

    let mut current = state.write().await;
    if current.is_terminal() {
        debug!("Dashboard state already settled, ignoring late result");
        return;
    }
    *current = next;
}
