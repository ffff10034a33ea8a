// ── Console facade ──
//
// One gateway session: a shared HTTP client injected into the device
// registry and the metrics monitor, plus the background tasks that feed
// them.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use zta_api::ApiClient;

use crate::config::ConsoleConfig;
use crate::error::CoreError;
use crate::monitor::MetricsMonitor;
use crate::poll::spawn_metrics_poller;
use crate::registry::DeviceRegistry;

/// Main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ConsoleInner>`. Creating one sends nothing;
/// call [`DeviceRegistry::list`] or [`MetricsMonitor::refresh`] to load
/// data, or [`start_polling`](Self::start_polling) for periodic metrics.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    api: Arc<ApiClient>,
    devices: DeviceRegistry,
    metrics: Arc<MetricsMonitor>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(&config.transport()).map_err(|e| CoreError::Config {
            message: e.to_string(),
        })?;
        Ok(Self::with_api(config, Arc::new(api)))
    }

    /// Build around an existing client.
    pub fn with_api(config: ConsoleConfig, api: Arc<ApiClient>) -> Self {
        Self {
            inner: Arc::new(ConsoleInner {
                devices: DeviceRegistry::new(Arc::clone(&api)),
                metrics: Arc::new(MetricsMonitor::new(Arc::clone(&api))),
                config,
                api,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.inner.api
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.inner.devices
    }

    pub fn metrics(&self) -> &Arc<MetricsMonitor> {
        &self.inner.metrics
    }

    /// Spawn the metrics poller at the configured interval. No-op when the
    /// interval is zero or the console is shut down.
    pub async fn start_polling(&self) {
        let period = self.inner.config.poll_interval;
        if period.is_zero() || self.inner.cancel.is_cancelled() {
            return;
        }
        let handle = spawn_metrics_poller(
            Arc::clone(&self.inner.metrics),
            period,
            self.inner.cancel.child_token(),
        );
        self.inner.task_handles.lock().await.push(handle);
        debug!(?period, "metrics polling started");
    }

    /// Stop background tasks and discard every outstanding result.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner.devices.detach();
        self.inner.metrics.detach();
        debug!("console shut down");
    }
}
