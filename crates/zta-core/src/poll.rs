// ── Background polling ──

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::monitor::MetricsMonitor;

/// Refresh `monitor` every `period` until `cancel` fires.
///
/// The first refresh runs immediately. Failures are logged and leave the
/// previous snapshot in place. A zero `period` is clamped to one second.
pub fn spawn_metrics_poller(
    monitor: Arc<MetricsMonitor>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(metrics_poll_task(monitor, period, cancel))
}

async fn metrics_poll_task(
    monitor: Arc<MetricsMonitor>,
    period: Duration,
    cancel: CancellationToken,
) {
    let period = if period.is_zero() {
        Duration::from_secs(1)
    } else {
        period
    };
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = monitor.refresh().await {
                    warn!(error = %e, "periodic metrics refresh failed");
                }
            }
        }
    }
    debug!("metrics poller stopped");
}
