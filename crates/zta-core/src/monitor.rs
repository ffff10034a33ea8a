// ── Metrics snapshot client ──
//
// Holds the most recent metrics summary. A refresh swaps in a whole new
// snapshot; a failed refresh leaves the old one in place.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;
use zta_api::ApiClient;

use crate::error::CoreError;
use crate::model::MetricsSnapshot;
use crate::store::{ResourceState, ResourceView};

pub struct MetricsMonitor {
    api: Arc<ApiClient>,
    state: ResourceState<MetricsSnapshot>,
}

impl MetricsMonitor {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            state: ResourceState::new(),
        }
    }

    /// Fetch a fresh summary and make it the held snapshot.
    ///
    /// Safe to call while another refresh is outstanding: the one issued
    /// last wins.
    pub async fn refresh(&self) -> Result<Arc<MetricsSnapshot>, CoreError> {
        let ticket = self.state.begin();
        let seq = ticket.seq();

        match self.api.metrics_summary().await {
            Ok(summary) => {
                let snapshot = Arc::new(MetricsSnapshot::from(summary));
                if !ticket.succeed(Arc::clone(&snapshot)) {
                    debug!(seq, "metrics snapshot superseded, discarded");
                }
                Ok(snapshot)
            }
            Err(source) => {
                let err = CoreError::Fetch {
                    resource: "metrics",
                    source,
                };
                ticket.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Held snapshot, if any refresh has succeeded yet.
    pub fn snapshot(&self) -> Option<Arc<MetricsSnapshot>> {
        self.state.data()
    }

    pub fn view(&self) -> ResourceView<MetricsSnapshot> {
        self.state.view()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceView<MetricsSnapshot>> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.view().is_loading()
    }

    pub fn last_error(&self) -> Option<String> {
        self.view().error
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.view().last_updated
    }

    /// Discard the results of every refresh issued so far.
    pub fn detach(&self) {
        self.state.detach();
    }
}
