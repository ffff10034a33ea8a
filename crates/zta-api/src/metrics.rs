// Metrics endpoints

use reqwest::Method;
use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::MetricsSummary;

impl ApiClient {
    /// Fetch the aggregate metrics summary.
    ///
    /// `GET /metrics/summary`. Decoding is lenient: a successful response
    /// always yields a summary, possibly with empty maps.
    pub async fn metrics_summary(&self) -> Result<MetricsSummary, Error> {
        let url = self.endpoint(&["metrics", "summary"])?;
        debug!("fetching metrics summary");
        let body = self.send(Method::GET, url, None).await?;
        if !body.is_object() {
            warn!(%body, "metrics summary is not a JSON object");
        }
        Ok(MetricsSummary::from_value(&body))
    }
}
