// ── Runtime connection configuration ──
//
// Describes *where* the gateway lives and how often to poll it.
// Never touches disk: the CLI builds a `ConsoleConfig` and hands it in.

use std::time::Duration;

use url::Url;
use zta_api::{DEFAULT_TIMEOUT, TransportConfig};

/// Default metrics polling period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for one console session against one gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// API root, e.g. `http://localhost:8000/api`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Period of the background metrics poller. Zero disables it.
    pub poll_interval: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            base_url: transport.base_url,
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ConsoleConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig::new(self.base_url.clone()).with_timeout(self.timeout)
    }
}
