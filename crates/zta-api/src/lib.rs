// zta-api: Async Rust client for the ZTA gateway REST API

pub mod client;
pub mod devices;
pub mod error;
pub mod metrics;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use error::{Error, ErrorKind};
pub use models::{DeviceRecord, MetricsSummary, NewDevice};
pub use transport::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, TransportConfig};
