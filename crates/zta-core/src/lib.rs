//! zta-core: client-side synchronization layer between `zta-api` and
//! consumers (CLI, UI).
//!
//! [`DeviceRegistry`] mirrors the gateway's device table and
//! [`MetricsMonitor`] holds the latest [`MetricsSnapshot`]. Both apply
//! results in request-issue order and keep their last good value when a
//! fetch fails. [`Console`] wires them to one shared HTTP client.

pub mod config;
pub mod console;
mod convert;
pub mod error;
pub mod model;
pub mod monitor;
pub mod poll;
pub mod registry;
mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, DEFAULT_POLL_INTERVAL};
pub use console::Console;
pub use error::CoreError;
pub use monitor::MetricsMonitor;
pub use poll::spawn_metrics_poller;
pub use registry::DeviceRegistry;
pub use store::ResourceView;
pub use zta_api::Error as ApiError;

pub use model::{
    DETECTED, Device, DeviceId, DeviceMode, DeviceType, HomeSummary, MetricRow, MetricsSnapshot,
    PLACEHOLDER, SeriesPoint, UNDETECTED, format_rate, parse_rate, round2,
};
