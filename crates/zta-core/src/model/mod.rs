// ── Domain model ──

pub mod device;
pub mod metrics;

pub use device::{Device, DeviceId, DeviceMode, DeviceType};
pub use metrics::{
    DETECTED, HomeSummary, MetricRow, MetricsSnapshot, PLACEHOLDER, SeriesPoint, UNDETECTED,
    format_rate, parse_rate, round2,
};
