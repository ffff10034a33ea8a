// ── Metrics snapshot and derived views ──
//
// Everything below `MetricsSnapshot` is pure: no I/O, no clock, same input
// gives the same output.

use indexmap::IndexMap;
use serde::Serialize;

/// Shown wherever a value is missing or not numeric.
pub const PLACEHOLDER: &str = "N/A";

pub const DETECTED: &str = "Detected";
pub const UNDETECTED: &str = "Undetected";

/// Point-in-time aggregate pulled from the gateway's summary endpoint.
///
/// Immutable once built. A refresh replaces it; two snapshots are never
/// merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Mode name -> average latency in seconds, in gateway order.
    pub latencies: IndexMap<String, f64>,
    /// Mode name -> request count, in gateway order.
    pub requests: IndexMap<String, u64>,
    /// Raw percentage string as sent (`"12.5%"`, `"0"`, ...).
    pub attack_detection_rate: Option<String>,
    pub total_logs: Option<u64>,
    pub throughput_rps: Option<f64>,
}

/// One labeled chart point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<V> {
    pub label: String,
    pub value: V,
}

impl<V> SeriesPoint<V> {
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Figures for the landing-page summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HomeSummary {
    pub total_logs: Option<u64>,
    pub detection_rate: Option<f64>,
    pub unauthorized_rate: Option<f64>,
}

/// One row of the metrics table, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    pub metric: String,
    pub value: String,
}

impl MetricRow {
    fn new(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
        }
    }
}

impl MetricsSnapshot {
    /// `(mode, seconds)` per latency entry, in gateway order.
    pub fn latency_series(&self) -> Vec<SeriesPoint<f64>> {
        self.latencies
            .iter()
            .map(|(mode, secs)| SeriesPoint::new(mode.as_str(), *secs))
            .collect()
    }

    /// `(mode, count)` per request entry, in gateway order.
    pub fn throughput_series(&self) -> Vec<SeriesPoint<u64>> {
        self.requests
            .iter()
            .map(|(mode, count)| SeriesPoint::new(mode.as_str(), *count))
            .collect()
    }

    /// Detection rate as a number in `[0, 100]`, if the raw value is one.
    pub fn detection_rate(&self) -> Option<f64> {
        self.attack_detection_rate.as_deref().and_then(parse_rate)
    }

    /// `[Detected: rate, Undetected: 100 - rate]`, or empty when the rate
    /// is absent or not numeric.
    pub fn detection_split(&self) -> Vec<SeriesPoint<f64>> {
        match self.detection_rate() {
            Some(rate) => vec![
                SeriesPoint::new(DETECTED, rate),
                SeriesPoint::new(UNDETECTED, 100.0 - rate),
            ],
            None => Vec::new(),
        }
    }

    /// `100 - detection rate`, rounded to two decimals.
    pub fn unauthorized_rate(&self) -> Option<f64> {
        self.detection_rate().map(|rate| round2(100.0 - rate))
    }

    /// Sum of all per-mode request counts, saturating at `u64::MAX`.
    pub fn total_requests(&self) -> u64 {
        self.requests
            .values()
            .fold(0u64, |total, &n| total.saturating_add(n))
    }

    pub fn home_summary(&self) -> HomeSummary {
        HomeSummary {
            total_logs: self.total_logs,
            detection_rate: self.detection_rate(),
            unauthorized_rate: self.unauthorized_rate(),
        }
    }

    /// Rows for the metrics table. Missing values render as [`PLACEHOLDER`].
    pub fn table_rows(&self) -> Vec<MetricRow> {
        let mut rows = Vec::with_capacity(self.latencies.len() + self.requests.len() + 4);

        for (mode, secs) in &self.latencies {
            rows.push(MetricRow::new(
                format!("Average Latency ({mode})"),
                format!("{secs:.4} s"),
            ));
        }
        for (mode, count) in &self.requests {
            rows.push(MetricRow::new(format!("Requests ({mode})"), count.to_string()));
        }

        rows.push(MetricRow::new(
            "Total Logs",
            self.total_logs
                .map_or_else(|| PLACEHOLDER.to_owned(), |n| n.to_string()),
        ));
        rows.push(MetricRow::new(
            "Throughput",
            self.throughput_rps
                .map_or_else(|| PLACEHOLDER.to_owned(), |rps| format!("{rps:.2} req/s")),
        ));
        rows.push(MetricRow::new(
            "Attack Detection Rate",
            format_rate(self.detection_rate()),
        ));
        rows.push(MetricRow::new(
            "Unauthorized Access Rate",
            format_rate(self.unauthorized_rate()),
        ));

        rows
    }
}

/// Read a percentage like `"12.5"`, `" 12.5 % "` or `"0"`.
///
/// Returns `None` for anything that is not a finite number in `[0, 100]`.
pub fn parse_rate(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    let rate: f64 = number.parse().ok()?;
    (rate.is_finite() && (0.0..=100.0).contains(&rate)).then_some(rate)
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `"12.50%"`, or [`PLACEHOLDER`].
pub fn format_rate(rate: Option<f64>) -> String {
    rate.map_or_else(|| PLACEHOLDER.to_owned(), |r| format!("{r:.2}%"))
}
