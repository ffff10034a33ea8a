//! Metrics command handlers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tabled::Tabled;
use tokio_util::sync::CancellationToken;
use zta_core::{
    Console, DEFAULT_POLL_INTERVAL, MetricsSnapshot, SeriesPoint, format_rate,
    spawn_metrics_poller,
};

use crate::cli::{GlobalOpts, MetricsArgs, MetricsCommand, OutputFormat};
use crate::config::display_duration;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LatencyRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Avg Latency")]
    latency: String,
}

#[derive(Tabled)]
struct RequestsRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Requests")]
    requests: u64,
}

#[derive(Tabled)]
struct SplitRow {
    #[tabled(rename = "Outcome")]
    label: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Structured form of `metrics summary`.
#[derive(Serialize)]
struct SummaryReport<'a> {
    #[serde(flatten)]
    snapshot: &'a MetricsSnapshot,
    total_requests: u64,
    detection_rate: Option<f64>,
    unauthorized_rate: Option<f64>,
    last_updated: Option<DateTime<Utc>>,
}

impl<'a> SummaryReport<'a> {
    fn new(snapshot: &'a MetricsSnapshot, last_updated: Option<DateTime<Utc>>) -> Self {
        let home = snapshot.home_summary();
        Self {
            snapshot,
            total_requests: snapshot.total_requests(),
            detection_rate: home.detection_rate,
            unauthorized_rate: home.unauthorized_rate,
            last_updated,
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: MetricsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let MetricsCommand::Watch { interval } = args.command {
        return watch(console, interval, global).await;
    }

    let spinner = util::spinner(global, "Fetching metrics...");
    let result = console.metrics().refresh().await;
    spinner.finish_and_clear();
    let snap = result?;
    let format = global.output_format();

    let out = match args.command {
        MetricsCommand::Summary => {
            render_summary(&snap, console.metrics().last_updated(), global)
        }

        MetricsCommand::Latency => output::render_list(
            format,
            &snap.latency_series(),
            |p| LatencyRow {
                mode: p.label.clone(),
                latency: format!("{:.4} s", p.value),
            },
            |p| format!("{}\t{}", p.label, p.value),
        ),

        MetricsCommand::Throughput => output::render_list(
            format,
            &snap.throughput_series(),
            |p| RequestsRow {
                mode: p.label.clone(),
                requests: p.value,
            },
            |p| format!("{}\t{}", p.label, p.value),
        ),

        MetricsCommand::Detection => {
            let split: Vec<SeriesPoint<f64>> = snap.detection_split();
            if split.is_empty() && format == OutputFormat::Table {
                util::status(global, "Detection rate unavailable (N/A)");
                return Ok(());
            }
            output::render_list(
                format,
                &split,
                |p| SplitRow {
                    label: p.label.clone(),
                    share: format_rate(Some(p.value)),
                },
                |p| format!("{}\t{}", p.label, p.value),
            )
        }

        MetricsCommand::Watch { .. } => String::new(),
    };

    output::print_output(&out, global.quiet);
    Ok(())
}

fn render_summary(
    snap: &MetricsSnapshot,
    last_updated: Option<DateTime<Utc>>,
    global: &GlobalOpts,
) -> String {
    let color = output::should_color(global.color_mode());
    let report = SummaryReport::new(snap, last_updated);

    output::render_single(
        global.output_format(),
        &report,
        |r| summary_detail(r, color),
        |r| {
            r.snapshot
                .table_rows()
                .into_iter()
                .map(|row| format!("{}\t{}", row.metric, row.value))
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

fn summary_detail(report: &SummaryReport<'_>, color: bool) -> String {
    let width = report
        .snapshot
        .table_rows()
        .iter()
        .map(|row| row.metric.len())
        .max()
        .unwrap_or(0)
        .max("Total Requests".len());

    let mut lines = Vec::new();
    for row in report.snapshot.table_rows() {
        let value = match row.metric.as_str() {
            "Attack Detection Rate" => {
                output::paint_rate(&row.value, report.detection_rate, true, color)
            }
            "Unauthorized Access Rate" => {
                output::paint_rate(&row.value, report.unauthorized_rate, false, color)
            }
            _ => row.value,
        };
        lines.push(format!("{:<width$}  {value}", format!("{}:", row.metric), width = width + 1));
        if row.metric == "Total Logs" {
            lines.push(format!(
                "{:<width$}  {}",
                "Total Requests:",
                report.total_requests,
                width = width + 1
            ));
        }
    }
    if let Some(at) = report.last_updated {
        lines.push(format!(
            "{:<width$}  {}",
            "Updated:",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S"),
            width = width + 1
        ));
    }
    lines.join("\n")
}

// ── Watch ───────────────────────────────────────────────────────────

async fn watch(
    console: &Console,
    interval: Option<Duration>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let period = match interval {
        Some(d) => d.max(Duration::from_millis(100)),
        None if console.config().poll_interval.is_zero() => DEFAULT_POLL_INTERVAL,
        None => console.config().poll_interval,
    };

    let metrics = Arc::clone(console.metrics());
    let mut rx = metrics.subscribe();
    let cancel = CancellationToken::new();
    let poller = spawn_metrics_poller(Arc::clone(&metrics), period, cancel.clone());

    util::status(
        global,
        &format!(
            "Refreshing every {}, press Ctrl-C to stop",
            display_duration(period)
        ),
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut printed_seq = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = rx.borrow_and_update().clone();
                if view.is_loading() || view.applied_seq == printed_seq {
                    continue;
                }
                printed_seq = view.applied_seq;

                match (view.data, view.error) {
                    (_, Some(error)) => util::status(global, &format!("Refresh failed: {error}")),
                    (Some(snap), None) => {
                        let mut out = render_summary(&snap, view.last_updated, global);
                        if global.output_format() == OutputFormat::Table {
                            out.push('\n');
                        }
                        output::print_output(&out, global.quiet);
                    }
                    (None, None) => {}
                }
            }
        }
    }

    cancel.cancel();
    let _ = poller.await;
    Ok(())
}
