// ── Wire -> domain conversion ──
//
// Translates `zta-api` wire types into the canonical domain model.

use std::str::FromStr;

use tracing::warn;
use zta_api::{DeviceRecord, MetricsSummary};

use crate::error::CoreError;
use crate::model::{Device, DeviceId, DeviceMode, DeviceType, MetricsSnapshot};

impl TryFrom<DeviceRecord> for Device {
    type Error = CoreError;

    fn try_from(record: DeviceRecord) -> Result<Self, Self::Error> {
        let device_type =
            DeviceType::from_str(&record.device_type).map_err(|_| CoreError::InvalidDevice {
                reason: format!("unknown device_type '{}'", record.device_type),
            })?;
        let mode = DeviceMode::from_str(&record.mode).map_err(|_| CoreError::InvalidDevice {
            reason: format!("unknown mode '{}'", record.mode),
        })?;

        Ok(Self {
            device_id: DeviceId::new(record.device_id)?,
            device_type,
            mode,
        })
    }
}

/// Convert a listing, skipping records that do not fit the domain model.
pub(crate) fn devices_from_records(records: Vec<DeviceRecord>) -> Vec<Device> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.device_id.clone();
            Device::try_from(record)
                .map_err(|e| warn!(device_id = %id, error = %e, "skipping device record"))
                .ok()
        })
        .collect()
}

impl From<MetricsSummary> for MetricsSnapshot {
    fn from(summary: MetricsSummary) -> Self {
        Self {
            latencies: summary.latencies,
            requests: summary.requests,
            attack_detection_rate: summary.attack_detection_rate,
            total_logs: summary.total_logs,
            throughput_rps: summary.throughput_rps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, device_type: &str, mode: &str) -> DeviceRecord {
        DeviceRecord {
            device_id: id.into(),
            device_type: device_type.into(),
            mode: mode.into(),
        }
    }

    #[test]
    fn converts_known_values() {
        let devices = devices_from_records(vec![
            record("t1", "thermostat", "secure"),
            record("c1", "camera", "replay"),
        ]);
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[1].device_type, DeviceType::Camera);
        assert_eq!(devices[1].mode, DeviceMode::Replay);
    }

    #[test]
    fn skips_unknown_and_blank() {
        let devices = devices_from_records(vec![
            record("x", "toaster", "secure"),
            record("y", "lock", "paranoid"),
            record("", "lock", "secure"),
            record("ok", "lock", "insecure"),
        ]);
        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_id.as_str(), "ok");
    }
}
