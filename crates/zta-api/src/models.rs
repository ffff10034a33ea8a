// Gateway API wire types
//
// Device records round-trip through serde as-is. The metrics summary is
// decoded by hand: a successful response with missing or oddly typed fields
// must still produce a usable value.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A device as listed by `GET /devices`.
///
/// The gateway may attach a server-generated `shared_secret` (and a row
/// `id`). Neither is declared here, so serde drops them on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub device_id: String,
    pub device_type: String,
    pub mode: String,
}

/// Request body for `POST /devices`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NewDevice<'a> {
    pub device_id: &'a str,
    pub device_type: &'a str,
    pub mode: &'a str,
}

/// Body of `GET /metrics/summary`.
///
/// Map order follows the gateway's response. Non-numeric entries inside
/// `latencies` / `requests` are dropped; scalar fields of the wrong type
/// become `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    /// Mode name -> average response time in seconds.
    pub latencies: IndexMap<String, f64>,
    /// Mode name -> number of logged requests.
    pub requests: IndexMap<String, u64>,
    /// Percentage as sent by the gateway, e.g. `"12.5%"`.
    pub attack_detection_rate: Option<String>,
    pub total_logs: Option<u64>,
    pub throughput_rps: Option<f64>,
}

impl MetricsSummary {
    /// Decode leniently from a JSON body. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let latencies = numeric_map(obj.get("latencies"), Value::as_f64);
        let requests = numeric_map(obj.get("requests"), Value::as_u64);

        let attack_detection_rate = match obj.get("attack_detection_rate") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Self {
            latencies,
            requests,
            attack_detection_rate,
            total_logs: obj.get("total_logs").and_then(Value::as_u64),
            throughput_rps: obj.get("throughput_rps").and_then(Value::as_f64),
        }
    }
}

fn numeric_map<T>(value: Option<&Value>, read: fn(&Value) -> Option<T>) -> IndexMap<String, T> {
    value
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(k, v)| read(v).map(|n| (k.clone(), n)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn summary_keeps_gateway_order() {
        let body = json!({
            "latencies": { "secure": 0.18, "insecure": 0.25, "replay": 0.3 },
            "requests": { "secure": 4, "insecure": 7 },
            "attack_detection_rate": "12.5%",
            "total_logs": 11,
            "throughput_rps": 0.5
        });
        let summary = MetricsSummary::from_value(&body);

        let modes: Vec<&str> = summary.latencies.keys().map(String::as_str).collect();
        assert_eq!(modes, ["secure", "insecure", "replay"]);
        assert_eq!(summary.requests.get("insecure"), Some(&7));
        assert_eq!(summary.attack_detection_rate.as_deref(), Some("12.5%"));
        assert_eq!(summary.total_logs, Some(11));
        assert_eq!(summary.throughput_rps, Some(0.5));
    }

    #[test]
    fn summary_degrades_on_bad_fields() {
        let body = json!({
            "latencies": "n/a",
            "requests": { "secure": "many", "insecure": 3 },
            "attack_detection_rate": null,
            "total_logs": -1
        });
        let summary = MetricsSummary::from_value(&body);

        assert!(summary.latencies.is_empty());
        assert_eq!(summary.requests.len(), 1);
        assert_eq!(summary.attack_detection_rate, None);
        assert_eq!(summary.total_logs, None);
        assert_eq!(summary.throughput_rps, None);
    }

    #[test]
    fn summary_from_non_object_is_empty() {
        assert_eq!(
            MetricsSummary::from_value(&json!([1, 2, 3])),
            MetricsSummary::default()
        );
    }

    #[test]
    fn numeric_rate_is_stringified() {
        let summary = MetricsSummary::from_value(&json!({ "attack_detection_rate": 0 }));
        assert_eq!(summary.attack_detection_rate.as_deref(), Some("0"));
    }

    #[test]
    fn device_record_ignores_shared_secret() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "id": 4,
            "device_id": "therm-1",
            "device_type": "thermostat",
            "mode": "secure",
            "shared_secret": "s3cr3t"
        }))
        .unwrap();

        assert_eq!(
            record,
            DeviceRecord {
                device_id: "therm-1".into(),
                device_type: "thermostat".into(),
                mode: "secure".into(),
            }
        );
        let back = serde_json::to_value(&record).unwrap();
        assert!(back.get("shared_secret").is_none());
    }
}
