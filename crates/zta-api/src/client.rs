// Gateway API HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction, status mapping
// and JSON decoding. Endpoint modules (devices, metrics) are implemented
// as inherent methods in separate files to keep this module focused on
// transport mechanics.

use std::time::Duration;

use reqwest::Method;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

const PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the gateway's `/api` surface.
///
/// One attempt per call: failures come back as [`Error`] and retry policy
/// belongs to the caller. Construct it once and share it (`Arc`) between
/// the components that need it.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// `timeout` is only used for error reporting; the `reqwest::Client`
    /// is expected to enforce it.
    pub fn with_client(http: reqwest::Client, base_url: Url, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            timeout,
        }
    }

    /// The API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base_url}/{seg}/{seg}...`, percent-encoding each segment.
    ///
    /// Device ids are operator-supplied, so they go through here rather
    /// than string formatting.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::UnusableBaseUrl(self.base_url.to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue one request against a `/`-separated path below the API root
    /// and return the decoded JSON body (`Value::Null` for empty bodies).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.endpoint(&segments)?;
        self.send(method, url, body).await
    }

    /// Issue one request against a fully built URL.
    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            trace!(%body, "request body");
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|e| self.classify(e))?;
        self.parse_response(resp).await
    }

    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout: self.timeout,
            }
        } else {
            Error::Network(err)
        }
    }

    async fn parse_response(&self, resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify(e))?;
        trace!(status = status.as_u16(), len = body.len(), "response body");

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// Pull a human-readable message out of an error body.
///
/// FastAPI answers `{"detail": "..."}` for handled errors and
/// `{"detail": [{"msg": ...}, ...]}` for schema validation failures.
fn extract_detail(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Some(preview(body));
    };

    match value.get("detail") {
        Some(Value::String(msg)) => Some(msg.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                Some(preview(body))
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => Some(preview(body)),
    }
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            Duration::from_secs(10),
        )
    }

    #[test]
    fn endpoint_appends_below_api_root() {
        let c = client("http://localhost:8000/api");
        let url = c.endpoint(&["metrics", "summary"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/metrics/summary");
    }

    #[test]
    fn unusable_base_url_is_a_config_error() {
        let c = client("mailto:ops@example.com");
        let err = c.endpoint(&["devices"]).unwrap_err();
        assert!(matches!(err, Error::UnusableBaseUrl(_)));
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let c = client("http://localhost:8000/api/");
        let url = c.endpoint(&["devices"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/devices");
    }

    #[test]
    fn endpoint_encodes_device_ids() {
        let c = client("http://localhost:8000/api");
        let url = c.endpoint(&["devices", "cam/01 lobby"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/devices/cam%2F01%20lobby"
        );
    }

    #[test]
    fn detail_from_fastapi_string() {
        let detail = extract_detail(r#"{"detail":"Device not found"}"#);
        assert_eq!(detail.as_deref(), Some("Device not found"));
    }

    #[test]
    fn detail_from_fastapi_validation_list() {
        let body = r#"{"detail":[{"loc":["body","mode"],"msg":"field required"},{"msg":"bad type"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; bad type")
        );
    }

    #[test]
    fn detail_falls_back_to_preview() {
        assert_eq!(
            extract_detail("Internal Server Error").as_deref(),
            Some("Internal Server Error")
        );
        assert_eq!(extract_detail("   "), None);
    }
}
