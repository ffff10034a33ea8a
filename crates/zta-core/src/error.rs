// ── Core error types ──
//
// Operation-level errors. Each failed fetch, create or remove wraps the
// transport error that caused it, or says what the gateway rejected.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Fetch ────────────────────────────────────────────────────────
    #[error("Failed to fetch {resource}: {source}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: zta_api::Error,
    },

    // ── Create ───────────────────────────────────────────────────────
    #[error("Failed to create device '{device_id}': {source}")]
    Create {
        device_id: String,
        #[source]
        source: zta_api::Error,
    },

    /// The gateway refused the device (duplicate id, invalid fields).
    #[error("Gateway rejected device '{device_id}': {reason}")]
    Rejected { device_id: String, reason: String },

    // ── Remove ───────────────────────────────────────────────────────
    #[error("Failed to remove device '{device_id}': {source}")]
    Remove {
        device_id: String,
        #[source]
        source: zta_api::Error,
    },

    #[error("Device not found: {device_id}")]
    DeviceNotFound { device_id: String },

    // ── Client-side checks ───────────────────────────────────────────
    #[error("Invalid device: {reason}")]
    InvalidDevice { reason: String },

    /// Another add/remove has not finished its resync yet.
    #[error("Cannot {operation} while another device change is in progress")]
    MutationInFlight { operation: &'static str },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The transport error underneath, if there is one.
    pub fn api_error(&self) -> Option<&zta_api::Error> {
        match self {
            Self::Fetch { source, .. } | Self::Create { source, .. } | Self::Remove { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.api_error()
            .is_some_and(|e| e.kind() == zta_api::ErrorKind::Timeout)
    }

    /// Timeouts and network failures.
    pub fn is_transient(&self) -> bool {
        self.api_error().is_some_and(zta_api::Error::is_transient)
    }

    pub(crate) fn create(device_id: &str, err: zta_api::Error) -> Self {
        if err.is_rejection() {
            Self::Rejected {
                device_id: device_id.to_owned(),
                reason: err.detail().unwrap_or("rejected by gateway").to_owned(),
            }
        } else {
            Self::Create {
                device_id: device_id.to_owned(),
                source: err,
            }
        }
    }

    pub(crate) fn remove(device_id: &str, err: zta_api::Error) -> Self {
        if err.is_not_found() {
            Self::DeviceNotFound {
                device_id: device_id.to_owned(),
            }
        } else {
            Self::Remove {
                device_id: device_id.to_owned(),
                source: err,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn duplicate_becomes_rejected() {
        let err = CoreError::create(
            "cam-1",
            zta_api::Error::HttpStatus {
                status: 400,
                detail: Some("Device ID already exists".into()),
            },
        );
        assert_eq!(
            err.to_string(),
            "Gateway rejected device 'cam-1': Device ID already exists"
        );
    }

    #[test]
    fn server_error_stays_create() {
        let err = CoreError::create(
            "cam-1",
            zta_api::Error::HttpStatus {
                status: 500,
                detail: None,
            },
        );
        assert!(matches!(err, CoreError::Create { .. }));
        assert_eq!(err.api_error().and_then(zta_api::Error::status), Some(500));
    }

    #[test]
    fn unknown_id_becomes_not_found() {
        let err = CoreError::remove(
            "ghost",
            zta_api::Error::HttpStatus {
                status: 404,
                detail: Some("Device not found".into()),
            },
        );
        assert!(matches!(err, CoreError::DeviceNotFound { ref device_id } if device_id == "ghost"));
    }

    #[test]
    fn fetch_timeout_is_transient() {
        let err = CoreError::Fetch {
            resource: "devices",
            source: zta_api::Error::Timeout {
                timeout: Duration::from_secs(10),
            },
        };
        assert!(err.is_timeout());
        assert!(err.is_transient());
        assert_eq!(
            err.to_string(),
            "Failed to fetch devices: Request timed out after 10000ms"
        );
    }
}
