use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `zta-api` crate.
///
/// Every request goes out exactly once; nothing in this crate retries.
/// `zta-core` maps these into operation-level errors (fetch, create, remove).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {}ms", millis(.timeout))]
    Timeout { timeout: Duration },

    /// Connection refused, DNS failure, reset mid-body, etc.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The gateway answered with a non-success status.
    ///
    /// `detail` carries the FastAPI `{"detail": "..."}` message when present,
    /// otherwise a truncated preview of the body.
    #[error("HTTP {status}{}", detail_suffix(.detail.as_deref()))]
    HttpStatus { status: u16, detail: Option<String> },

    // ── Configuration ───────────────────────────────────────────────
    /// The base URL cannot carry path segments (e.g. `mailto:`).
    #[error("Base URL cannot be used for API paths: {0}")]
    UnusableBaseUrl(String),

    /// The underlying HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

fn millis(timeout: &Duration) -> u128 {
    timeout.as_millis()
}

fn detail_suffix(detail: Option<&str>) -> String {
    detail.map(|d| format!(": {d}")).unwrap_or_default()
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    Network,
    HttpStatus(u16),
    Decode,
    Config,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Network(_) => ErrorKind::Network,
            Self::HttpStatus { status, .. } => ErrorKind::HttpStatus(*status),
            Self::Deserialization { .. } => ErrorKind::Decode,
            Self::UnusableBaseUrl(_) | Self::Build(_) => ErrorKind::Config,
        }
    }

    /// The HTTP status code, if the gateway answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` for failures where the gateway was never reached
    /// or never answered. Callers treat timeouts and network failures alike.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network(_))
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the gateway rejected the request body
    /// (duplicate id, schema validation, ...).
    pub fn is_rejection(&self) -> bool {
        matches!(self.status(), Some(400 | 409 | 422))
    }

    /// The server-provided message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
