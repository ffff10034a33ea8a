//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use zta_config::ConfigError;
use zta_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the gateway")]
    #[diagnostic(
        code(zta::connection_failed),
        help(
            "Check that the gateway is running and the API URL is right.\n\
             Show the active settings with: zta config show\n\
             Override with: zta --api-url http://HOST:8000/api ..."
        )
    )]
    ConnectionFailed {
        #[source]
        source: CoreError,
    },

    #[error("The gateway did not answer in time")]
    #[diagnostic(
        code(zta::timeout),
        help("Increase the timeout with --timeout or check gateway responsiveness.")
    )]
    Timeout {
        #[source]
        source: CoreError,
    },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(zta::not_found),
        help("Run: zta {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' was rejected: {reason}")]
    #[diagnostic(code(zta::conflict))]
    Conflict {
        resource_type: String,
        identifier: String,
        reason: String,
    },

    #[error("Cannot {operation} while another device change is in progress")]
    #[diagnostic(code(zta::busy), help("Wait for the previous change to finish."))]
    Busy { operation: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Gateway error{}: {message}", status_suffix(.status.as_ref()))]
    #[diagnostic(code(zta::api_error))]
    ApiError { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(zta::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(zta::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: zta config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(zta::config), help("Check the file printed by: zta config path"))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(zta::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn status_suffix(status: Option<&u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } | Self::Busy { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_timeout() {
            return Self::Timeout { source: err };
        }
        if err.is_transient() {
            return Self::ConnectionFailed { source: err };
        }

        match err {
            CoreError::Rejected { device_id, reason } => Self::Conflict {
                resource_type: "device".into(),
                identifier: device_id,
                reason,
            },

            CoreError::DeviceNotFound { device_id } => Self::NotFound {
                resource_type: "device".into(),
                identifier: device_id,
                list_command: "devices list".into(),
            },

            CoreError::InvalidDevice { reason } => Self::Validation {
                field: "device".into(),
                reason,
            },

            CoreError::MutationInFlight { operation } => Self::Busy {
                operation: operation.into(),
            },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },

            other => Self::ApiError {
                status: other.api_error().and_then(zta_core::ApiError::status),
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::UnknownProfile { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            other => Self::Config(other),
        }
    }
}
