//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

use fortimgr_config::ConfigError;
use fortimgr_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const UPSTREAM: i32 = 9;
    pub const DEVICE_PROXY: i32 = 10;
    pub const MALFORMED: i32 = 11;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to FortiManager at {url}")]
    #[diagnostic(
        code(fortimgr::connection_failed),
        help(
            "Check that the FortiManager is reachable and JSON-RPC is enabled.\n\
             Self-signed certificate? Try: fortimgr adoms --insecure"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fortimgr::auth_failed),
        help(
            "Verify your API key or administrator credentials.\n\
             API keys are created under System Settings > Administrators > REST API Admin.\n\
             Run: fortimgr config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(fortimgr::no_credentials),
        help(
            "Configure credentials with: fortimgr config init\n\
             Or set the FMG_API_KEY environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(fortimgr::not_found),
        help("Run: fortimgr {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Controller ───────────────────────────────────────────────────
    #[error("FortiManager returned status {code}")]
    #[diagnostic(
        code(fortimgr::upstream),
        help("{hint}\nController response: {payload}")
    )]
    Upstream {
        code: i64,
        payload: Value,
        hint: String,
    },

    #[error("Request proxied to device '{device}' failed")]
    #[diagnostic(
        code(fortimgr::device_proxy),
        help(
            "FortiManager accepted the request but the device did not answer it.\n\
             Check the device is online: fortimgr find {device}\n\
             Device response: {context}"
        )
    )]
    DeviceProxy { device: String, context: Value },

    #[error("Unexpected {resource} data from FortiManager: {message}")]
    #[diagnostic(
        code(fortimgr::malformed),
        help("Re-run with -vv to see the request; the firmware may use a different schema.")
    )]
    Malformed { resource: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fortimgr::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fortimgr::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fortimgr config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No FortiManager configured")]
    #[diagnostic(
        code(fortimgr::no_config),
        help(
            "Create a profile with: fortimgr config init\n\
             Or pass --host / set FMG_HOST.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(fortimgr::config))]
    Config(Box<figment::Error>),

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(fortimgr::timeout),
        help("Increase timeout with --timeout or check FortiManager responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Internal / IO ────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    #[diagnostic(code(fortimgr::internal))]
    Internal(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Upstream { .. } => exit_code::UPSTREAM,
            Self::DeviceProxy { .. } => exit_code::DEVICE_PROXY,
            Self::Malformed { .. } => exit_code::MALFORMED,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ProfileNotFound { .. } | Self::NoConfig { .. } => {
                exit_code::USAGE
            }
            Self::Config(_) | Self::Internal(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }
}

/// Help line for well-known FortiManager status codes.
fn upstream_hint(code: i64) -> String {
    match code {
        fortimgr_core::TRANSIENT_NO_PERMISSION => {
            "Status -11 persisted through every retry. Raise --retries or --retry-delay, \
             or check the admin profile's JSON-RPC permissions."
        }
        -3 => "The object does not exist. Check the ADOM and device names.",
        -6 => "Invalid URL. The ADOM or device name may be wrong.",
        -10 => "The ADOM or device does not exist.",
        -20 | -22 => "Login failed or session expired. Check credentials.",
        _ => "See the FortiManager JSON-RPC reference for this status code.",
    }
    .into()
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Upstream { code, payload } => CliError::Upstream {
                code,
                payload,
                hint: upstream_hint(code),
            },

            CoreError::DeviceProxy { device, context } => {
                CliError::DeviceProxy { device, context }
            }

            CoreError::MalformedData { resource, message } => {
                CliError::Malformed { resource, message }
            }

            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Serialization(e) => CliError::Internal(e.to_string()),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn core_errors_map_to_distinct_exit_codes() {
        let cases = [
            (
                CoreError::Upstream { code: -11, payload: json!({}) },
                exit_code::UPSTREAM,
            ),
            (
                CoreError::DeviceProxy { device: "FGT-01".into(), context: json!({ "code": -3 }) },
                exit_code::DEVICE_PROXY,
            ),
            (
                CoreError::MalformedData { resource: "interface".into(), message: "x".into() },
                exit_code::MALFORMED,
            ),
            (
                CoreError::AuthenticationFailed { message: "denied".into() },
                exit_code::AUTH,
            ),
            (CoreError::Timeout { timeout_secs: 30 }, exit_code::TIMEOUT),
            (
                CoreError::ConnectionFailed { url: "https://fmg".into(), reason: "refused".into() },
                exit_code::CONNECTION,
            ),
        ];
        for (err, code) in cases {
            let msg = err.to_string();
            assert_eq!(CliError::from(err).exit_code(), code, "{msg}");
        }
    }

    #[test]
    fn persistent_no_permission_gets_retry_hint() {
        let err = CliError::from(CoreError::Upstream { code: -11, payload: json!({}) });
        match err {
            CliError::Upstream { hint, .. } => assert!(hint.contains("--retries"), "{hint}"),
            other => panic!("expected Upstream, got: {other:?}"),
        }
    }
}
