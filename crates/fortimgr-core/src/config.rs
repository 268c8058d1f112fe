// ── Runtime connection configuration ──
//
// These types describe *how* to reach a FortiManager. They carry
// credential data and connection tuning, but never touch disk.
// The CLI constructs a `ControllerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::executor::RetryPolicy;

/// How to authenticate with the controller.
///
/// Carries the actual credential data; `fortimgr_api::AuthStrategy`
/// is the zero-data marker counterpart.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// REST API admin key (preferred).
    ApiKey(SecretString),
    /// Administrator username/password, exchanged for a session token
    /// on every request attempt.
    Credentials {
        username: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. FortiManager ships with a self-signed certificate.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one controller.
///
/// Built by the CLI, passed to `Controller` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller URL (e.g., `https://fmg.example.com`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Retry policy for the transient `-11` status.
    pub retry: RetryPolicy,
}

impl ControllerConfig {
    /// Config with default TLS, timeout, and retry settings.
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}
