//! Shared configuration for the fortimgr CLI and other consumers.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `fortimgr_core::ControllerConfig`. The CLI adds
//! `GlobalOpts`-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use fortimgr_core::{AuthCredentials, ControllerConfig, RetryPolicy, TlsVerification};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "fortimgr";

/// Prefix of the environment variables that override config values.
pub const ENV_PREFIX: &str = "FMG_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Extra attempts after a `-11` reply.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Seconds to wait before each retry.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_secs: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            retries: default_retries(),
            retry_delay_secs: default_retry_delay(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    5
}

/// A named controller profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// FortiManager host: bare hostname (`fmg.example.com`) or URL.
    pub host: String,

    /// API key (plaintext; prefer keyring or env var).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Administrator username for session login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Administrator password (plaintext; prefer keyring).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Override insecure TLS setting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Override retry count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,

    /// Override retry delay (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_secs: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fortimgr", "fortimgr").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("fortimgr");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from a specific file, then apply `FMG_` env overrides
/// (`FMG_DEFAULTS__TIMEOUT=60`, `FMG_PROFILES__LAB__HOST=...`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Secret lookup ───────────────────────────────────────────────────

/// Where credential resolution looks for secrets outside the profile.
///
/// [`SystemSecrets`] reads the process environment and OS keyring; tests
/// substitute fixed maps.
pub trait SecretSource {
    fn env(&self, name: &str) -> Option<String>;
    fn keyring(&self, key: &str) -> Option<String>;
}

/// Process environment + OS keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSecrets;

impl SecretSource for SystemSecrets {
    fn env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn keyring(&self, key: &str) -> Option<String> {
        keyring::Entry::new(KEYRING_SERVICE, key)
            .and_then(|entry| entry.get_password())
            .ok()
    }
}

/// Keyring entry name for a profile's API key.
pub fn api_key_entry(profile_name: &str) -> String {
    format!("{profile_name}/api-key")
}

/// Keyring entry name for a profile's password.
pub fn password_entry(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Store a secret in the OS keyring under the `fortimgr` service.
pub fn store_secret(key: &str, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, key).map_err(|e| keyring_err(&e))?;
    entry.set_password(secret).map_err(|e| keyring_err(&e))
}

fn keyring_err(e: &keyring::Error) -> ConfigError {
    ConfigError::Validation {
        field: "keyring".into(),
        reason: e.to_string(),
    }
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an API key: `api_key_env` → keyring → plaintext. `None` when
/// the profile has no API key anywhere.
pub fn resolve_api_key(
    profile: &Profile,
    profile_name: &str,
    secrets: &impl SecretSource,
) -> Option<SecretString> {
    // 1. Profile's api_key_env → env var lookup
    if let Some(value) = profile.api_key_env.as_deref().and_then(|name| secrets.env(name)) {
        return Some(SecretString::from(value));
    }

    // 2. System keyring
    if let Some(secret) = secrets.keyring(&api_key_entry(profile_name)) {
        return Some(SecretString::from(secret));
    }

    // 3. Plaintext in config
    profile.api_key.clone().map(SecretString::from)
}

/// Resolve username + password: username from the profile or
/// `FMG_USERNAME`; password from `FMG_PASSWORD` → keyring → plaintext.
pub fn resolve_login_credentials(
    profile: &Profile,
    profile_name: &str,
    secrets: &impl SecretSource,
) -> Result<(String, SecretString), ConfigError> {
    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    let username = profile
        .username
        .clone()
        .or_else(|| secrets.env("FMG_USERNAME"))
        .ok_or_else(no_credentials)?;

    // 1. Env var
    if let Some(pw) = secrets.env("FMG_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Some(pw) = secrets.keyring(&password_entry(profile_name)) {
        return Ok((username, SecretString::from(pw)));
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(no_credentials())
}

/// Resolve `AuthCredentials`: an API key wins; otherwise session login.
pub fn resolve_auth(
    profile: &Profile,
    profile_name: &str,
    secrets: &impl SecretSource,
) -> Result<AuthCredentials, ConfigError> {
    if let Some(key) = resolve_api_key(profile, profile_name, secrets) {
        return Ok(AuthCredentials::ApiKey(key));
    }
    let (username, password) = resolve_login_credentials(profile, profile_name, secrets)?;
    Ok(AuthCredentials::Credentials { username, password })
}

// ── Translation ─────────────────────────────────────────────────────

/// Parse a host setting: a bare hostname gets `https://`.
pub fn parse_host(host: &str) -> Result<Url, ConfigError> {
    let host = host.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "host is empty".into(),
        });
    }
    let candidate = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    candidate.parse().map_err(|e| ConfigError::Validation {
        field: "host".into(),
        reason: format!("invalid URL '{host}': {e}"),
    })
}

/// TLS mode for a profile: insecure wins, then a custom CA, then the
/// system store.
pub fn tls_verification(insecure: bool, ca_cert: Option<&Path>) -> TlsVerification {
    if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(path) = ca_cert {
        TlsVerification::CustomCa(path.to_path_buf())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Build a `ControllerConfig` from a profile with already-resolved
/// credentials. Each setting is the profile's value, else `[defaults]`.
pub fn controller_config_with_auth(
    profile: &Profile,
    defaults: &Defaults,
    auth: AuthCredentials,
) -> Result<ControllerConfig, ConfigError> {
    let url = parse_host(&profile.host)?;

    let tls = tls_verification(
        profile.insecure.unwrap_or(defaults.insecure),
        profile.ca_cert.as_deref(),
    );
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let retry = RetryPolicy::new(
        profile.retries.unwrap_or(defaults.retries),
        Duration::from_secs(profile.retry_delay_secs.unwrap_or(defaults.retry_delay_secs)),
    );

    Ok(ControllerConfig {
        url,
        auth,
        tls,
        timeout,
        retry,
    })
}
