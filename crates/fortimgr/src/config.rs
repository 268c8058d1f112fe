//! CLI configuration: thin wrapper around `fortimgr_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--host, --api-key, etc.).

use secrecy::SecretString;

use fortimgr_config::{SecretSource, SystemSecrets};
use fortimgr_core::{AuthCredentials, ControllerConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use fortimgr_config::{
    Config, Defaults, Profile, api_key_entry, config_path, load_config_or_default,
    password_entry, save_config, store_secret,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Build a `ControllerConfig` from the config file, profile, and CLI overrides.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global, &SystemSecrets);
    }

    // An explicitly requested profile must exist
    if global.profile.is_some() && global.host.is_none() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    // No profile found -- build from CLI flags / env vars alone
    let host = global.host.clone().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let flags_only = Profile {
        host,
        ..Profile::default()
    };
    resolve_profile(&flags_only, &profile_name, &cfg.defaults, global, &SystemSecrets)
}

/// Translate a `Profile` + global flags into a `ControllerConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
    secrets: &impl SecretSource,
) -> Result<ControllerConfig, CliError> {
    let effective = with_flag_overrides(profile, global);

    // --api-key skips the credential chain entirely
    let auth = match global.api_key {
        Some(ref key) => AuthCredentials::ApiKey(SecretString::from(key.clone())),
        None => fortimgr_config::resolve_auth(&effective, profile_name, secrets)?,
    };

    fortimgr_config::controller_config_with_auth(&effective, defaults, auth).map_err(CliError::from)
}

/// The profile with every set connection flag layered on top.
fn with_flag_overrides(profile: &Profile, global: &GlobalOpts) -> Profile {
    Profile {
        host: global.host.clone().unwrap_or_else(|| profile.host.clone()),
        insecure: if global.insecure {
            Some(true)
        } else {
            profile.insecure
        },
        timeout: global.timeout.or(profile.timeout),
        retries: global.retries.or(profile.retries),
        retry_delay_secs: global.retry_delay.or(profile.retry_delay_secs),
        ..profile.clone()
    }
}
