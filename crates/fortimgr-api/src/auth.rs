use secrecy::SecretString;

/// Which authentication flow a session uses.
///
/// Marker enum (no data) -- the actual secrets live in [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Bearer token on every request, no login round-trip.
    ApiKey,
    /// `exec /sys/login/user` per session, token carried in the request body.
    Session,
}

/// Credentials for authenticating with a FortiManager.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// REST API administrator key.
    /// Generated at: System Settings > Administrators > New REST API Admin.
    ApiKey { key: SecretString },

    /// Interactive administrator account. A session token is obtained when
    /// a session opens and released when it closes.
    Password {
        username: String,
        password: SecretString,
    },
}

impl Credentials {
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            Self::ApiKey { .. } => AuthStrategy::ApiKey,
            Self::Password { .. } => AuthStrategy::Session,
        }
    }
}
