use thiserror::Error;

/// Authentication and credential-cache errors.
///
/// Messages are user facing; variants that the user can fix by logging in
/// again say so.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("token cache I/O error: {0}")]
    Storage(String),
    #[error("malformed JSON: {0}")]
    Parse(String),
    #[error("unexpected response from identity provider: {0}")]
    Protocol(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("device code request failed: {0}")]
    ProviderRejected(String),
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("login timed out, device code expired, run: tcli login")]
    DeviceCodeExpired,
    #[error("cancelled")]
    Cancelled,
    #[error("not logged in, run: tcli login")]
    NotLoggedIn,
    #[error("session expired, run: tcli login")]
    SessionExpired,
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

impl From<crate::util::wait::Cancelled> for AuthError {
    fn from(_: crate::util::wait::Cancelled) -> Self {
        Self::Cancelled
    }
}
