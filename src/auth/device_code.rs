use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use strum::Display;
use tokio::time::Instant;

use super::error::AuthError;
use super::oauth::{DeviceCodeResponse, TokenResponse};
use super::Token;

/// Interval used when the provider omits one (or sends zero).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Added to the interval on every `slow_down` response.
pub const SLOW_DOWN_INCREMENT: Duration = Duration::from_secs(5);

/// Device-code session for one `login` call. Never persisted.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use chrono::Utc;
/// use tcli::auth::DeviceCodeSession;
///
/// let session = DeviceCodeSession {
///     verification_url: "https://microsoft.com/devicelogin".to_string(),
///     user_code: "ABCD-EFGH".to_string(),
///     device_code: "device-code".to_string(),
///     message: None,
///     interval: Duration::from_secs(5),
///     expires_at: Utc::now(),
///     deadline: tokio::time::Instant::now() + Duration::from_secs(900),
/// };
/// assert!(session.instructions().contains("ABCD-EFGH"));
/// ```
#[derive(Clone)]
pub struct DeviceCodeSession {
    pub verification_url: String,
    pub user_code: String,
    /// Secret sent with each poll; never displayed or logged.
    pub device_code: String,
    /// Human-readable instructions supplied by the provider.
    pub message: Option<String>,
    pub interval: Duration,
    /// Wall-clock expiry, for display.
    pub expires_at: DateTime<Utc>,
    /// Monotonic bound on the poll loop.
    pub deadline: Instant,
}

impl fmt::Debug for DeviceCodeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCodeSession")
            .field("verification_url", &self.verification_url)
            .field("user_code", &self.user_code)
            .field("device_code", &"..")
            .field("interval", &self.interval)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl DeviceCodeSession {
    pub(crate) fn from_response(
        response: DeviceCodeResponse,
        raw_body: &str,
    ) -> Result<Self, AuthError> {
        if response.error_code().is_some() {
            return Err(AuthError::ProviderRejected(response.error_text()));
        }
        let device_code = response
            .device_code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuthError::Protocol(raw_body.to_string()))?;

        let expires_in = Duration::from_secs(response.expires_in.unwrap_or_default());
        let interval = match response.interval {
            Some(secs) if secs > 0 => Duration::from_secs(secs),
            _ => DEFAULT_POLL_INTERVAL,
        };
        Ok(Self {
            verification_url: response.verification_uri.unwrap_or_default(),
            user_code: response.user_code.unwrap_or_default(),
            device_code,
            message: response.message.filter(|m| !m.is_empty()),
            interval,
            expires_at: Utc::now()
                + chrono::Duration::from_std(expires_in).unwrap_or_default(),
            deadline: Instant::now() + expires_in,
        })
    }

    /// Text shown to the user: the provider's message when it sent one.
    pub fn instructions(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!(
                "To sign in, open {} and enter the code {} to authenticate.",
                self.verification_url, self.user_code
            ),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Fold one poll outcome into the session.
    pub fn apply(&mut self, poll: DeviceCodePoll) -> PollStep {
        match poll {
            DeviceCodePoll::Pending => PollStep::Continue,
            DeviceCodePoll::SlowDown => {
                self.interval += SLOW_DOWN_INCREMENT;
                PollStep::Continue
            }
            DeviceCodePoll::Transient(reason) => {
                tracing::debug!(%reason, "transient poll failure, retrying");
                PollStep::Continue
            }
            DeviceCodePoll::Authorized(token) => PollStep::Authorized(token),
            DeviceCodePoll::Rejected(message) => {
                PollStep::Failed(AuthError::AuthenticationFailed(message))
            }
            DeviceCodePoll::Malformed(body) => PollStep::Failed(AuthError::Protocol(body)),
        }
    }
}

/// Outcome of a single poll of the token endpoint.
#[derive(Debug, Clone)]
pub enum DeviceCodePoll {
    /// `authorization_pending`.
    Pending,
    /// `slow_down`.
    SlowDown,
    Authorized(Token),
    /// Any other provider error (denied, expired_token, bad client, ...).
    Rejected(String),
    /// No error field but no access token either.
    Malformed(String),
    /// Network blip or unreadable body; polling continues.
    Transient(String),
}

impl DeviceCodePoll {
    pub(crate) fn from_token_response(response: TokenResponse, raw_body: &str) -> Self {
        match response.error_code() {
            Some("authorization_pending") => Self::Pending,
            Some("slow_down") => Self::SlowDown,
            Some(_) => Self::Rejected(response.error_text()),
            None => match response.access_token() {
                Some(access_token) => Self::Authorized(Token::issued_now(
                    access_token.to_string(),
                    response.refresh_token,
                    response.expires_in.unwrap_or_default(),
                )),
                None => Self::Malformed(raw_body.to_string()),
            },
        }
    }
}

/// What the poll loop does next.
#[derive(Debug)]
pub enum PollStep {
    Continue,
    Authorized(Token),
    Failed(AuthError),
}

/// States of the device-code login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoginState {
    Requesting,
    Polling,
    Succeeded,
    Failed,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::oauth::parse;

    fn session(interval_secs: u64) -> DeviceCodeSession {
        DeviceCodeSession {
            verification_url: "https://microsoft.com/devicelogin".to_string(),
            user_code: "ABCD-EFGH".to_string(),
            device_code: "device-code-1".to_string(),
            message: None,
            interval: Duration::from_secs(interval_secs),
            expires_at: Utc::now(),
            deadline: Instant::now() + Duration::from_secs(900),
        }
    }

    fn poll(body: &str) -> DeviceCodePoll {
        DeviceCodePoll::from_token_response(parse(body).unwrap(), body)
    }

    #[test]
    fn slow_down_adds_five_seconds() {
        let mut session = session(5);
        assert!(matches!(session.apply(DeviceCodePoll::SlowDown), PollStep::Continue));
        assert_eq!(session.interval, Duration::from_secs(10));
    }

    #[test]
    fn pending_keeps_interval() {
        let mut session = session(7);
        for _ in 0..3 {
            assert!(matches!(session.apply(DeviceCodePoll::Pending), PollStep::Continue));
        }
        assert_eq!(session.interval, Duration::from_secs(7));
    }

    #[test]
    fn transient_failures_keep_polling() {
        let mut session = session(5);
        let step = session.apply(DeviceCodePoll::Transient("connection reset".to_string()));
        assert!(matches!(step, PollStep::Continue));
    }

    #[test]
    fn unknown_error_code_fails_with_provider_message() {
        let mut session = session(5);
        let step = session.apply(poll(
            r#"{"error":"access_denied","error_description":"The user declined."}"#,
        ));
        match step {
            PollStep::Failed(AuthError::AuthenticationFailed(message)) => {
                assert_eq!(message, "The user declined.");
            }
            other => panic!("expected AuthenticationFailed, got {other:?}"),
        }
    }

    #[test]
    fn response_without_error_is_authorized() {
        let result = poll(r#"{"access_token":"at","refresh_token":"rt","expires_in":3600}"#);
        match result {
            DeviceCodePoll::Authorized(token) => {
                assert_eq!(token.access_token, "at");
                assert_eq!(token.refresh_token.as_deref(), Some("rt"));
                assert!(!token.is_expired());
            }
            other => panic!("expected Authorized, got {other:?}"),
        }
    }

    #[test]
    fn response_without_error_or_token_is_malformed() {
        assert!(matches!(poll(r#"{"expires_in":3600}"#), DeviceCodePoll::Malformed(_)));
    }

    #[test]
    fn session_from_response_defaults_zero_interval() {
        let body = r#"{"device_code":"d","user_code":"u","verification_uri":"v","expires_in":900,"interval":0}"#;
        let session = DeviceCodeSession::from_response(parse(body).unwrap(), body).unwrap();
        assert_eq!(session.interval, DEFAULT_POLL_INTERVAL);
        assert!(!session.is_expired());
    }

    #[test]
    fn session_from_response_rejects_provider_error() {
        let body = r#"{"error":"invalid_client","error_description":"AADSTS7000218"}"#;
        let err = DeviceCodeSession::from_response(parse(body).unwrap(), body).unwrap_err();
        assert_eq!(err, AuthError::ProviderRejected("AADSTS7000218".to_string()));
    }

    #[test]
    fn session_from_response_requires_device_code() {
        let body = r#"{"user_code":"u"}"#;
        let err = DeviceCodeSession::from_response(parse(body).unwrap(), body).unwrap_err();
        assert!(matches!(err, AuthError::Protocol(raw) if raw.contains("user_code")));
    }

    #[test]
    fn debug_output_hides_device_code() {
        let rendered = format!("{:?}", session(5));
        assert!(!rendered.contains("device-code-1"));
    }

    #[test]
    fn instructions_prefer_provider_message() {
        let mut session = session(5);
        session.message = Some("Use code ABCD-EFGH at the login page".to_string());
        assert_eq!(session.instructions(), "Use code ABCD-EFGH at the login page");
    }

    #[test]
    fn login_states_render_snake_case() {
        assert_eq!(LoginState::Requesting.to_string(), "requesting");
        assert_eq!(LoginState::Succeeded.to_string(), "succeeded");
    }
}
