use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::device_code::{DeviceCodePoll, DeviceCodeSession, LoginState, PollStep};
use super::error::AuthError;
use super::identity::IdentityConfig;
use super::oauth::{self, DeviceCodeResponse, TokenResponse, DEVICE_CODE_GRANT};
use super::store::TokenStore;
use super::token::Token;
use crate::http::shared_client;
use crate::util::wait::sleep_or_cancel;

/// Device-code grant against the Microsoft identity platform.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use tcli::auth::{DeviceCodeAuth, FileTokenStore, IdentityConfig};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let identity = IdentityConfig::builder()
///     .tenant_id("contoso.onmicrosoft.com")
///     .client_id("00000000-0000-0000-0000-000000000000")
///     .build();
/// let auth = DeviceCodeAuth::new(identity, Arc::new(FileTokenStore::new_default()?));
/// let token = auth
///     .login(&CancellationToken::new(), |session| println!("{}", session.instructions()))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct DeviceCodeAuth {
    client: reqwest::Client,
    identity: IdentityConfig,
    token_store: Arc<dyn TokenStore>,
}

impl DeviceCodeAuth {
    pub fn new(identity: IdentityConfig, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            client: shared_client().clone(),
            identity,
            token_store,
        }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Request a device code and user code.
    pub async fn start_device_code(&self) -> Result<DeviceCodeSession, AuthError> {
        let scope = self.identity.scope_param();
        let body = oauth::post_form(
            &self.client,
            &self.identity.device_code_url(),
            &[
                ("client_id", self.identity.client_id.as_str()),
                ("scope", scope.as_str()),
            ],
        )
        .await?;
        let response: DeviceCodeResponse = oauth::parse(&body)?;
        DeviceCodeSession::from_response(response, &body)
    }

    /// Poll the token endpoint once. Transport and parse failures come back
    /// as [`DeviceCodePoll::Transient`].
    pub async fn poll_device_code(&self, session: &DeviceCodeSession) -> DeviceCodePoll {
        let body = match oauth::post_form(
            &self.client,
            &self.identity.token_url(),
            &[
                ("client_id", self.identity.client_id.as_str()),
                ("grant_type", DEVICE_CODE_GRANT),
                ("device_code", session.device_code.as_str()),
            ],
        )
        .await
        {
            Ok(body) => body,
            Err(err) => return DeviceCodePoll::Transient(err.to_string()),
        };
        match oauth::parse::<TokenResponse>(&body) {
            Ok(response) => DeviceCodePoll::from_token_response(response, &body),
            Err(err) => DeviceCodePoll::Transient(err.to_string()),
        }
    }

    /// Run the full grant and persist the resulting token.
    ///
    /// `present` receives the session once, before the first poll. Nothing is
    /// persisted unless the grant succeeds.
    pub async fn login<F>(&self, cancel: &CancellationToken, present: F) -> Result<Token, AuthError>
    where
        F: FnOnce(&DeviceCodeSession),
    {
        let mut state = LoginState::Requesting;
        let mut session = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                transition(&mut state, LoginState::Cancelled);
                return Err(AuthError::Cancelled);
            }
            session = self.start_device_code() => session,
        }?;

        present(&session);
        transition(&mut state, LoginState::Polling);

        let mut attempt: u32 = 0;
        while !session.is_expired() {
            if sleep_or_cancel(session.interval, cancel).await.is_err() {
                transition(&mut state, LoginState::Cancelled);
                return Err(AuthError::Cancelled);
            }

            attempt += 1;
            let poll = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    transition(&mut state, LoginState::Cancelled);
                    return Err(AuthError::Cancelled);
                }
                poll = self.poll_device_code(&session) => poll,
            };
            tracing::debug!(attempt, interval = ?session.interval, "polled token endpoint");

            match session.apply(poll) {
                PollStep::Continue => continue,
                PollStep::Authorized(token) => {
                    if let Err(err) = self.token_store.save(&token) {
                        transition(&mut state, LoginState::Failed);
                        return Err(err);
                    }
                    transition(&mut state, LoginState::Succeeded);
                    return Ok(token);
                }
                PollStep::Failed(err) => {
                    transition(&mut state, LoginState::Failed);
                    return Err(err);
                }
            }
        }

        transition(&mut state, LoginState::Failed);
        Err(AuthError::DeviceCodeExpired)
    }
}

fn transition(state: &mut LoginState, next: LoginState) {
    tracing::debug!(from = %state, to = %next, "device-code login");
    *state = next;
}
