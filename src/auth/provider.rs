use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio_util::sync::CancellationToken;

use super::error::AuthError;
use super::identity::IdentityConfig;
use super::oauth::{self, TokenResponse, REFRESH_TOKEN_GRANT};
use super::store::TokenStore;
use crate::http::shared_client;

/// Source of bearer tokens for outbound API calls.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self, cancel: &CancellationToken) -> Result<String, AuthError>;
}

/// A currently valid access token.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub secret: String,
    /// The token came from a refresh rather than the cache.
    pub refreshed: bool,
    /// Set when a refreshed token could not be written back to the cache.
    /// The token is still usable; the next process will refresh again.
    pub persist_error: Option<AuthError>,
}

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"..")
            .field("refreshed", &self.refreshed)
            .field("persist_error", &self.persist_error)
            .finish()
    }
}

/// Hands out valid access tokens, refreshing expired ones.
///
/// The cache is re-read on every call so a refresh done by another process
/// is picked up instead of spending the refresh token twice.
pub struct TokenProvider {
    client: reqwest::Client,
    identity: IdentityConfig,
    token_store: Arc<dyn TokenStore>,
}

impl TokenProvider {
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

    pub async fn valid_token(&self, cancel: &CancellationToken) -> Result<AccessToken, AuthError> {
        let mut token = self.token_store.load()?.ok_or(AuthError::NotLoggedIn)?;
        if !token.is_expired() {
            return Ok(AccessToken {
                secret: token.access_token,
                refreshed: false,
                persist_error: None,
            });
        }

        let refresh_token = token
            .refresh_token()
            .ok_or(AuthError::SessionExpired)?
            .to_string();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AuthError::Cancelled),
            response = self.request_refresh(&refresh_token) => response,
        };
        let response = response.map_err(|err| {
            tracing::debug!(error = %err, "token refresh failed");
            AuthError::SessionExpired
        })?;
        let access_token = match response.access_token() {
            Some(access_token) => access_token.to_string(),
            None => return Err(AuthError::SessionExpired),
        };

        token.access_token = access_token;
        token.expires_at = Utc::now() + Duration::seconds(response.expires_in.unwrap_or_default());
        if let Some(rotated) = response.refresh_token.filter(|t| !t.is_empty()) {
            token.refresh_token = Some(rotated);
        }

        let persist_error = match self.token_store.save(&token) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(error = %err, "refreshed token could not be cached");
                Some(err)
            }
        };
        tracing::debug!("access token refreshed");

        Ok(AccessToken {
            secret: token.access_token,
            refreshed: true,
            persist_error,
        })
    }

    async fn request_refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let scope = self.identity.scope_param();
        let body = oauth::post_form(
            &self.client,
            &self.identity.token_url(),
            &[
                ("client_id", self.identity.client_id.as_str()),
                ("grant_type", REFRESH_TOKEN_GRANT),
                ("refresh_token", refresh_token),
                ("scope", scope.as_str()),
            ],
        )
        .await?;
        let response: TokenResponse = oauth::parse(&body)?;
        if response.error_code().is_some() {
            return Err(AuthError::AuthenticationFailed(response.error_text()));
        }
        Ok(response)
    }
}

#[async_trait]
impl TokenSource for TokenProvider {
    async fn access_token(&self, cancel: &CancellationToken) -> Result<String, AuthError> {
        self.valid_token(cancel).await.map(|token| token.secret)
    }
}
