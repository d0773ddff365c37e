use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::device_code::DeviceCodeSession;
use super::error::AuthError;
use super::identity::IdentityConfig;
use super::login::DeviceCodeAuth;
use super::provider::{AccessToken, TokenProvider};
use super::store::TokenStore;
use super::token::Token;
use crate::http::shared_client;

/// Service facade over the authentication flows.
///
/// All I/O decisions (printing, prompting, exit codes) belong to the caller;
/// `AuthService` only returns typed results and errors.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use tcli::auth::{AuthService, FileTokenStore, IdentityConfig, TokenStoreConfig};
///
/// let store = Arc::new(FileTokenStore::new(
///     TokenStoreConfig::new(std::path::PathBuf::from("/tmp/tcli")),
/// ));
/// let identity = IdentityConfig::builder().tenant_id("t").client_id("c").build();
/// let svc = AuthService::new(identity, store);
/// ```
pub struct AuthService {
    identity: IdentityConfig,
    store: Arc<dyn TokenStore>,
    client: reqwest::Client,
}

impl AuthService {
    pub fn new(identity: IdentityConfig, store: Arc<dyn TokenStore>) -> Self {
        Self {
            identity,
            store,
            client: shared_client().clone(),
        }
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Run the device-code login; `present` shows the code to the user.
    pub async fn login<F>(&self, cancel: &CancellationToken, present: F) -> Result<Token, AuthError>
    where
        F: FnOnce(&DeviceCodeSession),
    {
        DeviceCodeAuth::new(self.identity.clone(), self.store.clone())
            .with_http_client(self.client.clone())
            .login(cancel, present)
            .await
    }

    /// A valid access token, refreshed if needed.
    pub async fn valid_token(&self, cancel: &CancellationToken) -> Result<AccessToken, AuthError> {
        self.token_provider().valid_token(cancel).await
    }

    /// Token provider sharing this service's store and HTTP client; hand it
    /// to [`crate::api::ApiClient`].
    pub fn token_provider(&self) -> TokenProvider {
        TokenProvider::new(self.identity.clone(), self.store.clone())
            .with_http_client(self.client.clone())
    }

    /// The cached token, if any. Never touches the network.
    pub fn status(&self) -> Result<Option<Token>, AuthError> {
        self.store.load()
    }

    /// Remove the cached token.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.clear()
    }
}
