#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tcli::auth::{AuthError, IdentityConfig, Token, TokenSource, TokenStore};
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

pub const TENANT: &str = "tenant-1";
pub const CLIENT: &str = "client-1";

#[derive(Default)]
pub struct InMemoryTokenStore {
    token: Mutex<Option<Token>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    pub fn get(&self) -> Option<Token> {
        self.token.lock().expect("store lock poisoned").clone()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        Ok(self.get())
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        *self.token.lock().expect("store lock poisoned") = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.token.lock().expect("store lock poisoned") = None;
        Ok(())
    }
}

/// Loads a fixed token and refuses every write.
pub struct ReadOnlyTokenStore {
    token: Option<Token>,
}

impl ReadOnlyTokenStore {
    pub fn new(token: Option<Token>) -> Self {
        Self { token }
    }
}

impl TokenStore for ReadOnlyTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        Ok(self.token.clone())
    }

    fn save(&self, _token: &Token) -> Result<(), AuthError> {
        Err(AuthError::Storage("read-only file system".to_string()))
    }

    fn clear(&self) -> Result<(), AuthError> {
        Err(AuthError::Storage("read-only file system".to_string()))
    }
}

/// Fixed bearer token, or a fixed failure.
pub struct StaticTokenSource {
    result: Result<String, AuthError>,
}

impl StaticTokenSource {
    pub fn ok(token: &str) -> Self {
        Self {
            result: Ok(token.to_string()),
        }
    }

    pub fn failing(err: AuthError) -> Self {
        Self { result: Err(err) }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self, _cancel: &CancellationToken) -> Result<String, AuthError> {
        self.result.clone()
    }
}

pub fn valid_token(access_token: &str, refresh_token: Option<&str>) -> Token {
    Token {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(str::to_string),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

pub fn expired_token(access_token: &str, refresh_token: Option<&str>) -> Token {
    Token {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.map(str::to_string),
        expires_at: Utc::now() - Duration::minutes(5),
    }
}

pub fn identity(server: &MockServer) -> IdentityConfig {
    IdentityConfig::builder()
        .tenant_id(TENANT)
        .client_id(CLIENT)
        .authority(server.uri())
        .build()
}

pub fn token_path() -> String {
    format!("/{TENANT}/oauth2/v2.0/token")
}

pub fn device_code_path() -> String {
    format!("/{TENANT}/oauth2/v2.0/devicecode")
}

/// Client without connection reuse, so paused-clock tests never hold idle
/// connections across an auto-advanced sleep.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .expect("build test client")
}
