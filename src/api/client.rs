use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::error::{classify_error, ApiError};
use crate::auth::TokenSource;
use crate::http::{bearer_headers, shared_client};
use crate::util::retry::RetryPolicy;
use crate::util::wait::sleep_or_cancel;

pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Authenticated Microsoft Graph client with rate-limit retries.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use reqwest::Method;
/// use tcli::api::ApiClient;
/// use tcli::auth::{FileTokenStore, IdentityConfig, TokenProvider};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let identity = IdentityConfig::builder().tenant_id("t").client_id("c").build();
/// let tokens = TokenProvider::new(identity, Arc::new(FileTokenStore::new_default()?));
/// let api = ApiClient::new(Arc::new(tokens));
/// let body = api
///     .request(Method::GET, "/me/chats", None, &CancellationToken::new())
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            client: shared_client().clone(),
            base_url: GRAPH_BASE_URL.to_string(),
            tokens,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a path against the base URL. Absolute URLs under the base
    /// (such as `@odata.nextLink`) pass through unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with(&self.base_url) {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Send an authenticated request and return the response body.
    ///
    /// 429 responses are retried up to the policy's limit; every other error
    /// status is classified and returned without retrying. Token failures are
    /// returned before any request is made.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, ApiError> {
        let token = self.tokens.access_token(cancel).await?;
        let headers = bearer_headers(&token);
        let url = self.url(path);
        let max_attempts = self.retry.max_attempts();

        for attempt in 0..max_attempts {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .headers(headers.clone());
            if let Some(body) = &body {
                request = request.body(body.clone());
            }

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                response = request.send() => response?,
            };
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let delay = self.retry.delay(response.headers(), attempt);
                drop(response);
                if attempt + 1 >= max_attempts {
                    return Err(ApiError::RateLimited);
                }
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, backing off"
                );
                sleep_or_cancel(delay, cancel).await?;
                continue;
            }

            if status.is_client_error() || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                tracing::debug!(%method, %url, status = status.as_u16(), "request failed");
                return Err(classify_error(status.as_u16(), &text));
            }

            return Ok(response.bytes().await?.to_vec());
        }

        Err(ApiError::RequestFailed {
            retries: self.retry.max_retries,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let body = self.request(Method::GET, path, None, cancel).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_vec(payload)?;
        let response = self.request(Method::POST, path, Some(body), cancel).await?;
        Ok(serde_json::from_slice(&response)?)
    }
}
