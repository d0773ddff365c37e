use serde::Deserialize;
use thiserror::Error;

use crate::auth::AuthError;

/// Graph permissions the app registration must grant.
pub const REQUIRED_PERMISSIONS: &str = "Chat.Read and ChatMessage.Send";

/// Structured `{ "error": { "code", "message" } }` payload from Graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// Errors from authenticated API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("rate limited by Graph API, try again later")]
    RateLimited,
    #[error("unauthorized, session may have expired, run: tcli login")]
    Unauthorized(ProviderError),
    #[error(
        "permission denied, ensure {} are granted in your Azure app registration",
        REQUIRED_PERMISSIONS
    )]
    PermissionDenied(ProviderError),
    #[error("Graph API error ({}): {}", .0.code, .0.message)]
    Provider(ProviderError),
    #[error("Graph API error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("refusing to follow pagination link outside Graph: {0}")]
    UnexpectedNextLink(String),
    #[error("request failed after {retries} retries")]
    RequestFailed { retries: u32 },
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("cancelled")]
    Cancelled,
}

impl ApiError {
    /// HTTP status of the failing response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(err) | Self::PermissionDenied(err) | Self::Provider(err) => {
                Some(err.status)
            }
            Self::Http { status, .. } => Some(*status),
            Self::RateLimited => Some(429),
            _ => None,
        }
    }

    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Unauthorized(err) | Self::PermissionDenied(err) | Self::Provider(err) => Some(err),
            _ => None,
        }
    }
}

impl From<crate::util::wait::Cancelled> for ApiError {
    fn from(_: crate::util::wait::Cancelled) -> Self {
        Self::Cancelled
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Map a failing (>= 400, non-429) response to an actionable error.
///
/// Bodies that are not a Graph error envelope (HTML, plain text, empty) keep
/// the status and raw text.
pub fn classify_error(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .filter(|envelope| !envelope.error.code.is_empty());

    let Some(envelope) = parsed else {
        return ApiError::Http {
            status,
            body: body.to_string(),
        };
    };

    let error = ProviderError {
        status,
        code: envelope.error.code,
        message: envelope.error.message,
    };
    match status {
        401 => ApiError::Unauthorized(error),
        403 => ApiError::PermissionDenied(error),
        _ => ApiError::Provider(error),
    }
}
