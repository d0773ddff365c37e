use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Seconds before `expires_at` from which a token is treated as expired, so a
/// request never starts with a token that lapses mid-flight.
pub const EXPIRY_BUFFER_SECS: i64 = 120;

/// Cached OAuth credential, persisted as `tokens.json`.
///
/// # Example
/// ```
/// use chrono::{Duration, Utc};
/// use tcli::auth::Token;
///
/// let token = Token {
///     access_token: "access".to_string(),
///     refresh_token: Some("refresh".to_string()),
///     expires_at: Utc::now() + Duration::hours(1),
/// };
/// assert!(!token.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(default, deserialize_with = "null_as_default")]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Missing or `null` reads as the Unix epoch, i.e. already expired.
    #[serde(default, deserialize_with = "null_as_default")]
    pub expires_at: DateTime<Utc>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Token {
    /// Build a token that expires `expires_in_secs` from now.
    pub fn issued_now(
        access_token: String,
        refresh_token: Option<String>,
        expires_in_secs: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token: refresh_token.filter(|t| !t.is_empty()),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    /// A record without an access token counts as no credential at all.
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// The refresh token, if present and non-empty.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Expired once `now` is within [`EXPIRY_BUFFER_SECS`] of `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at - Duration::seconds(EXPIRY_BUFFER_SECS)
    }
}
