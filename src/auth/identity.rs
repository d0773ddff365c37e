//! Identity-provider endpoint parameters.

use bon::Builder;

use crate::config::AppConfig;

pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Graph scopes requested at login and on refresh.
pub const DEFAULT_SCOPES: &[&str] = &[
    "https://graph.microsoft.com/Chat.Read",
    "https://graph.microsoft.com/ChatMessage.Send",
    OFFLINE_ACCESS,
];

/// Required for the provider to issue a refresh token.
pub const OFFLINE_ACCESS: &str = "offline_access";

/// Tenant, client and scopes for the device-code and refresh grants.
///
/// # Example
/// ```
/// use tcli::auth::IdentityConfig;
///
/// let identity = IdentityConfig::builder()
///     .tenant_id("contoso.onmicrosoft.com")
///     .client_id("00000000-0000-0000-0000-000000000000")
///     .build();
/// assert_eq!(
///     identity.token_url(),
///     "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
/// );
/// ```
#[derive(Debug, Clone, Builder)]
pub struct IdentityConfig {
    #[builder(into)]
    pub tenant_id: String,
    #[builder(into)]
    pub client_id: String,
    #[builder(default = default_scopes())]
    pub scopes: Vec<String>,
    /// Base URL of the identity provider, without a trailing slash.
    #[builder(into, default = DEFAULT_AUTHORITY.to_string())]
    pub authority: String,
}

impl IdentityConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::builder()
            .tenant_id(config.tenant_id.trim())
            .client_id(config.client_id.trim())
            .build()
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn device_code_url(&self) -> String {
        format!("{}/oauth2/v2.0/devicecode", self.tenant_base())
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.tenant_base())
    }

    /// Space-separated scope parameter, always including `offline_access`.
    pub fn scope_param(&self) -> String {
        let mut scopes: Vec<&str> = self.scopes.iter().map(String::as_str).collect();
        if !scopes.contains(&OFFLINE_ACCESS) {
            scopes.push(OFFLINE_ACCESS);
        }
        scopes.join(" ")
    }

    fn tenant_base(&self) -> String {
        format!("{}/{}", self.authority.trim_end_matches('/'), self.tenant_id)
    }
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}
