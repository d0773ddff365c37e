//! Wire types and form posts for the device-code and token endpoints.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::AuthError;

pub(crate) const DEVICE_CODE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";
pub(crate) const REFRESH_TOKEN_GRANT: &str = "refresh_token";

#[derive(Debug, Deserialize)]
pub(crate) struct DeviceCodeResponse {
    #[serde(default)]
    pub device_code: Option<String>,
    #[serde(default)]
    pub user_code: Option<String>,
    #[serde(default)]
    pub verification_uri: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub interval: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// Token endpoint payload. Success is the absence of `error`, whatever the
/// HTTP status was.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenResponse {
    pub fn error_code(&self) -> Option<&str> {
        non_empty(&self.error)
    }

    /// Provider description, falling back to the bare error code.
    pub fn error_text(&self) -> String {
        describe(&self.error, &self.error_description)
    }

    pub fn access_token(&self) -> Option<&str> {
        non_empty(&self.access_token)
    }
}

impl DeviceCodeResponse {
    pub fn error_code(&self) -> Option<&str> {
        non_empty(&self.error)
    }

    pub fn error_text(&self) -> String {
        describe(&self.error, &self.error_description)
    }
}

/// POST a form and return the raw response body, regardless of status.
pub(crate) async fn post_form(
    client: &reqwest::Client,
    url: &str,
    form: &[(&str, &str)],
) -> Result<String, AuthError> {
    let response = client
        .post(url)
        .header("Accept", "application/json")
        .form(form)
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;
    tracing::trace!(%url, %status, "identity provider responded");
    Ok(body)
}

pub(crate) fn parse<T: DeserializeOwned>(body: &str) -> Result<T, AuthError> {
    serde_json::from_str(body).map_err(|err| AuthError::Parse(err.to_string()))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn describe(code: &Option<String>, description: &Option<String>) -> String {
    non_empty(description)
        .or_else(|| non_empty(code))
        .unwrap_or("unknown error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_with_error_reports_description() {
        let response: TokenResponse = parse(
            r#"{"error":"invalid_grant","error_description":"AADSTS70000: grant expired"}"#,
        )
        .unwrap();
        assert_eq!(response.error_code(), Some("invalid_grant"));
        assert_eq!(response.error_text(), "AADSTS70000: grant expired");
    }

    #[test]
    fn empty_error_field_counts_as_success() {
        let response: TokenResponse =
            parse(r#"{"access_token":"a","expires_in":3600,"error":""}"#).unwrap();
        assert_eq!(response.error_code(), None);
        assert_eq!(response.access_token(), Some("a"));
    }

    #[test]
    fn error_text_falls_back_to_code() {
        let response: DeviceCodeResponse = parse(r#"{"error":"invalid_client"}"#).unwrap();
        assert_eq!(response.error_text(), "invalid_client");
    }

    #[test]
    fn non_json_body_is_a_parse_error() {
        let err = parse::<TokenResponse>("<html>oops</html>").unwrap_err();
        assert!(matches!(err, AuthError::Parse(_)));
    }
}
