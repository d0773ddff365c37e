//! CLI auth command handlers for login, status, and logout.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::api::ApiClient;
use crate::auth::{AuthService, FileTokenStore, IdentityConfig};
use crate::config::AppConfig;
use crate::error::Result;

/// Service for commands that need the app registration.
fn auth_service() -> Result<AuthService> {
    let config = AppConfig::load()?;
    service_for(&config)
}

/// Graph client backed by the cached token.
pub(crate) fn api_client() -> Result<ApiClient> {
    let service = auth_service()?;
    Ok(ApiClient::new(Arc::new(service.token_provider())))
}

fn service_for(config: &AppConfig) -> Result<AuthService> {
    let store = FileTokenStore::new_default()?;
    Ok(AuthService::new(
        IdentityConfig::from_app_config(config),
        Arc::new(store),
    ))
}

/// Handle `tcli login`.
pub async fn handle_login(cancel: &CancellationToken) -> Result<()> {
    let service = auth_service()?;
    let token = service
        .login(cancel, |session| {
            println!("{}", session.instructions());
            println!("Waiting for authorization...");
        })
        .await?;

    println!(
        "Login successful. Token expires {}.",
        token.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}

/// Handle `tcli status`. Reads the cache only.
pub async fn handle_status() -> Result<()> {
    // The cache does not depend on the app registration.
    let service = service_for(&AppConfig::load_unvalidated()?)?;

    match service.status()? {
        Some(token) if !token.is_expired() => {
            let remaining = token.expires_at - Utc::now();
            println!(
                "Logged in (token expires {}, in {} min)",
                token.expires_at.format("%Y-%m-%d %H:%M UTC"),
                remaining.num_minutes()
            );
        }
        Some(token) if token.refresh_token().is_some() => {
            println!("Token expired (refreshes on next request)");
        }
        Some(_) => println!("Session expired, run: tcli login"),
        None => println!("Not logged in, run: tcli login"),
    }
    Ok(())
}

/// Handle `tcli logout`.
pub async fn handle_logout() -> Result<()> {
    let service = service_for(&AppConfig::load_unvalidated()?)?;
    service.logout()?;
    println!("Logged out.");
    Ok(())
}
