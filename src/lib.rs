//! tcli: Microsoft Teams command-line client core.
//!
//! Device-code login against the Microsoft identity platform, a durable
//! token cache with transparent refresh, and a Microsoft Graph client that
//! retries rate-limited calls and turns error payloads into actionable
//! messages.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tcli::api::ApiClient;
//! use tcli::auth::{AuthService, FileTokenStore, IdentityConfig};
//! use tcli::config::AppConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> tcli::error::Result<()> {
//! let config = AppConfig::load()?;
//! let store = Arc::new(FileTokenStore::new_default()?);
//! let auth = AuthService::new(IdentityConfig::from_app_config(&config), store);
//! let cancel = CancellationToken::new();
//!
//! auth.login(&cancel, |session| println!("{}", session.instructions()))
//!     .await?;
//!
//! let api = ApiClient::new(Arc::new(auth.token_provider()));
//! for chat in api.list_chats(&cancel).await? {
//!     println!("{}  {}", chat.id, chat.display_name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
