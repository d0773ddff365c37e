use std::fs;
use std::path::PathBuf;

use super::error::AuthError;
use super::token::Token;
use crate::config::{config_dir, ConfigError};
use crate::util::fs::{atomic_write, remove_if_exists};

const TOKEN_FILE_NAME: &str = "tokens.json";

/// Storage abstraction for the single cached credential.
pub trait TokenStore: Send + Sync {
    /// `Ok(None)` when nothing is cached, including a record with an empty
    /// access token.
    fn load(&self) -> Result<Option<Token>, AuthError>;
    fn save(&self, token: &Token) -> Result<(), AuthError>;
    /// Succeeds when nothing is cached.
    fn clear(&self) -> Result<(), AuthError>;
}

/// Configuration for file-backed token storage.
#[derive(Debug, Clone)]
pub struct TokenStoreConfig {
    pub base_dir: PathBuf,
}

impl TokenStoreConfig {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        config_dir()
    }
}

/// File-backed token store writing `tokens.json` in the config directory.
///
/// Saves are write-temp-then-rename, so concurrent invocations may lose a
/// race but never read a half-written file.
///
/// # Example
/// ```no_run
/// use chrono::{Duration, Utc};
/// use tcli::auth::{FileTokenStore, Token, TokenStore};
///
/// let store = FileTokenStore::new_default()?;
/// store.save(&Token {
///     access_token: "access".to_string(),
///     refresh_token: Some("refresh".to_string()),
///     expires_at: Utc::now() + Duration::hours(1),
/// })?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(config: TokenStoreConfig) -> Self {
        Self {
            path: config.base_dir.join(TOKEN_FILE_NAME),
        }
    }

    pub fn new_default() -> Result<Self, ConfigError> {
        Ok(Self::new(TokenStoreConfig::new(
            TokenStoreConfig::default_dir()?,
        )))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        let raw = match fs::read(&self.path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Storage(err.to_string())),
        };
        let token: Token = serde_json::from_slice(&raw)
            .map_err(|err| AuthError::Parse(format!("token cache: {err}")))?;
        Ok(Some(token).filter(Token::has_access_token))
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        let serialized = serde_json::to_vec_pretty(token)?;
        atomic_write(&self.path, &serialized)?;
        tracing::debug!(path = %self.path.display(), "saved token cache");
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        remove_if_exists(&self.path)?;
        Ok(())
    }
}
