//! Application configuration (layered: env > `config.json`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::fs::atomic_write;

/// Overrides the per-user directory holding `config.json` and `tokens.json`.
pub const CONFIG_DIR_ENV: &str = "TCLI_CONFIG_DIR";
pub const CLIENT_ID_ENV: &str = "TCLI_CLIENT_ID";
pub const TENANT_ID_ENV: &str = "TCLI_TENANT_ID";

const CONFIG_FILE_NAME: &str = "config.json";

/// Configuration loading and saving errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine home directory; set TCLI_CONFIG_DIR")]
    NoHomeDir,
    #[error("reading config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(
        "clientId and tenantId are required, set TCLI_CLIENT_ID / TCLI_TENANT_ID env vars or run: tcli config"
    )]
    Missing,
}

/// Azure app registration used for the device-code login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub tenant_id: String,
}

/// Values read from `TCLI_CLIENT_ID` / `TCLI_TENANT_ID`.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub client_id: Option<String>,
    pub tenant_id: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            client_id: read(CLIENT_ID_ENV),
            tenant_id: read(TENANT_ID_ENV),
        }
    }
}

/// Resolve the per-user config directory (`~/.config/tcli` by default).
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("tcli"))
        .ok_or(ConfigError::NoHomeDir)
}

impl AppConfig {
    /// Load and validate the configuration from the default directory and
    /// the environment (including a `.env` file, if present).
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::load_unvalidated()?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::load`] but returns incomplete values too; used to
    /// prefill the `config` prompt.
    pub fn load_unvalidated() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let env = EnvOverrides::from_env();
        let file = match config_dir() {
            Ok(dir) => Self::load_file(&dir)?,
            Err(ConfigError::NoHomeDir) => None,
            Err(err) => return Err(err),
        };
        Ok(Self::resolve(file, env))
    }

    /// Read `config.json` from `dir`; `None` if it does not exist.
    pub fn load_file(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        let raw = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ConfigError::Parse { path, source })
    }

    /// Merge file values with environment overrides; env wins.
    pub fn resolve(file: Option<Self>, env: EnvOverrides) -> Self {
        let file = file.unwrap_or_default();
        Self {
            client_id: env.client_id.unwrap_or(file.client_id),
            tenant_id: env.tenant_id.unwrap_or(file.tenant_id),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() || self.tenant_id.trim().is_empty() {
            return Err(ConfigError::Missing);
        }
        Ok(())
    }

    /// Persist to `config.json` in the default directory.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let dir = config_dir()?;
        self.save_to(&dir)?;
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    pub fn save_to(&self, dir: &Path) -> Result<(), ConfigError> {
        let path = dir.join(CONFIG_FILE_NAME);
        let serialized = serde_json::to_vec_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        atomic_write(&path, &serialized).map_err(|source| ConfigError::Io { path, source })
    }
}
