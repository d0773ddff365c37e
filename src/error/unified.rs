//! Unified error classification and recovery.

use strum::Display;

use crate::api::REQUIRED_PERMISSIONS;

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Authentication,
    Permission,
    RateLimit,
    Network,
    Api,
    Configuration,
    Storage,
    Serialization,
    Cancelled,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Run `tcli login` again.
    Login,
    /// Run `tcli config` or set the environment overrides.
    Configure,
    /// Grant the missing permissions in the app registration.
    GrantPermissions,
    RetryLater,
    CheckFilesystem,
    None,
}

impl RecoverySuggestion {
    /// A short hint suitable for printing under an error, if any.
    pub fn hint(self) -> Option<String> {
        let hint = match self {
            Self::Login => "run: tcli login".to_string(),
            Self::Configure => "run: tcli config".to_string(),
            Self::GrantPermissions => {
                format!("grant {REQUIRED_PERMISSIONS} to your Azure app registration")
            }
            Self::RetryLater => "try again in a few moments".to_string(),
            Self::CheckFilesystem => "check permissions on the tcli config directory".to_string(),
            Self::None => return None,
        };
        Some(hint)
    }
}
