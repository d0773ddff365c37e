//! Error types for tcli.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::api::ApiError;
use crate::auth::AuthError;
use crate::config::ConfigError;

/// Exit code for an interrupted command.
pub const EXIT_CANCELLED: i32 = 130;

/// Top-level error for tcli commands.
#[derive(Error, Debug)]
pub enum TcliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl TcliError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(ConfigError::Parse { .. }) => ErrorCategory::Serialization,
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Auth(err) => auth_category(err),
            Self::Api(err) => match err {
                ApiError::Auth(err) => auth_category(err),
                ApiError::RateLimited | ApiError::RequestFailed { .. } => ErrorCategory::RateLimit,
                ApiError::Unauthorized(_) => ErrorCategory::Authentication,
                ApiError::PermissionDenied(_) => ErrorCategory::Permission,
                ApiError::Provider(_)
                | ApiError::Http { .. }
                | ApiError::UnexpectedNextLink(_) => ErrorCategory::Api,
                ApiError::Network(_) => ErrorCategory::Network,
                ApiError::Serialization(_) => ErrorCategory::Serialization,
                ApiError::Cancelled => ErrorCategory::Cancelled,
            },
            Self::Io(_) => ErrorCategory::Storage,
            Self::InvalidArgument(_) => ErrorCategory::Configuration,
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Authentication => RecoverySuggestion::Login,
            ErrorCategory::Permission => RecoverySuggestion::GrantPermissions,
            ErrorCategory::RateLimit | ErrorCategory::Network => RecoverySuggestion::RetryLater,
            ErrorCategory::Configuration => RecoverySuggestion::Configure,
            ErrorCategory::Storage => RecoverySuggestion::CheckFilesystem,
            ErrorCategory::Api | ErrorCategory::Serialization | ErrorCategory::Cancelled => {
                RecoverySuggestion::None
            }
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        if self.category() == ErrorCategory::Cancelled {
            EXIT_CANCELLED
        } else {
            1
        }
    }
}

fn auth_category(err: &AuthError) -> ErrorCategory {
    match err {
        AuthError::Storage(_) => ErrorCategory::Storage,
        AuthError::Parse(_) => ErrorCategory::Serialization,
        AuthError::Network(_) => ErrorCategory::Network,
        AuthError::Cancelled => ErrorCategory::Cancelled,
        AuthError::Protocol(_)
        | AuthError::ProviderRejected(_)
        | AuthError::AuthenticationFailed(_)
        | AuthError::DeviceCodeExpired
        | AuthError::NotLoggedIn
        | AuthError::SessionExpired => ErrorCategory::Authentication,
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TcliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::classify_error;

    #[test]
    fn cancellation_exits_130_from_any_layer() {
        let from_auth = TcliError::from(AuthError::Cancelled);
        let from_api = TcliError::from(ApiError::Cancelled);
        let from_api_auth = TcliError::from(ApiError::Auth(AuthError::Cancelled));
        for err in [from_auth, from_api, from_api_auth] {
            assert_eq!(err.category(), ErrorCategory::Cancelled);
            assert_eq!(err.exit_code(), EXIT_CANCELLED);
        }
    }

    #[test]
    fn session_problems_suggest_login() {
        let err = TcliError::from(AuthError::SessionExpired);
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::Login);
        assert_eq!(err.exit_code(), 1);

        let err = TcliError::from(classify_error(
            401,
            r#"{"error":{"code":"InvalidAuthenticationToken","message":"expired"}}"#,
        ));
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::Login);
    }

    #[test]
    fn forbidden_suggests_permissions() {
        let err = TcliError::from(classify_error(
            403,
            r#"{"error":{"code":"Forbidden","message":"nope"}}"#,
        ));
        assert_eq!(err.category(), ErrorCategory::Permission);
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::GrantPermissions);
        let hint = err.recovery_suggestion().hint().unwrap();
        assert!(hint.contains(crate::api::REQUIRED_PERMISSIONS));
    }

    #[test]
    fn rate_limit_suggests_retrying_later() {
        let err = TcliError::from(ApiError::RateLimited);
        assert_eq!(err.recovery_suggestion(), RecoverySuggestion::RetryLater);
        assert_eq!(
            err.recovery_suggestion().hint().as_deref(),
            Some("try again in a few moments")
        );
    }

    #[test]
    fn missing_config_suggests_configure() {
        let err = TcliError::from(ConfigError::Missing);
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(
            err.recovery_suggestion().hint().as_deref(),
            Some("run: tcli config")
        );
    }

    #[test]
    fn transparent_messages_pass_through() {
        let err = TcliError::from(AuthError::NotLoggedIn);
        assert_eq!(err.to_string(), AuthError::NotLoggedIn.to_string());
    }
}
