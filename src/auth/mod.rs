//! OAuth device-code login, token cache, and token refresh.

pub mod device_code;
pub mod error;
pub mod identity;
pub mod login;
mod oauth;
pub mod provider;
pub mod service;
pub mod store;
pub mod token;

pub use device_code::{DeviceCodePoll, DeviceCodeSession, LoginState, PollStep};
pub use error::AuthError;
pub use identity::IdentityConfig;
pub use login::DeviceCodeAuth;
pub use provider::{AccessToken, TokenProvider, TokenSource};
pub use service::AuthService;
pub use store::{FileTokenStore, TokenStore, TokenStoreConfig};
pub use token::Token;
