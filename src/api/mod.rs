//! Authenticated Microsoft Graph client with retry and error classification.

pub mod chats;
pub mod client;
pub mod error;
pub mod messages;

pub use chats::{Chat, ChatMember, CHATS_PATH};
pub use client::{ApiClient, GRAPH_BASE_URL};
pub use error::{classify_error, ApiError, ProviderError, REQUIRED_PERMISSIONS};
pub use messages::SentMessage;
