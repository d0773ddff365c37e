//! Sending chat messages.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::client::ApiClient;
use super::error::ApiError;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    body: MessageBody<'a>,
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    content: &'a str,
}

/// The created message, as acknowledged by Graph.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SentMessage {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "createdDateTime", default)]
    pub created_at: String,
}

impl ApiClient {
    /// Post `content` to the chat `chat_id`.
    pub async fn send_message(
        &self,
        chat_id: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<SentMessage, ApiError> {
        let payload = SendMessageRequest {
            body: MessageBody { content },
        };
        let sent: SentMessage = self
            .post_json(&format!("/me/chats/{chat_id}/messages"), &payload, cancel)
            .await?;
        tracing::debug!(message_id = %sent.id, "message sent");
        Ok(sent)
    }
}
