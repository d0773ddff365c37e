//! `/me/chats` listing with `@odata.nextLink` pagination.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::client::ApiClient;
use super::error::ApiError;

/// First page of the chat listing; members are expanded for display names.
pub const CHATS_PATH: &str = "/me/chats?$expand=members&$top=50";

const UNNAMED_CHAT: &str = "(unnamed)";

/// A Teams chat as returned by Graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub chat_type: String,
    #[serde(default)]
    pub members: Vec<ChatMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMember {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatsPage {
    #[serde(default)]
    value: Vec<Chat>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

impl Chat {
    /// The topic, else the members' names joined with `, `, else `(unnamed)`.
    pub fn display_name(&self) -> String {
        if let Some(topic) = self.topic.as_deref().filter(|t| !t.is_empty()) {
            return topic.to_string();
        }
        let names: Vec<&str> = self
            .members
            .iter()
            .filter_map(|member| member.display_name.as_deref())
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() {
            UNNAMED_CHAT.to_string()
        } else {
            names.join(", ")
        }
    }
}

impl ApiClient {
    /// Every chat of the signed-in user, following `@odata.nextLink` until
    /// the last page.
    ///
    /// Links pointing outside the base URL are refused so the bearer token
    /// stays with Graph.
    pub async fn list_chats(&self, cancel: &CancellationToken) -> Result<Vec<Chat>, ApiError> {
        let mut chats = Vec::new();
        let mut next = Some(CHATS_PATH.to_string());
        let mut pages: u32 = 0;

        while let Some(path) = next.take() {
            let page: ChatsPage = self.get_json(&path, cancel).await?;
            pages += 1;
            chats.extend(page.value);

            if let Some(link) = page.next_link.filter(|link| !link.is_empty()) {
                if !self.is_graph_link(&link) {
                    return Err(ApiError::UnexpectedNextLink(link));
                }
                next = Some(link);
            }
        }

        tracing::debug!(pages, chats = chats.len(), "listed chats");
        Ok(chats)
    }

    fn is_graph_link(&self, link: &str) -> bool {
        link.strip_prefix(self.base_url())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?']))
    }
}
