//! `tcli chats`: list the signed-in user's chats.

use std::io::Write;

use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, Chat};
use crate::cli::auth::api_client;
use crate::cli::ChatsArgs;
use crate::error::Result;

const COLUMN_GAP: usize = 2;

/// Handle `tcli chats [--json]`.
pub async fn handle_chats(args: ChatsArgs, cancel: &CancellationToken) -> Result<()> {
    let chats = api_client()?.list_chats(cancel).await?;

    let rendered = if args.json {
        let mut json = serde_json::to_string_pretty(&chats).map_err(ApiError::from)?;
        json.push('\n');
        json
    } else {
        render_table(&chats)
    };
    std::io::stdout().write_all(rendered.as_bytes())?;
    Ok(())
}

/// Left-aligned `CHAT ID / TYPE / NAME` columns.
pub fn render_table(chats: &[Chat]) -> String {
    let rows: Vec<[String; 3]> = chats
        .iter()
        .map(|chat| [chat.id.clone(), chat.chat_type.clone(), chat.display_name()])
        .collect();
    let header = ["CHAT ID", "TYPE", "NAME"].map(str::to_string);

    let id_width = column_width(&header, &rows, 0);
    let type_width = column_width(&header, &rows, 1);

    let mut out = String::new();
    for [id, kind, name] in std::iter::once(&header).chain(rows.iter()) {
        out.push_str(&format!("{id:<id_width$}{kind:<type_width$}{name}\n"));
    }
    out
}

fn column_width(header: &[String; 3], rows: &[[String; 3]], column: usize) -> usize {
    rows.iter()
        .map(|row| row[column].chars().count())
        .chain(std::iter::once(header[column].len()))
        .max()
        .unwrap_or_default()
        + COLUMN_GAP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatMember;

    #[test]
    fn table_aligns_columns_and_uses_display_names() {
        let chats = vec![
            Chat {
                id: "19:a@thread.v2".to_string(),
                topic: Some("Release".to_string()),
                chat_type: "group".to_string(),
                members: vec![],
            },
            Chat {
                id: "19:bb@unq.gbl.spaces".to_string(),
                topic: None,
                chat_type: "oneOnOne".to_string(),
                members: vec![ChatMember {
                    display_name: Some("Alice".to_string()),
                    email: None,
                }],
            },
        ];

        let table = render_table(&chats);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "CHAT ID               TYPE      NAME");
        assert_eq!(lines[1], "19:a@thread.v2        group     Release");
        assert_eq!(lines[2], "19:bb@unq.gbl.spaces  oneOnOne  Alice");
    }

    #[test]
    fn empty_listing_prints_only_the_header() {
        assert_eq!(render_table(&[]), "CHAT ID  TYPE  NAME\n");
    }
}
