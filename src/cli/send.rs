//! `tcli send`: post a message to a chat.

use std::io::Read;

use tokio_util::sync::CancellationToken;

use crate::cli::auth::api_client;
use crate::cli::SendArgs;
use crate::error::{Result, TcliError};

/// Read from stdin instead of the argument.
const STDIN_MARKER: &str = "-";

/// Handle `tcli send <chat-id> [<message>|-]`.
pub async fn handle_send(args: SendArgs, cancel: &CancellationToken) -> Result<()> {
    let message = read_message(args.message.as_deref(), &mut std::io::stdin().lock())?;
    let sent = api_client()?
        .send_message(&args.chat_id, &message, cancel)
        .await?;
    println!("Message sent (id: {}, at: {})", sent.id, sent.created_at);
    Ok(())
}

/// The message argument, or all of `stdin` (minus trailing newlines) when
/// the argument is missing or `-`. Empty messages are rejected.
pub fn read_message<R: Read>(arg: Option<&str>, stdin: &mut R) -> Result<String> {
    let message = match arg {
        Some(text) if text != STDIN_MARKER => text.to_string(),
        _ => {
            let mut raw = String::new();
            stdin.read_to_string(&mut raw)?;
            raw.trim_end_matches(['\r', '\n']).to_string()
        }
    };
    if message.is_empty() {
        return Err(TcliError::InvalidArgument(
            "message cannot be empty".to_string(),
        ));
    }
    Ok(message)
}
