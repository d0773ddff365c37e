//! CLI entry point for tcli.

pub mod auth;
pub mod chats;
pub mod config;
pub mod request;
pub mod send;

use clap::{Parser, Subcommand};

/// Microsoft Teams CLI client
#[derive(Parser, Debug)]
#[command(name = "tcli", version, about = "Microsoft Teams CLI client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with Microsoft Teams using device code flow
    Login,
    /// Remove the cached token
    Logout,
    /// Show authentication status
    Status,
    /// Configure Azure app credentials (client ID and tenant ID)
    Config(ConfigArgs),
    /// List your Teams chats
    Chats(ChatsArgs),
    /// Send a message to a Teams chat
    #[command(after_help = "Examples:
  tcli send 19:abc123@thread.v2 \"Hello from the CLI\"
  echo \"Build passed\" | tcli send 19:abc123@thread.v2 -")]
    Send(SendArgs),
    /// Send an authenticated request to Microsoft Graph
    Request(RequestArgs),
}

/// Arguments for `tcli config`. Values not given as flags are prompted for.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Azure app registration client ID
    #[arg(long)]
    pub client_id: Option<String>,

    /// Azure tenant ID
    #[arg(long)]
    pub tenant_id: Option<String>,
}

/// Arguments for `tcli chats`.
#[derive(Parser, Debug)]
pub struct ChatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `tcli send`.
#[derive(Parser, Debug)]
pub struct SendArgs {
    /// Target chat ID, e.g. 19:abc123@thread.v2
    pub chat_id: String,

    /// Message text; omit or pass `-` to read stdin
    pub message: Option<String>,
}

/// Arguments for `tcli request`.
#[derive(Parser, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PATCH, DELETE, ...)
    pub method: String,

    /// Path relative to the Graph base URL, e.g. /me/chats
    pub path: String,

    /// JSON request body
    #[arg(short, long)]
    pub body: Option<String>,
}
