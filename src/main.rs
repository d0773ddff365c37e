//! tcli binary entry point.

use clap::Parser;
use tcli::cli::{Cli, Commands};
use tcli::error::TcliError;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_ENV: &str = "TCLI_LOG";

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling");
            on_interrupt.cancel();
        }
    });

    let result = match cli.command {
        Commands::Login => tcli::cli::auth::handle_login(&cancel).await,
        Commands::Logout => tcli::cli::auth::handle_logout().await,
        Commands::Status => tcli::cli::auth::handle_status().await,
        Commands::Config(args) => tcli::cli::config::handle_config(args),
        Commands::Chats(args) => tcli::cli::chats::handle_chats(args, &cancel).await,
        Commands::Send(args) => tcli::cli::send::handle_send(args, &cancel).await,
        Commands::Request(args) => tcli::cli::request::handle_request(args, &cancel).await,
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(e.exit_code());
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn report(err: &TcliError) {
    eprintln!("Error: {err}");
    let message = err.to_string();
    if let Some(hint) = err.recovery_suggestion().hint() {
        // Most messages already carry the next step.
        if !message.contains(hint.as_str()) {
            eprintln!("Hint: {hint}");
        }
    }
}
