//! `tcli request`: raw authenticated Graph call.

use std::io::Write;

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use crate::cli::auth::api_client;
use crate::cli::RequestArgs;
use crate::error::{Result, TcliError};

/// Handle `tcli request <method> <path> [--body <json>]`; prints the
/// response body to stdout.
pub async fn handle_request(args: RequestArgs, cancel: &CancellationToken) -> Result<()> {
    let method = parse_method(&args.method)?;
    let body = args.body.map(|body| body.into_bytes());

    let api = api_client()?;
    let response = api.request(method, &args.path, body, cancel).await?;

    let mut stdout = std::io::stdout();
    stdout.write_all(&response)?;
    if !response.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn parse_method(raw: &str) -> Result<Method> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .map_err(|_| TcliError::InvalidArgument(format!("invalid HTTP method: {raw}")))
}
