//! `tcli config`: interactive app registration setup.

use std::io::{self, BufRead, Write};

use crate::cli::ConfigArgs;
use crate::config::AppConfig;
use crate::error::Result;

/// Handle `tcli config`. Flags skip the matching prompt.
pub fn handle_config(args: ConfigArgs) -> Result<()> {
    let existing = AppConfig::load_unvalidated().unwrap_or_default();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let client_id = match args.client_id {
        Some(value) => value,
        None => prompt(&mut input, &mut output, "Client ID", &existing.client_id)?,
    };
    let tenant_id = match args.tenant_id {
        Some(value) => value,
        None => prompt(&mut input, &mut output, "Tenant ID", &existing.tenant_id)?,
    };

    let config = AppConfig {
        client_id: client_id.trim().to_string(),
        tenant_id: tenant_id.trim().to_string(),
    };
    let path = config.save()?;
    println!("Configuration saved to {}.", path.display());
    Ok(())
}

/// Ask for one value; an empty answer keeps `current`.
pub fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    current: &str,
) -> io::Result<String> {
    if current.is_empty() {
        write!(output, "{label}: ")?;
    } else {
        write!(output, "{label} [{current}]: ")?;
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    if answer.is_empty() {
        Ok(current.to_string())
    } else {
        Ok(answer.to_string())
    }
}
