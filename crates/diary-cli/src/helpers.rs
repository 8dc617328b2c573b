//! Input helpers: passphrase, entry body, entry numbers.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use secrecy::SecretString;

use crate::constants::ENV_PASSPHRASE;
use crate::errors::CliError;

/// Read the passphrase from `DIARY_PASSPHRASE`, or prompt for it.
pub fn prompt_passphrase(interactive: bool) -> anyhow::Result<SecretString> {
    if let Ok(value) = std::env::var(ENV_PASSPHRASE) {
        if !value.is_empty() {
            return Ok(SecretString::from(value));
        }
    }
    if !interactive {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set {}.",
            ENV_PASSPHRASE
        ));
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map(SecretString::from)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Entry body from `--body`, or from stdin when piped.
pub fn read_entry_body(body: Option<String>) -> anyhow::Result<String> {
    if let Some(value) = body {
        if value.trim().is_empty() {
            return Err(anyhow::anyhow!("--body cannot be empty"));
        }
        return Ok(value);
    }

    if io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No entry body given; use --body or pipe content via stdin"
        ));
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    normalize_body(&buffer)
}

fn normalize_body(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim_end();
    if trimmed.trim().is_empty() {
        return Err(anyhow::anyhow!("No input provided on stdin"));
    }
    Ok(trimmed.to_string())
}

/// Convert a 1-based entry number into a journal index.
pub fn entry_index(number: usize) -> Result<usize, CliError> {
    number.checked_sub(1).ok_or_else(|| {
        CliError::not_found(
            "Entry numbers start at 1",
            "Run `diary list --all` to see entry numbers.",
        )
    })
}

/// Current time in milliseconds since the epoch.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
