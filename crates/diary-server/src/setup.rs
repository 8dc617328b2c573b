//! One-time creation of the shared secret (`diary-server set-password`).

use std::io::IsTerminal;
use std::path::Path;

use dialoguer::Password;
use diary_core::crypto::{derive_access_credential, KdfParams};
use owo_colors::OwoColorize;
use tracing::info;

use crate::config::{read_config_or_default, write_config, ServerConfig};

pub const ENV_SETUP_PASSWORD: &str = "DIARY_SETUP_PASSWORD";

/// Write the access credential and KDF params for `password` into `config`.
///
/// Other sections are left as they are.
pub fn configure_password(
    config: &mut ServerConfig,
    password: &str,
    kdf: KdfParams,
) -> anyhow::Result<()> {
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    let credential = derive_access_credential(password, &kdf)?;
    config.auth.secret = Some(credential.as_str().to_string());
    config.kdf = Some(kdf);
    Ok(())
}

/// Interactive entry point. Reads `DIARY_SETUP_PASSWORD` when set, else prompts.
pub fn run(config_path: &Path, legacy: bool) -> anyhow::Result<()> {
    print_warning();

    let password = match std::env::var(ENV_SETUP_PASSWORD) {
        Ok(value) if !value.is_empty() => value,
        _ => prompt_password()?,
    };

    let kdf = if legacy {
        KdfParams::LegacySha256
    } else {
        KdfParams::generate()?
    };
    let scheme = kdf.scheme_name();

    let mut config = read_config_or_default(config_path)?;
    configure_password(&mut config, &password, kdf)?;
    write_config(config_path, &config)?;

    info!(scheme, path = %config_path.display(), "shared secret written");
    eprintln!(
        "{} Shared secret ({}) written to {}",
        "OK".green().bold(),
        scheme,
        config_path.display()
    );
    if legacy {
        eprintln!(
            "{} legacy-sha256 is unsalted; use it only to keep reading an existing journal",
            "NOTE".yellow().bold()
        );
    }
    eprintln!("Restart the server for the change to take effect.");
    Ok(())
}

fn print_warning() {
    eprintln!(
        "{}",
        "WARNING: run this only on a trusted local machine.".red().bold()
    );
    eprintln!("The password typed here encrypts your journal. It is never stored;");
    eprintln!("only a derived access credential is written to the server config.");
    eprintln!("If you lose the password, the journal cannot be recovered.");
    eprintln!();
}

fn prompt_password() -> anyhow::Result<String> {
    if !std::io::stdin().is_terminal() {
        anyhow::bail!(
            "No password provided and no TTY available. Set {}.",
            ENV_SETUP_PASSWORD
        );
    }
    let password = Password::new()
        .with_prompt("Journal password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }
    Ok(password)
}
