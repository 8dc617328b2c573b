//! CLI error types for structured error handling.
//!
//! Core errors are mapped onto a small set of user-facing failures, each
//! with its own exit code and an optional hint.

use std::fmt;

use diary_core::DiaryError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Entry, server, or config not found
    NotFound { message: String, hint: String },

    /// Server rejected the credential derived from the passphrase
    AuthFailed { message: String, hint: String },

    /// Another session saved first
    Conflict { message: String, hint: String },

    /// Stored journal is unreadable with this passphrase
    Corrupt { message: String, hint: String },

    /// Anything else (network, server, invalid input)
    Other(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn auth_failed(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CliError::NotFound { message, .. }
            | CliError::AuthFailed { message, .. }
            | CliError::Conflict { message, .. }
            | CliError::Corrupt { message, .. } => message,
            CliError::Other(message) => message,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            CliError::NotFound { hint, .. }
            | CliError::AuthFailed { hint, .. }
            | CliError::Conflict { hint, .. }
            | CliError::Corrupt { hint, .. } => Some(hint),
            CliError::Other(_) => None,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::Conflict { .. } => exit_codes::CONFLICT,
            CliError::Corrupt { .. } => exit_codes::CORRUPT,
            CliError::Other(_) => exit_codes::GENERAL,
        }
    }
}

impl From<DiaryError> for CliError {
    fn from(err: DiaryError) -> Self {
        match err {
            DiaryError::Unauthorized => CliError::auth_failed(
                "Server rejected the credential",
                "Check your passphrase (DIARY_PASSPHRASE) and the server's shared secret.",
            ),
            DiaryError::Conflict => CliError::Conflict {
                message: "The journal was changed by another session; nothing was saved"
                    .to_string(),
                hint: "Re-run the command to apply it to the latest journal.".to_string(),
            },
            DiaryError::Decryption(_) | DiaryError::MalformedDocument(_) => CliError::Corrupt {
                message: format!("Could not read the stored journal: {}", err),
                hint: "Check your passphrase. If the stored journal is truly lost, \
                       `diary reset --yes` replaces it with an empty one."
                    .to_string(),
            },
            DiaryError::NotFound(what) => CliError::not_found(
                format!("Not found: {}", what),
                "Run `diary list --all` to see entry numbers.",
            ),
            other => CliError::Other(other.to_string()),
        }
    }
}

/// Map any error to its CLI form, keeping typed CLI errors as they are.
pub fn classify(err: anyhow::Error) -> CliError {
    let err = match err.downcast::<CliError>() {
        Ok(cli) => return cli,
        Err(err) => err,
    };
    match err.downcast::<DiaryError>() {
        Ok(core) => core.into(),
        Err(err) => CliError::Other(format!("{:#}", err)),
    }
}
