//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    pub const GENERAL: i32 = 1;

    /// Server rejected the access credential.
    pub const AUTH_FAILED: i32 = 3;

    /// Entry or configuration not found.
    pub const NOT_FOUND: i32 = 4;

    /// The stored journal changed since it was loaded.
    pub const CONFLICT: i32 = 5;

    /// The stored journal could not be decrypted or parsed.
    pub const CORRUPT: i32 = 6;
}

pub const ENV_PASSPHRASE: &str = "DIARY_PASSPHRASE";
