//! Error types for Diary core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.

use thiserror::Error;

/// Result type alias for Diary operations.
pub type Result<T> = std::result::Result<T, DiaryError>;

/// Core error type for Diary operations.
#[derive(Debug, Error)]
pub enum DiaryError {
    /// Ciphertext could not be decrypted (wrong password, corrupted or truncated blob)
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// Decrypted content is not a valid journal document
    #[error("Malformed journal document: {0}")]
    MalformedDocument(String),

    /// Server rejected the access credential
    #[error("Unauthorized: access credential rejected")]
    Unauthorized,

    /// Stored blob changed since it was last read
    #[error("Version conflict: the journal was changed by another session")]
    Conflict,

    /// Transport-level failure (connect, timeout, body read)
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP response other than auth or conflict
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Storage backend error (server-side filesystem)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Key derivation error
    #[error("Key derivation error: {0}")]
    Crypto(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation not valid in the current session state
    #[error("Invalid session state: {0}")]
    InvalidState(String),
}

impl DiaryError {
    /// True for failures that mean "the stored journal cannot be read with
    /// this password": either decryption failed or the plaintext is not a
    /// journal.
    pub fn is_corrupt_or_wrong_password(&self) -> bool {
        matches!(
            self,
            DiaryError::Decryption(_) | DiaryError::MalformedDocument(_)
        )
    }
}

impl From<std::io::Error> for DiaryError {
    fn from(err: std::io::Error) -> Self {
        DiaryError::Storage(err.to_string())
    }
}

impl From<reqwest::Error> for DiaryError {
    fn from(err: reqwest::Error) -> Self {
        DiaryError::Network(err.to_string())
    }
}
