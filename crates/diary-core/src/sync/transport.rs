//! Transport abstraction between a session and the blob store.
//!
//! The production implementation is the HTTP [`SyncClient`](super::SyncClient);
//! tests substitute in-memory transports.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::crypto::{AccessCredential, KdfParams};
use crate::error::Result;

/// Opaque token identifying one stored blob state.
///
/// Computed as the hex SHA-256 of the blob text, so equal content always has
/// an equal token regardless of which server process produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Token for a given stored blob.
    pub fn of_content(body: &str) -> Self {
        Self(hex::encode(Sha256::digest(body.as_bytes())))
    }

    /// Parse an `ETag` / `If-Match` header value (quotes and weak prefix are stripped).
    pub fn from_header(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let trimmed = trimmed.strip_prefix("W/").unwrap_or(trimmed);
        let unquoted = trimmed.trim_matches('"');
        if unquoted.is_empty() {
            None
        } else {
            Some(Self(unquoted.to_string()))
        }
    }

    /// Quoted form for HTTP headers.
    pub fn to_header(&self) -> String {
        format!("\"{}\"", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Blob text plus the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBlob {
    pub body: String,
    pub version: Option<VersionToken>,
}

/// Network boundary used by [`Session`](crate::session::Session).
///
/// Implementations must never send anything besides the access credential
/// and the ciphertext blob.
#[async_trait]
pub trait BlobTransport: Send + Sync {
    /// Public key-derivation parameters of the installation.
    async fn kdf_params(&self) -> Result<KdfParams>;

    /// Read the stored blob.
    ///
    /// # Errors
    ///
    /// - `DiaryError::Unauthorized` if the credential is rejected
    /// - `DiaryError::Network` / `DiaryError::Server` on other failures
    async fn fetch_blob(&self, credential: &AccessCredential) -> Result<FetchedBlob>;

    /// Replace the stored blob.
    ///
    /// With `expected` set, the write only succeeds if the store is still at
    /// that version; otherwise it fails with `DiaryError::Conflict`. Without
    /// it the write is unconditional (last write wins).
    async fn push_blob(
        &self,
        credential: &AccessCredential,
        blob: &str,
        expected: Option<&VersionToken>,
    ) -> Result<Option<VersionToken>>;
}
