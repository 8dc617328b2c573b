//! The single opaque blob the server keeps per installation.
//!
//! The store never interprets the blob. It only hands it back verbatim and
//! replaces it wholesale, optionally guarded by the version the writer
//! last saw.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use diary_core::{DiaryError, Result, VersionToken};
use tokio::sync::Mutex;
use tracing::debug;

use crate::fs::{ensure_file, write_atomic};

pub const BLOB_FILENAME: &str = "journal.enc";

/// Blob contents plus their version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub body: String,
    pub version: VersionToken,
}

impl StoredBlob {
    fn new(body: String) -> Self {
        let version = VersionToken::of_content(&body);
        Self { body, version }
    }
}

/// Result of a write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(VersionToken),
    /// The expected version did not match; nothing was written.
    Conflict { current: VersionToken },
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Current blob, created empty on first access.
    async fn read(&self) -> Result<StoredBlob>;

    /// Replace the blob. With `expected`, only if the stored version matches.
    async fn write(&self, body: String, expected: Option<VersionToken>) -> Result<WriteOutcome>;
}

/// File-backed store at `<data_dir>/journal.enc`.
#[derive(Debug)]
pub struct FileBlobStore {
    path: PathBuf,
    // Serializes read-check-write so conditional writes are atomic.
    lock: Mutex<()>,
}

impl FileBlobStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(BLOB_FILENAME),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn read(&self) -> Result<StoredBlob> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        blocking(move || read_blob(&path)).await
    }

    async fn write(&self, body: String, expected: Option<VersionToken>) -> Result<WriteOutcome> {
        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        blocking(move || {
            if let Some(expected) = expected {
                let current = read_blob(&path)?.version;
                if current != expected {
                    debug!(%current, %expected, "conditional write rejected");
                    return Ok(WriteOutcome::Conflict { current });
                }
            }
            ensure_file(&path)?;
            write_atomic(&path, body.as_bytes())?;
            Ok(WriteOutcome::Written(VersionToken::of_content(&body)))
        })
        .await
    }
}

fn read_blob(path: &Path) -> Result<StoredBlob> {
    ensure_file(path)?;
    let body = std::fs::read_to_string(path)
        .map_err(|e| DiaryError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(StoredBlob::new(body))
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DiaryError::Storage(format!("Storage task failed: {}", e)))?
}
