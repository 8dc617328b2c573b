//! Client session: derived keys, the loaded journal, and the load/save
//! state machine.
//!
//! ```text
//! Unloaded -> Loading -> Loaded | DecryptFailed | NetworkError
//! Loaded   -> Saving  -> Loaded | SaveFailed (journal kept)
//! DecryptFailed -> acknowledge_empty() -> Loaded (empty journal)
//! ```
//!
//! A session owns everything it needs; two sessions never share state.

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{derive_keys, KdfParams, KeyMaterial};
use crate::document::{self, Journal};
use crate::error::{DiaryError, Result};
use crate::sync::{BlobTransport, VersionToken};

/// Where a session is in its load/save lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loading,
    Loaded,
    /// The stored blob could not be decrypted or parsed; no journal is held.
    DecryptFailed,
    /// The last load failed at the transport or server level.
    NetworkError,
    Saving,
    /// The last save failed; the in-memory journal is unchanged.
    SaveFailed,
}

/// One user's open journal.
pub struct Session<T: BlobTransport> {
    transport: T,
    kdf: KdfParams,
    keys: KeyMaterial,
    state: SessionState,
    journal: Option<Journal>,
    version: Option<VersionToken>,
}

impl<T: BlobTransport> Session<T> {
    /// Open a session: fetch the installation's KDF parameters and derive keys.
    ///
    /// Key derivation runs on the blocking pool. Nothing is loaded yet; call
    /// [`Session::load`].
    pub async fn open(password: &str, transport: T) -> Result<Self> {
        let kdf = transport.kdf_params().await?;
        let password = Zeroizing::new(password.to_string());
        let params = kdf.clone();
        let keys = tokio::task::spawn_blocking(move || derive_keys(&password, &params))
            .await
            .map_err(|e| DiaryError::Crypto(format!("Key derivation task failed: {}", e)))??;
        Ok(Self::with_keys(keys, kdf, transport))
    }

    /// Open a session with already-known KDF parameters.
    ///
    /// Derives keys on the calling thread; with Argon2id this blocks for the
    /// full work factor.
    pub fn open_with_params(password: &str, kdf: KdfParams, transport: T) -> Result<Self> {
        let keys = derive_keys(password, &kdf)?;
        Ok(Self::with_keys(keys, kdf, transport))
    }

    fn with_keys(keys: KeyMaterial, kdf: KdfParams, transport: T) -> Self {
        debug!(scheme = kdf.scheme_name(), "session opened");
        Self {
            transport,
            kdf,
            keys,
            state: SessionState::Unloaded,
            journal: None,
            version: None,
        }
    }

    /// End the session. Key material is zeroized as it is dropped.
    pub fn close(self) {
        debug!(state = ?self.state, "session closed");
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn kdf_params(&self) -> &KdfParams {
        &self.kdf
    }

    /// Version of the stored blob this session last read or wrote.
    pub fn version(&self) -> Option<&VersionToken> {
        self.version.as_ref()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The loaded journal.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::InvalidState` if nothing has been loaded.
    pub fn journal(&self) -> Result<&Journal> {
        self.journal.as_ref().ok_or_else(|| self.not_loaded())
    }

    /// Mutable access to the loaded journal.
    pub fn journal_mut(&mut self) -> Result<&mut Journal> {
        match self.journal {
            Some(ref mut journal) => Ok(journal),
            None => Err(not_loaded_error(self.state)),
        }
    }

    /// Fetch and decrypt the stored journal.
    ///
    /// # Errors
    ///
    /// - Transport errors (`Network`, `Server`, `Unauthorized`): the session
    ///   moves to `NetworkError` and any previously loaded journal is kept.
    /// - `Decryption` / `MalformedDocument`: the session moves to
    ///   `DecryptFailed` and drops its journal. Recovering requires
    ///   [`Session::acknowledge_empty`].
    pub async fn load(&mut self) -> Result<&Journal> {
        self.state = SessionState::Loading;

        let fetched = match self.transport.fetch_blob(&self.keys.access).await {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(error = %err, "failed to fetch journal");
                self.state = SessionState::NetworkError;
                return Err(err);
            }
        };

        match document::load(&fetched.body, &self.keys.encryption) {
            Ok(journal) => {
                info!(entries = journal.len(), "journal loaded");
                self.version = fetched.version;
                self.state = SessionState::Loaded;
                Ok(&*self.journal.insert(journal))
            }
            Err(err) => {
                warn!(error = %err, "stored journal could not be read");
                self.journal = None;
                self.version = fetched.version;
                self.state = SessionState::DecryptFailed;
                Err(err)
            }
        }
    }

    /// Accept that the stored journal is unreadable and start from empty.
    ///
    /// The next [`Session::save`] is conditioned on the unreadable blob's
    /// version, so it only replaces exactly what the user acknowledged.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::InvalidState` unless the last load failed to decrypt.
    pub fn acknowledge_empty(&mut self) -> Result<&mut Journal> {
        if self.state != SessionState::DecryptFailed {
            return Err(DiaryError::InvalidState(format!(
                "Nothing to acknowledge (session is {:?})",
                self.state
            )));
        }
        warn!("unreadable journal acknowledged; continuing with an empty journal");
        self.state = SessionState::Loaded;
        Ok(self.journal.insert(Journal::new()))
    }

    /// Encrypt and store the journal, failing with `Conflict` if the stored
    /// blob changed since it was read.
    pub async fn save(&mut self) -> Result<()> {
        self.push(true).await
    }

    /// Encrypt and store the journal unconditionally (last write wins).
    pub async fn overwrite(&mut self) -> Result<()> {
        self.push(false).await
    }

    async fn push(&mut self, conditional: bool) -> Result<()> {
        let journal = match self.journal {
            Some(ref journal) => journal,
            None => return Err(not_loaded_error(self.state)),
        };
        let blob = document::save(journal, &self.keys.encryption)?;
        let entries = journal.len();

        self.state = SessionState::Saving;
        let expected = if conditional {
            self.version.as_ref()
        } else {
            None
        };

        let result = self
            .transport
            .push_blob(&self.keys.access, &blob, expected)
            .await;

        match result {
            Ok(version) => {
                self.version = version.or_else(|| Some(VersionToken::of_content(&blob)));
                self.state = SessionState::Loaded;
                info!(entries, "journal saved");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to save journal");
                self.state = SessionState::SaveFailed;
                Err(err)
            }
        }
    }

    fn not_loaded(&self) -> DiaryError {
        not_loaded_error(self.state)
    }
}

fn not_loaded_error(state: SessionState) -> DiaryError {
    DiaryError::InvalidState(format!("No journal loaded (session is {:?})", state))
}

impl<T: BlobTransport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("scheme", &self.kdf.scheme_name())
            .field("state", &self.state)
            .field("version", &self.version)
            .field("entries", &self.journal.as_ref().map(Journal::len))
            .finish()
    }
}
