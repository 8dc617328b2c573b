use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use diary_core::crypto::{derive_access_credential, AccessCredential, KdfParams};
use diary_core::sync::{BlobTransport, FetchedBlob, VersionToken};
use diary_core::{DiaryError, Journal, Revision, Session, SessionState};

/// In-memory stand-in for the blob server with the same write semantics.
#[derive(Clone)]
struct MemoryTransport {
    params: KdfParams,
    inner: Arc<Mutex<Store>>,
}

struct Store {
    secret: Option<String>,
    body: String,
    fail_requests: bool,
}

impl MemoryTransport {
    fn new(params: KdfParams, secret: Option<String>) -> Self {
        Self {
            params,
            inner: Arc::new(Mutex::new(Store {
                secret,
                body: String::new(),
                fail_requests: false,
            })),
        }
    }

    fn body(&self) -> String {
        self.inner.lock().unwrap().body.clone()
    }

    fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().fail_requests = failing;
    }

    fn check(store: &Store, credential: &AccessCredential) -> diary_core::Result<()> {
        if store.fail_requests {
            return Err(DiaryError::Network("connection refused".to_string()));
        }
        match &store.secret {
            Some(secret) if secret != credential.as_str() => Err(DiaryError::Unauthorized),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl BlobTransport for MemoryTransport {
    async fn kdf_params(&self) -> diary_core::Result<KdfParams> {
        Ok(self.params.clone())
    }

    async fn fetch_blob(&self, credential: &AccessCredential) -> diary_core::Result<FetchedBlob> {
        let store = self.inner.lock().unwrap();
        Self::check(&store, credential)?;
        Ok(FetchedBlob {
            body: store.body.clone(),
            version: Some(VersionToken::of_content(&store.body)),
        })
    }

    async fn push_blob(
        &self,
        credential: &AccessCredential,
        blob: &str,
        expected: Option<&VersionToken>,
    ) -> diary_core::Result<Option<VersionToken>> {
        let mut store = self.inner.lock().unwrap();
        Self::check(&store, credential)?;
        if let Some(expected) = expected {
            if *expected != VersionToken::of_content(&store.body) {
                return Err(DiaryError::Conflict);
            }
        }
        store.body = blob.to_string();
        Ok(Some(VersionToken::of_content(blob)))
    }
}

fn test_params() -> KdfParams {
    KdfParams::argon2id(vec![42u8; 16], 1024, 1, 1).expect("valid params")
}

fn gated_transport(password: &str) -> MemoryTransport {
    let params = test_params();
    let secret = derive_access_credential(password, &params).expect("derive credential");
    MemoryTransport::new(params, Some(secret.as_str().to_string()))
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    // Ungated so the wrong-password client reaches the blob.
    let store = MemoryTransport::new(test_params(), None);

    // 1. Fresh store: client A loads an empty journal.
    let mut a = Session::open("p1", store.clone()).await.expect("open A");
    assert!(a.load().await.expect("load A").is_empty());

    // 2. A adds an entry and saves.
    a.journal_mut()
        .expect("journal")
        .add_entry("Day 1", 1_700_000_000_000);
    a.save().await.expect("save A");
    assert!(!store.body().is_empty());

    // 3. Client B with the same password sees exactly that entry.
    let mut b = Session::open("p1", store.clone()).await.expect("open B");
    let journal = b.load().await.expect("load B");
    assert_eq!(journal.len(), 1);
    assert_eq!(
        journal.get(0).unwrap().history(),
        &[Revision::new("Day 1", 1_700_000_000_000)]
    );

    // 4. Client C with the wrong password gets a reported failure, not an empty journal.
    let mut c = Session::open("wrong", store.clone()).await.expect("open C");
    let err = c.load().await.expect_err("wrong password must fail");
    assert!(err.is_corrupt_or_wrong_password());
    assert_eq!(c.state(), SessionState::DecryptFailed);
    assert!(c.journal().is_err());

    // 5. A adds a second entry and saves; B then overwrites with its stale copy.
    a.journal_mut()
        .expect("journal")
        .add_entry("Day 2", 1_700_086_400_000);
    a.overwrite().await.expect("save B1");
    b.overwrite().await.expect("save B2");

    let mut reader = Session::open("p1", store.clone()).await.expect("open reader");
    let final_journal = reader.load().await.expect("load final");
    assert_eq!(final_journal.len(), 1, "A's second entry is lost");
    assert_eq!(final_journal, b.journal().expect("journal B"));
}

#[tokio::test]
async fn test_conditional_save_detects_lost_update() {
    let store = gated_transport("p1");

    let mut a = Session::open("p1", store.clone()).await.expect("open A");
    a.load().await.expect("load A");
    a.journal_mut().unwrap().add_entry("Day 1", 1);
    a.save().await.expect("save A");

    let mut b = Session::open("p1", store.clone()).await.expect("open B");
    b.load().await.expect("load B");

    a.journal_mut().unwrap().add_entry("Day 2", 2);
    a.save().await.expect("save A again");
    let stored = store.body();

    let err = b.save().await.expect_err("stale save must conflict");
    assert!(matches!(err, DiaryError::Conflict));
    assert_eq!(b.state(), SessionState::SaveFailed);
    assert_eq!(b.journal().unwrap().len(), 1, "local journal kept");
    assert_eq!(store.body(), stored, "store untouched");

    // Reloading picks up A's work and saving succeeds again.
    assert_eq!(b.load().await.expect("reload B").len(), 2);
    b.journal_mut()
        .unwrap()
        .append_revision(0, "Day 1 (edited)", 3)
        .unwrap();
    b.save().await.expect("save after reload");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized_on_gated_store() {
    let store = gated_transport("p1");

    let mut session = Session::open("wrong", store.clone()).await.expect("open");
    let err = session.load().await.expect_err("must be rejected");

    assert!(matches!(err, DiaryError::Unauthorized));
    assert_eq!(session.state(), SessionState::NetworkError);
}

#[tokio::test]
async fn test_network_failure_leaves_state_untouched() {
    let store = gated_transport("p1");
    let mut session = Session::open("p1", store.clone()).await.expect("open");
    session.load().await.expect("load");
    session.journal_mut().unwrap().add_entry("kept", 1);

    store.set_failing(true);

    assert!(matches!(session.save().await, Err(DiaryError::Network(_))));
    assert_eq!(session.state(), SessionState::SaveFailed);
    assert_eq!(session.journal().unwrap().len(), 1);

    assert!(matches!(session.load().await, Err(DiaryError::Network(_))));
    assert_eq!(session.state(), SessionState::NetworkError);
    assert_eq!(session.journal().unwrap().len(), 1);
    assert!(store.body().is_empty());

    store.set_failing(false);
    session.save().await.expect("save after recovery");
    assert_eq!(session.state(), SessionState::Loaded);
}

#[tokio::test]
async fn test_acknowledge_empty_replaces_only_the_unreadable_blob() {
    let store = MemoryTransport::new(test_params(), None);

    let mut owner = Session::open("p1", store.clone()).await.expect("open owner");
    owner.load().await.expect("load owner");
    owner.journal_mut().unwrap().add_entry("secret", 1);
    owner.save().await.expect("save owner");

    let mut other = Session::open("p2", store.clone()).await.expect("open other");
    assert!(other.load().await.is_err());
    assert!(other.save().await.is_err(), "cannot save without a journal");

    let journal = other.acknowledge_empty().expect("acknowledge");
    assert!(journal.is_empty());
    journal.add_entry("fresh start", 2);
    other.save().await.expect("save after acknowledge");

    let mut reader = Session::open("p2", store).await.expect("open reader");
    let loaded = reader.load().await.expect("load");
    assert_eq!(loaded.get(0).unwrap().latest().content, "fresh start");
}

#[tokio::test]
async fn test_acknowledge_requires_decrypt_failure() {
    let store = gated_transport("p1");
    let mut session = Session::open("p1", store).await.expect("open");

    assert!(matches!(
        session.acknowledge_empty(),
        Err(DiaryError::InvalidState(_))
    ));
    session.load().await.expect("load");
    assert!(session.acknowledge_empty().is_err());
}

#[tokio::test]
async fn test_save_before_load_is_rejected() {
    let store = gated_transport("p1");
    let mut session = Session::open("p1", store.clone()).await.expect("open");

    assert!(matches!(
        session.save().await,
        Err(DiaryError::InvalidState(_))
    ));
    assert_eq!(session.state(), SessionState::Unloaded);
    assert!(store.body().is_empty());
}

#[tokio::test]
async fn test_legacy_scheme_reads_existing_blob() {
    let params = KdfParams::LegacySha256;
    let secret = derive_access_credential("p1", &params).unwrap();
    let store = MemoryTransport::new(params.clone(), Some(secret.as_str().to_string()));

    let mut writer = Session::open("p1", store.clone()).await.expect("open");
    writer.load().await.expect("load");
    writer.journal_mut().unwrap().add_entry("legacy", 5);
    writer.save().await.expect("save");
    writer.close();

    let key = diary_core::crypto::derive_encryption_key("p1", &params).unwrap();
    let journal: Journal = diary_core::document::load(&store.body(), &key).unwrap();
    assert_eq!(journal.get(0).unwrap().latest().content, "legacy");
}

#[tokio::test]
async fn test_open_derives_same_keys_as_open_with_params() {
    let store = gated_transport("p1");

    let mut opened = Session::open("p1", store.clone()).await.expect("open");
    opened.load().await.expect("load");
    opened.journal_mut().unwrap().add_entry("from open", 1);
    opened.save().await.expect("save");

    let mut direct =
        Session::open_with_params("p1", test_params(), store.clone()).expect("open directly");
    let journal = direct.load().await.expect("load directly");
    assert_eq!(journal.get(0).unwrap().latest().content, "from open");
}
