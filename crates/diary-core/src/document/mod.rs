//! Journal document: model plus the encrypted load/save boundary.
//!
//! Every cryptographic or parse failure is converted here into
//! `DiaryError::Decryption` or `DiaryError::MalformedDocument`; callers never
//! see raw cipher or JSON errors, and a failure is never turned into an
//! empty journal.

pub mod types;

pub use types::{Journal, JournalEntry, Revision};

use crate::crypto::{cipher, EncryptionKey};
use crate::error::{DiaryError, Result};

/// Decrypt and validate a stored blob.
///
/// An empty (or whitespace-only) blob is the representation of an empty
/// journal and is not an error.
///
/// # Errors
///
/// - `DiaryError::Decryption` if the blob cannot be decrypted with `key`
/// - `DiaryError::MalformedDocument` if the plaintext is not a journal
pub fn load(raw_blob: &str, key: &EncryptionKey) -> Result<Journal> {
    if raw_blob.trim().is_empty() {
        return Ok(Journal::new());
    }

    let plaintext = cipher::decrypt(key, raw_blob)?;
    parse(&plaintext)
}

/// Serialize and encrypt a journal into a blob.
pub fn save(journal: &Journal, key: &EncryptionKey) -> Result<String> {
    cipher::encrypt(key, &serialize(journal)?)
}

/// Deterministic JSON form of a journal.
pub fn serialize(journal: &Journal) -> Result<Vec<u8>> {
    serde_json::to_vec(journal)
        .map_err(|e| DiaryError::InvalidInput(format!("Failed to serialize journal: {}", e)))
}

/// Parse and validate decrypted journal bytes.
///
/// Accepts a top-level array of entries; each entry is either an array of
/// `{content, date}` revisions or an object with a `history` array and
/// optional `hidden`/`version`. Histories must be non-empty.
pub fn parse(plaintext: &[u8]) -> Result<Journal> {
    let text = std::str::from_utf8(plaintext).map_err(|_| {
        DiaryError::MalformedDocument("Decrypted content is not valid UTF-8".to_string())
    })?;
    serde_json::from_str(text).map_err(|e| DiaryError::MalformedDocument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_encryption_key, encrypt, KdfParams};

    fn key_for(password: &str) -> EncryptionKey {
        derive_encryption_key(password, &KdfParams::LegacySha256).unwrap()
    }

    fn sample_journal() -> Journal {
        let mut journal = Journal::new();
        journal.add_entry("Day 1", 1_700_000_000_000);
        journal.add_entry("Day 2", 1_700_086_400_000);
        journal
            .append_revision(0, "Day 1 (revised)", 1_700_000_500_000)
            .unwrap();
        journal
    }

    #[test]
    fn test_empty_blob_is_empty_journal() {
        let key = key_for("p1");
        assert!(load("", &key).unwrap().is_empty());
        assert!(load("  \n", &key).unwrap().is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let key = key_for("p1");
        let journal = sample_journal();

        let blob = save(&journal, &key).unwrap();
        assert_eq!(load(&blob, &key).unwrap(), journal);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let journal = sample_journal();
        assert_eq!(serialize(&journal).unwrap(), serialize(&journal.clone()).unwrap());
    }

    #[test]
    fn test_wrong_password_is_reported() {
        let blob = save(&sample_journal(), &key_for("p1")).unwrap();

        let err = load(&blob, &key_for("wrong")).unwrap_err();
        assert!(err.is_corrupt_or_wrong_password());
    }

    #[test]
    fn test_valid_ciphertext_of_non_journal_is_malformed() {
        let key = key_for("p1");

        let cases: [&[u8]; 6] = [
            br#"{"entries":[]}"#,
            br#"[[{"content":"x"}]]"#,
            br#"[[{"content":"x","date":"yesterday"}]]"#,
            b"[[]]",
            b"not json",
            &[0xff, 0xfe, 0x00],
        ];

        for plaintext in cases {
            let blob = encrypt(&key, plaintext).unwrap();
            let err = load(&blob, &key).unwrap_err();
            assert!(
                matches!(err, DiaryError::MalformedDocument(_)),
                "expected MalformedDocument for {:?}, got {:?}",
                String::from_utf8_lossy(plaintext),
                err
            );
        }
    }

    #[test]
    fn test_legacy_bare_array_document_loads() {
        let key = key_for("p1");
        let blob = encrypt(&key, br#"[[{"content":"Day 1","date":1700000000000}]]"#).unwrap();

        let journal = load(&blob, &key).unwrap();
        assert_eq!(journal.len(), 1);
        assert_eq!(
            journal.get(0).unwrap().latest(),
            &Revision::new("Day 1", 1_700_000_000_000)
        );
    }
}
