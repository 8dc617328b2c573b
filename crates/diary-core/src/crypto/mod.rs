//! Cryptographic operations for Diary.
//!
//! - **key**: password -> encryption key + access credential
//! - **cipher**: AES-256-CBC over the serialized journal
//!
//! ## Threat Model
//!
//! We defend against:
//! - A server (or its disk) reading journal contents
//! - A leaked access credential revealing the encryption key (argon2id scheme)
//! - Offline guessing of the password from a stolen blob (argon2id scheme)
//!
//! We do NOT defend against:
//! - Compromised client device / keylogger
//! - Tampering with the blob beyond what padding validation detects

pub mod cipher;
pub mod key;

pub use cipher::{decrypt, encrypt, IV_LENGTH};
pub use key::{
    derive_access_credential, derive_encryption_key, derive_keys, generate_salt, AccessCredential,
    Argon2Params, EncryptionKey, KdfParams, KeyMaterial, KEY_LENGTH,
};
