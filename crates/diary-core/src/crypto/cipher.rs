//! AES-256-CBC blob encryption.
//!
//! A blob is `base64(IV ‖ ciphertext)` with a fresh 16-byte IV per call and
//! PKCS#7 padding. This is the layout existing journals were written in.

use aes::Aes256;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::key::EncryptionKey;
use crate::error::{DiaryError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// IV length in bytes (one AES block).
pub const IV_LENGTH: usize = 16;

const BLOCK_SIZE: usize = 16;

/// Encrypt `plaintext` into a transport-ready blob.
///
/// Output is non-deterministic: every call draws a new IV.
///
/// # Errors
///
/// Returns `DiaryError::Crypto` if the system random source is unavailable.
///
/// # Examples
///
/// ```
/// use diary_core::crypto::{decrypt, derive_encryption_key, encrypt, KdfParams};
///
/// let key = derive_encryption_key("p1", &KdfParams::LegacySha256).unwrap();
/// let blob = encrypt(&key, b"secret data").unwrap();
/// assert_eq!(decrypt(&key, &blob).unwrap(), b"secret data");
/// ```
pub fn encrypt(key: &EncryptionKey, plaintext: &[u8]) -> Result<String> {
    let mut iv = [0u8; IV_LENGTH];
    getrandom::getrandom(&mut iv)
        .map_err(|e| DiaryError::Crypto(format!("Failed to generate IV: {}", e)))?;
    encrypt_with_iv(key, &iv, plaintext)
}

fn encrypt_with_iv(key: &EncryptionKey, iv: &[u8; IV_LENGTH], plaintext: &[u8]) -> Result<String> {
    let ciphertext = Aes256CbcEnc::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| DiaryError::Crypto(format!("Failed to create cipher: {}", e)))?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut raw = Vec::with_capacity(IV_LENGTH + ciphertext.len());
    raw.extend_from_slice(iv);
    raw.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(raw))
}

/// Decrypt a blob produced by [`encrypt`].
///
/// # Errors
///
/// Returns `DiaryError::Decryption` if:
/// - The blob is not valid base64
/// - The blob is shorter than an IV plus one block, or misaligned
/// - The padding is invalid (wrong key or corrupted data)
pub fn decrypt(key: &EncryptionKey, blob: &str) -> Result<Vec<u8>> {
    let raw = STANDARD
        .decode(blob.trim())
        .map_err(|e| DiaryError::Decryption(format!("Blob is not valid base64: {}", e)))?;

    if raw.len() < IV_LENGTH + BLOCK_SIZE {
        return Err(DiaryError::Decryption(format!(
            "Blob is truncated ({} bytes)",
            raw.len()
        )));
    }

    let (iv, body) = raw.split_at(IV_LENGTH);
    if body.len() % BLOCK_SIZE != 0 {
        return Err(DiaryError::Decryption(
            "Ciphertext length is not a multiple of the block size".to_string(),
        ));
    }

    Aes256CbcDec::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| DiaryError::Crypto(format!("Failed to create cipher: {}", e)))?
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map_err(|_| {
            DiaryError::Decryption("Invalid padding (wrong password or corrupted data)".to_string())
        })
}
