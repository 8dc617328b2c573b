//! Key derivation.
//!
//! A password is turned into two independent secrets:
//! - an [`EncryptionKey`] that never leaves the client
//! - an [`AccessCredential`] that is sent to the server on every request
//!
//! Two schemes exist. `legacy-sha256` matches older deployments
//! (both values are the same unsalted SHA-256 digest) so existing journals
//! stay readable. `argon2id` stretches the password with a per-installation
//! salt and splits the result with HKDF labels, so a leaked credential says
//! nothing about the encryption key.

use argon2::Argon2;
use hkdf::Hkdf;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{DiaryError, Result};

/// Argon2id defaults for new installations.
///
/// - Memory: 64 MB (64 * 1024 KB)
/// - Iterations: 3
/// - Parallelism: 1
pub const ARGON2_MEMORY_KB: u32 = 64 * 1024;
pub const ARGON2_ITERATIONS: u32 = 3;
pub const ARGON2_PARALLELISM: u32 = 1;

/// Length of derived keys in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Length of freshly generated salts.
pub const SALT_LENGTH: usize = 16;

const ENCRYPTION_LABEL: &[u8] = b"diary/v1/encryption";
const ACCESS_LABEL: &[u8] = b"diary/v1/access";

/// Public key-derivation parameters for an installation.
///
/// Nothing in here is secret; the server hands it out before login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme")]
pub enum KdfParams {
    /// Unsalted SHA-256 of the password, used for both roles.
    #[serde(rename = "legacy-sha256")]
    LegacySha256,

    /// Argon2id master key split by HKDF-SHA256.
    #[serde(rename = "argon2id")]
    Argon2id(Argon2Params),
}

/// Argon2id work factor and salt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    #[serde(with = "salt_base64")]
    pub salt: Vec<u8>,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl KdfParams {
    /// Argon2id parameters with explicit salt and work factor.
    ///
    /// # Errors
    ///
    /// Returns `DiaryError::Crypto` if the salt is shorter than 16 bytes or
    /// Argon2 rejects the work factor.
    pub fn argon2id(
        salt: Vec<u8>,
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self> {
        let params = KdfParams::Argon2id(Argon2Params {
            salt,
            memory_kib,
            iterations,
            parallelism,
        });
        params.validate()?;
        Ok(params)
    }

    /// Argon2id with the default work factor and a fresh random salt.
    pub fn generate() -> Result<Self> {
        Self::argon2id(
            generate_salt()?,
            ARGON2_MEMORY_KB,
            ARGON2_ITERATIONS,
            ARGON2_PARALLELISM,
        )
    }

    /// Check that the parameters can be used for derivation.
    pub fn validate(&self) -> Result<()> {
        match self {
            KdfParams::LegacySha256 => Ok(()),
            KdfParams::Argon2id(params) => {
                if params.salt.len() < SALT_LENGTH {
                    return Err(DiaryError::Crypto(format!(
                        "Salt must be at least {} bytes",
                        SALT_LENGTH
                    )));
                }
                params.argon2().map(|_| ())
            }
        }
    }

    /// Short scheme name for logs and status output.
    pub fn scheme_name(&self) -> &'static str {
        match self {
            KdfParams::LegacySha256 => "legacy-sha256",
            KdfParams::Argon2id(_) => "argon2id",
        }
    }
}

impl Argon2Params {
    fn argon2(&self) -> Result<Argon2<'static>> {
        let params = argon2::Params::new(
            self.memory_kib,
            self.iterations,
            self.parallelism,
            Some(KEY_LENGTH),
        )
        .map_err(|e| DiaryError::Crypto(format!("Invalid Argon2 params: {}", e)))?;
        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }
}

/// Symmetric key for the journal cipher.
///
/// Key material is zeroized from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    key: [u8; KEY_LENGTH],
}

impl EncryptionKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Value presented in the `Authorization` header.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccessCredential {
    value: String,
}

impl AccessCredential {
    /// Wrap an already-derived credential string.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCredential")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Both secrets derived from one password.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    pub encryption: EncryptionKey,
    pub access: AccessCredential,
}

/// Derive the encryption key and the access credential in one pass.
///
/// Deterministic: the same password and parameters always yield the same
/// key material.
///
/// # Errors
///
/// Returns `DiaryError::Crypto` only when the parameters are invalid.
pub fn derive_keys(password: &str, params: &KdfParams) -> Result<KeyMaterial> {
    match params {
        KdfParams::LegacySha256 => {
            let digest: [u8; KEY_LENGTH] = Sha256::digest(password.as_bytes()).into();
            Ok(KeyMaterial {
                access: AccessCredential::new(hex::encode(digest)),
                encryption: EncryptionKey::from_bytes(digest),
            })
        }
        KdfParams::Argon2id(argon) => {
            params.validate()?;
            let mut master = [0u8; KEY_LENGTH];
            argon
                .argon2()?
                .hash_password_into(password.as_bytes(), &argon.salt, &mut master)
                .map_err(|e| DiaryError::Crypto(format!("Key derivation failed: {}", e)))?;

            let hkdf = Hkdf::<Sha256>::new(None, &master);
            master.zeroize();

            let mut encryption = [0u8; KEY_LENGTH];
            let mut access = [0u8; KEY_LENGTH];
            hkdf.expand(ENCRYPTION_LABEL, &mut encryption)
                .and_then(|_| hkdf.expand(ACCESS_LABEL, &mut access))
                .map_err(|e| DiaryError::Crypto(format!("HKDF expand failed: {}", e)))?;

            let material = KeyMaterial {
                encryption: EncryptionKey::from_bytes(encryption),
                access: AccessCredential::new(hex::encode(access)),
            };
            encryption.zeroize();
            access.zeroize();
            Ok(material)
        }
    }
}

/// Derive only the symmetric encryption key.
pub fn derive_encryption_key(password: &str, params: &KdfParams) -> Result<EncryptionKey> {
    Ok(derive_keys(password, params)?.encryption)
}

/// Derive only the access credential.
pub fn derive_access_credential(password: &str, params: &KdfParams) -> Result<AccessCredential> {
    Ok(derive_keys(password, params)?.access)
}

/// Generate a random salt for a new installation.
pub fn generate_salt() -> Result<Vec<u8>> {
    let mut salt = vec![0u8; SALT_LENGTH];
    getrandom::getrandom(&mut salt)
        .map_err(|e| DiaryError::Crypto(format!("Failed to generate salt: {}", e)))?;
    Ok(salt)
}

mod salt_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(salt: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(salt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.trim())
            .map_err(serde::de::Error::custom)
    }
}
