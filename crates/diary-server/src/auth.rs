//! Shared-secret check for the `Authorization` header.

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

/// True when `presented` equals the configured secret.
///
/// The comparison is constant-time in the content of the secret. A missing
/// header never authorizes, and neither does an empty configured secret.
pub fn authorize(presented: Option<&str>, secret: &SecretString) -> bool {
    let Some(presented) = presented else {
        return false;
    };
    let expected = secret.expose_secret().as_bytes();
    if expected.is_empty() {
        return false;
    }
    presented.as_bytes().ct_eq(expected).into()
}
