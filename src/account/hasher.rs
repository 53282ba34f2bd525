//! One-way password hashing.
//!
//! Passwords are hashed with Argon2id and a per-call random salt, encoded as
//! a PHC string. Verification re-derives the digest from the parameters
//! embedded in the stored string and compares in constant time, so the
//! plaintext never needs to be stored and timing does not leak where a
//! mismatch occurs.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HashError {
    /// The hashing subsystem itself failed. Not triggered by any valid
    /// UTF-8 input of reasonable length.
    #[error("failed to hash password")]
    Hashing,
    /// The stored hash is not a structurally valid PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Hash a plaintext password into a PHC string.
///
/// Two calls with the same input produce different strings (random salt);
/// both verify against the original plaintext.
///
/// # Errors
/// Returns [`HashError::Hashing`] if the Argon2id computation fails.
pub fn hash(plaintext: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|_| HashError::Hashing)?
        .to_string();
    Ok(hash)
}

/// Verify a plaintext password against a stored PHC string.
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
/// Returns [`HashError::MalformedHash`] if `stored_hash` cannot be parsed.
pub fn verify(plaintext: &str, stored_hash: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| HashError::MalformedHash)?;
    Ok(Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let phc = hash("Passw0rd!").unwrap();
        assert!(verify("Passw0rd!", &phc).unwrap());
        assert!(!verify("passw0rd!", &phc).unwrap());
    }

    #[test]
    fn same_input_yields_different_hashes() {
        let first = hash("Passw0rd!").unwrap();
        let second = hash("Passw0rd!").unwrap();
        assert_ne!(first, second);
        assert!(verify("Passw0rd!", &first).unwrap());
        assert!(verify("Passw0rd!", &second).unwrap());
    }

    #[test]
    fn hash_is_not_the_plaintext() {
        let phc = hash("Passw0rd!").unwrap();
        assert_ne!(phc, "Passw0rd!");
        assert!(phc.starts_with("$argon2"));
    }

    #[test]
    fn unicode_input_is_supported() {
        let phc = hash("Pässw0rd€!").unwrap();
        assert!(verify("Pässw0rd€!", &phc).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(matches!(
            verify("Passw0rd!", "not-a-phc-string"),
            Err(HashError::MalformedHash)
        ));
    }
}
