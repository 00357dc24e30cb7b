//! Password Hashing
//! Mission: One-way salted hashing for stored credentials

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password with a fresh salt.
pub fn hash_password(plaintext: &str) -> Result<String> {
    hash(plaintext, DEFAULT_COST).context("Failed to hash password")
}

/// Verify a plaintext password against a stored bcrypt digest.
pub fn verify_password(plaintext: &str, digest: &str) -> Result<bool> {
    verify(plaintext, digest).context("Failed to verify password")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();

        // Fresh salt every time
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_roundtrip() {
        let digest = hash_password("correct horse").unwrap();

        assert!(verify_password("correct horse", &digest).unwrap());
        assert!(!verify_password("wrong horse", &digest).unwrap());
    }

    #[test]
    fn test_verify_garbage_digest_errors() {
        let result = verify_password("anything", "not-a-bcrypt-digest");
        assert!(result.is_err());
    }
}
