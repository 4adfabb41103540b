use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// One-way password hashing (Argon2id).
///
/// Every call to [`hash`](Self::hash) draws a fresh random salt, so hashing
/// the same password twice yields distinct digests. Digests are PHC strings
/// carrying algorithm, parameters and salt next to the hash, which keeps
/// stored credentials verifiable across parameter upgrades.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Hasher with the library's default Argon2id parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - the hashing operation itself failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext password against a stored digest.
    ///
    /// A mismatch is `Ok(false)`, not an error; `Err` means the stored
    /// digest itself could not be used.
    ///
    /// # Errors
    /// * `VerificationFailed` - the stored digest is not a valid PHC string
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(digest).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid stored digest: {}", e))
        })?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "correct horse battery staple";

        let digest = hasher.hash(password).expect("hashing failed");

        assert!(hasher.verify(password, &digest).expect("verify failed"));
        assert!(!hasher
            .verify("wrong password", &digest)
            .expect("verify failed"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = PasswordHasher::new();
        let password = "swordfish";

        let first = hasher.hash(password).expect("hashing failed");
        let second = hasher.hash(password).expect("hashing failed");

        // Fresh salt per call; both digests still verify.
        assert_ne!(first, second);
        assert!(hasher.verify(password, &first).expect("verify failed"));
        assert!(hasher.verify(password, &second).expect("verify failed"));
    }

    #[test]
    fn test_verify_rejects_unparsable_digest() {
        let hasher = PasswordHasher::new();

        let result = hasher.verify("password", "not-a-phc-string");
        assert!(result.is_err());
    }
}
