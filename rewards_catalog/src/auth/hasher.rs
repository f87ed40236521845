//! One-way password hashing.

use argon2::{
    Argon2, PasswordHasher as _, PasswordVerifier as _,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};

use super::errors::{AuthError, AuthResult};

/// Password hasher producing salted Argon2id digests.
///
/// A server-side pepper is appended to every password before hashing, so a
/// leaked database alone is not enough to mount an offline attack. The
/// pepper is immutable process-wide configuration.
#[derive(Clone)]
pub struct PasswordHasher {
    pepper: String,
}

impl PasswordHasher {
    /// Create a new password hasher with the given pepper.
    pub fn new(pepper: impl Into<String>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }

    /// Hash a password into a salted, algorithm-tagged PHC digest.
    ///
    /// # Errors
    ///
    /// * `AuthError::HashingFailed` - The hashing backend rejected the input
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let peppered = format!("{}{}", password, self.pepper);
        let salt = SaltString::generate(&mut OsRng);

        Ok(Argon2::default()
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    /// Verify a password against a stored digest.
    ///
    /// Never errors: a malformed or unsupported digest is a verification
    /// failure, not a fault. The comparison itself happens inside the
    /// argon2 backend and does not short-circuit on the first differing
    /// byte.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };

        let peppered = format!("{}{}", password, self.pepper);
        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed)
            .is_ok()
    }
}
