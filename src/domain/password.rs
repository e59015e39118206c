//! Password value object.
//!
//! Wraps the one-way hashing scheme behind a small domain type so every
//! credential in the crate flows through the same salting, hashing, and
//! constant-time verification path.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AuthError, AuthResult};

/// Digest of a user credential. Immutable, compared by value.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Never expose the digest in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plaintext credential with a fresh salt.
    ///
    /// The same plaintext yields a different digest on every call; the
    /// salt and parameters are embedded in the digest itself.
    ///
    /// # Errors
    /// Returns a validation error if the password is too short.
    pub fn new(plain_text: &str) -> AuthResult<Self> {
        if plain_text.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AuthError::internal(format!("Password hash failed: {}", e)))?;

        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap an existing digest loaded from the store.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Digest string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the digest string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plaintext credential against this digest.
    ///
    /// Argon2 verification is constant-time with respect to the digest;
    /// an unparseable stored digest simply fails verification.
    pub fn verify(&self, plain_text: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}
