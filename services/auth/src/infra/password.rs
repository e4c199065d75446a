use argon2::Argon2;
use argon2::PasswordHasher as _;
use argon2::PasswordVerifier as _;
use argon2::password_hash::{PasswordHash, SaltString, rand_core::OsRng};

use crate::domain::repository::PasswordHasher;
use crate::error::AuthServiceError;

/// Argon2id adapter behind the opaque hashing port. Default parameters;
/// hashes embed their own parameters so they can be tuned without migration.
#[derive(Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, AuthServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("argon2 hash: {e}")))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthServiceError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            AuthServiceError::Internal(anyhow::anyhow!("stored password hash unparsable: {e}"))
        })?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
