//! Argon2 password hashing.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use scribe_core::ports::{AuthError, PasswordService};

/// Argon2id with the crate's default parameters.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
    /// Hash of a random password, verified against when the username is unknown.
    decoy: Option<String>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        let argon2 = Argon2::default();
        let salt = SaltString::generate(&mut OsRng);
        let decoy = match argon2.hash_password(salt.as_str().as_bytes(), &salt) {
            Ok(hash) => Some(hash.to_string()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to prepare decoy password hash");
                None
            }
        };

        Self { argon2, decoy }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    fn verify_decoy(&self, password: &str) {
        if let Some(decoy) = &self.decoy {
            let _ = self.verify(password, decoy);
        }
    }
}
