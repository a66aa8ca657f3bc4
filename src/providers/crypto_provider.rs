use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::Rng;

use crate::config::SecretManager;
use crate::errors::InternalError;

const GENERATED_PASSWORD_LENGTH: usize = 20;
const PASSWORD_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                  abcdefghijklmnopqrstuvwxyz\
                                  0123456789\
                                  !@#$%^&*()_+-=[]{}|;:,.<>?";

/// Password hashing and generation
///
/// Hashes are Argon2id with the deployment pepper as the Argon2 secret.
/// Hashing runs on the blocking pool so request tasks are not stalled.
pub struct CryptoProvider {
    secret_manager: Arc<SecretManager>,
}

impl CryptoProvider {
    pub fn new(secret_manager: Arc<SecretManager>) -> Self {
        Self { secret_manager }
    }

    fn argon2(pepper: &[u8]) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(pepper, Algorithm::Argon2id, Version::V0x13, Params::default())
            .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let pepper = self.secret_manager.pepper().to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut rand_core::OsRng);
            Self::argon2(pepper.as_bytes())?
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| InternalError::crypto("password_hash", e.to_string()))
        })
        .await
        .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?
    }

    /// Returns false for a wrong password or an unparseable stored hash
    pub async fn verify_password(&self, stored_hash: &str, password: &str) -> Result<bool, InternalError> {
        let pepper = self.secret_manager.pepper().to_string();
        let stored_hash = stored_hash.to_string();
        let password = password.to_string();

        tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&stored_hash) else {
                tracing::warn!("Stored password hash could not be parsed");
                return Ok(false);
            };
            Ok(Self::argon2(pepper.as_bytes())?
                .verify_password(password.as_bytes(), &parsed)
                .is_ok())
        })
        .await
        .map_err(|e| InternalError::crypto("password_verify", e.to_string()))?
    }

    /// 20 random characters from letters, digits and symbols
    pub fn generate_secure_password(&self) -> String {
        let mut rng = rand::rng();
        (0..GENERATED_PASSWORD_LENGTH)
            .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
            .collect()
    }
}
