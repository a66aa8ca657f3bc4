use std::sync::Arc;

use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::crypto_provider::CryptoProvider;
use crate::stores::UserStore;
use crate::types::db::user;

/// Email and password verification
pub struct AuthenticationProvider {
    user_store: Arc<UserStore>,
    crypto_provider: Arc<CryptoProvider>,
}

impl AuthenticationProvider {
    pub fn new(user_store: Arc<UserStore>, crypto_provider: Arc<CryptoProvider>) -> Self {
        Self {
            user_store,
            crypto_provider,
        }
    }

    /// Verify credentials and return the account
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<user::Model, InternalError> {
        let Some(account) = self.user_store.find_by_email(email).await? else {
            return Err(CredentialError::InvalidCredentials.into());
        };

        if self.crypto_provider.verify_password(&account.password_hash, password).await? {
            Ok(account)
        } else {
            Err(CredentialError::InvalidCredentials.into())
        }
    }
}
