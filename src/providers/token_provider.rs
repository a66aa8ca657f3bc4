use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::types::internal::auth::Claims;
use crate::types::internal::role::{Role, RoleGrants};

/// Issues and validates HS256 session tokens
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    jwt_expiration_minutes: i64,
}

impl TokenProvider {
    pub fn new(secret_manager: Arc<SecretManager>, jwt_expiration_minutes: i64) -> Self {
        Self {
            secret_manager,
            jwt_expiration_minutes,
        }
    }

    pub fn expiration_seconds(&self) -> i64 {
        self.jwt_expiration_minutes * 60
    }

    /// Generate a JWT for a resolved session
    ///
    /// Returns the encoded token together with the claims it carries.
    pub fn generate_jwt(
        &self,
        user_id: &str,
        email: &str,
        active_role: Role,
        grants: &RoleGrants,
    ) -> Result<(String, Claims), InternalError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            active_role,
            roles: grants.to_vec(),
            exp: now + self.expiration_seconds(),
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let token = self.encode_claims(&claims)?;
        Ok((token, claims))
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, InternalError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))
    }

    /// Validate a JWT and return its claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => InternalError::from(CredentialError::ExpiredToken),
            _ => {
                tracing::debug!("JWT rejected: {}", e);
                InternalError::from(CredentialError::invalid_token("invalid signature or malformed"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(secret: &str) -> TokenProvider {
        let secrets = SecretManager::new(secret, "test-pepper-for-unit-tests").unwrap();
        TokenProvider::new(Arc::new(secrets), 60)
    }

    const SECRET: &str = "test-jwt-secret-at-least-32-characters!!";

    #[test]
    fn test_generate_and_validate() {
        let tokens = provider(SECRET);
        let grants = RoleGrants::from_ordered([Role::Mentor, Role::Admin]);

        let (token, issued) = tokens.generate_jwt("user-1", "m@uni.edu", Role::Admin, &grants).unwrap();
        let claims = tokens.validate_jwt(&token).unwrap();

        assert_eq!(claims, issued);
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.active_role, Role::Admin);
        assert_eq!(claims.roles, vec![Role::Mentor, Role::Admin]);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let grants = RoleGrants::from_ordered([Role::Student]);
        let (token, _) = provider(SECRET)
            .generate_jwt("user-1", "s@uni.edu", Role::Student, &grants)
            .unwrap();

        let other = provider("another-jwt-secret-at-least-32-characters");
        assert!(matches!(
            other.validate_jwt(&token),
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = provider(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".to_string(),
            email: "s@uni.edu".to_string(),
            active_role: Role::Student,
            roles: vec![Role::Student],
            exp: now - 3600,
            iat: now - 7200,
            jti: "jti-1".to_string(),
        };
        let token = tokens.encode_claims(&claims).unwrap();

        assert!(matches!(
            tokens.validate_jwt(&token),
            Err(InternalError::Credential(CredentialError::ExpiredToken))
        ));
    }

    #[test]
    fn test_malformed_token_rejected() {
        assert!(matches!(
            provider(SECRET).validate_jwt("not.a.jwt"),
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }
}
