#[cfg(test)]
mod tests {
    use crate::errors::AuthError;
    use crate::errors::internal::{CredentialError, InternalError, RoleError};
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let internal_err = InternalError::database("get_user", DbErr::RecordNotFound("test".to_string()));
        let auth_err = AuthError::from_internal_error(internal_err);

        assert!(matches!(auth_err, AuthError::InternalError(_)));
        assert_eq!(auth_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_crypto_error_converts_to_internal_server_error() {
        let auth_err = AuthError::from_internal_error(InternalError::crypto("argon2_init", "invalid secret"));
        assert_eq!(auth_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_invalid_credentials_converts_correctly() {
        let auth_err = AuthError::from(InternalError::Credential(CredentialError::InvalidCredentials));
        assert!(matches!(auth_err, AuthError::InvalidCredentials(_)));
        assert_eq!(auth_err.message(), "Invalid email or password");
    }

    #[test]
    fn test_duplicate_email_does_not_echo_address() {
        let auth_err = AuthError::from(InternalError::Credential(CredentialError::DuplicateEmail(
            "a@b.edu".to_string(),
        )));
        assert!(matches!(auth_err, AuthError::DuplicateEmail(_)));
        assert!(!auth_err.message().contains("a@b.edu"));
    }

    #[test]
    fn test_token_errors_convert_correctly() {
        let invalid = AuthError::from(InternalError::Credential(CredentialError::invalid_token("bad signature")));
        assert!(matches!(invalid, AuthError::InvalidToken(_)));

        let expired = AuthError::from(InternalError::Credential(CredentialError::ExpiredToken));
        assert!(matches!(expired, AuthError::ExpiredToken(_)));
    }

    #[test]
    fn test_unknown_role_is_a_bad_request() {
        let auth_err = AuthError::from(InternalError::Role(RoleError::UnknownRole("dean".to_string())));
        assert!(matches!(auth_err, AuthError::InvalidRequest(_)));
        assert_eq!(auth_err.message(), "Unknown role: dean");
    }
}
