use crate::errors::internal::{CredentialError, InternalError, RecordError, RoleError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid email or password
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Invalid or malformed JWT
    #[oai(status = 401)]
    InvalidToken(Json<AuthErrorResponse>),

    /// JWT has expired
    #[oai(status = 401)]
    ExpiredToken(Json<AuthErrorResponse>),

    /// Email already registered
    #[oai(status = 409)]
    DuplicateEmail(Json<AuthErrorResponse>),

    /// Request body failed validation
    #[oai(status = 400)]
    InvalidRequest(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<AuthErrorResponse> {
    Json(AuthErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl AuthError {
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(body("invalid_credentials", "Invalid email or password", 401))
    }

    pub fn invalid_token() -> Self {
        AuthError::InvalidToken(body("invalid_token", "Invalid or malformed JWT", 401))
    }

    pub fn expired_token() -> Self {
        AuthError::ExpiredToken(body("expired_token", "JWT has expired", 401))
    }

    pub fn duplicate_email() -> Self {
        AuthError::DuplicateEmail(body("duplicate_email", "Email is already registered", 409))
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        AuthError::InvalidRequest(body("invalid_request", message, 400))
    }

    /// Convert InternalError to AuthError
    ///
    /// Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) => {
                tracing::error!("Database error in auth operation: {}", err);
                Self::internal_server_error()
            }
            InternalError::Parse { value_type, .. } => {
                tracing::error!("Parse error for {}: {}", value_type, err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }

            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::Unauthenticated) => Self::invalid_token(),
            InternalError::Credential(CredentialError::DuplicateEmail(email)) => {
                tracing::warn!("Duplicate registration attempt: {}", email);
                Self::duplicate_email()
            }
            InternalError::Credential(CredentialError::InvalidToken { reason }) => {
                tracing::debug!("Invalid token: {}", reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken) => Self::expired_token(),
            InternalError::Credential(CredentialError::UserNotFound(_)) => {
                // A token for a deleted account
                Self::invalid_token()
            }
            InternalError::Role(RoleError::UnknownRole(role)) => {
                Self::invalid_request(format!("Unknown role: {}", role))
            }
            InternalError::Record(RecordError::Invalid { .. }) => Self::invalid_request(err.to_string()),

            _ => {
                tracing::error!("Unexpected error in auth operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    fn internal_server_error() -> Self {
        AuthError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::InvalidToken(json)
            | AuthError::ExpiredToken(json)
            | AuthError::DuplicateEmail(json)
            | AuthError::InvalidRequest(json)
            | AuthError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
