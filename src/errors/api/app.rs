use crate::errors::internal::{CredentialError, InternalError, PhaseError, RecordError, RoleError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for student, mentor and admin endpoints
#[derive(Object, Debug)]
pub struct ApiErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Whether repeating the same request may succeed
    pub retryable: bool,
}

/// Error types for role-scoped endpoints
#[derive(ApiResponse, Debug)]
pub enum AppError {
    /// Request failed validation
    #[oai(status = 400)]
    BadRequest(Json<ApiErrorResponse>),

    /// Missing, invalid or expired token
    #[oai(status = 401)]
    Unauthorized(Json<ApiErrorResponse>),

    /// Principal lacks the role or ownership required
    #[oai(status = 403)]
    Forbidden(Json<ApiErrorResponse>),

    /// Record not found
    #[oai(status = 404)]
    NotFound(Json<ApiErrorResponse>),

    /// Record already exists or conflicts with current state
    #[oai(status = 409)]
    Conflict(Json<ApiErrorResponse>),

    /// Backing data temporarily unavailable
    #[oai(status = 503)]
    ServiceUnavailable(Json<ApiErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16, retryable: bool) -> Json<ApiErrorResponse> {
    Json(ApiErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
        retryable,
    })
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(body("bad_request", message, 400, false))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized(body("unauthorized", message, 401, false))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden(body("forbidden", message, 403, false))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(body("not_found", message, 404, false))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(body("conflict", message, 409, false))
    }

    /// Phase data could not be loaded; the client shows an error state and may retry
    pub fn phases_unavailable() -> Self {
        AppError::ServiceUnavailable(body(
            "phases_unavailable",
            "Project phases are temporarily unavailable",
            503,
            true,
        ))
    }

    fn internal_server_error() -> Self {
        AppError::InternalError(body("internal_error", "An internal error occurred", 500, false))
    }

    /// Convert InternalError to AppError
    ///
    /// Infrastructure details are logged, never returned to the client.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) | InternalError::Parse { .. } | InternalError::Crypto { .. } => {
                tracing::error!("Infrastructure error: {}", err);
                Self::internal_server_error()
            }
            InternalError::Audit(_) => {
                tracing::error!("Audit error: {}", err);
                Self::internal_server_error()
            }

            InternalError::Credential(CredentialError::ExpiredToken) => Self::unauthorized("JWT has expired"),
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                Self::unauthorized("Invalid email or password")
            }
            InternalError::Credential(CredentialError::Unauthenticated)
            | InternalError::Credential(CredentialError::InvalidToken { .. }) => {
                tracing::debug!("Rejected request: {}", err);
                Self::unauthorized("Authentication required")
            }
            InternalError::Credential(CredentialError::UserNotFound(_)) => Self::not_found(err.to_string()),
            InternalError::Credential(CredentialError::DuplicateEmail(_)) => {
                Self::conflict("Email is already registered")
            }

            InternalError::Role(RoleError::RoleRequired { .. }) => Self::forbidden(err.to_string()),
            InternalError::Role(RoleError::UnknownRole(_))
            | InternalError::Role(RoleError::NotAMentor(_))
            | InternalError::Role(RoleError::InvalidOverridePattern { .. }) => Self::bad_request(err.to_string()),

            InternalError::Phase(PhaseError::PhasesUnavailable { reason }) => {
                tracing::warn!("Phase data unavailable: {}", reason);
                Self::phases_unavailable()
            }
            InternalError::Phase(PhaseError::PhaseNotFound(_))
            | InternalError::Phase(PhaseError::NoGroupAssigned { .. }) => Self::not_found(err.to_string()),
            InternalError::Phase(PhaseError::PhaseLocked { .. })
            | InternalError::Phase(PhaseError::AlreadyApproved { .. }) => Self::conflict(err.to_string()),
            InternalError::Phase(PhaseError::NotGroupMentor { .. }) => Self::forbidden(err.to_string()),

            InternalError::Record(RecordError::NotFound { .. }) => Self::not_found(err.to_string()),
            InternalError::Record(RecordError::Conflict { .. }) => Self::conflict(err.to_string()),
            InternalError::Record(RecordError::Invalid { .. }) => Self::bad_request(err.to_string()),
        }
    }

    fn response(&self) -> &ApiErrorResponse {
        match self {
            AppError::BadRequest(json)
            | AppError::Unauthorized(json)
            | AppError::Forbidden(json)
            | AppError::NotFound(json)
            | AppError::Conflict(json)
            | AppError::ServiceUnavailable(json)
            | AppError::InternalError(json) => &json.0,
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }

    pub fn is_retryable(&self) -> bool {
        self.response().retryable
    }
}

impl From<InternalError> for AppError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
