use thiserror::Error;

pub mod audit;
pub mod credential;
pub mod database;
pub mod phase;
pub mod record;
pub mod role;

pub use audit::AuditError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use phase::PhaseError;
pub use record::RecordError;
pub use role::RoleError;

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors (database, parse, crypto) are shared; domain errors
/// live in their own enums. Not exposed via API: endpoints convert to
/// `AuthError` or `AppError`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Audit(#[from] AuditError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn transaction(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Transaction {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> InternalError {
        InternalError::Record(RecordError::NotFound {
            entity,
            id: id.into(),
        })
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> InternalError {
        InternalError::Record(RecordError::Invalid {
            field,
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_helper_keeps_operation_name() {
        let err = InternalError::database("list_phases", sea_orm::DbErr::Custom("boom".into()));
        assert!(err.to_string().contains("list_phases"));
        assert!(matches!(err, InternalError::Database(DatabaseError::Operation { .. })));
    }

    #[test]
    fn test_domain_errors_convert_with_question_mark() {
        fn fails() -> Result<(), InternalError> {
            Err(PhaseError::PhaseNotFound("p1".to_string()))?
        }
        assert!(matches!(fails(), Err(InternalError::Phase(PhaseError::PhaseNotFound(_)))));
    }

    #[test]
    fn test_record_helpers() {
        let err = InternalError::not_found("group", "G-1");
        assert_eq!(err.to_string(), "group not found: G-1");
        let err = InternalError::invalid("work_done", "must not be empty");
        assert_eq!(err.to_string(), "Invalid work_done: must not be empty");
    }
}
