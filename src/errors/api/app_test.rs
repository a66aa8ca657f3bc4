#[cfg(test)]
mod tests {
    use crate::errors::AppError;
    use crate::errors::internal::{CredentialError, InternalError, PhaseError, RecordError, RoleError};
    use crate::types::internal::role::Role;
    use sea_orm::DbErr;

    #[test]
    fn test_phases_unavailable_is_retryable_503() {
        let err = AppError::from(InternalError::Phase(PhaseError::PhasesUnavailable {
            reason: "status query failed".to_string(),
        }));

        assert!(matches!(err, AppError::ServiceUnavailable(_)));
        assert_eq!(err.status_code(), 503);
        assert!(err.is_retryable());
        assert!(!err.message().contains("status query failed"));
    }

    #[test]
    fn test_database_error_is_hidden() {
        let err = AppError::from(InternalError::database("list_groups", DbErr::Custom("disk full".into())));

        assert_eq!(err.status_code(), 500);
        assert!(!err.is_retryable());
        assert_eq!(err.message(), "An internal error occurred");
    }

    #[test]
    fn test_missing_principal_is_unauthorized() {
        let err = AppError::from(InternalError::Credential(CredentialError::Unauthenticated));
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_missing_role_is_forbidden() {
        let err = AppError::from(InternalError::Role(RoleError::RoleRequired { required: Role::Admin }));
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.message(), "Role required: admin");
    }

    #[test]
    fn test_record_errors_map_to_client_statuses() {
        let not_found = AppError::from(InternalError::not_found("group", "G-9"));
        assert_eq!(not_found.status_code(), 404);

        let conflict = AppError::from(InternalError::Record(RecordError::Conflict {
            entity: "group",
            message: "G-1".to_string(),
        }));
        assert_eq!(conflict.status_code(), 409);

        let invalid = AppError::from(InternalError::invalid("title", "must not be empty"));
        assert_eq!(invalid.status_code(), 400);
    }

    #[test]
    fn test_locked_phase_is_conflict_and_foreign_group_is_forbidden() {
        let locked = AppError::from(InternalError::Phase(PhaseError::PhaseLocked { phase_number: 3 }));
        assert_eq!(locked.status_code(), 409);

        let approved = AppError::from(InternalError::Phase(PhaseError::AlreadyApproved { phase_number: 1 }));
        assert_eq!(approved.status_code(), 409);
        assert_eq!(approved.message(), "Phase 1 is already approved");

        let foreign = AppError::from(InternalError::Phase(PhaseError::NotGroupMentor {
            group_id: "g1".to_string(),
        }));
        assert_eq!(foreign.status_code(), 403);
    }
}
