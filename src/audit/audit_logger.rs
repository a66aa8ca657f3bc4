use std::sync::Arc;

use crate::audit::AuditBuilder;
use crate::errors::InternalError;
use crate::providers::role_override::AppliedOverride;
use crate::stores::AuditStore;
use crate::types::internal::audit::EventType;
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::Role;

/// Writes the audit trail for authentication, role and review actions
///
/// Keeps actor (from the context) and target separate on every event.
pub struct AuditLogger {
    pub audit_store: Arc<AuditStore>,
}

impl AuditLogger {
    pub fn new(audit_store: Arc<AuditStore>) -> Self {
        Self { audit_store }
    }

    /// Create an AuditBuilder for custom audit events
    pub fn builder(&self, event_type: impl Into<EventType>) -> AuditBuilder {
        AuditBuilder::new(self.audit_store.clone(), event_type)
    }

    pub async fn log_login_success(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        requested_role: Role,
        active_role: Role,
    ) -> Result<(), InternalError> {
        self.builder(EventType::LoginSuccess)
            .with_context(ctx)
            .actor(user_id)
            .target(user_id)
            .add_field("requested_role", requested_role)
            .add_field("active_role", active_role)
            .write()
            .await
    }

    /// Failed login; the email is hashed so the attempt can be correlated
    pub async fn log_login_failure(
        &self,
        ctx: &RequestContext,
        email: &str,
        reason: &str,
    ) -> Result<(), InternalError> {
        self.builder(EventType::LoginFailure)
            .with_context(ctx)
            .add_sensitive("email", email)
            .add_field("reason", reason)
            .write()
            .await
    }

    pub async fn log_user_registered(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        role: Role,
    ) -> Result<(), InternalError> {
        self.builder(EventType::UserRegistered)
            .with_context(ctx)
            .target(user_id)
            .add_field("role", role)
            .write()
            .await
    }

    pub async fn log_role_mismatch(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        requested_role: Role,
        destination: Role,
        fallback_applied: bool,
    ) -> Result<(), InternalError> {
        self.builder(EventType::RoleMismatch)
            .with_context(ctx)
            .actor(user_id)
            .target(user_id)
            .add_field("requested_role", requested_role)
            .add_field("destination", destination)
            .add_field("fallback_applied", fallback_applied)
            .write()
            .await
    }

    pub async fn log_role_override_applied(
        &self,
        ctx: &RequestContext,
        user_id: &str,
        applied: &AppliedOverride,
    ) -> Result<(), InternalError> {
        self.builder(EventType::RoleOverrideApplied)
            .with_context(ctx)
            .actor(user_id)
            .target(user_id)
            .add_field("policy", applied.policy)
            .add_field("matched_pattern", &applied.matched_pattern)
            .add_field("original_grants", applied.original_grants.to_vec())
            .write()
            .await
    }

    pub async fn log_role_changed(
        &self,
        ctx: &RequestContext,
        target_user_id: &str,
        role: Role,
        granted: bool,
    ) -> Result<(), InternalError> {
        let event_type = if granted { EventType::RoleGranted } else { EventType::RoleRevoked };
        self.builder(event_type)
            .with_context(ctx)
            .target(target_user_id)
            .add_field("role", role)
            .write()
            .await
    }

    pub async fn log_phase_submitted(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        phase_id: &str,
    ) -> Result<(), InternalError> {
        self.builder(EventType::PhaseSubmitted)
            .with_context(ctx)
            .target(group_id)
            .add_field("phase_id", phase_id)
            .write()
            .await
    }

    pub async fn log_phase_approved(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        phase_id: &str,
        status_row_id: &str,
    ) -> Result<(), InternalError> {
        self.builder(EventType::PhaseApproved)
            .with_context(ctx)
            .target(group_id)
            .add_field("phase_id", phase_id)
            .add_field("status_row_id", status_row_id)
            .write()
            .await
    }

    pub async fn log_diary_reviewed(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        entry_id: &str,
    ) -> Result<(), InternalError> {
        self.builder(EventType::DiaryReviewed)
            .with_context(ctx)
            .target(group_id)
            .add_field("entry_id", entry_id)
            .write()
            .await
    }

    pub async fn log_mentor_assigned(
        &self,
        ctx: &RequestContext,
        group_id: &str,
        mentor_id: &str,
    ) -> Result<(), InternalError> {
        self.builder(EventType::MentorAssigned)
            .with_context(ctx)
            .target(group_id)
            .add_field("mentor_id", mentor_id)
            .write()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_audit_store;
    use crate::types::internal::role::RoleGrants;

    #[tokio::test]
    async fn test_login_failure_hashes_email() {
        let store = setup_test_audit_store().await;
        let logger = AuditLogger::new(store.clone());

        logger
            .log_login_failure(&RequestContext::new(), "student@uni.edu", "invalid_credentials")
            .await
            .unwrap();

        let events = store.recent_events("login_failure", 10).await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(!events[0].data.contains("student@uni.edu"));
        assert!(events[0].data.contains("sha256:"));
        assert!(events[0].data.contains("invalid_credentials"));
    }

    #[tokio::test]
    async fn test_override_event_records_original_grants() {
        let store = setup_test_audit_store().await;
        let logger = AuditLogger::new(store.clone());
        let applied = AppliedOverride {
            policy: "allowlist",
            matched_pattern: "*@demo.edu".to_string(),
            original_grants: RoleGrants::from_ordered([Role::Student]),
        };

        logger
            .log_role_override_applied(&RequestContext::new(), "user-1", &applied)
            .await
            .unwrap();

        let events = store.recent_events("role_override_applied", 10).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actor_id, "user-1");
        let data: serde_json::Value = serde_json::from_str(&events[0].data).unwrap();
        assert_eq!(data["policy"], "allowlist");
        assert_eq!(data["original_grants"], serde_json::json!(["student"]));
    }

    #[tokio::test]
    async fn test_role_change_event_types() {
        let store = setup_test_audit_store().await;
        let logger = AuditLogger::new(store.clone());
        let ctx = RequestContext::for_cli("grant-role");

        logger.log_role_changed(&ctx, "user-2", Role::Mentor, true).await.unwrap();
        logger.log_role_changed(&ctx, "user-2", Role::Mentor, false).await.unwrap();

        assert_eq!(store.recent_events("role_granted", 10).await.unwrap().len(), 1);
        assert_eq!(store.recent_events("role_revoked", 10).await.unwrap().len(), 1);
    }
}
