use std::sync::Arc;

use crate::app_data::AppData;
use crate::audit::AuditLogger;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::providers::{AuthenticationProvider, CryptoProvider, RoleOverrideStep, RoleResolver, TokenProvider};
use crate::stores::{CacheEntity, NewProfile, QueryCache, RoleStore, UserStore};
use crate::types::dto::auth::{LoginResponse, RegisterRequest, RegisterResponse, WhoAmIResponse};
use crate::types::internal::auth::Principal;
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::Role;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Signup, login and session introspection workflows
pub struct LoginCoordinator {
    user_store: Arc<UserStore>,
    role_store: Arc<RoleStore>,
    query_cache: Arc<QueryCache>,
    crypto_provider: Arc<CryptoProvider>,
    token_provider: Arc<TokenProvider>,
    authentication_provider: Arc<AuthenticationProvider>,
    role_override: RoleOverrideStep,
    role_resolver: RoleResolver,
    audit_logger: Arc<AuditLogger>,
}

impl LoginCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            user_store: app_data.user_store.clone(),
            role_store: app_data.role_store.clone(),
            query_cache: app_data.query_cache.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
            token_provider: app_data.token_provider.clone(),
            authentication_provider: app_data.authentication_provider.clone(),
            role_override: app_data.role_override.clone(),
            role_resolver: app_data.role_resolver,
            audit_logger: app_data.audit_logger.clone(),
        }
    }

    /// Create an account with a profile and a grant for the chosen role
    pub async fn register(&self, ctx: &RequestContext, request: RegisterRequest) -> Result<RegisterResponse, InternalError> {
        let email = request.email.trim().to_lowercase();
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(InternalError::invalid("email", "must be a valid email address"));
        }
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(InternalError::invalid(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        if request.full_name.trim().is_empty() {
            return Err(InternalError::invalid("full_name", "must not be empty"));
        }

        let password_hash = self.crypto_provider.hash_password(&request.password).await?;
        let profile = NewProfile {
            full_name: request.full_name.trim().to_string(),
            usn: request.usn,
            department: request.department,
            phone: request.phone,
        };
        let account = self.user_store.create_user(&email, password_hash, profile).await?;
        self.role_store.add_grant(&account.id, request.role).await?;
        self.query_cache.invalidate_entity(CacheEntity::RoleGrants);

        tracing::info!(user_id = %account.id, role = %request.role, "User registered");
        if let Err(audit_err) = self.audit_logger.log_user_registered(ctx, &account.id, request.role).await {
            tracing::error!("Failed to log user registration: {:?}", audit_err);
        }

        Ok(RegisterResponse {
            user_id: account.id,
            email: account.email,
            role: request.role,
        })
    }

    /// Verify credentials, resolve the landing role and issue a token
    ///
    /// 1. Verify credentials (failure is audited; no role resolution happens)
    /// 2. Load grants in creation order
    /// 3. Run the role override step (audited when it applies)
    /// 4. Resolve the requested role (mismatches are audited)
    /// 5. Issue a JWT carrying the active role and effective grants
    pub async fn login(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
        requested_role: Role,
    ) -> Result<LoginResponse, InternalError> {
        let account = match self.authentication_provider.verify_credentials(email, password).await {
            Ok(account) => account,
            Err(err) => {
                if let Err(audit_err) = self.audit_logger.log_login_failure(ctx, email, "invalid_credentials").await {
                    tracing::error!("Failed to log login failure: {:?}", audit_err);
                }
                return Err(err);
            }
        };

        let grants = self.role_store.grants_for(&account.id).await?;
        let principal = Principal::new(account.id, account.email, grants);

        let outcome = self.role_override.apply(&principal);
        if let Some(applied) = &outcome.applied {
            tracing::warn!(user_id = %principal.user_id, pattern = %applied.matched_pattern, "Role override applied");
            if let Err(audit_err) = self
                .audit_logger
                .log_role_override_applied(ctx, &principal.user_id, applied)
                .await
            {
                tracing::error!("Failed to log role override: {:?}", audit_err);
            }
        }

        let resolution = self.role_resolver.resolve(&outcome.grants, requested_role);
        if resolution.mismatch {
            tracing::info!(
                user_id = %principal.user_id,
                requested = %requested_role,
                destination = %resolution.destination,
                "Requested role not granted; redirecting"
            );
            if let Err(audit_err) = self
                .audit_logger
                .log_role_mismatch(
                    ctx,
                    &principal.user_id,
                    requested_role,
                    resolution.destination,
                    resolution.fallback_applied,
                )
                .await
            {
                tracing::error!("Failed to log role mismatch: {:?}", audit_err);
            }
        }

        let effective = self.role_resolver.effective_grants(&outcome.grants);
        let (access_token, claims) = self.token_provider.generate_jwt(
            &principal.user_id,
            &principal.email,
            resolution.destination,
            &effective,
        )?;

        if let Err(audit_err) = self
            .audit_logger
            .log_login_success(ctx, &principal.user_id, requested_role, resolution.destination)
            .await
        {
            tracing::error!("Failed to log login success: {:?}", audit_err);
        }

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.token_provider.expiration_seconds(),
            user_id: principal.user_id,
            active_role: resolution.destination,
            roles: claims.roles,
            dashboard_path: resolution.destination.dashboard_path(),
            mismatch: resolution.mismatch,
            fallback_applied: resolution.fallback_applied,
            notice: resolution.notice(requested_role),
        })
    }

    /// Describe the session behind an authenticated context
    pub fn whoami(&self, ctx: &RequestContext) -> Result<WhoAmIResponse, InternalError> {
        ctx.require_principal()?;
        let claims = ctx
            .claims
            .as_ref()
            .ok_or(CredentialError::Unauthenticated)?;

        Ok(WhoAmIResponse {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
            active_role: claims.active_role,
            roles: claims.roles.clone(),
            expires_at: claims.exp,
        })
    }

    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppSettings, RoleOverrideSettings};
    use crate::test::utils::{setup_test_app_data, setup_test_app_data_with};

    fn register_request(email: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: "password-123".to_string(),
            full_name: "Test Person".to_string(),
            role,
            usn: None,
            department: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login_with_granted_role() {
        let app_data = setup_test_app_data().await;
        let coordinator = LoginCoordinator::new(app_data);
        let ctx = RequestContext::new();

        coordinator
            .register(&ctx, register_request("Mentor@Uni.edu", Role::Mentor))
            .await
            .unwrap();
        let response = coordinator
            .login(&ctx, "mentor@uni.edu", "password-123", Role::Mentor)
            .await
            .unwrap();

        assert_eq!(response.active_role, Role::Mentor);
        assert_eq!(response.roles, vec![Role::Mentor]);
        assert_eq!(response.dashboard_path, "/dashboard/mentor");
        assert!(!response.mismatch);
        assert!(response.notice.is_none());
        assert_eq!(response.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_mismatch_redirects_to_first_grant() {
        let app_data = setup_test_app_data().await;
        let coordinator = LoginCoordinator::new(app_data.clone());
        let ctx = RequestContext::new();
        let registered = coordinator
            .register(&ctx, register_request("s@uni.edu", Role::Student))
            .await
            .unwrap();
        app_data.role_store.add_grant(&registered.user_id, Role::Mentor).await.unwrap();

        let response = coordinator.login(&ctx, "s@uni.edu", "password-123", Role::Admin).await.unwrap();

        assert_eq!(response.active_role, Role::Student);
        assert!(response.mismatch);
        assert_eq!(
            response.notice.as_deref(),
            Some("You don't have Admin access. Redirecting to your Student dashboard.")
        );

        let mismatches = app_data.audit_store.recent_events("role_mismatch", 10).await.unwrap();
        assert_eq!(mismatches.len(), 1);
    }

    #[tokio::test]
    async fn test_account_without_grants_falls_back_to_student() {
        let app_data = setup_test_app_data().await;
        let coordinator = LoginCoordinator::new(app_data.clone());
        let ctx = RequestContext::new();
        let registered = coordinator
            .register(&ctx, register_request("legacy@uni.edu", Role::Student))
            .await
            .unwrap();
        app_data.role_store.remove_grant(&registered.user_id, Role::Student).await.unwrap();

        let response = coordinator.login(&ctx, "legacy@uni.edu", "password-123", Role::Student).await.unwrap();

        assert_eq!(response.active_role, Role::Student);
        assert!(response.fallback_applied);
        assert!(!response.mismatch);
        assert_eq!(response.roles, vec![Role::Student]);
    }

    #[tokio::test]
    async fn test_wrong_password_is_audited_and_rejected() {
        let app_data = setup_test_app_data().await;
        let coordinator = LoginCoordinator::new(app_data.clone());
        let ctx = RequestContext::new();
        coordinator
            .register(&ctx, register_request("s@uni.edu", Role::Student))
            .await
            .unwrap();

        let result = coordinator.login(&ctx, "s@uni.edu", "wrong-password", Role::Student).await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));
        let failures = app_data.audit_store.recent_events("login_failure", 10).await.unwrap();
        assert_eq!(failures.len(), 1);
        assert!(!failures[0].data.contains("s@uni.edu"));
    }

    #[tokio::test]
    async fn test_allowlisted_identity_gets_every_role() {
        let settings = AppSettings::defaults().with_role_override(RoleOverrideSettings::allowlist(["ops@uni.edu"]));
        let app_data = setup_test_app_data_with(settings).await;
        let coordinator = LoginCoordinator::new(app_data.clone());
        let ctx = RequestContext::new();
        coordinator
            .register(&ctx, register_request("ops@uni.edu", Role::Student))
            .await
            .unwrap();

        let response = coordinator.login(&ctx, "ops@uni.edu", "password-123", Role::Admin).await.unwrap();

        assert_eq!(response.active_role, Role::Admin);
        assert_eq!(response.roles, vec![Role::Student, Role::Mentor, Role::Admin]);
        assert!(!response.mismatch);
        let overrides = app_data.audit_store.recent_events("role_override_applied", 10).await.unwrap();
        assert_eq!(overrides.len(), 1);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let coordinator = LoginCoordinator::new(setup_test_app_data().await);
        let ctx = RequestContext::new();

        let mut short = register_request("a@uni.edu", Role::Student);
        short.password = "short".to_string();
        assert!(coordinator.register(&ctx, short).await.is_err());

        assert!(coordinator.register(&ctx, register_request("not-an-email", Role::Student)).await.is_err());

        coordinator.register(&ctx, register_request("a@uni.edu", Role::Student)).await.unwrap();
        assert!(matches!(
            coordinator.register(&ctx, register_request("A@uni.edu", Role::Mentor)).await,
            Err(InternalError::Credential(CredentialError::DuplicateEmail(_)))
        ));
    }

    #[tokio::test]
    async fn test_whoami_reads_claims() {
        let app_data = setup_test_app_data().await;
        let coordinator = LoginCoordinator::new(app_data.clone());
        let ctx = RequestContext::new();
        coordinator
            .register(&ctx, register_request("s@uni.edu", Role::Student))
            .await
            .unwrap();
        let login = coordinator.login(&ctx, "s@uni.edu", "password-123", Role::Student).await.unwrap();

        let claims = app_data.token_provider.validate_jwt(&login.access_token).unwrap();
        let authed = RequestContext::new().with_auth(claims);
        let whoami = coordinator.whoami(&authed).unwrap();

        assert_eq!(whoami.user_id, login.user_id);
        assert_eq!(whoami.active_role, Role::Student);
        assert!(coordinator.whoami(&RequestContext::new()).is_err());
    }
}
