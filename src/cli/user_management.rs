use std::sync::Arc;

use crate::app_data::AppData;
use crate::coordinators::LoginCoordinator;
use crate::errors::InternalError;
use crate::errors::internal::CredentialError;
use crate::stores::CacheEntity;
use crate::types::dto::auth::RegisterRequest;
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::Role;

/// Create an account from the command line
///
/// Prints a generated password when none is supplied; it is shown once.
pub async fn create_user(
    app_data: &Arc<AppData>,
    email: &str,
    full_name: &str,
    role: Role,
    password: Option<String>,
) -> Result<String, InternalError> {
    let ctx = RequestContext::for_cli("create-user");
    let generated = password.is_none();
    let password = password.unwrap_or_else(|| app_data.crypto_provider.generate_secure_password());

    let coordinator = LoginCoordinator::new(app_data.clone());
    let response = coordinator
        .register(
            &ctx,
            RegisterRequest {
                email: email.to_string(),
                password: password.clone(),
                full_name: full_name.to_string(),
                role,
                usn: None,
                department: None,
                phone: None,
            },
        )
        .await?;

    println!("✓ Created {} account {} ({})", role, response.email, response.user_id);
    if generated {
        println!("  Generated password: {}", password);
        println!("  Store it now; it will not be shown again.");
    }

    Ok(response.user_id)
}

/// Grant or revoke a role for the account with `email`
///
/// Returns whether the stored grants changed.
pub async fn change_role(app_data: &AppData, email: &str, role: Role, grant: bool) -> Result<bool, InternalError> {
    let ctx = RequestContext::for_cli(if grant { "grant-role" } else { "revoke-role" });
    let user = app_data
        .user_store
        .find_by_email(email)
        .await?
        .ok_or_else(|| CredentialError::UserNotFound(email.to_string()))?;

    let changed = if grant {
        app_data.role_store.add_grant(&user.id, role).await?
    } else {
        app_data.role_store.remove_grant(&user.id, role).await?
    };

    if changed {
        app_data.query_cache.invalidate_entity(CacheEntity::RoleGrants);
        if let Err(audit_err) = app_data.audit_logger.log_role_changed(&ctx, &user.id, role, grant).await {
            tracing::error!("Failed to log role change: {:?}", audit_err);
        }
    }

    let grants = app_data.role_store.grants_for(&user.id).await?;
    match (changed, grant) {
        (true, true) => println!("✓ Granted {} to {}", role, email),
        (true, false) => println!("✓ Revoked {} from {}", role, email),
        (false, true) => println!("{} already holds {}", email, role),
        (false, false) => println!("{} does not hold {}", email, role),
    }
    println!("  Current roles: {}", grants);

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_create_user_with_generated_password() {
        let app_data = setup_test_app_data().await;

        let user_id = create_user(&app_data, "ops@uni.edu", "Ops Team", Role::Admin, None)
            .await
            .unwrap();

        let grants = app_data.role_store.grants_for(&user_id).await.unwrap();
        assert_eq!(grants.as_slice(), &[Role::Admin]);
    }

    #[tokio::test]
    async fn test_grant_and_revoke_role() {
        let app_data = setup_test_app_data().await;
        create_user(
            &app_data,
            "mentor@uni.edu",
            "Mentor",
            Role::Student,
            Some("a-long-password".to_string()),
        )
        .await
        .unwrap();

        assert!(change_role(&app_data, "mentor@uni.edu", Role::Mentor, true).await.unwrap());
        assert!(!change_role(&app_data, "mentor@uni.edu", Role::Mentor, true).await.unwrap());
        assert!(change_role(&app_data, "mentor@uni.edu", Role::Student, false).await.unwrap());

        let user = app_data.user_store.find_by_email("mentor@uni.edu").await.unwrap().unwrap();
        let grants = app_data.role_store.grants_for(&user.id).await.unwrap();
        assert_eq!(grants.as_slice(), &[Role::Mentor]);

        let events = app_data.audit_store.recent_events("role_revoked", 10).await.unwrap();
        assert_eq!(events.len(), 1);
    }

    #[tokio::test]
    async fn test_change_role_for_unknown_email() {
        let app_data = setup_test_app_data().await;
        assert!(matches!(
            change_role(&app_data, "nobody@uni.edu", Role::Mentor, true).await,
            Err(InternalError::Credential(CredentialError::UserNotFound(_)))
        ));
    }
}
