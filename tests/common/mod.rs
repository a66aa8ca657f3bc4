// Common test utilities for integration tests

use std::sync::Arc;

use migration::{AuditMigrator, Migrator, MigratorTrait};
use projecthub_backend::AppData;
use projecthub_backend::config::{AppSettings, DatabaseConnections, SecretManager};
use projecthub_backend::coordinators::LoginCoordinator;
use projecthub_backend::types::dto::auth::RegisterRequest;
use projecthub_backend::types::internal::auth::Claims;
use projecthub_backend::types::internal::context::RequestContext;
use projecthub_backend::types::internal::role::Role;
use sea_orm::{Database, DatabaseConnection};

pub const TEST_PASSWORD: &str = "integration-password";

async fn memory_db() -> DatabaseConnection {
    Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

/// Application data over fresh, migrated in-memory databases
pub async fn setup_app_data(settings: AppSettings) -> Arc<AppData> {
    let main = memory_db().await;
    Migrator::up(&main, None).await.expect("Failed to run migrations");
    let audit = memory_db().await;
    AuditMigrator::up(&audit, None)
        .await
        .expect("Failed to run audit migrations");

    let secret_manager = Arc::new(
        SecretManager::new("integration-jwt-secret-at-least-32-chars", "integration-pepper")
            .expect("Test secrets are valid"),
    );

    Arc::new(
        AppData::init(DatabaseConnections { main, audit }, settings, secret_manager)
            .await
            .expect("Failed to initialize AppData"),
    )
}

/// Register an account through the signup workflow; returns the user id
pub async fn register(app_data: &Arc<AppData>, email: &str, name: &str, role: Role) -> String {
    LoginCoordinator::new(app_data.clone())
        .register(
            &RequestContext::new(),
            RegisterRequest {
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
                full_name: name.to_string(),
                role,
                usn: None,
                department: None,
                phone: None,
            },
        )
        .await
        .expect("Registration failed")
        .user_id
}

/// Log in and turn the issued token into an authenticated context
pub async fn login_context(app_data: &Arc<AppData>, email: &str, requested_role: Role) -> RequestContext {
    let coordinator = LoginCoordinator::new(app_data.clone());
    let response = coordinator
        .login(&RequestContext::new(), email, TEST_PASSWORD, requested_role)
        .await
        .expect("Login failed");
    let claims: Claims = app_data
        .token_provider
        .validate_jwt(&response.access_token)
        .expect("Issued token must validate");
    RequestContext::new().with_auth(claims)
}
