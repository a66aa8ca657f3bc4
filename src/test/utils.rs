// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use chrono::Utc;
use migration::{AuditMigrator, Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use crate::app_data::AppData;
use crate::config::{AppSettings, DatabaseConnections, SecretManager};
use crate::stores::AuditStore;
use crate::types::db::{group_phase_status, profile, project_group, user};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters!!";
pub const TEST_PEPPER: &str = "test-pepper-for-unit-tests";

/// In-memory application database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// In-memory audit database with migrations applied
pub async fn setup_test_audit_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");

    AuditMigrator::up(&db, None)
        .await
        .expect("Failed to run audit migrations");

    db
}

pub async fn setup_test_audit_store() -> Arc<AuditStore> {
    Arc::new(AuditStore::new(setup_test_audit_db().await))
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    Arc::new(SecretManager::new(TEST_JWT_SECRET, TEST_PEPPER).expect("Test secrets are valid"))
}

/// Full application data over fresh in-memory databases
pub async fn setup_test_app_data_with(settings: AppSettings) -> Arc<AppData> {
    let connections = DatabaseConnections {
        main: setup_test_db().await,
        audit: setup_test_audit_db().await,
    };
    Arc::new(
        AppData::init(connections, settings, test_secret_manager())
            .await
            .expect("Failed to initialize test AppData"),
    )
}

pub async fn setup_test_app_data() -> Arc<AppData> {
    setup_test_app_data_with(AppSettings::defaults()).await
}

/// Insert a bare account with a profile named after the email; returns the user id
pub async fn create_test_user(db: &DatabaseConnection, email: &str) -> String {
    let now = Utc::now().timestamp();
    let user_id = Uuid::new_v4().to_string();

    user::ActiveModel {
        id: Set(user_id.clone()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert test user");

    profile::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id.clone()),
        full_name: Set(email.split('@').next().unwrap_or(email).to_string()),
        email: Set(email.to_string()),
        usn: Set(None),
        phone: Set(None),
        department: Set(None),
        avatar_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert test profile");

    user_id
}

/// Insert a group with the given code; returns its row id
pub async fn create_test_group(db: &DatabaseConnection, code: &str) -> String {
    let now = Utc::now().timestamp();
    let id = Uuid::new_v4().to_string();

    project_group::ActiveModel {
        id: Set(id.clone()),
        group_id: Set(code.to_string()),
        project_title: Set(format!("Project {}", code)),
        project_description: Set(None),
        status: Set(Some("active".to_string())),
        mentor_id: Set(None),
        department_id: Set(None),
        academic_year_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to insert test group");

    id
}

/// Insert a raw status row, bypassing the write path (duplicates allowed)
pub async fn insert_status_row(
    db: &DatabaseConnection,
    id: &str,
    group_id: &str,
    phase_id: &str,
    status: Option<&str>,
    updated_at: i64,
) {
    group_phase_status::ActiveModel {
        id: Set(id.to_string()),
        group_id: Set(group_id.to_string()),
        phase_id: Set(phase_id.to_string()),
        status: Set(status.map(str::to_string)),
        submission_date: Set(None),
        mentor_remarks: Set(None),
        approved_at: Set(None),
        approved_by: Set(None),
        created_at: Set(updated_at),
        updated_at: Set(updated_at),
    }
    .insert(db)
    .await
    .expect("Failed to insert status row");
}
