use migration::{AuditMigrator, Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::config::BootstrapSettings;
use crate::errors::InternalError;

/// Connections to the main and audit databases
pub struct DatabaseConnections {
    pub main: DatabaseConnection,
    pub audit: DatabaseConnection,
}

impl DatabaseConnections {
    /// Connect to both databases. Does NOT run migrations.
    pub async fn connect(bootstrap_settings: &BootstrapSettings) -> Result<Self, InternalError> {
        let main = Database::connect(bootstrap_settings.database_url())
            .await
            .map_err(|e| InternalError::database("connect_database", e))?;
        tracing::debug!("Connected to database: {}", bootstrap_settings.database_url());

        let audit = Database::connect(bootstrap_settings.audit_database_url())
            .await
            .map_err(|e| InternalError::database("connect_audit_database", e))?;
        tracing::debug!("Connected to audit database: {}", bootstrap_settings.audit_database_url());

        Ok(Self { main, audit })
    }

    pub async fn migrate(&self) -> Result<(), InternalError> {
        migrate_main_database(&self.main).await?;
        migrate_audit_database(&self.audit).await?;
        Ok(())
    }
}

/// Run pending migrations on the main database
pub async fn migrate_main_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    Migrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_migrations", e))?;

    tracing::debug!("Database migrations completed");
    Ok(())
}

/// Run pending migrations on the audit database
pub async fn migrate_audit_database(audit_db: &DatabaseConnection) -> Result<(), InternalError> {
    AuditMigrator::up(audit_db, None)
        .await
        .map_err(|e| InternalError::database("run_audit_migrations", e))?;

    tracing::debug!("Audit database migrations completed");
    Ok(())
}
