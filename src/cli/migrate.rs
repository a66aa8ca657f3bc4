use crate::config::{BootstrapSettings, DatabaseConnections};

/// Run database migrations for the main and audit databases
///
/// Connects without building AppData.
pub async fn run_migrations(bootstrap_settings: &BootstrapSettings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Running database migrations...");

    let connections = DatabaseConnections::connect(bootstrap_settings).await?;
    connections.migrate().await?;

    tracing::info!("All migrations completed successfully");
    println!("✓ Migrations applied");

    Ok(())
}
