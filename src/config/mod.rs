mod app_settings;
mod bootstrap_settings;
mod config_spec;
mod database;
mod env_provider;
mod errors;
mod logging;
mod role_override_settings;
mod secret_manager;

pub use app_settings::AppSettings;
pub use bootstrap_settings::BootstrapSettings;
pub use config_spec::ConfigSpec;
pub use database::{DatabaseConnections, migrate_audit_database, migrate_main_database};
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::{LoggingConfig, LoggingError, init_logging};
pub use role_override_settings::RoleOverrideSettings;
pub use secret_manager::{SecretError, SecretManager};

#[cfg(test)]
pub use env_provider::MockEnvironment;
