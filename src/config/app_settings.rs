use std::sync::Arc;
use std::time::Duration;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ConfigError;
use crate::config::{EnvironmentProvider, RoleOverrideSettings, SystemEnvironment};

/// Runtime settings for the application layer
#[derive(Debug, Clone)]
pub struct AppSettings {
    query_cache_ttl: Duration,
    jwt_expiration_minutes: i64,
    role_override: RoleOverrideSettings,
}

impl AppSettings {
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider>) -> Result<Self, ConfigError> {
        let ttl_value = ConfigSpec::new(env_provider.clone())
            .env_override("QUERY_CACHE_TTL_SECONDS")
            .default_value("30")
            .load()?;
        let query_cache_ttl = Duration::from_secs(ConfigSpec::parse_u64(&ttl_value, "QUERY_CACHE_TTL_SECONDS")?);

        let jwt_value = ConfigSpec::new(env_provider.clone())
            .env_override("JWT_EXPIRATION_MINUTES")
            .default_value("60")
            .validator(|value| match value.trim().parse::<u32>() {
                Ok(minutes) if minutes > 0 => Ok(()),
                _ => Err("Expected a positive number of minutes".to_string()),
            })
            .load()?;
        let jwt_expiration_minutes = ConfigSpec::parse_u64(&jwt_value, "JWT_EXPIRATION_MINUTES")? as i64;

        let role_override = RoleOverrideSettings::from_env_provider(env_provider)?;

        Ok(Self {
            query_cache_ttl,
            jwt_expiration_minutes,
            role_override,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    /// Settings with every default applied and the role override disabled
    pub fn defaults() -> Self {
        Self {
            query_cache_ttl: Duration::from_secs(30),
            jwt_expiration_minutes: 60,
            role_override: RoleOverrideSettings::disabled(),
        }
    }

    pub fn with_role_override(mut self, role_override: RoleOverrideSettings) -> Self {
        self.role_override = role_override;
        self
    }

    pub fn query_cache_ttl(&self) -> Duration {
        self.query_cache_ttl
    }

    pub fn jwt_expiration_minutes(&self) -> i64 {
        self.jwt_expiration_minutes
    }

    pub fn role_override(&self) -> &RoleOverrideSettings {
        &self.role_override
    }
}
