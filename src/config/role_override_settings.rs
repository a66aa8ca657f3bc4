use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ConfigError;
use crate::config::EnvironmentProvider;

/// Operator switch for granting every role to allowlisted identities
///
/// Off unless `ROLE_OVERRIDE_ENABLED` is set. The allowlist holds identity
/// patterns (see `IdentityPattern`) separated by commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleOverrideSettings {
    enabled: bool,
    allowlist: Vec<String>,
}

impl RoleOverrideSettings {
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider>) -> Result<Self, ConfigError> {
        let enabled_value = ConfigSpec::new(env_provider.clone())
            .env_override("ROLE_OVERRIDE_ENABLED")
            .default_value("false")
            .load()?;
        let enabled = ConfigSpec::parse_bool(&enabled_value, "ROLE_OVERRIDE_ENABLED")?;

        let allowlist_value = ConfigSpec::new(env_provider)
            .env_override("ROLE_OVERRIDE_ALLOWLIST")
            .load()?;
        let allowlist = ConfigSpec::parse_list(&allowlist_value);

        if enabled && allowlist.is_empty() {
            tracing::warn!("ROLE_OVERRIDE_ENABLED is set but ROLE_OVERRIDE_ALLOWLIST is empty; no identity will match");
        }

        Ok(Self { enabled, allowlist })
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            allowlist: Vec::new(),
        }
    }

    pub fn allowlist(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            enabled: true,
            allowlist: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn patterns(&self) -> &[String] {
        &self.allowlist
    }
}
