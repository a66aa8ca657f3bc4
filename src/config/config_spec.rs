use std::sync::Arc;

use crate::config::EnvironmentProvider;
use crate::config::errors::ConfigError;

/// Configuration specification: environment override, then default
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider>,
    env_override: Option<String>,
    default_value: Option<String>,
    required: bool,
    min_length: Option<usize>,
    validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider>) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            required: false,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("unknown_setting")
    }

    /// Load the value: environment variable first, then the default
    ///
    /// Returns an empty string for an optional setting with no value.
    pub fn load(&self) -> Result<String, ConfigError> {
        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(env_var) {
                self.validate_value(&value, env_var)?;
                return Ok(value);
            }
        }

        if let Some(default) = &self.default_value {
            self.validate_value(default, self.setting_name())?;
            return Ok(default.clone());
        }

        if self.required {
            return Err(ConfigError::InvalidSetting {
                setting_name: self.setting_name().to_string(),
                reason: "Required setting has no value from any source".to_string(),
            });
        }

        Ok(String::new())
    }

    /// Validate a setting value according to the ConfigSpec rules
    pub fn validate_value(&self, value: &str, setting_name: &str) -> Result<(), ConfigError> {
        if let Some(min_len) = self.min_length {
            if value.len() < min_len {
                return Err(ConfigError::InvalidSetting {
                    setting_name: setting_name.to_string(),
                    reason: format!("Value must be at least {} characters long", min_len),
                });
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ConfigError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason,
            })?;
        }

        Ok(())
    }
}

/// Type parsing utilities for configuration values
impl ConfigSpec {
    pub fn parse_bool(value: &str, setting_name: &str) -> Result<bool, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
            "false" | "0" | "no" | "off" | "disabled" => Ok(false),
            _ => Err(ConfigError::ParseError {
                setting_name: setting_name.to_string(),
                error: format!(
                    "Expected boolean value, got '{}'. Valid values: true/false, 1/0, yes/no, on/off, enabled/disabled",
                    value
                ),
            }),
        }
    }

    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ConfigError> {
        let port = value.trim().parse::<u16>().map_err(|e| ConfigError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected port number (1-65535), got '{}': {}", value, e),
        })?;

        if port == 0 {
            return Err(ConfigError::InvalidSetting {
                setting_name: setting_name.to_string(),
                reason: "Port number must be between 1 and 65535".to_string(),
            });
        }

        Ok(port)
    }

    pub fn parse_u64(value: &str, setting_name: &str) -> Result<u64, ConfigError> {
        value.trim().parse::<u64>().map_err(|e| ConfigError::ParseError {
            setting_name: setting_name.to_string(),
            error: format!("Expected non-negative integer, got '{}': {}", value, e),
        })
    }

    /// Split a comma-separated list, dropping blank entries
    pub fn parse_list(value: &str) -> Vec<String> {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate_host_address(value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Err("Host address cannot be empty".to_string());
        }
        if value.chars().any(char::is_whitespace) {
            return Err("Host address cannot contain whitespace characters".to_string());
        }
        Ok(())
    }

    pub fn validate_port_range(value: &str, min: u16, max: u16) -> Result<(), String> {
        let parsed = value
            .parse::<u16>()
            .map_err(|_| format!("Expected port number between {} and {}", min, max))?;

        if parsed < min || parsed > max {
            return Err(format!("Port {} is outside valid range {}-{}", parsed, min, max));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    fn spec(env: MockEnvironment) -> ConfigSpec {
        ConfigSpec::new(Arc::new(env))
    }

    #[test]
    fn test_env_value_wins_over_default() {
        let value = spec(MockEnvironment::empty().with_var("PORT", "8080"))
            .env_override("PORT")
            .default_value("3000")
            .load()
            .unwrap();
        assert_eq!(value, "8080");
    }

    #[test]
    fn test_default_used_when_env_missing() {
        let value = spec(MockEnvironment::empty())
            .env_override("PORT")
            .default_value("3000")
            .load()
            .unwrap();
        assert_eq!(value, "3000");
    }

    #[test]
    fn test_required_without_value_fails() {
        let result = spec(MockEnvironment::empty())
            .env_override("JWT_SECRET")
            .required(true)
            .load();

        match result {
            Err(ConfigError::InvalidSetting { setting_name, .. }) => assert_eq!(setting_name, "JWT_SECRET"),
            other => panic!("Expected InvalidSetting, got: {:?}", other),
        }
    }

    #[test]
    fn test_min_length_enforced() {
        let result = spec(MockEnvironment::empty().with_var("PASSWORD_PEPPER", "short"))
            .env_override("PASSWORD_PEPPER")
            .min_length(16)
            .load();

        match result {
            Err(ConfigError::InvalidSetting { reason, .. }) => {
                assert!(reason.contains("at least 16 characters"))
            }
            other => panic!("Expected InvalidSetting, got: {:?}", other),
        }
    }

    #[test]
    fn test_validator_runs_on_env_value() {
        let result = spec(MockEnvironment::empty().with_var("HOST", "bad host"))
            .env_override("HOST")
            .validator(ConfigSpec::validate_host_address)
            .load();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(ConfigSpec::parse_bool("Yes", "X").unwrap());
        assert!(!ConfigSpec::parse_bool("off", "X").unwrap());
        assert!(ConfigSpec::parse_bool("maybe", "X").is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(ConfigSpec::parse_port("8080", "PORT").unwrap(), 8080);
        assert!(ConfigSpec::parse_port("0", "PORT").is_err());
        assert!(ConfigSpec::parse_port("70000", "PORT").is_err());
    }

    #[test]
    fn test_parse_list_drops_blanks() {
        assert_eq!(
            ConfigSpec::parse_list(" a@x.edu, ,*@demo.edu ,"),
            vec!["a@x.edu".to_string(), "*@demo.edu".to_string()]
        );
        assert!(ConfigSpec::parse_list("").is_empty());
    }
}
