use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::{EnvironmentProvider, SystemEnvironment};

const JWT_SECRET_MIN_LENGTH: usize = 32;
const PEPPER_MIN_LENGTH: usize = 16;

/// Custom error type for secret-related failures
#[derive(Debug)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

/// Centralized manager for application secrets
pub struct SecretManager {
    jwt_secret: String,
    pepper: String,
}

impl SecretManager {
    /// Load and validate secrets from the system environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider>) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env_provider.clone(), "JWT_SECRET")?;
        let pepper = Self::load_secret(env_provider, "PASSWORD_PEPPER")?;
        Self::new(jwt_secret, pepper)
    }

    /// Build from explicit values, applying the same length rules
    pub fn new(jwt_secret: impl Into<String>, pepper: impl Into<String>) -> Result<Self, SecretError> {
        let jwt_secret = jwt_secret.into();
        let pepper = pepper.into();

        if jwt_secret.len() < JWT_SECRET_MIN_LENGTH {
            return Err(SecretError::invalid_length("JWT_SECRET", JWT_SECRET_MIN_LENGTH, jwt_secret.len()));
        }
        if pepper.len() < PEPPER_MIN_LENGTH {
            return Err(SecretError::invalid_length("PASSWORD_PEPPER", PEPPER_MIN_LENGTH, pepper.len()));
        }

        Ok(Self { jwt_secret, pepper })
    }

    fn load_secret(env_provider: Arc<dyn EnvironmentProvider>, name: &str) -> Result<String, SecretError> {
        let value = ConfigSpec::new(env_provider)
            .env_override(name)
            .load()
            .map_err(|_| SecretError::missing(name))?;
        if value.is_empty() {
            return Err(SecretError::missing(name));
        }
        Ok(value)
    }

    /// Get the JWT secret
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Get the pepper for password hashing
    pub fn pepper(&self) -> &str {
        &self.pepper
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"<redacted>")
            .field("pepper", &"<redacted>")
            .finish()
    }
}
