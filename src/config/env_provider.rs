#[cfg(test)]
use std::collections::HashMap;

/// Trait for providing environment variable access
///
/// Lets settings be loaded from an injected source so tests never touch the
/// process environment.
pub trait EnvironmentProvider: Send + Sync {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production environment provider that reads from system environment
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Test environment provider with configurable variables
#[cfg(test)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvironment {
    pub fn new(vars: HashMap<String, String>) -> Self {
        Self { vars }
    }

    pub fn empty() -> Self {
        Self { vars: HashMap::new() }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_vars(mut self, vars: &[(&str, &str)]) -> Self {
        for (key, value) in vars {
            self.vars.insert(key.to_string(), value.to_string());
        }
        self
    }
}

#[cfg(test)]
impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_environment_provider() {
        let provider = SystemEnvironment;

        unsafe {
            std::env::set_var("PROJECTHUB_TEST_VAR_12345", "test_value");
        }

        assert_eq!(provider.get_var("PROJECTHUB_TEST_VAR_12345"), Some("test_value".to_string()));
        assert_eq!(provider.get_var("PROJECTHUB_NON_EXISTENT_98765"), None);

        unsafe {
            std::env::remove_var("PROJECTHUB_TEST_VAR_12345");
        }
    }

    #[test]
    fn test_mock_environment_provider() {
        let provider = MockEnvironment::empty()
            .with_var("TEST_KEY", "test_value")
            .with_vars(&[("KEY1", "value1"), ("KEY2", "value2")]);

        assert_eq!(provider.get_var("TEST_KEY"), Some("test_value".to_string()));
        assert_eq!(provider.get_var("KEY2"), Some("value2".to_string()));
        assert_eq!(provider.get_var("NON_EXISTENT"), None);
    }
}
