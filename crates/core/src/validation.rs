//! Configuration validation support

use config::ConfigError;
use serde::{Deserialize, Serialize};

/// Trait for validating configuration values
pub trait ValidateConfig: Serialize + for<'de> Deserialize<'de> {
    /// Validate the configuration
    ///
    /// Returns Ok(()) if valid, or an error describing what's wrong
    fn validate(&self) -> Result<(), ConfigError>;

    /// Validate a change to one top-level option
    ///
    /// Operators change one option at a time, so the change is applied to a
    /// serialized copy of the current configuration and the result is
    /// validated as a whole. An empty `option` replaces the whole
    /// configuration. Returns the updated configuration.
    fn validate_update(&self, option: &str, value: &serde_json::Value) -> Result<Self, ConfigError> {
        let mut current_value = serde_json::to_value(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        if option.is_empty() {
            current_value = value.clone();
        } else {
            let Some(obj) = current_value.as_object_mut() else {
                return Err(ConfigError::Message(format!(
                    "Cannot set '{option}' on a non-object configuration"
                )));
            };
            if !obj.contains_key(option) {
                return Err(ConfigError::Message(format!("Unknown option '{option}'")));
            }
            obj.insert(option.to_string(), value.clone());
        }

        let updated: Self = serde_json::from_value(current_value)
            .map_err(|e| ConfigError::Message(format!("Invalid config after update: {e}")))?;

        updated.validate()?;
        Ok(updated)
    }
}

/// Common validation helpers
pub mod validators {
    use config::ConfigError;
    use regex::Regex;
    use std::sync::LazyLock;

    static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email pattern is valid")
    });

    /// Validate that a string is not empty
    pub fn validate_not_empty(value: &str, field: &str) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::Message(format!("{field} cannot be empty")));
        }
        Ok(())
    }

    /// Validate email format: one `@` and a dotted domain
    pub fn validate_email(email: &str) -> Result<(), ConfigError> {
        if !EMAIL_RE.is_match(email) {
            return Err(ConfigError::Message(format!(
                "Invalid email address: {email}"
            )));
        }
        Ok(())
    }

    /// Validate an ACME server keyword or directory URL
    pub fn validate_acme_server(server: &str) -> Result<(), ConfigError> {
        crate::resolve(server)
            .map(|_| ())
            .map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::validators::*;

    #[test]
    fn test_email_validation() {
        assert!(validate_email("someone@example.com").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());
        assert!(validate_email("sdlkfj@gmail").is_err());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.example.com").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("space in@example.com").is_err());
    }

    #[test]
    fn test_not_empty() {
        assert!(validate_not_empty("x", "field").is_ok());
        let err = validate_not_empty("  ", "Email").unwrap_err();
        assert_eq!(err.to_string(), "Email cannot be empty");
    }

    #[test]
    fn test_acme_server_validation() {
        assert!(validate_acme_server("letsencrypt").is_ok());
        assert!(validate_acme_server("https://acme.com/dir").is_ok());
        assert!(validate_acme_server("http://acme.com/dir").is_err());
    }
}
