//! Configuration validation for the EduFin chat service.
//!
//! Ensures all required values are present and within valid ranges before
//! the service starts.

use thiserror::Error;

use crate::config::{ChatConfig, Config, ObservabilityConfig, ProviderConfig, ServerConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.server.validate() {
            errors.push(e);
        }
        if let Err(e) = self.provider.validate() {
            errors.push(e);
        }
        if let Err(e) = self.chat.validate() {
            errors.push(e);
        }
        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.bind.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "server.bind".into(),
            });
        }
        if self.port == 0 {
            return Err(ValidationError::InvalidValue {
                field: "server.port".into(),
                reason: "must be between 1 and 65535".into(),
            });
        }
        Ok(())
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingField {
                field: "provider.model".into(),
            });
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidValue {
                field: "provider.base_url".into(),
                reason: "must be an http(s) URL".into(),
            });
        }
        if self.max_tokens == 0 {
            return Err(ValidationError::InvalidValue {
                field: "provider.max_tokens".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidValue {
                field: "provider.temperature".into(),
                reason: "must be between 0.0 and 2.0".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "provider.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Validate for ChatConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.history_window == 0 {
            return Err(ValidationError::InvalidValue {
                field: "chat.history_window".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ValidationError::InvalidValue {
                    field: "observability.log_level".into(),
                    reason: format!("unknown level '{other}'"),
                });
            }
        }
        match self.log_format.as_str() {
            "json" | "pretty" => Ok(()),
            other => Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("unknown format '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidValue { field, .. }) if field == "server.port"
        ));
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut config = Config::default();
        config.provider.model = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingField { field }) if field == "provider.model"
        ));
    }

    #[test]
    fn test_non_http_base_url_rejected() {
        let mut config = Config::default();
        config.provider.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let mut config = Config::default();
        config.provider.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_history_window_rejected() {
        let mut config = Config::default();
        config.chat.history_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_multiple_errors_aggregated() {
        let mut config = Config::default();
        config.server.port = 0;
        config.observability.log_level = "loud".into();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::Multiple(errors)) if errors.len() == 2
        ));
    }
}
