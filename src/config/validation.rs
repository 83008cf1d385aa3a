//! Configuration validation.

use super::types::{AnalysisConfig, AppConfig, ModelConfig, ServerConfig};

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.server.validate();
        errors.extend(self.model.validate());
        errors.extend(self.analysis.validate());
        errors
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.host.trim().is_empty() {
            errors.push(ConfigError::new("server.host", "Host must not be empty"));
        }
        if self.port == 0 {
            errors.push(ConfigError::new("server.port", "Port must be non-zero"));
        }
        if self.connect_timeout_ms == 0 {
            errors.push(ConfigError::new(
                "server.connect_timeout_ms",
                "Connect timeout must be greater than 0",
            ));
        }
        if self.read_timeout_ms == 0 {
            errors.push(ConfigError::new(
                "server.read_timeout_ms",
                "Read timeout must be greater than 0",
            ));
        } else if self.read_timeout_ms < self.connect_timeout_ms {
            errors.push(ConfigError::new(
                "server.read_timeout_ms",
                format!(
                    "Read timeout ({} ms) is shorter than the connect timeout ({} ms)",
                    self.read_timeout_ms, self.connect_timeout_ms
                ),
            ));
        }
        errors
    }
}

impl Validatable for ModelConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.chat_model.trim().is_empty() {
            errors.push(ConfigError::new("model.chat_model", "Model name must not be empty"));
        }
        if self.analysis_model.trim().is_empty() {
            errors.push(ConfigError::new(
                "model.analysis_model",
                "Model name must not be empty",
            ));
        }
        errors
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(path) = &self.matrix_path {
            if !path.exists() {
                errors.push(ConfigError::new(
                    "analysis.matrix_path",
                    format!("Matrix file does not exist: {}", path.display()),
                ));
            }
        }
        if let Some(dir) = &self.prompts_dir {
            if !dir.is_dir() {
                errors.push(ConfigError::new(
                    "analysis.prompts_dir",
                    format!("Prompts directory does not exist: {}", dir.display()),
                ));
            }
        }
        if self
            .target_license
            .as_deref()
            .is_some_and(|license| license.trim().is_empty())
        {
            errors.push(ConfigError::new(
                "analysis.target_license",
                "License must not be empty when set",
            ));
        }
        errors
    }
}
