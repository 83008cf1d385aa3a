//! Configuration types for sbom-license-audit.

use crate::transport::TransportConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments override file settings (see [`AppConfig::merge`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Model server connection
    pub server: ServerConfig,
    /// Models used for chat and analysis
    pub model: ModelConfig,
    /// Analysis inputs and workspace layout
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Transport settings for the socket transport
    #[must_use]
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            connect_timeout: Duration::from_millis(self.server.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.server.read_timeout_ms),
        }
    }

    /// Workspace directory for a project
    #[must_use]
    pub fn workspace(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.analysis.output_dir)
    }

    /// Compatibility matrix path; defaults to `matrix.csv` in the workspace
    #[must_use]
    pub fn matrix_path(&self, project_root: &Path) -> PathBuf {
        self.analysis.matrix_path.clone().unwrap_or_else(|| {
            self.workspace(project_root)
                .join(super::defaults::DEFAULT_MATRIX_FILE)
        })
    }

    /// Licensing survey path inside the workspace
    #[must_use]
    pub fn survey_path(&self, project_root: &Path) -> PathBuf {
        self.workspace(project_root).join(&self.analysis.survey_file)
    }
}

/// Model server connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ServerConfig {
    /// Model server host
    pub host: String,
    /// Model server port
    pub port: u16,
    /// Bound on establishing a connection (milliseconds)
    pub connect_timeout_ms: u64,
    /// Bound on waiting for a reply (milliseconds)
    pub read_timeout_ms: u64,
}

/// Model selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ModelConfig {
    /// Endpoint argument forwarded to the model server
    pub endpoint: String,
    /// Model for the user-facing chat session
    pub chat_model: String,
    /// Model for the reasoning and categorization sessions
    pub analysis_model: String,
    /// Never contact the model server
    pub offline: bool,
}

/// Analysis inputs and workspace layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Compatibility matrix CSV (defaults to `matrix.csv` in the workspace)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_path: Option<PathBuf>,
    /// Workspace directory, relative to the project root
    pub output_dir: PathBuf,
    /// Directory with prompt template overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts_dir: Option<PathBuf>,
    /// Own license, overriding the licensing survey
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_license: Option<String>,
    /// Licensing survey file, relative to the workspace
    pub survey_file: PathBuf,
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for [`AppConfig`].
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the model server address
    pub fn server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config.server.host = host.into();
        self.config.server.port = port;
        self
    }

    /// Set both timeouts in milliseconds
    pub const fn timeouts(mut self, connect_ms: u64, read_ms: u64) -> Self {
        self.config.server.connect_timeout_ms = connect_ms;
        self.config.server.read_timeout_ms = read_ms;
        self
    }

    /// Set the chat model
    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.config.model.chat_model = model.into();
        self
    }

    /// Set the analysis model
    pub fn analysis_model(mut self, model: impl Into<String>) -> Self {
        self.config.model.analysis_model = model.into();
        self
    }

    /// Disable model access
    pub const fn offline(mut self, offline: bool) -> Self {
        self.config.model.offline = offline;
        self
    }

    /// Set the compatibility matrix path
    pub fn matrix_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.analysis.matrix_path = Some(path.into());
        self
    }

    /// Set the prompts directory
    pub fn prompts_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.analysis.prompts_dir = Some(path.into());
        self
    }

    /// Set the own license
    pub fn target_license(mut self, license: impl Into<String>) -> Self {
        self.config.analysis.target_license = Some(license.into());
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}
