//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::types::AppConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".sbom-license-audit.yaml",
    ".sbom-license-audit.yml",
    "sbom-license-audit.yaml",
    "sbom-license-audit.yml",
];

/// Directory name under the user config directory
const CONFIG_DIR_NAME: &str = "sbom-license-audit";

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/sbom-license-audit/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|path| path.exists()) {
        return Some(path.to_path_buf());
    }

    let candidates = [
        std::env::current_dir().ok(),
        find_git_root(),
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME)),
        dirs::home_dir(),
    ];

    candidates
        .iter()
        .flatten()
        .find_map(|dir| find_config_in_dir(dir))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    /// File not found
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// IO error reading file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override; used to layer
    /// command-line arguments over file config.
    pub fn merge(&mut self, other: &Self) {
        let defaults = Self::default();

        if other.server.host != defaults.server.host {
            self.server.host.clone_from(&other.server.host);
        }
        if other.server.port != defaults.server.port {
            self.server.port = other.server.port;
        }
        if other.server.connect_timeout_ms != defaults.server.connect_timeout_ms {
            self.server.connect_timeout_ms = other.server.connect_timeout_ms;
        }
        if other.server.read_timeout_ms != defaults.server.read_timeout_ms {
            self.server.read_timeout_ms = other.server.read_timeout_ms;
        }

        if other.model.endpoint != defaults.model.endpoint {
            self.model.endpoint.clone_from(&other.model.endpoint);
        }
        if other.model.chat_model != defaults.model.chat_model {
            self.model.chat_model.clone_from(&other.model.chat_model);
        }
        if other.model.analysis_model != defaults.model.analysis_model {
            self.model.analysis_model.clone_from(&other.model.analysis_model);
        }
        if other.model.offline {
            self.model.offline = true;
        }

        if other.analysis.matrix_path.is_some() {
            self.analysis.matrix_path.clone_from(&other.analysis.matrix_path);
        }
        if other.analysis.output_dir != defaults.analysis.output_dir {
            self.analysis.output_dir.clone_from(&other.analysis.output_dir);
        }
        if other.analysis.prompts_dir.is_some() {
            self.analysis.prompts_dir.clone_from(&other.analysis.prompts_dir);
        }
        if other.analysis.target_license.is_some() {
            self.analysis
                .target_license
                .clone_from(&other.analysis.target_license);
        }
        if other.analysis.survey_file != defaults.analysis.survey_file {
            self.analysis.survey_file.clone_from(&other.analysis.survey_file);
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# sbom-license-audit configuration
# Place this file at .sbom-license-audit.yaml in your project root
# or in ~/.config/sbom-license-audit/. CLI arguments override file settings.

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".sbom-license-audit.yaml");
        std::fs::write(&config_path, "server:\n  port: 8000\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        let yaml = r"
server:
  host: models.internal
  read_timeout_ms: 60000
model:
  analysis_model: llama3
analysis:
  target_license: Apache-2.0
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.server.host, "models.internal");
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.read_timeout_ms, 60_000);
        assert_eq!(config.model.analysis_model, "llama3");
        assert_eq!(config.model.chat_model, "gpt-4o");
        assert_eq!(config.analysis.target_license.as_deref(), Some("Apache-2.0"));
    }

    #[test]
    fn test_load_empty_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "\n").unwrap();
        assert_eq!(load_config_file(&config_path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_file_errors() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));

        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        std::fs::write(&config_path, "server: 12\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::builder()
            .server("models.internal", 7000)
            .chat_model("claude")
            .build();
        let overrides = AppConfig::builder()
            .analysis_model("llama3")
            .target_license("MIT")
            .offline(true)
            .build();

        base.merge(&overrides);

        assert_eq!(base.server.host, "models.internal");
        assert_eq!(base.server.port, 7000);
        assert_eq!(base.model.chat_model, "claude");
        assert_eq!(base.model.analysis_model, "llama3");
        assert_eq!(base.analysis.target_license.as_deref(), Some("MIT"));
        assert!(base.model.offline);
    }

    #[test]
    fn test_generate_example_config_parses() {
        let example = generate_example_config();
        assert!(example.contains("server:"));
        assert!(example.contains("analysis_model"));
        let parsed: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        std::fs::write(&config_path, "model:\n  offline: true\n").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
