//! Default values for sbom-license-audit configuration.

use super::types::{AnalysisConfig, ModelConfig, ServerConfig};
use std::path::PathBuf;

/// Default model server host
pub const DEFAULT_SERVER_HOST: &str = "localhost";
/// Default model server port
pub const DEFAULT_SERVER_PORT: u16 = 9999;
/// Default connect timeout in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
/// Default read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;
/// Default model endpoint passed to the model server
pub const DEFAULT_MODEL_ENDPOINT: &str = "localhost";
/// Default workspace directory, relative to the project root
pub const DEFAULT_OUTPUT_DIR: &str = ".license-tool";
/// Default survey file name inside the workspace
pub const DEFAULT_SURVEY_FILE: &str = "license-survey.json";
/// Default matrix file name inside the workspace
pub const DEFAULT_MATRIX_FILE: &str = "matrix.csv";

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            chat_model: crate::session::DEFAULT_MODEL.to_string(),
            analysis_model: crate::session::DEFAULT_MODEL.to_string(),
            offline: false,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            matrix_path: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prompts_dir: None,
            target_license: None,
            survey_file: PathBuf::from(DEFAULT_SURVEY_FILE),
        }
    }
}
