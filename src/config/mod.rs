//! Configuration for sbom-license-audit.
//!
//! Settings come from a YAML file (discovered or explicit) layered under
//! command-line arguments:
//!
//! ```yaml
//! server:
//!   host: localhost
//!   port: 9999
//! model:
//!   analysis_model: gpt-4o
//! analysis:
//!   target_license: Apache-2.0
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MATRIX_FILE, DEFAULT_MODEL_ENDPOINT, DEFAULT_OUTPUT_DIR,
    DEFAULT_READ_TIMEOUT_MS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SURVEY_FILE,
};
pub use types::{AnalysisConfig, AppConfig, AppConfigBuilder, ModelConfig, ServerConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and complete `.sbom-license-audit.yaml` files.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
