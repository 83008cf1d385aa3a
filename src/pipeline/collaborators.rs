//! Collaborators the pipeline consumes.
//!
//! Inventory generation, the target-license configuration and result
//! presentation live outside the analysis core. Each is a trait with the
//! implementations the command line needs.

use crate::error::{AuditError, Result};
use crate::model::License;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::INVENTORY_FILE;

// ============================================================================
// Inventory generation
// ============================================================================

/// Produces the current inventory document for a project.
pub trait SbomGenerator: Send + Sync {
    /// Write the inventory into `output_dir` and return its path.
    fn generate(&self, project_root: &Path, output_dir: &Path, manifest: &Path) -> Result<PathBuf>;
}

/// Generator that copies an already-built inventory into place.
#[derive(Debug, Clone)]
pub struct FileSbomGenerator {
    source: PathBuf,
}

impl FileSbomGenerator {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl SbomGenerator for FileSbomGenerator {
    fn generate(&self, _project_root: &Path, output_dir: &Path, manifest: &Path) -> Result<PathBuf> {
        let target = output_dir.join(INVENTORY_FILE);
        tracing::debug!(
            "Copying inventory {} for manifest {}",
            self.source.display(),
            manifest.display()
        );
        std::fs::copy(&self.source, &target).map_err(|e| AuditError::io(&self.source, e))?;
        Ok(target)
    }
}

/// Maven CycloneDX plugin goal producing an aggregate XML inventory
const CYCLONEDX_GOAL: &str = "org.cyclonedx:cyclonedx-maven-plugin:2.9.1:makeAggregateBom";

/// Generator running the CycloneDX Maven plugin.
#[derive(Debug, Clone)]
pub struct MavenSbomGenerator {
    mvn_command: Option<PathBuf>,
}

impl Default for MavenSbomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MavenSbomGenerator {
    /// Generator that prefers the project's Maven wrapper over `mvn`
    #[must_use]
    pub const fn new() -> Self {
        Self { mvn_command: None }
    }

    /// Generator using an explicit Maven executable
    pub fn with_command(command: impl Into<PathBuf>) -> Self {
        Self {
            mvn_command: Some(command.into()),
        }
    }

    fn command_for(&self, project_root: &Path) -> PathBuf {
        if let Some(command) = &self.mvn_command {
            return command.clone();
        }
        let wrapper = project_root.join(if cfg!(windows) { "mvnw.cmd" } else { "mvnw" });
        if wrapper.exists() {
            wrapper
        } else {
            PathBuf::from("mvn")
        }
    }
}

/// Resolve a path against the current directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| AuditError::io(path, e))?;
    Ok(cwd.join(path))
}

impl SbomGenerator for MavenSbomGenerator {
    /// All three paths are taken relative to the caller's working directory;
    /// Maven itself runs inside `project_root`.
    fn generate(&self, project_root: &Path, output_dir: &Path, manifest: &Path) -> Result<PathBuf> {
        let project_root = absolute(project_root)?;
        let output_dir = absolute(output_dir)?;
        let manifest = absolute(manifest)?;
        std::fs::create_dir_all(&output_dir).map_err(|e| AuditError::io(&output_dir, e))?;

        let command = self.command_for(&project_root);
        tracing::info!(
            "Generating inventory with {} for {}",
            command.display(),
            manifest.display()
        );

        let output = Command::new(&command)
            .current_dir(&project_root)
            .arg(CYCLONEDX_GOAL)
            .arg("-f")
            .arg(&manifest)
            .arg("-DoutputFormat=xml")
            .arg(format!("-DoutputDirectory={}", output_dir.display()))
            .arg("-DoutputName=bom")
            .arg("-DincludeBomSerialNumber=false")
            .arg("-B")
            .output()
            .map_err(|e| AuditError::io(&command, e))?;

        if !output.status.success() {
            tracing::debug!("{}", String::from_utf8_lossy(&output.stdout));
            return Err(AuditError::config(format!(
                "inventory generation failed with {}",
                output.status
            )));
        }

        let target = output_dir.join(INVENTORY_FILE);
        if !target.exists() {
            return Err(AuditError::config(format!(
                "inventory not found at {} after generation",
                target.display()
            )));
        }
        Ok(target)
    }
}

// ============================================================================
// Target license configuration
// ============================================================================

/// Supplies the project's own license and the questionnaire context.
pub trait LicenseConfigSource: Send + Sync {
    /// Own license; typed `unknown` when nothing is configured
    fn target_license(&self) -> License;

    /// Licensing questionnaire answers given to the model as context
    fn questionnaire(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }
}

/// License configuration read from the licensing survey file.
///
/// The first entry of `existingLicensesUsed` is the target license.
#[derive(Debug, Clone)]
pub struct SurveyLicenseSource {
    path: PathBuf,
}

impl SurveyLicenseSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Option<Value> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Error reading license survey {}: {}", self.path.display(), err);
                return None;
            }
        };
        match serde_json::from_str::<Value>(content.trim()) {
            Ok(value @ Value::Object(_)) => Some(value),
            Ok(_) => {
                tracing::warn!("License survey {} is not a JSON object", self.path.display());
                None
            }
            Err(err) => {
                tracing::warn!("Error parsing license survey {}: {}", self.path.display(), err);
                None
            }
        }
    }
}

impl LicenseConfigSource for SurveyLicenseSource {
    fn target_license(&self) -> License {
        self.read()
            .as_ref()
            .and_then(|survey| survey.get("existingLicensesUsed"))
            .and_then(Value::as_array)
            .and_then(|licenses| licenses.first())
            .and_then(Value::as_str)
            .map_or_else(License::unknown, License::new)
    }

    fn questionnaire(&self) -> Value {
        self.read()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    }
}

/// Fixed license, used for command-line overrides.
#[derive(Debug, Clone)]
pub struct StaticLicenseSource {
    license: License,
}

impl StaticLicenseSource {
    pub fn new(license: License) -> Self {
        Self { license }
    }
}

impl LicenseConfigSource for StaticLicenseSource {
    fn target_license(&self) -> License {
        self.license.clone()
    }
}

// ============================================================================
// Presentation
// ============================================================================

/// Receives the finished report and the busy signal.
pub trait Notifier: Send + Sync {
    fn present(&self, report: &str);

    fn set_busy(&self, busy: bool);
}

/// Notifier printing reports to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn present(&self, report: &str) {
        println!("{report}");
    }

    fn set_busy(&self, busy: bool) {
        tracing::debug!("Pipeline busy: {}", busy);
    }
}
