//! Full dependency-change run.

use super::collaborators::{LicenseConfigSource, Notifier, SbomGenerator};
use super::conflict_stage::{analyze_conflicts, load_matrix, AnalysisSessions, ConflictAnalysis};
use super::diff_stage::{compute_changes, write_diff_artifact};
use super::report_stage::{present_findings, ReportContext};
use super::sbom_stage::refresh_inventory;
use super::PipelineError;
use crate::model::{DependencyChanges, License};
use crate::session::{PromptTemplates, SessionRegistry};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Paths and models of a pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub project_root: PathBuf,
    /// Workspace directory, relative to the project root
    pub output_dir: PathBuf,
    pub matrix_path: PathBuf,
    /// Model of the user-facing chat session
    pub chat_model: String,
    /// Model of the reasoning and categorization sessions
    pub analysis_model: String,
}

impl PipelineSettings {
    /// Directory holding the inventories and the diff artifact
    #[must_use]
    pub fn workspace(&self) -> PathBuf {
        self.project_root.join(&self.output_dir)
    }
}

/// Result of one run. The default value means "no findings".
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub own_license: Option<License>,
    pub changes: DependencyChanges,
    pub analysis: ConflictAnalysis,
    /// Text handed to the notifier, if anything was presented
    pub report: Option<String>,
}

/// Clears the busy signal when dropped
struct BusyGuard<'a>(&'a dyn Notifier);

impl<'a> BusyGuard<'a> {
    fn new(notifier: &'a dyn Notifier) -> Self {
        notifier.set_busy(true);
        Self(notifier)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set_busy(false);
    }
}

/// Runs regenerate → diff → conflicts → report for one project.
///
/// Runs are serialized: a second `run` waits for the first to finish instead
/// of racing on the inventory files.
pub struct AuditPipeline {
    settings: PipelineSettings,
    generator: Box<dyn SbomGenerator>,
    license_source: Box<dyn LicenseConfigSource>,
    notifier: Arc<dyn Notifier>,
    registry: Arc<SessionRegistry>,
    templates: PromptTemplates,
    run_lock: Mutex<()>,
}

impl AuditPipeline {
    pub fn new(
        settings: PipelineSettings,
        generator: Box<dyn SbomGenerator>,
        license_source: Box<dyn LicenseConfigSource>,
        notifier: Arc<dyn Notifier>,
        registry: Arc<SessionRegistry>,
        templates: PromptTemplates,
    ) -> Self {
        Self {
            settings,
            generator,
            license_source,
            notifier,
            registry,
            templates,
            run_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Analyze the dependency change behind `manifest`.
    ///
    /// Stage failures are logged and reported as no findings.
    pub fn run(&self, manifest: &Path) -> RunOutcome {
        let _run = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let _busy = BusyGuard::new(self.notifier.as_ref());

        tracing::info!("Dependency change detected in {}", manifest.display());
        match self.try_run(manifest) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!("Dependency analysis aborted: {}", err);
                RunOutcome::default()
            }
        }
    }

    fn try_run(&self, manifest: &Path) -> Result<RunOutcome, PipelineError> {
        let workspace = self.settings.workspace();
        let pair = refresh_inventory(
            self.generator.as_ref(),
            &self.settings.project_root,
            &workspace,
            manifest,
        )?;

        let changes = compute_changes(&pair)?;
        if changes.is_empty() {
            return Ok(RunOutcome {
                changes,
                ..RunOutcome::default()
            });
        }
        write_diff_artifact(&workspace, &changes);

        let own_license = self.license_source.target_license();
        let matrix = load_matrix(&self.settings.matrix_path)?;
        let analysis = analyze_conflicts(
            &own_license,
            &changes.added_licenses(),
            &matrix,
            &AnalysisSessions {
                factory: self.registry.factory().as_ref(),
                model: &self.settings.analysis_model,
                templates: &self.templates,
            },
        );

        let report = if analysis.has_conflicts() {
            let questionnaire = self.license_source.questionnaire();
            Some(present_findings(
                &self.registry,
                &self.settings.chat_model,
                &self.templates,
                self.notifier.as_ref(),
                &ReportContext {
                    own_license: &own_license,
                    changes: &changes,
                    partition: &analysis.partition,
                    questionnaire: &questionnaire,
                },
            ))
        } else {
            tracing::info!("No license conflicts found");
            None
        };

        Ok(RunOutcome {
            own_license: Some(own_license),
            changes,
            analysis,
            report,
        })
    }
}
