//! Run command handler.
//!
//! Drives the full pipeline once for a changed build manifest.

use super::{license_source, prompt_templates, session_factory, session_registry};
use crate::config::AppConfig;
use crate::pipeline::{
    exit_codes, AuditPipeline, FileSbomGenerator, MavenSbomGenerator, PipelineSettings,
    RunOutcome, SbomGenerator, StdoutNotifier,
};
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings of one `run` invocation
#[derive(Debug, Clone)]
pub struct RunCommand {
    /// Build manifest whose change triggered the run; relative paths start at `project_root`
    pub manifest: PathBuf,
    /// Pre-built inventory to copy into the workspace instead of invoking Maven
    pub bom: Option<PathBuf>,
    pub project_root: PathBuf,
    pub config: AppConfig,
}

/// Pipeline settings for a project under the given configuration
#[must_use]
pub fn pipeline_settings(config: &AppConfig, project_root: &Path) -> PipelineSettings {
    PipelineSettings {
        project_root: project_root.to_path_buf(),
        output_dir: config.analysis.output_dir.clone(),
        matrix_path: config.matrix_path(project_root),
        chat_model: config.model.chat_model.clone(),
        analysis_model: config.model.analysis_model.clone(),
    }
}

/// Run the audit pipeline, returning the desired exit code.
pub fn run_audit(command: RunCommand) -> Result<i32> {
    let manifest = command.project_root.join(&command.manifest);
    if !manifest.exists() {
        bail!("manifest {} does not exist", manifest.display());
    }
    if let Some(bom) = command.bom.as_ref().filter(|bom| !bom.exists()) {
        bail!("inventory {} does not exist", bom.display());
    }

    let config = &command.config;
    let generator: Box<dyn SbomGenerator> = match &command.bom {
        Some(bom) => Box::new(FileSbomGenerator::new(bom)),
        None => Box::new(MavenSbomGenerator::new()),
    };
    let templates = prompt_templates(config);
    let registry = session_registry(session_factory(config), &templates);

    let pipeline = AuditPipeline::new(
        pipeline_settings(config, &command.project_root),
        generator,
        license_source(config, &command.project_root),
        Arc::new(StdoutNotifier),
        registry,
        templates,
    );

    let outcome = pipeline.run(&manifest);
    Ok(exit_code(&outcome))
}

fn exit_code(outcome: &RunOutcome) -> i32 {
    if outcome.analysis.has_conflicts() {
        exit_codes::CONFLICTS_FOUND
    } else if !outcome.changes.is_empty() {
        exit_codes::CHANGES_DETECTED
    } else {
        exit_codes::SUCCESS
    }
}
