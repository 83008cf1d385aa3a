//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand
//! and returns the process exit code.

mod check;
mod diff;
mod run;

pub use check::{run_check, CheckCommand};
pub use diff::{run_diff, DiffCommand};
pub use run::{pipeline_settings, run_audit, RunCommand};

use crate::config::AppConfig;
use crate::model::License;
use crate::pipeline::{LicenseConfigSource, StaticLicenseSource, SurveyLicenseSource};
use crate::session::{
    OfflineSessionFactory, PromptTemplates, RpcSessionFactory, SessionFactory, SessionRegistry,
};
use crate::transport::SocketTransport;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Session factory for the configured model server, or an offline one.
#[must_use]
pub fn session_factory(config: &AppConfig) -> Arc<dyn SessionFactory> {
    if config.model.offline {
        tracing::info!("Offline mode: conflicts are not sent to a model");
        return Arc::new(OfflineSessionFactory);
    }
    let transport = SocketTransport::new(config.transport_config());
    Arc::new(RpcSessionFactory::new(
        Arc::new(transport),
        config.model.endpoint.clone(),
    ))
}

/// Prompt templates from the configured directory, built-ins otherwise.
#[must_use]
pub fn prompt_templates(config: &AppConfig) -> PromptTemplates {
    PromptTemplates::load(config.analysis.prompts_dir.as_deref())
}

/// Session registry whose chat sessions start from the `system` template.
#[must_use]
pub fn session_registry(
    factory: Arc<dyn SessionFactory>,
    templates: &PromptTemplates,
) -> Arc<SessionRegistry> {
    Arc::new(SessionRegistry::new(factory, templates.system.clone()))
}

/// Absolute project root: the explicit one, else the current directory.
pub fn resolve_project_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(root) => root
            .canonicalize()
            .with_context(|| format!("cannot resolve project root {}", root.display())),
        None => std::env::current_dir().context("cannot determine current directory"),
    }
}

/// Target-license source: an explicit license wins over the licensing survey.
#[must_use]
pub fn license_source(config: &AppConfig, project_root: &Path) -> Box<dyn LicenseConfigSource> {
    match &config.analysis.target_license {
        Some(license) => Box::new(StaticLicenseSource::new(License::new(license.as_str()))),
        None => Box::new(SurveyLicenseSource::new(config.survey_path(project_root))),
    }
}
