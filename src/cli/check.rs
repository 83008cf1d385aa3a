//! Check command handler.
//!
//! Runs diff, matrix lookup and conflict triage on existing inventories
//! without regenerating anything.

use super::{license_source, prompt_templates, session_factory};
use crate::config::AppConfig;
use crate::diff::{DiffEngine, DiffSummary};
use crate::model::{ConflictRecord, License};
use crate::pipeline::{
    analyze_conflicts, exit_codes, load_matrix, render_plain_report, write_output,
    AnalysisSessions, ConflictAnalysis, OutputTarget,
};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Settings of one `check` invocation
#[derive(Debug, Clone)]
pub struct CheckCommand {
    pub current: PathBuf,
    /// Previous inventory; without one every component counts as added
    pub previous: Option<PathBuf>,
    /// Root the workspace, survey and default matrix paths resolve against
    pub project_root: PathBuf,
    /// Effective configuration, CLI overrides already merged
    pub config: AppConfig,
    pub json: bool,
    pub output_file: Option<PathBuf>,
    /// Exit with [`exit_codes::CONFLICTS_FOUND`] when any conflict remains
    pub fail_on_conflict: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PotentialEntry<'a> {
    license: &'a License,
    indicator: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckReport<'a> {
    generated_at: DateTime<Utc>,
    own_license: &'a License,
    summary: DiffSummary,
    potential: Vec<PotentialEntry<'a>>,
    conflicts: Vec<ConflictRecord>,
}

/// Run the check command, returning the desired exit code.
pub fn run_check(command: CheckCommand) -> Result<i32> {
    let config = &command.config;
    let diff = DiffEngine::new()
        .diff_files(command.previous.as_deref(), &command.current)
        .with_context(|| format!("failed to diff {}", command.current.display()))?;
    let changes = diff.to_changes();
    let summary = diff.summary();
    tracing::info!(
        "{} component(s) added, {} removed",
        summary.added,
        summary.removed
    );

    let own_license = license_source(config, &command.project_root).target_license();
    let analysis = if changes.added_components.is_empty() {
        ConflictAnalysis::default()
    } else {
        let matrix_path = config.matrix_path(&command.project_root);
        let matrix = load_matrix(&matrix_path)
            .with_context(|| format!("failed to load matrix {}", matrix_path.display()))?;
        let templates = prompt_templates(config);
        let factory = session_factory(config);
        analyze_conflicts(
            &own_license,
            &changes.added_licenses(),
            &matrix,
            &AnalysisSessions {
                factory: factory.as_ref(),
                model: &config.model.analysis_model,
                templates: &templates,
            },
        )
    };

    let content = if command.json {
        render_json(&own_license, summary, &analysis)?
    } else {
        render_text(&own_license, &analysis)
    };
    write_output(&content, &OutputTarget::from_option(command.output_file))?;

    Ok(if command.fail_on_conflict && analysis.has_conflicts() {
        exit_codes::CONFLICTS_FOUND
    } else {
        exit_codes::SUCCESS
    })
}

fn render_json(
    own_license: &License,
    summary: DiffSummary,
    analysis: &ConflictAnalysis,
) -> Result<String> {
    let report = CheckReport {
        generated_at: Utc::now(),
        own_license,
        summary,
        potential: analysis
            .potential
            .iter()
            .map(|(license, indicator)| PotentialEntry {
                license,
                indicator: indicator.as_str(),
            })
            .collect(),
        conflicts: analysis.partition.records(),
    };
    serde_json::to_string_pretty(&report).context("failed to serialize check report")
}

fn render_text(own_license: &License, analysis: &ConflictAnalysis) -> String {
    if analysis.has_conflicts() {
        render_plain_report(own_license, &analysis.partition)
            .trim_end()
            .to_string()
    } else {
        format!("No license conflicts for {own_license}")
    }
}
