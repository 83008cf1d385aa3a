//! Diff command handler.
//!
//! Implements the `diff` subcommand for comparing two inventories.

use crate::diff::{DiffEngine, DiffSummary};
use crate::model::{Dependency, DependencyChanges};
use crate::pipeline::{exit_codes, write_output, OutputTarget};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Settings of one `diff` invocation
#[derive(Debug, Clone)]
pub struct DiffCommand {
    /// Previous inventory; a missing file counts as an empty inventory
    pub previous: PathBuf,
    pub current: PathBuf,
    pub json: bool,
    pub output_file: Option<PathBuf>,
    /// Exit with [`exit_codes::CHANGES_DETECTED`] when anything changed
    pub fail_on_change: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiffReport<'a> {
    generated_at: DateTime<Utc>,
    summary: DiffSummary,
    #[serde(flatten)]
    changes: &'a DependencyChanges,
}

/// Run the diff command, returning the desired exit code.
pub fn run_diff(command: DiffCommand) -> Result<i32> {
    let diff = DiffEngine::new()
        .diff_files(Some(&command.previous), &command.current)
        .with_context(|| {
            format!(
                "failed to diff {} against {}",
                command.current.display(),
                command.previous.display()
            )
        })?;

    let summary = diff.summary();
    tracing::info!(
        "{} component(s) added, {} removed",
        summary.added,
        summary.removed
    );

    let changes = diff.to_changes();
    let content = if command.json {
        serde_json::to_string_pretty(&DiffReport {
            generated_at: Utc::now(),
            summary,
            changes: &changes,
        })
        .context("failed to serialize diff")?
    } else {
        render_text(&changes)
    };
    write_output(&content, &OutputTarget::from_option(command.output_file))?;

    Ok(if command.fail_on_change && summary.total_changes > 0 {
        exit_codes::CHANGES_DETECTED
    } else {
        exit_codes::SUCCESS
    })
}

fn render_text(changes: &DependencyChanges) -> String {
    if changes.is_empty() {
        return "No component changes".to_string();
    }
    let mut out = String::new();
    for (marker, deps) in [
        ('+', &changes.added_components),
        ('-', &changes.removed_components),
    ] {
        for dep in deps {
            let _ = writeln!(out, "{marker} {}", describe(dep));
        }
    }
    out.trim_end().to_string()
}

fn describe(dep: &Dependency) -> String {
    if dep.licenses.is_empty() {
        return dep.coordinate();
    }
    let licenses: Vec<&str> = dep.licenses.iter().map(|l| l.license_type()).collect();
    format!("{} ({})", dep.coordinate(), licenses.join(", "))
}
